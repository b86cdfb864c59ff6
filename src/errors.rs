use std::fmt;

use actix_web::http::StatusCode;

#[derive(Debug, Clone)]
pub enum BiolinkerError {
    DatabaseConfig(String),
    DatabaseConnection(String),
    DatabaseOperation(String),
    FileOperation(String),
    Validation(String),
    NotFound(String),
    Conflict(String),
    Unauthorized(String),
    Serialization(String),
    ExternalService(String),
    Internal(String),
}

impl BiolinkerError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            BiolinkerError::DatabaseConfig(_) => "E001",
            BiolinkerError::DatabaseConnection(_) => "E002",
            BiolinkerError::DatabaseOperation(_) => "E003",
            BiolinkerError::FileOperation(_) => "E004",
            BiolinkerError::Validation(_) => "E005",
            BiolinkerError::NotFound(_) => "E006",
            BiolinkerError::Conflict(_) => "E007",
            BiolinkerError::Unauthorized(_) => "E008",
            BiolinkerError::Serialization(_) => "E009",
            BiolinkerError::ExternalService(_) => "E010",
            BiolinkerError::Internal(_) => "E011",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            BiolinkerError::DatabaseConfig(_) => "Database Configuration Error",
            BiolinkerError::DatabaseConnection(_) => "Database Connection Error",
            BiolinkerError::DatabaseOperation(_) => "Database Operation Error",
            BiolinkerError::FileOperation(_) => "File Operation Error",
            BiolinkerError::Validation(_) => "Validation Error",
            BiolinkerError::NotFound(_) => "Resource Not Found",
            BiolinkerError::Conflict(_) => "Conflict",
            BiolinkerError::Unauthorized(_) => "Unauthorized",
            BiolinkerError::Serialization(_) => "Serialization Error",
            BiolinkerError::ExternalService(_) => "External Service Error",
            BiolinkerError::Internal(_) => "Internal Error",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            BiolinkerError::DatabaseConfig(msg)
            | BiolinkerError::DatabaseConnection(msg)
            | BiolinkerError::DatabaseOperation(msg)
            | BiolinkerError::FileOperation(msg)
            | BiolinkerError::Validation(msg)
            | BiolinkerError::NotFound(msg)
            | BiolinkerError::Conflict(msg)
            | BiolinkerError::Unauthorized(msg)
            | BiolinkerError::Serialization(msg)
            | BiolinkerError::ExternalService(msg)
            | BiolinkerError::Internal(msg) => msg,
        }
    }

    /// 映射到 HTTP 状态码
    pub fn http_status(&self) -> StatusCode {
        match self {
            BiolinkerError::Validation(_) => StatusCode::BAD_REQUEST,
            BiolinkerError::NotFound(_) => StatusCode::NOT_FOUND,
            BiolinkerError::Conflict(_) => StatusCode::CONFLICT,
            BiolinkerError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            BiolinkerError::ExternalService(_) => StatusCode::BAD_GATEWAY,
            BiolinkerError::DatabaseConnection(_) => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Validation errors are caught before any store call; everything
    /// else counts as a failed remote operation.
    pub fn is_validation(&self) -> bool {
        matches!(self, BiolinkerError::Validation(_))
    }

    /// 格式化为彩色输出（用于 Server 模式）
    #[cfg(feature = "server")]
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        format!(
            "{} {} {}\n  {}",
            "[ERROR]".red().bold(),
            self.code().yellow(),
            self.error_type().red(),
            self.message().white()
        )
    }

    /// 格式化为简洁输出（用于 CLI 模式）
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for BiolinkerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for BiolinkerError {}

// 便捷的构造函数
impl BiolinkerError {
    pub fn database_config<T: Into<String>>(msg: T) -> Self {
        BiolinkerError::DatabaseConfig(msg.into())
    }

    pub fn database_connection<T: Into<String>>(msg: T) -> Self {
        BiolinkerError::DatabaseConnection(msg.into())
    }

    pub fn database_operation<T: Into<String>>(msg: T) -> Self {
        BiolinkerError::DatabaseOperation(msg.into())
    }

    pub fn validation<T: Into<String>>(msg: T) -> Self {
        BiolinkerError::Validation(msg.into())
    }

    pub fn not_found<T: Into<String>>(msg: T) -> Self {
        BiolinkerError::NotFound(msg.into())
    }

    pub fn conflict<T: Into<String>>(msg: T) -> Self {
        BiolinkerError::Conflict(msg.into())
    }

    pub fn unauthorized<T: Into<String>>(msg: T) -> Self {
        BiolinkerError::Unauthorized(msg.into())
    }

    pub fn external_service<T: Into<String>>(msg: T) -> Self {
        BiolinkerError::ExternalService(msg.into())
    }

    pub fn internal<T: Into<String>>(msg: T) -> Self {
        BiolinkerError::Internal(msg.into())
    }
}

// 为常见的错误类型实现 From trait
impl From<sea_orm::DbErr> for BiolinkerError {
    fn from(err: sea_orm::DbErr) -> Self {
        BiolinkerError::DatabaseOperation(err.to_string())
    }
}

impl From<std::io::Error> for BiolinkerError {
    fn from(err: std::io::Error) -> Self {
        BiolinkerError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for BiolinkerError {
    fn from(err: serde_json::Error) -> Self {
        BiolinkerError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, BiolinkerError>;
