//! 统一 API 错误码定义

use serde_repr::{Deserialize_repr, Serialize_repr};

use crate::errors::BiolinkerError;

/// API 错误码
///
/// 使用 serde_repr 序列化为数字。按千位分域：
/// - 0: 成功
/// - 1000-1099: 通用错误
/// - 2000-2099: 认证错误
/// - 3000-3099: 仪表盘错误
/// - 4000-4099: 二维码错误
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize_repr, Deserialize_repr)]
#[repr(i32)]
pub enum ErrorCode {
    Success = 0,

    BadRequest = 1000,
    Unauthorized = 1001,
    NotFound = 1004,
    InternalServerError = 1005,
    Conflict = 1009,
    ServiceUnavailable = 1030,

    AuthFailed = 2000,
    TokenInvalid = 2002,

    DashboardValidation = 3000,
    LinkNotFound = 3001,
    DashboardStoreFailed = 3005,

    QrInvalidOptions = 4000,
    QrUpstreamFailed = 4001,
}

impl From<&BiolinkerError> for ErrorCode {
    fn from(err: &BiolinkerError) -> Self {
        match err {
            BiolinkerError::Validation(_) => ErrorCode::BadRequest,
            BiolinkerError::NotFound(_) => ErrorCode::NotFound,
            BiolinkerError::Conflict(_) => ErrorCode::Conflict,
            BiolinkerError::Unauthorized(_) => ErrorCode::AuthFailed,
            BiolinkerError::ExternalService(_) => ErrorCode::QrUpstreamFailed,
            BiolinkerError::DatabaseConnection(_) => ErrorCode::ServiceUnavailable,
            _ => ErrorCode::InternalServerError,
        }
    }
}

impl ErrorCode {
    /// 仪表盘操作使用更细的错误码
    pub fn for_dashboard(err: &BiolinkerError) -> Self {
        match err {
            BiolinkerError::Validation(_) => ErrorCode::DashboardValidation,
            BiolinkerError::NotFound(_) => ErrorCode::LinkNotFound,
            BiolinkerError::Conflict(_) => ErrorCode::Conflict,
            _ => ErrorCode::DashboardStoreFailed,
        }
    }
}
