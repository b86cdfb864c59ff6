//! SeaORM storage backend
//!
//! Implements the profile, link, click and account stores on top of
//! SeaORM, supporting SQLite, MySQL/MariaDB and PostgreSQL.

mod accounts;
mod clicks;
mod connection;
mod converters;
mod links;
mod profiles;

use sea_orm::{DatabaseConnection, DbErr, SqlErr};
use tracing::info;

use crate::config::DatabaseConfig;
use crate::errors::{BiolinkerError, Result};

pub use connection::{connect_generic, connect_sqlite, run_migrations};
pub use converters::{model_to_link, model_to_profile};
pub use profiles::PROFILE_EXISTS;

/// 从数据库 URL 推断数据库类型
pub fn infer_backend_from_url(database_url: &str) -> Result<String> {
    if database_url.starts_with("sqlite:")
        || database_url.ends_with(".db")
        || database_url.ends_with(".sqlite")
        || database_url == ":memory:"
    {
        Ok("sqlite".to_string())
    } else if database_url.starts_with("mysql://") || database_url.starts_with("mariadb://") {
        Ok("mysql".to_string())
    } else if database_url.starts_with("postgres://") || database_url.starts_with("postgresql://") {
        Ok("postgres".to_string())
    } else {
        Err(BiolinkerError::database_config(format!(
            "无法从 URL 推断数据库类型: {}. 支持的 URL 格式: sqlite://, mysql://, mariadb://, postgres://",
            database_url
        )))
    }
}

/// SeaORM-based storage backend
#[derive(Clone)]
pub struct SeaOrmStorage {
    db: DatabaseConnection,
    backend_name: String,
}

impl SeaOrmStorage {
    pub async fn new(
        database_url: &str,
        backend_name: &str,
        config: &DatabaseConfig,
    ) -> Result<Self> {
        if database_url.is_empty() {
            return Err(BiolinkerError::database_config("database_url 未设置"));
        }

        let db = if backend_name == "sqlite" {
            connect_sqlite(database_url, config).await?
        } else {
            connect_generic(database_url, backend_name, config).await?
        };

        run_migrations(&db).await?;

        info!("{} storage initialized", backend_name.to_uppercase());
        Ok(SeaOrmStorage {
            db,
            backend_name: backend_name.to_string(),
        })
    }

    pub fn backend_name(&self) -> &str {
        &self.backend_name
    }

    /// 健康检查用：执行一次 ping
    pub async fn ping(&self) -> Result<()> {
        self.db
            .ping()
            .await
            .map_err(|e| BiolinkerError::database_connection(e.to_string()))
    }
}

/// 唯一索引冲突映射为 Conflict，其余保持数据库操作错误
fn map_write_err(err: DbErr, conflict_msg: &str) -> BiolinkerError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => BiolinkerError::conflict(conflict_msg),
        _ => BiolinkerError::database_operation(err.to_string()),
    }
}
