use std::sync::Arc;

use crate::errors::Result;

pub mod backend;
pub mod models;
pub mod traits;

pub use backend::{PROFILE_EXISTS, SeaOrmStorage};
pub use models::{
    Account, AuthProvider, Link, LinkClickEvent, LinkIcon, LinkPatch, NewLink, NewProfile,
    Profile, ProfilePatch, Theme,
};
pub use traits::{AccountStore, Backend, ClickSink, LinkStore, ProfileStore};

pub struct StorageFactory;

impl StorageFactory {
    /// 按全局配置创建存储（自动推断数据库类型并执行迁移）
    pub async fn create() -> Result<Arc<SeaOrmStorage>> {
        let config = crate::config::get_config();
        let database_url = &config.database.database_url;

        let backend_type = backend::infer_backend_from_url(database_url)?;

        let storage = SeaOrmStorage::new(database_url, &backend_type, &config.database).await?;
        Ok(Arc::new(storage))
    }
}
