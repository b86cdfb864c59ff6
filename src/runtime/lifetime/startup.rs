use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use crate::api::jwt::get_jwt_service;
use crate::config::get_config;
use crate::services::{AuthGateway, DashboardSessions, PublicProfileService, QrService};
use crate::storage::traits::{AccountStore, Backend};
use crate::storage::{SeaOrmStorage, StorageFactory};

/// 服务器运行所需的共享组件
pub struct StartupContext {
    pub storage: Arc<SeaOrmStorage>,
    pub store: Arc<dyn Backend>,
    pub sessions: DashboardSessions,
    pub public_profiles: PublicProfileService,
    pub auth: AuthGateway,
    pub qr: QrService,
}

impl StartupContext {
    /// 由已连接的存储组装全部服务（测试也通过这里构建）
    pub fn from_storage(storage: Arc<SeaOrmStorage>) -> Self {
        let config = get_config();
        let store: Arc<dyn Backend> = storage.clone();
        let accounts: Arc<dyn AccountStore> = storage.clone();

        Self {
            sessions: DashboardSessions::from_config(store.clone(), &config),
            public_profiles: PublicProfileService::new(store.clone()),
            auth: AuthGateway::new(accounts, get_jwt_service(), &config),
            qr: QrService::new(&config.qr),
            storage,
            store,
        }
    }
}

/// 准备服务器启动的上下文：连接数据库、执行迁移、组装服务
pub async fn prepare_server_startup() -> Result<StartupContext> {
    let start_time = std::time::Instant::now();
    debug!("Starting pre-startup processing...");

    let config = get_config();
    if config.auth.jwt_secret.is_empty() {
        warn!("auth.jwt_secret is empty, using a random secret; tokens will not survive a restart");
    }

    let storage = StorageFactory::create()
        .await
        .context("Failed to initialize storage")?;
    info!("Using storage backend: {}", storage.backend_name());

    let context = StartupContext::from_storage(storage);

    debug!(
        "Pre-startup processing completed in {} ms",
        start_time.elapsed().as_millis()
    );
    Ok(context)
}
