//! Per-user dashboard sessions
//!
//! Each signed-in user gets one [`DashboardSession`] held in an
//! idle-expiring moka cache. The dashboard container sits behind an async
//! mutex so two requests for the same user never interleave mutations.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use tokio::sync::Mutex;
use tracing::debug;

use crate::analytics::LiveRefresher;
use crate::config::StaticConfig;
use crate::services::dashboard::DashboardState;
use crate::storage::traits::Backend;

pub struct DashboardSession {
    pub dashboard: Mutex<DashboardState>,
    pub analytics: LiveRefresher,
}

#[derive(Clone)]
pub struct DashboardSessions {
    cache: Cache<String, Arc<DashboardSession>>,
    store: Arc<dyn Backend>,
    live_interval: Duration,
}

impl DashboardSessions {
    pub fn new(
        store: Arc<dyn Backend>,
        idle: Duration,
        max_sessions: u64,
        live_interval: Duration,
    ) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_sessions)
            .time_to_idle(idle)
            .eviction_listener(|user_id: Arc<String>, _, cause| {
                debug!("Dashboard session for {} evicted ({:?})", user_id, cause);
            })
            .build();

        Self {
            cache,
            store,
            live_interval,
        }
    }

    pub fn from_config(store: Arc<dyn Backend>, config: &StaticConfig) -> Self {
        Self::new(
            store,
            Duration::from_secs(config.dashboard.session_idle_secs),
            config.dashboard.max_sessions,
            Duration::from_secs(config.analytics.live_refresh_secs.max(1)),
        )
    }

    /// 获取或创建会话；不访问数据库，首次加载由调用方完成
    pub async fn session(&self, user_id: &str) -> Arc<DashboardSession> {
        let store = self.store.clone();
        let interval = self.live_interval;
        let owner = user_id.to_string();

        self.cache
            .get_with(user_id.to_string(), async move {
                debug!("New dashboard session for {}", owner);
                Arc::new(DashboardSession {
                    dashboard: Mutex::new(DashboardState::new(owner, store)),
                    analytics: LiveRefresher::new(interval),
                })
            })
            .await
    }

    /// 登出时丢弃会话（同时停止实时刷新）
    pub async fn end(&self, user_id: &str) {
        self.cache.invalidate(user_id).await;
    }

    /// 关闭时清空所有会话，随之停止全部实时刷新任务
    pub async fn clear(&self) {
        self.cache.invalidate_all();
        self.cache.run_pending_tasks().await;
    }

    pub fn session_count(&self) -> u64 {
        self.cache.entry_count()
    }

    pub fn store(&self) -> Arc<dyn Backend> {
        self.store.clone()
    }
}
