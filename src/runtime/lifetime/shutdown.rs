use std::time::Duration;

use tokio::signal;
use tokio::time::timeout;
use tracing::{error, info, warn};

use crate::services::DashboardSessions;

/// 关闭超时时间（秒）
const SHUTDOWN_TIMEOUT_SECS: u64 = 10;

pub async fn listen_for_shutdown(sessions: &DashboardSessions) {
    match signal::ctrl_c().await {
        Ok(()) => {
            info!("Shutdown signal received, closing dashboard sessions...");
        }
        Err(e) => {
            warn!(
                "Failed to listen for Ctrl+C: {}. Proceeding with shutdown anyway.",
                e
            );
        }
    }

    let open = sessions.session_count();
    match timeout(Duration::from_secs(SHUTDOWN_TIMEOUT_SECS), sessions.clear()).await {
        Ok(()) => {
            info!("Closed {} dashboard sessions", open);
        }
        Err(_) => {
            error!(
                "Closing dashboard sessions timed out after {} seconds",
                SHUTDOWN_TIMEOUT_SECS
            );
        }
    }
}
