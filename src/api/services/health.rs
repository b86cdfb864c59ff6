use actix_web::{HttpResponse, Responder, http::StatusCode, web};
use serde::Serialize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{error, info, trace};

use crate::storage::SeaOrmStorage;

use super::error_code::ErrorCode;
use super::helpers::json_response;

const STORAGE_PING_TIMEOUT: Duration = Duration::from_secs(5);

// 应用启动时间
#[derive(Clone, Debug)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}

impl AppStartTime {
    pub fn now() -> Self {
        Self {
            start_datetime: chrono::Utc::now(),
        }
    }
}

#[derive(Serialize, Debug)]
pub struct HealthStorageCheck {
    pub status: String,
    pub backend: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Serialize, Debug)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub uptime: u64,
    pub storage: HealthStorageCheck,
    pub response_time_ms: u32,
}

/// 运行时长，如 "2d 3h"、"5m 12s"
pub fn format_uptime(seconds: u64) -> String {
    let days = seconds / 86_400;
    let hours = (seconds % 86_400) / 3_600;
    let minutes = (seconds % 3_600) / 60;
    let secs = seconds % 60;

    if days > 0 {
        format!("{}d {}h", days, hours)
    } else if hours > 0 {
        format!("{}h {}m", hours, minutes)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, secs)
    } else {
        format!("{}s", secs)
    }
}

pub async fn health_check(
    storage: web::Data<Arc<SeaOrmStorage>>,
    app_start_time: web::Data<AppStartTime>,
) -> impl Responder {
    let start_time = Instant::now();
    trace!("Received health check request");

    let backend = storage.backend_name().to_string();
    let storage_status = match tokio::time::timeout(STORAGE_PING_TIMEOUT, storage.ping()).await {
        Ok(Ok(())) => HealthStorageCheck {
            status: "healthy".to_string(),
            backend,
            error: None,
        },
        Ok(Err(e)) => {
            error!("Storage health check failed: {}", e);
            HealthStorageCheck {
                status: "unhealthy".to_string(),
                backend,
                error: Some(format!("database error: {}", e.message())),
            }
        }
        Err(_) => {
            error!("Storage health check timeout");
            HealthStorageCheck {
                status: "unhealthy".to_string(),
                backend,
                error: Some("timeout".to_string()),
            }
        }
    };

    let now = chrono::Utc::now();
    let uptime = (now - app_start_time.start_datetime).num_seconds().max(0) as u64;
    let is_healthy = storage_status.status == "healthy";

    let data = HealthResponse {
        status: storage_status.status.clone(),
        timestamp: now.to_rfc3339(),
        uptime,
        storage: storage_status,
        response_time_ms: start_time.elapsed().as_millis() as u32,
    };

    info!(
        "Health check completed in {:?}, status: {}, uptime: {}",
        start_time.elapsed(),
        data.status,
        format_uptime(uptime)
    );

    if is_healthy {
        json_response(StatusCode::OK, ErrorCode::Success, "OK", Some(data))
    } else {
        json_response(
            StatusCode::SERVICE_UNAVAILABLE,
            ErrorCode::ServiceUnavailable,
            "Service Unavailable",
            Some(data),
        )
    }
}

// 活跃性检查
pub async fn liveness_check() -> impl Responder {
    trace!("Received liveness check request");
    HttpResponse::NoContent().finish()
}
