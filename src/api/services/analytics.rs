//! 统计接口（数据为模拟生成）

use actix_web::{Responder, web};
use chrono::Utc;
use tracing::{debug, error};

use crate::analytics::{LiveRefresher, export_filename};
use crate::api::middleware::AuthUser;
use crate::errors::BiolinkerError;
use crate::services::DashboardSessions;

use super::helpers::{attachment_response, error_from_biolinker, success_response};
use super::types::{AnalyticsResponse, LiveToggleRequest};

fn analytics_response(refresher: &LiveRefresher) -> AnalyticsResponse {
    AnalyticsResponse {
        live: refresher.is_live(),
        refresh_secs: refresher.interval().as_secs(),
        snapshot: (*refresher.current()).clone(),
    }
}

pub async fn get_analytics(
    user: AuthUser,
    sessions: web::Data<DashboardSessions>,
) -> impl Responder {
    let session = sessions.session(&user.user_id).await;
    success_response(analytics_response(&session.analytics))
}

pub async fn refresh_analytics(
    user: AuthUser,
    sessions: web::Data<DashboardSessions>,
) -> impl Responder {
    let session = sessions.session(&user.user_id).await;
    session.analytics.refresh();
    success_response(analytics_response(&session.analytics))
}

pub async fn toggle_live(
    user: AuthUser,
    sessions: web::Data<DashboardSessions>,
    body: web::Json<LiveToggleRequest>,
) -> impl Responder {
    let session = sessions.session(&user.user_id).await;
    session.analytics.set_live(body.enabled);
    debug!("Live analytics for {} set to {}", user.user_id, body.enabled);
    success_response(analytics_response(&session.analytics))
}

/// 以 JSON 附件形式导出当前快照
pub async fn export_analytics(
    user: AuthUser,
    sessions: web::Data<DashboardSessions>,
) -> impl Responder {
    let session = sessions.session(&user.user_id).await;
    let snapshot = session.analytics.current();

    match serde_json::to_string_pretty(&*snapshot) {
        Ok(body) => attachment_response(
            "application/json; charset=utf-8",
            &export_filename(Utc::now().date_naive()),
            body,
        ),
        Err(e) => {
            error!("Failed to serialize analytics export: {}", e);
            error_from_biolinker(&BiolinkerError::from(e))
        }
    }
}
