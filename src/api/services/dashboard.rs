//! 仪表盘接口
//!
//! 每个请求先取得当前用户的会话并持有其锁，整个操作期间同一用户的
//! 其他写请求会排队等待。

use actix_web::{HttpResponse, Responder, http::StatusCode, web};
use serde::Serialize;
use tracing::{debug, error};

use crate::api::middleware::AuthUser;
use crate::config::get_config;
use crate::errors::Result;
use crate::services::dashboard::DashboardState;
use crate::services::public_profile::public_url;
use crate::services::{DashboardSessions, Notice, Operation, PublicProfileService};
use crate::storage::models::{LinkPatch, NewLink, ProfilePatch, Theme};

use super::helpers::{notice_error_response, success_response};
use super::public::{html_response, not_found_page, render_profile_page};
use super::types::{DashboardResponse, OperationResponse, ReorderRequest};

fn dashboard_response(dashboard: &DashboardState) -> DashboardResponse {
    let site_url = get_config().server.site_url.clone();
    DashboardResponse {
        public_url: dashboard
            .profile()
            .map(|p| public_url(&site_url, &p.username)),
        view: dashboard.view(),
        themes: Theme::keys(),
    }
}

/// 写操作结果 → 带 notice 的响应
fn operation_response<T: Serialize>(
    op: Operation,
    result: Result<T>,
    dashboard: &DashboardState,
) -> HttpResponse {
    match result {
        Ok(item) => success_response(OperationResponse {
            notice: Notice::success(op),
            item: Some(item),
            dashboard: dashboard.view(),
        }),
        Err(e) => {
            if e.is_validation() {
                debug!("{:?} rejected for {}: {}", op, dashboard.user_id(), e);
            } else {
                error!("{:?} failed for {}: {}", op, dashboard.user_id(), e);
            }
            notice_error_response(op, &e)
        }
    }
}

pub async fn get_dashboard(
    user: AuthUser,
    sessions: web::Data<DashboardSessions>,
) -> impl Responder {
    let session = sessions.session(&user.user_id).await;
    let mut dashboard = session.dashboard.lock().await;

    match dashboard.load().await {
        Ok(()) => success_response(dashboard_response(&dashboard)),
        Err(e) => {
            error!("Failed to load dashboard for {}: {}", user.user_id, e);
            notice_error_response(Operation::Load, &e)
        }
    }
}

pub async fn save_profile(
    user: AuthUser,
    sessions: web::Data<DashboardSessions>,
    body: web::Json<ProfilePatch>,
) -> impl Responder {
    let session = sessions.session(&user.user_id).await;
    let mut dashboard = session.dashboard.lock().await;

    let result = match dashboard.ensure_loaded().await {
        Ok(()) => dashboard.save_profile(body.into_inner()).await.cloned(),
        Err(e) => Err(e),
    };
    operation_response(Operation::SaveProfile, result, &dashboard)
}

pub async fn add_link(
    user: AuthUser,
    sessions: web::Data<DashboardSessions>,
    body: web::Json<NewLink>,
) -> impl Responder {
    let session = sessions.session(&user.user_id).await;
    let mut dashboard = session.dashboard.lock().await;

    let result = match dashboard.ensure_loaded().await {
        Ok(()) => dashboard.add_link(body.into_inner()).await.cloned(),
        Err(e) => Err(e),
    };
    operation_response(Operation::AddLink, result, &dashboard)
}

pub async fn update_link(
    user: AuthUser,
    sessions: web::Data<DashboardSessions>,
    link_id: web::Path<String>,
    body: web::Json<LinkPatch>,
) -> impl Responder {
    let session = sessions.session(&user.user_id).await;
    let mut dashboard = session.dashboard.lock().await;

    let result = match dashboard.ensure_loaded().await {
        Ok(()) => dashboard
            .update_link(&link_id, body.into_inner())
            .await
            .cloned(),
        Err(e) => Err(e),
    };
    operation_response(Operation::UpdateLink, result, &dashboard)
}

pub async fn delete_link(
    user: AuthUser,
    sessions: web::Data<DashboardSessions>,
    link_id: web::Path<String>,
) -> impl Responder {
    let session = sessions.session(&user.user_id).await;
    let mut dashboard = session.dashboard.lock().await;

    let result = match dashboard.ensure_loaded().await {
        Ok(()) => dashboard.delete_link(&link_id).await,
        Err(e) => Err(e),
    };
    operation_response(Operation::DeleteLink, result, &dashboard)
}

pub async fn reorder_links(
    user: AuthUser,
    sessions: web::Data<DashboardSessions>,
    body: web::Json<ReorderRequest>,
) -> impl Responder {
    let session = sessions.session(&user.user_id).await;
    let mut dashboard = session.dashboard.lock().await;

    let result = match dashboard.ensure_loaded().await {
        Ok(()) => dashboard.reorder(&body.ids).await.map(<[_]>::to_vec),
        Err(e) => Err(e),
    };
    operation_response(Operation::Reorder, result, &dashboard)
}

/// 自己的页面预览，不受 is_public 影响
pub async fn preview(
    user: AuthUser,
    service: web::Data<PublicProfileService>,
) -> impl Responder {
    match service.preview(&user.user_id).await {
        Ok(Some(page)) => html_response(StatusCode::OK, render_profile_page(&page, true)),
        Ok(None) => not_found_page(),
        Err(e) => {
            error!("Failed to render preview for {}: {}", user.user_id, e);
            notice_error_response(Operation::Load, &e)
        }
    }
}
