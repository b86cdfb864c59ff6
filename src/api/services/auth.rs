//! 账号接口：注册、登录、OAuth 跳转、刷新与登出

use actix_web::{HttpResponse, Responder, web};
use tracing::{info, trace};

use crate::api::middleware::AuthUser;
use crate::services::{AuthGateway, DashboardSessions, SignInRequest, SignUpRequest};

use super::helpers::{api_result, error_from_biolinker, success_response};
use super::types::{RefreshRequest, SignOutRequest};

pub async fn sign_up(
    gateway: web::Data<AuthGateway>,
    body: web::Json<SignUpRequest>,
) -> impl Responder {
    trace!("Received sign-up request");
    api_result(gateway.sign_up(body.into_inner()).await)
}

pub async fn sign_in(
    gateway: web::Data<AuthGateway>,
    body: web::Json<SignInRequest>,
) -> impl Responder {
    trace!("Received sign-in request");
    api_result(gateway.sign_in(body.into_inner()).await)
}

/// 302 到托管的 OAuth 授权页
pub async fn oauth_redirect(
    gateway: web::Data<AuthGateway>,
    provider: web::Path<String>,
) -> impl Responder {
    match gateway.oauth_authorize_url(&provider) {
        Ok(url) => HttpResponse::Found()
            .insert_header(("Location", url))
            .finish(),
        Err(e) => error_from_biolinker(&e),
    }
}

pub async fn refresh(
    gateway: web::Data<AuthGateway>,
    body: web::Json<RefreshRequest>,
) -> impl Responder {
    api_result(gateway.refresh(&body.refresh_token).await)
}

/// 注销 refresh token 并丢弃仪表盘会话
pub async fn sign_out(
    user: AuthUser,
    gateway: web::Data<AuthGateway>,
    sessions: web::Data<DashboardSessions>,
    body: Option<web::Json<SignOutRequest>>,
) -> impl Responder {
    let body = body.map(web::Json::into_inner).unwrap_or_default();
    gateway.sign_out(body.refresh_token.as_deref());
    sessions.end(&user.user_id).await;

    info!("User {} signed out", user.user_id);
    success_response(serde_json::json!({ "signed_out": true }))
}
