//! Server mode
//!
//! Builds the shared services and runs the HTTP server until it exits or
//! a shutdown signal arrives.

use actix_cors::Cors;
use actix_web::{
    App, HttpServer,
    middleware::{Compress, DefaultHeaders},
    web,
};
use anyhow::Result;
use tracing::warn;

use crate::api::middleware::RequestIdMiddleware;
use crate::api::services::{AppStartTime, configure};
use crate::config::get_config;
use crate::runtime::lifetime;
use crate::runtime::lifetime::startup::StartupContext;

/// Build CORS middleware from the configured origins
fn build_cors_middleware(allowed_origins: &[String]) -> Cors {
    // 未配置时保持浏览器默认的同源策略
    if allowed_origins.is_empty() {
        return Cors::default();
    }

    let mut cors = Cors::default()
        .allowed_methods(vec!["GET", "POST", "PUT", "PATCH", "DELETE", "OPTIONS"])
        .allowed_headers(vec!["Content-Type", "Authorization", "Accept", "X-Request-ID"])
        .max_age(3600);

    if allowed_origins.iter().any(|o| o == "*") {
        cors = cors.allow_any_origin();
    } else {
        for origin in allowed_origins {
            cors = cors.allowed_origin(origin);
        }
    }
    cors
}

/// 把共享组件注册为 app data
pub fn register_app_data(cfg: &mut web::ServiceConfig, ctx: &StartupContext) {
    cfg.app_data(web::Data::new(ctx.storage.clone()))
        .app_data(web::Data::from(ctx.store.clone()))
        .app_data(web::Data::new(ctx.sessions.clone()))
        .app_data(web::Data::new(ctx.public_profiles.clone()))
        .app_data(web::Data::new(ctx.auth.clone()))
        .app_data(web::Data::new(ctx.qr.clone()));
}

/// Run the HTTP server
///
/// **Note**: Logging system must be initialized before calling this function
pub async fn run_server() -> Result<()> {
    let app_start_time = AppStartTime::now();

    let startup = lifetime::startup::prepare_server_startup()
        .await
        .map_err(|e| {
            tracing::error!("Server startup failed: {}", e);
            e
        })?;
    let ctx = web::Data::new(startup);

    let config = get_config();
    let cpu_count = config.server.cpu_count.clamp(1, 32);
    warn!("Using {} CPU cores for the server", cpu_count);

    let allowed_origins = config.server.cors_allowed_origins.clone();
    if allowed_origins.is_empty() {
        warn!("CORS allowed origins not configured, cross-origin API requests will be rejected");
    }

    let sessions = ctx.sessions.clone();
    let server_ctx = ctx.clone();

    let bind_address = format!("{}:{}", config.server.host, config.server.port);
    let server = HttpServer::new(move || {
        let ctx = server_ctx.clone();
        App::new()
            .wrap(RequestIdMiddleware)
            .wrap(build_cors_middleware(&allowed_origins))
            .wrap(Compress::default())
            .wrap(
                DefaultHeaders::new()
                    .add(("Keep-Alive", "timeout=30, max=1000"))
                    .add(("X-Content-Type-Options", "nosniff")),
            )
            .app_data(web::Data::new(app_start_time.clone()))
            .app_data(web::PayloadConfig::new(256 * 1024))
            .configure(|cfg| register_app_data(cfg, &ctx))
            .configure(configure)
    })
    .keep_alive(std::time::Duration::from_secs(30))
    .client_request_timeout(std::time::Duration::from_millis(5000))
    .client_disconnect_timeout(std::time::Duration::from_millis(1000))
    .workers(cpu_count);

    warn!("Starting server at http://{}", bind_address);
    let server = server.bind(&bind_address)?.run();

    tokio::select! {
        res = server => {
            res?;
        }
        _ = lifetime::shutdown::listen_for_shutdown(&sessions) => {
            warn!("Graceful shutdown: all tasks completed");
        }
    }

    Ok(())
}
