//! 路由表
//!
//! 顺序有意义：`/{username}` 是兜底匹配，必须最后注册。

use actix_web::web;

use crate::api::middleware::UserAuth;

use super::{analytics, auth, dashboard, health, public, qr};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .service(
                web::scope("/auth")
                    .route("/sign-up", web::post().to(auth::sign_up))
                    .route("/sign-in", web::post().to(auth::sign_in))
                    .route("/oauth/{provider}", web::get().to(auth::oauth_redirect))
                    .route("/refresh", web::post().to(auth::refresh))
                    .service(
                        web::resource("/sign-out")
                            .wrap(UserAuth)
                            .route(web::post().to(auth::sign_out)),
                    ),
            )
            .service(
                web::scope("/dashboard")
                    .wrap(UserAuth)
                    .route("", web::get().to(dashboard::get_dashboard))
                    .route("/profile", web::put().to(dashboard::save_profile))
                    .route("/preview", web::get().to(dashboard::preview))
                    .route("/links", web::post().to(dashboard::add_link))
                    .route("/links/order", web::put().to(dashboard::reorder_links))
                    .route("/links/{id}", web::patch().to(dashboard::update_link))
                    .route("/links/{id}", web::delete().to(dashboard::delete_link)),
            )
            .service(
                web::scope("/analytics")
                    .wrap(UserAuth)
                    .route("", web::get().to(analytics::get_analytics))
                    .route("/refresh", web::post().to(analytics::refresh_analytics))
                    .route("/live", web::put().to(analytics::toggle_live))
                    .route("/export", web::get().to(analytics::export_analytics)),
            )
            .service(
                web::scope("/qr")
                    .wrap(UserAuth)
                    .route("", web::get().to(qr::qr_code))
                    .route("/download", web::get().to(qr::download)),
            ),
    )
    .service(
        web::scope("/health")
            .route("", web::get().to(health::health_check))
            .route("", web::head().to(health::health_check))
            .route("/live", web::get().to(health::liveness_check))
            .route("/live", web::head().to(health::liveness_check)),
    )
    .route("/go/{link_id}", web::get().to(public::go))
    .route("/{username}/share", web::get().to(public::share))
    .route("/{username}", web::get().to(public::profile_page));
}
