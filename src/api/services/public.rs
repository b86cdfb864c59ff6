//! 公开页面：/{username}、/{username}/share 与 /go/{link_id}

use std::fmt::Write;

use actix_web::{HttpRequest, HttpResponse, Responder, http::StatusCode, web};
use tracing::{debug, error, trace};

use crate::config::get_config;
use crate::services::{PublicPage, PublicProfileService};
use crate::utils::html::escape;

use super::error_code::ErrorCode;
use super::helpers::{error_response, success_response};

const NOT_FOUND_TITLE: &str = "Profile not found";

pub fn html_response(status: StatusCode, body: String) -> HttpResponse {
    HttpResponse::build(status)
        .insert_header(("Content-Type", "text/html; charset=utf-8"))
        .body(body)
}

/// 不存在与私密共用同一个 404 页面
pub fn not_found_page() -> HttpResponse {
    html_response(
        StatusCode::NOT_FOUND,
        page_shell(
            NOT_FOUND_TITLE,
            "linear-gradient(135deg, #f3f4f6, #d1d5db)",
            "#111827",
            &format!(
                "<main class=\"card\"><h1>{}</h1><p>The page you're looking for doesn't exist or is private.</p></main>",
                NOT_FOUND_TITLE
            ),
        ),
    )
}

fn page_shell(title: &str, background: &str, text_color: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
<style>
body {{ margin: 0; min-height: 100vh; font-family: system-ui, sans-serif; background: {background}; color: {text_color}; display: flex; justify-content: center; }}
.card {{ width: 100%; max-width: 28rem; padding: 3rem 1.5rem; text-align: center; }}
.avatar {{ width: 6rem; height: 6rem; border-radius: 50%; object-fit: cover; margin: 0 auto 1rem; display: flex; align-items: center; justify-content: center; font-size: 2rem; font-weight: 700; background: rgba(255,255,255,0.25); }}
.links {{ list-style: none; padding: 0; margin: 2rem 0 0; }}
.links li {{ margin-bottom: 0.75rem; }}
.links a {{ display: block; padding: 0.9rem 1rem; border-radius: 0.75rem; background: rgba(255,255,255,0.2); color: inherit; text-decoration: none; font-weight: 600; }}
.links small {{ display: block; font-weight: 400; opacity: 0.8; }}
.banner {{ font-size: 0.8rem; opacity: 0.75; margin-bottom: 1rem; }}
</style>
</head>
<body>
{body}
</body>
</html>
"#
    )
}

/// 渲染资料页；preview 为 true 时加上预览提示
pub fn render_profile_page(page: &PublicPage, preview: bool) -> String {
    let profile = &page.profile;
    let title = escape(profile.title());
    let text_color = if profile.theme.is_light() {
        "#111827"
    } else {
        "#ffffff"
    };

    let mut body = String::from("<main class=\"card\">");
    if preview {
        let visibility = if profile.is_public { "public" } else { "private" };
        let _ = write!(
            body,
            "<p class=\"banner\">Preview &middot; this profile is {}</p>",
            visibility
        );
    }

    match profile.avatar_url.as_deref() {
        Some(avatar) => {
            let _ = write!(
                body,
                "<img class=\"avatar\" src=\"{}\" alt=\"{}\">",
                escape(avatar),
                title
            );
        }
        None => {
            let _ = write!(
                body,
                "<div class=\"avatar\">{}</div>",
                escape(&profile.initials())
            );
        }
    }

    let _ = write!(
        body,
        "<h1>{}</h1><p>@{}</p>",
        title,
        escape(&profile.username)
    );
    if let Some(bio) = profile.bio.as_deref() {
        let _ = write!(body, "<p>{}</p>", escape(bio));
    }

    if page.links.is_empty() {
        body.push_str("<p>No links yet.</p>");
    } else {
        body.push_str("<ul class=\"links\">");
        for link in &page.links {
            let glyph = link.icon.map(|i| i.glyph()).unwrap_or("🔗");
            let _ = write!(
                body,
                "<li><a href=\"/go/{}\" target=\"_blank\" rel=\"noopener noreferrer\">{} {}",
                escape(&link.id),
                glyph,
                escape(&link.title)
            );
            if let Some(description) = link.description.as_deref() {
                let _ = write!(body, "<small>{}</small>", escape(description));
            }
            body.push_str("</a></li>");
        }
        body.push_str("</ul>");
    }
    body.push_str("</main>");

    page_shell(&title, profile.theme.background(), text_color, &body)
}

pub async fn profile_page(
    service: web::Data<PublicProfileService>,
    username: web::Path<String>,
) -> impl Responder {
    trace!("Public page requested: {}", username);
    match service.resolve(&username).await {
        Ok(Some(page)) => html_response(StatusCode::OK, render_profile_page(&page, false)),
        Ok(None) => not_found_page(),
        Err(e) => {
            error!("Failed to load public page {}: {}", username, e);
            html_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                page_shell(
                    "Something went wrong",
                    "#111827",
                    "#ffffff",
                    "<main class=\"card\"><h1>Something went wrong</h1></main>",
                ),
            )
        }
    }
}

pub async fn share(
    service: web::Data<PublicProfileService>,
    username: web::Path<String>,
) -> impl Responder {
    let site_url = get_config().server.site_url.clone();
    match service.share(&username, &site_url).await {
        Ok(Some(payload)) => success_response(payload),
        Ok(None) => error_response(StatusCode::NOT_FOUND, ErrorCode::NotFound, NOT_FOUND_TITLE),
        Err(e) => {
            error!("Failed to build share payload for {}: {}", username, e);
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorCode::InternalServerError,
                "Internal Server Error",
            )
        }
    }
}

fn header_value(req: &HttpRequest, name: &str) -> Option<String> {
    req.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// 记录点击（不等待写入）后 302 跳转
pub async fn go(
    req: HttpRequest,
    service: web::Data<PublicProfileService>,
    link_id: web::Path<String>,
) -> impl Responder {
    match service.click_target(&link_id).await {
        Ok(Some(link)) => {
            let _ = service.track_click(
                &link.id,
                header_value(&req, "User-Agent"),
                header_value(&req, "Referer"),
            );
            debug!("Redirecting {} -> {}", link.id, link.url);
            HttpResponse::Found()
                .insert_header(("Location", link.url))
                .insert_header(("Cache-Control", "no-store"))
                .finish()
        }
        Ok(None) => not_found_page(),
        Err(e) => {
            error!("Failed to resolve link {}: {}", link_id, e);
            not_found_page()
        }
    }
}
