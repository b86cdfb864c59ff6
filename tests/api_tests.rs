//! HTTP API tests against the full route table

use std::sync::{Arc, Once};
use std::time::Duration;

use actix_web::http::StatusCode;
use actix_web::{App, test, web};
use biolinker::api::configure;
use biolinker::api::services::AppStartTime;
use biolinker::config::{DatabaseConfig, init_config};
use biolinker::runtime::lifetime::startup::StartupContext;
use biolinker::runtime::modes::server::register_app_data;
use biolinker::storage::SeaOrmStorage;
use serde_json::{Value, json};
use tempfile::TempDir;

static INIT: Once = Once::new();

fn init_test_config() {
    INIT.call_once(|| {
        init_config();
    });
}

async fn setup() -> (StartupContext, TempDir) {
    init_test_config();

    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("api_test.db");
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    let storage = SeaOrmStorage::new(&db_url, "sqlite", &DatabaseConfig::default())
        .await
        .expect("Failed to create storage");

    (StartupContext::from_storage(Arc::new(storage)), temp_dir)
}

macro_rules! test_app {
    ($ctx:expr) => {
        test::init_service(
            App::new()
                .configure(|c| register_app_data(c, &$ctx))
                .app_data(web::Data::new(AppStartTime::now()))
                .configure(configure),
        )
        .await
    };
}

/// 发送请求并解析 JSON 信封
macro_rules! call_json {
    ($app:expr, $req:expr) => {{
        let resp = test::call_service(&$app, $req.to_request()).await;
        let status = resp.status();
        let body: Value = test::read_body_json(resp).await;
        (status, body)
    }};
}

macro_rules! call_text {
    ($app:expr, $req:expr) => {{
        let resp = test::call_service(&$app, $req.to_request()).await;
        let status = resp.status();
        let body = test::read_body(resp).await;
        (status, String::from_utf8(body.to_vec()).expect("utf-8 body"))
    }};
}

macro_rules! sign_up {
    ($app:expr, $email:expr) => {{
        let (status, body) = call_json!(
            $app,
            test::TestRequest::post()
                .uri("/api/v1/auth/sign-up")
                .set_json(json!({
                    "email": $email,
                    "password": "hunter22",
                    "confirm_password": "hunter22",
                }))
        );
        assert_eq!(status, StatusCode::OK, "sign-up failed: {}", body);
        body["data"]["access_token"]
            .as_str()
            .expect("access token")
            .to_string()
    }};
}

fn bearer(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {}", token))
}

// =============================================================================
// Auth
// =============================================================================

#[actix_rt::test]
async fn test_dashboard_requires_token() {
    let (ctx, _dir) = setup().await;
    let app = test_app!(ctx);

    let (status, body) = call_json!(app, test::TestRequest::get().uri("/api/v1/dashboard"));
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], 1001);

    let (status, _) = call_json!(
        app,
        test::TestRequest::get()
            .uri("/api/v1/analytics")
            .insert_header(bearer("not-a-jwt"))
    );
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[actix_rt::test]
async fn test_sign_in_wrong_password() {
    let (ctx, _dir) = setup().await;
    let app = test_app!(ctx);
    sign_up!(app, "jane@example.com");

    let (status, body) = call_json!(
        app,
        test::TestRequest::post()
            .uri("/api/v1/auth/sign-in")
            .set_json(json!({ "email": "jane@example.com", "password": "nope-nope" }))
    );
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid email or password");
}

#[actix_rt::test]
async fn test_oauth_redirect() {
    let (ctx, _dir) = setup().await;
    let app = test_app!(ctx);

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/auth/oauth/google")
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    let location = resp.headers().get("Location").unwrap().to_str().unwrap();
    assert!(location.contains("provider=google"));

    let (status, _) = call_json!(
        app,
        test::TestRequest::get().uri("/api/v1/auth/oauth/email")
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// =============================================================================
// Dashboard → public page
// =============================================================================

#[actix_rt::test]
async fn test_full_profile_flow() {
    let (ctx, _dir) = setup().await;
    let app = test_app!(ctx);
    let token = sign_up!(app, "jane@example.com");

    // 新账号：没有资料也没有链接
    let (status, body) = call_json!(
        app,
        test::TestRequest::get()
            .uri("/api/v1/dashboard")
            .insert_header(bearer(&token))
    );
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"]["profile"].is_null());
    assert!(body["data"]["public_url"].is_null());
    assert_eq!(body["data"]["links"].as_array().unwrap().len(), 0);
    assert_eq!(body["data"]["themes"].as_array().unwrap().len(), 7);

    let (status, body) = call_json!(
        app,
        test::TestRequest::put()
            .uri("/api/v1/dashboard/profile")
            .insert_header(bearer(&token))
            .set_json(json!({ "username": "jane", "display_name": "Jane <Doe>", "theme": "ocean" }))
    );
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["data"]["notice"]["title"], "Profile updated");
    assert_eq!(body["data"]["item"]["theme"], "ocean");

    let (status, body) = call_json!(
        app,
        test::TestRequest::post()
            .uri("/api/v1/dashboard/links")
            .insert_header(bearer(&token))
            .set_json(json!({ "title": "Site", "url": "https://site.io", "icon": "website" }))
    );
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["data"]["notice"]["variant"], "success");
    assert_eq!(body["data"]["item"]["position"], 0);
    let link_id = body["data"]["item"]["id"].as_str().unwrap().to_string();

    let (status, html) = call_text!(app, test::TestRequest::get().uri("/jane"));
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("Jane &lt;Doe&gt;"));
    assert!(!html.contains("Jane <Doe>"));
    assert!(html.contains(&format!("href=\"/go/{}\"", link_id)));

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/go/{}", link_id))
            .insert_header(("User-Agent", "api-test"))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(resp.headers().get("Location").unwrap(), "https://site.io");

    // 点击在后台写入
    let mut clicks = 0;
    for _ in 0..50 {
        clicks = ctx.storage.count_clicks(&link_id).await.unwrap();
        if clicks == 1 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert_eq!(clicks, 1);
}

#[actix_rt::test]
async fn test_link_edit_reorder_delete() {
    let (ctx, _dir) = setup().await;
    let app = test_app!(ctx);
    let token = sign_up!(app, "jane@example.com");

    let mut ids = Vec::new();
    for (title, url) in [("A", "https://a.io"), ("B", "https://b.io"), ("C", "mailto:c@c.io")] {
        let (status, body) = call_json!(
            app,
            test::TestRequest::post()
                .uri("/api/v1/dashboard/links")
                .insert_header(bearer(&token))
                .set_json(json!({ "title": title, "url": url }))
        );
        assert_eq!(status, StatusCode::OK, "{}", body);
        ids.push(body["data"]["item"]["id"].as_str().unwrap().to_string());
    }

    let (status, body) = call_json!(
        app,
        test::TestRequest::patch()
            .uri(&format!("/api/v1/dashboard/links/{}", ids[0]))
            .insert_header(bearer(&token))
            .set_json(json!({ "is_active": false }))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["item"]["is_active"], false);
    assert_eq!(body["data"]["item"]["title"], "A");

    let (status, body) = call_json!(
        app,
        test::TestRequest::put()
            .uri("/api/v1/dashboard/links/order")
            .insert_header(bearer(&token))
            .set_json(json!({ "ids": [ids[2], ids[1], ids[0]] }))
    );
    assert_eq!(status, StatusCode::OK, "{}", body);
    let order: Vec<&str> = body["data"]["dashboard"]["links"]
        .as_array()
        .unwrap()
        .iter()
        .map(|l| l["id"].as_str().unwrap())
        .collect();
    assert_eq!(order, vec![ids[2].as_str(), ids[1].as_str(), ids[0].as_str()]);

    let (status, body) = call_json!(
        app,
        test::TestRequest::put()
            .uri("/api/v1/dashboard/links/order")
            .insert_header(bearer(&token))
            .set_json(json!({ "ids": [ids[0]] }))
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 3000);

    let (status, body) = call_json!(
        app,
        test::TestRequest::delete()
            .uri(&format!("/api/v1/dashboard/links/{}", ids[1]))
            .insert_header(bearer(&token))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["notice"]["title"], "Link deleted");
    assert_eq!(body["data"]["dashboard"]["links"].as_array().unwrap().len(), 2);

    let (status, body) = call_json!(
        app,
        test::TestRequest::delete()
            .uri(&format!("/api/v1/dashboard/links/{}", ids[1]))
            .insert_header(bearer(&token))
    );
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 3001);
    assert_eq!(body["data"]["notice"]["description"], "Link not found");
}

#[actix_rt::test]
async fn test_add_link_validation_returns_notice() {
    let (ctx, _dir) = setup().await;
    let app = test_app!(ctx);
    let token = sign_up!(app, "jane@example.com");

    let (status, body) = call_json!(
        app,
        test::TestRequest::post()
            .uri("/api/v1/dashboard/links")
            .insert_header(bearer(&token))
            .set_json(json!({ "title": "", "url": "https://a.io" }))
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 3000);
    assert_eq!(body["message"], "Title and URL are required");
    assert_eq!(body["data"]["notice"]["variant"], "destructive");
}

#[actix_rt::test]
async fn test_reserved_username_rejected() {
    let (ctx, _dir) = setup().await;
    let app = test_app!(ctx);
    let token = sign_up!(app, "jane@example.com");

    let (status, body) = call_json!(
        app,
        test::TestRequest::put()
            .uri("/api/v1/dashboard/profile")
            .insert_header(bearer(&token))
            .set_json(json!({ "username": "api" }))
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "This username is reserved");
}

#[actix_rt::test]
async fn test_username_conflict_between_accounts() {
    let (ctx, _dir) = setup().await;
    let app = test_app!(ctx);
    let first = sign_up!(app, "jane@example.com");
    let second = sign_up!(app, "john@example.com");

    for (token, expected) in [(&first, StatusCode::OK), (&second, StatusCode::CONFLICT)] {
        let (status, _) = call_json!(
            app,
            test::TestRequest::put()
                .uri("/api/v1/dashboard/profile")
                .insert_header(bearer(token))
                .set_json(json!({ "username": "jane" }))
        );
        assert_eq!(status, expected);
    }
}

// =============================================================================
// Public pages
// =============================================================================

#[actix_rt::test]
async fn test_private_and_missing_profiles_share_404() {
    let (ctx, _dir) = setup().await;
    let app = test_app!(ctx);
    let token = sign_up!(app, "jane@example.com");

    let (status, _) = call_json!(
        app,
        test::TestRequest::put()
            .uri("/api/v1/dashboard/profile")
            .insert_header(bearer(&token))
            .set_json(json!({ "username": "hidden", "is_public": false }))
    );
    assert_eq!(status, StatusCode::OK);

    let (private_status, private_html) = call_text!(app, test::TestRequest::get().uri("/hidden"));
    let (missing_status, missing_html) = call_text!(app, test::TestRequest::get().uri("/nobody"));
    assert_eq!(private_status, StatusCode::NOT_FOUND);
    assert_eq!(missing_status, StatusCode::NOT_FOUND);
    assert_eq!(private_html, missing_html);

    let (status, _) = call_json!(app, test::TestRequest::get().uri("/hidden/share"));
    assert_eq!(status, StatusCode::NOT_FOUND);

    // 预览不受公开设置影响
    let (status, html) = call_text!(
        app,
        test::TestRequest::get()
            .uri("/api/v1/dashboard/preview")
            .insert_header(bearer(&token))
    );
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("Preview"));
}

#[actix_rt::test]
async fn test_share_payload() {
    let (ctx, _dir) = setup().await;
    let app = test_app!(ctx);
    let token = sign_up!(app, "jane@example.com");

    call_json!(
        app,
        test::TestRequest::put()
            .uri("/api/v1/dashboard/profile")
            .insert_header(bearer(&token))
            .set_json(json!({ "username": "jane", "bio": "Designer" }))
    );

    let (status, body) = call_json!(app, test::TestRequest::get().uri("/jane/share"));
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["title"], "jane");
    assert_eq!(body["data"]["text"], "Designer");
    assert!(body["data"]["url"].as_str().unwrap().ends_with("/jane"));
}

#[actix_rt::test]
async fn test_go_unknown_link_is_404() {
    let (ctx, _dir) = setup().await;
    let app = test_app!(ctx);

    let (status, html) = call_text!(app, test::TestRequest::get().uri("/go/nope"));
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(html.contains("Profile not found"));
}

// =============================================================================
// Analytics / QR
// =============================================================================

#[actix_rt::test]
async fn test_analytics_endpoints() {
    let (ctx, _dir) = setup().await;
    let app = test_app!(ctx);
    let token = sign_up!(app, "jane@example.com");

    let (status, body) = call_json!(
        app,
        test::TestRequest::get()
            .uri("/api/v1/analytics")
            .insert_header(bearer(&token))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["live"], false);
    assert_eq!(body["data"]["snapshot"]["daily_views"].as_array().unwrap().len(), 7);

    let (_, body) = call_json!(
        app,
        test::TestRequest::put()
            .uri("/api/v1/analytics/live")
            .insert_header(bearer(&token))
            .set_json(json!({ "enabled": true }))
    );
    assert_eq!(body["data"]["live"], true);

    let (_, body) = call_json!(
        app,
        test::TestRequest::put()
            .uri("/api/v1/analytics/live")
            .insert_header(bearer(&token))
            .set_json(json!({ "enabled": false }))
    );
    assert_eq!(body["data"]["live"], false);

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/analytics/export")
            .insert_header(bearer(&token))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let disposition = resp
        .headers()
        .get("Content-Disposition")
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(disposition.starts_with("attachment; filename=\"analytics-"));
    let exported: Value = test::read_body_json(resp).await;
    assert!(exported["views"].is_u64());
}

#[actix_rt::test]
async fn test_qr_defaults_to_public_url() {
    let (ctx, _dir) = setup().await;
    let app = test_app!(ctx);
    let token = sign_up!(app, "jane@example.com");

    let (status, body) = call_json!(
        app,
        test::TestRequest::get()
            .uri("/api/v1/qr")
            .insert_header(bearer(&token))
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Create your profile before generating its QR code");

    call_json!(
        app,
        test::TestRequest::put()
            .uri("/api/v1/dashboard/profile")
            .insert_header(bearer(&token))
            .set_json(json!({ "username": "jane" }))
    );

    let (status, body) = call_json!(
        app,
        test::TestRequest::get()
            .uri("/api/v1/qr?size=300&format=svg")
            .insert_header(bearer(&token))
    );
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert!(body["data"]["target"].as_str().unwrap().ends_with("/jane"));
    assert!(body["data"]["qr_url"].as_str().unwrap().contains("size=300x300"));

    let (status, body) = call_json!(
        app,
        test::TestRequest::get()
            .uri("/api/v1/qr?size=5000")
            .insert_header(bearer(&token))
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 4000);
}

// =============================================================================
// Health
// =============================================================================

#[actix_rt::test]
async fn test_health_endpoints() {
    let (ctx, _dir) = setup().await;
    let app = test_app!(ctx);

    let (status, body) = call_json!(app, test::TestRequest::get().uri("/health"));
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "healthy");
    assert_eq!(body["data"]["storage"]["backend"], "sqlite");

    let resp = test::call_service(
        &app,
        test::TestRequest::get().uri("/health/live").to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
}
