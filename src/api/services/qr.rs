//! 二维码接口：生成图片地址与下载代理

use actix_web::{Responder, web};
use tracing::{error, warn};

use crate::api::middleware::AuthUser;
use crate::config::get_config;
use crate::errors::{BiolinkerError, Result};
use crate::services::public_profile::public_url;
use crate::services::qr::{DEFAULT_QR_TITLE, share_payload};
use crate::services::{Notice, NoticeVariant, QrOptions, QrService};
use crate::storage::traits::Backend;

use super::error_code::ErrorCode;
use super::helpers::{attachment_response, error_from_biolinker, json_response, success_response};
use super::types::{NoticeOnly, QrQuery, QrResponse};

const DOWNLOAD_FAILED_TITLE: &str = "Download Failed";

/// 未指定 url 时使用自己的公开页地址
async fn resolve_target(
    store: &dyn Backend,
    user_id: &str,
    query: &QrQuery,
) -> Result<(String, String)> {
    if let Some(url) = query.url.as_deref().map(str::trim).filter(|u| !u.is_empty()) {
        let title = query
            .title
            .clone()
            .unwrap_or_else(|| DEFAULT_QR_TITLE.to_string());
        return Ok((url.to_string(), title));
    }

    let profile = store.find_profile_by_owner(user_id).await?.ok_or_else(|| {
        BiolinkerError::validation("Create your profile before generating its QR code")
    })?;
    let site_url = get_config().server.site_url.clone();
    let title = query
        .title
        .clone()
        .unwrap_or_else(|| profile.title().to_string());
    Ok((public_url(&site_url, &profile.username), title))
}

fn invalid_options(e: &BiolinkerError) -> actix_web::HttpResponse {
    json_response::<()>(e.http_status(), ErrorCode::QrInvalidOptions, e.message(), None)
}

pub async fn qr_code(
    user: AuthUser,
    store: web::Data<dyn Backend>,
    qr: web::Data<QrService>,
    query: web::Query<QrQuery>,
) -> impl Responder {
    let options = match QrOptions::try_from(query.params()) {
        Ok(options) => options,
        Err(e) => return invalid_options(&e),
    };

    let (target, title) = match resolve_target(store.get_ref(), &user.user_id, &query).await {
        Ok(resolved) => resolved,
        Err(e) => return error_from_biolinker(&e),
    };

    match qr.url_for(&target, &options) {
        Ok(qr_url) => success_response(QrResponse {
            share: share_payload(&title, &target, &qr_url),
            target,
            qr_url,
            options,
        }),
        Err(e) => invalid_options(&e),
    }
}

pub async fn download(
    user: AuthUser,
    store: web::Data<dyn Backend>,
    qr: web::Data<QrService>,
    query: web::Query<QrQuery>,
) -> impl Responder {
    let options = match QrOptions::try_from(query.params()) {
        Ok(options) => options,
        Err(e) => return invalid_options(&e),
    };

    let (target, _) = match resolve_target(store.get_ref(), &user.user_id, &query).await {
        Ok(resolved) => resolved,
        Err(e) => return error_from_biolinker(&e),
    };

    match qr.download(&target, &options).await {
        Ok(image) => attachment_response(image.content_type, &image.filename, image.bytes),
        Err(e) if e.is_validation() => invalid_options(&e),
        Err(e) => {
            warn!("QR download failed for {}: {}", user.user_id, e);
            let notice = Notice {
                title: DOWNLOAD_FAILED_TITLE.to_string(),
                description: e.message().to_string(),
                variant: NoticeVariant::Destructive,
            };
            if !matches!(e, BiolinkerError::ExternalService(_)) {
                error!("Unexpected QR download error: {}", e);
            }
            json_response(
                e.http_status(),
                ErrorCode::QrUpstreamFailed,
                notice.description.clone(),
                Some(NoticeOnly { notice }),
            )
        }
    }
}
