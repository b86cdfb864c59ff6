//! Request and response bodies for the JSON API

use serde::{Deserialize, Serialize};

use crate::analytics::AnalyticsSnapshot;
use crate::services::{DashboardView, Notice, QrOptions, QrParams, SharePayload};

/// 统一响应信封 `{code, message, data}`
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ApiResponse<T> {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

/// GET /api/v1/dashboard
#[derive(Serialize, Debug)]
pub struct DashboardResponse {
    #[serde(flatten)]
    pub view: DashboardView,
    /// 尚未创建资料时为 None
    pub public_url: Option<String>,
    pub themes: Vec<&'static str>,
}

/// 仪表盘写操作的成功响应
#[derive(Serialize, Debug)]
pub struct OperationResponse<T: Serialize> {
    pub notice: Notice,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item: Option<T>,
    pub dashboard: DashboardView,
}

/// 失败时 data 中只带 notice
#[derive(Serialize, Debug)]
pub struct NoticeOnly {
    pub notice: Notice,
}

#[derive(Deserialize, Debug)]
pub struct ReorderRequest {
    pub ids: Vec<String>,
}

#[derive(Deserialize, Debug)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Deserialize, Debug, Default)]
pub struct SignOutRequest {
    #[serde(default)]
    pub refresh_token: Option<String>,
}

#[derive(Serialize, Debug)]
pub struct AnalyticsResponse {
    pub live: bool,
    pub refresh_secs: u64,
    pub snapshot: AnalyticsSnapshot,
}

#[derive(Deserialize, Debug)]
pub struct LiveToggleRequest {
    pub enabled: bool,
}

/// QR 查询参数；url 缺省时使用自己的公开页地址
#[derive(Deserialize, Debug, Default)]
pub struct QrQuery {
    pub url: Option<String>,
    pub title: Option<String>,
    pub size: Option<u32>,
    pub format: Option<String>,
    pub ecc: Option<String>,
    pub bg: Option<String>,
    pub fg: Option<String>,
    pub margin: Option<u32>,
}

impl QrQuery {
    pub fn params(&self) -> QrParams {
        QrParams {
            size: self.size,
            format: self.format.clone(),
            ecc: self.ecc.clone(),
            bg: self.bg.clone(),
            fg: self.fg.clone(),
            margin: self.margin,
        }
    }
}

#[derive(Serialize, Debug)]
pub struct QrResponse {
    pub target: String,
    pub qr_url: String,
    pub options: QrOptions,
    pub share: SharePayload,
}
