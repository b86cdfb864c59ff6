//! QR codes via an external image service
//!
//! Nothing is encoded locally: options become query parameters on the
//! service URL, and the download proxy streams the rendered image back.

use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumString};
use tracing::{debug, warn};
use ureq::Agent;
use url::Url;

use crate::config::QrConfig;
use crate::errors::{BiolinkerError, Result};
use crate::services::public_profile::SharePayload;

pub const DEFAULT_QR_TITLE: &str = "QR Code";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, AsRefStr, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum QrFormat {
    #[default]
    Png,
    Svg,
    Eps,
    Pdf,
}

impl QrFormat {
    pub fn content_type(&self) -> &'static str {
        match self {
            QrFormat::Png => "image/png",
            QrFormat::Svg => "image/svg+xml",
            QrFormat::Eps => "application/postscript",
            QrFormat::Pdf => "application/pdf",
        }
    }
}

/// 纠错等级
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, AsRefStr, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum ErrorCorrection {
    L,
    #[default]
    M,
    Q,
    H,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QrOptions {
    pub size: u32,
    pub format: QrFormat,
    pub error_correction: ErrorCorrection,
    pub background_color: String,
    pub foreground_color: String,
    pub margin: u32,
}

impl Default for QrOptions {
    fn default() -> Self {
        Self {
            size: 300,
            format: QrFormat::Png,
            error_correction: ErrorCorrection::M,
            background_color: "#FFFFFF".to_string(),
            foreground_color: "#000000".to_string(),
            margin: 20,
        }
    }
}

/// 未解析的原始参数（HTTP query 与 CLI 共用）
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QrParams {
    pub size: Option<u32>,
    pub format: Option<String>,
    pub ecc: Option<String>,
    pub bg: Option<String>,
    pub fg: Option<String>,
    pub margin: Option<u32>,
}

impl TryFrom<QrParams> for QrOptions {
    type Error = BiolinkerError;

    fn try_from(params: QrParams) -> Result<Self> {
        let defaults = QrOptions::default();

        let format = match params.format.as_deref() {
            Some(raw) => QrFormat::from_str(raw).map_err(|_| {
                BiolinkerError::validation(format!("Unsupported QR format: {}", raw))
            })?,
            None => defaults.format,
        };
        let error_correction = match params.ecc.as_deref() {
            Some(raw) => ErrorCorrection::from_str(raw).map_err(|_| {
                BiolinkerError::validation(format!("Unsupported error correction level: {}", raw))
            })?,
            None => defaults.error_correction,
        };

        let options = QrOptions {
            size: params.size.unwrap_or(defaults.size),
            format,
            error_correction,
            background_color: params.bg.unwrap_or(defaults.background_color),
            foreground_color: params.fg.unwrap_or(defaults.foreground_color),
            margin: params.margin.unwrap_or(defaults.margin),
        };
        options.validate()?;
        Ok(options)
    }
}

impl QrOptions {
    pub fn validate(&self) -> Result<()> {
        if !(50..=1000).contains(&self.size) {
            return Err(BiolinkerError::validation(
                "QR size must be between 50 and 1000 pixels",
            ));
        }
        if self.margin > 50 {
            return Err(BiolinkerError::validation("QR margin must be between 0 and 50"));
        }
        for color in [&self.background_color, &self.foreground_color] {
            if !is_hex_color(color) {
                return Err(BiolinkerError::validation(format!(
                    "Invalid color '{}', expected #RRGGBB",
                    color
                )));
            }
        }
        Ok(())
    }

    /// qr-code-{unix_millis}.{ext}
    pub fn download_filename(&self, unix_millis: i64) -> String {
        format!("qr-code-{}.{}", unix_millis, self.format.as_ref())
    }
}

fn is_hex_color(value: &str) -> bool {
    value.len() == 7
        && value.starts_with('#')
        && value[1..].bytes().all(|b| b.is_ascii_hexdigit())
}

/// 构造二维码图片地址
pub fn build_qr_url(service_url: &str, target: &str, options: &QrOptions) -> Result<String> {
    let target = target.trim();
    if target.is_empty() {
        return Err(BiolinkerError::validation("QR target URL is required"));
    }

    let size = format!("{0}x{0}", options.size);
    let margin = options.margin.to_string();
    let url = Url::parse_with_params(
        service_url,
        &[
            ("size", size.as_str()),
            ("data", target),
            ("bgcolor", options.background_color.trim_start_matches('#')),
            ("color", options.foreground_color.trim_start_matches('#')),
            ("margin", margin.as_str()),
            ("ecc", options.error_correction.as_ref()),
            ("format", options.format.as_ref()),
        ],
    )
    .map_err(|e| BiolinkerError::internal(format!("Invalid QR service URL: {}", e)))?;

    Ok(url.into())
}

pub fn share_payload(title: &str, target: &str, qr_url: &str) -> SharePayload {
    SharePayload {
        title: format!("QR Code for {}", title),
        text: format!("Scan this QR code to visit: {}", target),
        url: qr_url.to_string(),
    }
}

/// 下载得到的图片
#[derive(Debug, Clone)]
pub struct QrImage {
    pub bytes: Vec<u8>,
    pub content_type: &'static str,
    pub filename: String,
}

#[derive(Clone)]
pub struct QrService {
    service_url: String,
    agent: Agent,
}

impl QrService {
    pub fn new(config: &QrConfig) -> Self {
        let agent: Agent = Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(config.download_timeout_secs)))
            .build()
            .into();

        Self {
            service_url: config.service_url.clone(),
            agent,
        }
    }

    pub fn url_for(&self, target: &str, options: &QrOptions) -> Result<String> {
        build_qr_url(&self.service_url, target, options)
    }

    /// 拉取图片（阻塞请求在 spawn_blocking 中执行）
    pub async fn download(&self, target: &str, options: &QrOptions) -> Result<QrImage> {
        let url = self.url_for(target, options)?;
        let agent = self.agent.clone();

        let bytes = tokio::task::spawn_blocking(move || -> std::result::Result<Vec<u8>, String> {
            let resp = agent.get(&url).call().map_err(|e| e.to_string())?;
            resp.into_body().read_to_vec().map_err(|e| e.to_string())
        })
        .await
        .map_err(|e| BiolinkerError::internal(format!("QR download task failed: {}", e)))?
        .map_err(|e| {
            warn!("QR service request failed: {}", e);
            BiolinkerError::external_service("Failed to download QR code. Please try again.")
        })?;

        debug!("QR image downloaded ({} bytes)", bytes.len());
        Ok(QrImage {
            bytes,
            content_type: options.format.content_type(),
            filename: options.download_filename(chrono::Utc::now().timestamp_millis()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SERVICE: &str = "https://api.qrserver.com/v1/create-qr-code/";

    #[test]
    fn test_default_url() {
        let url = build_qr_url(SERVICE, "https://x.io/jane", &QrOptions::default()).unwrap();
        assert_eq!(
            url,
            "https://api.qrserver.com/v1/create-qr-code/?size=300x300&data=https%3A%2F%2Fx.io%2Fjane&bgcolor=FFFFFF&color=000000&margin=20&ecc=M&format=png"
        );
    }

    #[test]
    fn test_params_parse_case_insensitive() {
        let options = QrOptions::try_from(QrParams {
            format: Some("SVG".to_string()),
            ecc: Some("h".to_string()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(options.format, QrFormat::Svg);
        assert_eq!(options.error_correction, ErrorCorrection::H);
    }

    #[test]
    fn test_validation_bounds() {
        let too_small = QrOptions {
            size: 49,
            ..Default::default()
        };
        assert!(too_small.validate().is_err());

        let big_margin = QrOptions {
            margin: 51,
            ..Default::default()
        };
        assert!(big_margin.validate().is_err());

        let bad_color = QrOptions {
            background_color: "white".to_string(),
            ..Default::default()
        };
        assert!(bad_color.validate().is_err());

        let edge = QrOptions {
            size: 1000,
            margin: 0,
            ..Default::default()
        };
        assert!(edge.validate().is_ok());
    }

    #[test]
    fn test_download_filename() {
        let options = QrOptions {
            format: QrFormat::Pdf,
            ..Default::default()
        };
        assert_eq!(options.download_filename(1700000000000), "qr-code-1700000000000.pdf");
    }

    #[test]
    fn test_share_payload() {
        let share = share_payload("Jane", "https://x.io/jane", "https://qr/img");
        assert_eq!(share.title, "QR Code for Jane");
        assert_eq!(share.text, "Scan this QR code to visit: https://x.io/jane");
        assert_eq!(share.url, "https://qr/img");
    }

    #[test]
    fn test_empty_target_rejected() {
        assert!(build_qr_url(SERVICE, "  ", &QrOptions::default()).is_err());
    }

    fn unreachable_service() -> QrService {
        // 端口 9 (discard) 在测试环境中不会有监听
        QrService::new(&QrConfig {
            service_url: "http://127.0.0.1:9/qr".to_string(),
            download_timeout_secs: 2,
        })
    }

    #[tokio::test]
    async fn test_download_upstream_failure_is_external_error() {
        let err = unreachable_service()
            .download("https://x.io/jane", &QrOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, BiolinkerError::ExternalService(_)));
        assert_eq!(err.http_status(), actix_web::http::StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn test_download_empty_target_fails_before_request() {
        let err = unreachable_service()
            .download(" ", &QrOptions::default())
            .await
            .unwrap_err();
        assert!(err.is_validation());
    }
}
