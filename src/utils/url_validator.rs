//! URL 验证模块
//!
//! 链接目标允许 http(s) / mailto / tel，头像只允许 http(s)。

use url::Url;

#[derive(Debug, PartialEq)]
pub enum UrlValidationError {
    EmptyUrl,
    InvalidProtocol(String),
    DangerousProtocol(String),
    InvalidFormat(String),
}

impl std::fmt::Display for UrlValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyUrl => write!(f, "URL cannot be empty"),
            Self::InvalidProtocol(proto) => write!(f, "Unsupported protocol: {}", proto),
            Self::DangerousProtocol(proto) => {
                write!(f, "Dangerous protocol blocked: {}", proto)
            }
            Self::InvalidFormat(msg) => write!(f, "Invalid URL format: {}", msg),
        }
    }
}

impl std::error::Error for UrlValidationError {}

const DANGEROUS_PROTOCOLS: &[&str] = &[
    "javascript:",
    "data:",
    "file:",
    "vbscript:",
    "about:",
    "blob:",
];

const LINK_SCHEMES: &[&str] = &["http", "https", "mailto", "tel"];
const WEB_SCHEMES: &[&str] = &["http", "https"];

/// 校验链接目标：http(s)、mailto:、tel:
pub fn validate_link_url(url: &str) -> Result<(), UrlValidationError> {
    validate_with_schemes(url, LINK_SCHEMES)
}

/// 校验头像等必须可被浏览器加载的地址
pub fn validate_web_url(url: &str) -> Result<(), UrlValidationError> {
    validate_with_schemes(url, WEB_SCHEMES)
}

fn validate_with_schemes(url: &str, allowed: &[&str]) -> Result<(), UrlValidationError> {
    let url = url.trim();
    if url.is_empty() {
        return Err(UrlValidationError::EmptyUrl);
    }

    let url_lower = url.to_lowercase();
    if let Some(proto) = DANGEROUS_PROTOCOLS.iter().find(|p| url_lower.starts_with(*p)) {
        return Err(UrlValidationError::DangerousProtocol(proto.to_string()));
    }

    let parsed = Url::parse(url).map_err(|e| UrlValidationError::InvalidFormat(e.to_string()))?;
    let scheme = parsed.scheme();
    if !allowed.contains(&scheme) {
        return Err(UrlValidationError::InvalidProtocol(format!("{}:", scheme)));
    }

    // http(s) 必须带主机名
    if WEB_SCHEMES.contains(&scheme) && parsed.host_str().is_none_or(str::is_empty) {
        return Err(UrlValidationError::InvalidFormat("missing host".to_string()));
    }

    Ok(())
}

/// 用户可见的错误提示
pub fn validation_error_message(error: &UrlValidationError) -> &'static str {
    match error {
        UrlValidationError::EmptyUrl => "URL cannot be empty",
        UrlValidationError::InvalidProtocol(_) => {
            "URL must start with http://, https://, mailto: or tel:"
        }
        UrlValidationError::DangerousProtocol(_) => "This URL protocol is not allowed",
        UrlValidationError::InvalidFormat(_) => "Invalid URL format",
    }
}
