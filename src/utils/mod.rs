pub mod html;
pub mod password;
pub mod url_validator;

pub use url_validator::{validate_link_url, validate_web_url, validation_error_message};

/// 与路由冲突的保留用户名
pub const RESERVED_USERNAMES: &[&str] = &["api", "health", "go", "static"];

pub const MAX_USERNAME_LEN: usize = 32;

/// username 只允许 1-32 位的 [A-Za-z0-9_.-]
pub fn is_valid_username(username: &str) -> bool {
    !username.is_empty()
        && username.len() <= MAX_USERNAME_LEN
        && username
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'_' | b'-' | b'.'))
}

pub fn is_reserved_username(username: &str) -> bool {
    RESERVED_USERNAMES
        .iter()
        .any(|r| r.eq_ignore_ascii_case(username))
}

/// 生成指定长度的随机字母数字串
pub fn generate_random_string(length: usize) -> String {
    use std::iter;

    let chars = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

    iter::repeat_with(|| chars[rand::random_range(0..chars.len())] as char)
        .take(length)
        .collect()
}
