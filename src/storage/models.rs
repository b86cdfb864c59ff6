use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumIter, EnumString, IntoEnumIterator};

/// 公开页面主题
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    EnumIter,
    AsRefStr,
    EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Theme {
    Minimal,
    Sunset,
    Ocean,
    Forest,
    Cosmic,
    Aurora,
    #[default]
    Gradient,
}

impl Theme {
    /// CSS background used by the public page renderer
    pub fn background(&self) -> &'static str {
        match self {
            Theme::Minimal => "linear-gradient(135deg, #f3f4f6, #d1d5db)",
            Theme::Sunset => "linear-gradient(135deg, #fb923c, #ec4899)",
            Theme::Ocean => "linear-gradient(135deg, #60a5fa, #a855f7)",
            Theme::Forest => "linear-gradient(135deg, #4ade80, #10b981)",
            Theme::Cosmic => "linear-gradient(135deg, #9333ea, #2563eb)",
            Theme::Aurora => "linear-gradient(135deg, #c084fc, #f472b6, #f87171)",
            Theme::Gradient => "linear-gradient(135deg, #667eea, #764ba2)",
        }
    }

    /// 浅色背景使用深色文字
    pub fn is_light(&self) -> bool {
        matches!(self, Theme::Minimal)
    }

    /// 所有可选主题的 key 列表
    pub fn keys() -> Vec<&'static str> {
        Theme::iter().map(|t| t.into_static()).collect()
    }

    fn into_static(self) -> &'static str {
        match self {
            Theme::Minimal => "minimal",
            Theme::Sunset => "sunset",
            Theme::Ocean => "ocean",
            Theme::Forest => "forest",
            Theme::Cosmic => "cosmic",
            Theme::Aurora => "aurora",
            Theme::Gradient => "gradient",
        }
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_ref())
    }
}

/// 链接图标分类（固定集合）
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, AsRefStr, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum LinkIcon {
    Website,
    Instagram,
    Twitter,
    Youtube,
    Github,
    Email,
    Location,
}

impl LinkIcon {
    /// Glyph shown next to the link title on the public page
    pub fn glyph(&self) -> &'static str {
        match self {
            LinkIcon::Website => "🌐",
            LinkIcon::Instagram => "📸",
            LinkIcon::Twitter => "🐦",
            LinkIcon::Youtube => "▶️",
            LinkIcon::Github => "💻",
            LinkIcon::Email => "✉️",
            LinkIcon::Location => "📍",
        }
    }
}

/// 用户的公开资料（与账号 1:1）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,
    pub user_id: String,
    pub username: String,
    pub display_name: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    pub theme: Theme,
    pub is_public: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Profile {
    /// 展示名，未设置时回退到 username
    pub fn title(&self) -> &str {
        self.display_name
            .as_deref()
            .filter(|s| !s.is_empty())
            .unwrap_or(&self.username)
    }

    /// 头像占位字母（最多两位）
    pub fn initials(&self) -> String {
        let initials: String = self
            .title()
            .split_whitespace()
            .filter_map(|part| part.chars().next())
            .flat_map(|c| c.to_uppercase())
            .take(2)
            .collect();
        if initials.is_empty() {
            "?".to_string()
        } else {
            initials
        }
    }
}

/// 首次保存资料时的创建参数
#[derive(Debug, Clone, PartialEq)]
pub struct NewProfile {
    pub username: String,
    pub display_name: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    pub theme: Theme,
    pub is_public: bool,
}

/// Partial profile update. `None` keeps the stored value; an empty string
/// for an optional text field clears it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfilePatch {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub theme: Option<Theme>,
    #[serde(default)]
    pub is_public: Option<bool>,
}

impl ProfilePatch {
    pub fn is_empty(&self) -> bool {
        self.username.is_none()
            && self.display_name.is_none()
            && self.bio.is_none()
            && self.avatar_url.is_none()
            && self.theme.is_none()
            && self.is_public.is_none()
    }
}

/// 一条对外链接
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub url: String,
    pub description: Option<String>,
    pub icon: Option<LinkIcon>,
    pub is_active: bool,
    pub position: i32,
    pub created_at: DateTime<Utc>,
}

impl Link {
    /// 将已被存储确认的 patch 合并到本地副本
    pub fn apply(&mut self, patch: &LinkPatch) {
        if let Some(title) = &patch.title {
            self.title = title.clone();
        }
        if let Some(url) = &patch.url {
            self.url = url.clone();
        }
        if let Some(description) = &patch.description {
            self.description = non_empty(description);
        }
        if let Some(icon) = patch.icon {
            self.icon = icon;
        }
        if let Some(is_active) = patch.is_active {
            self.is_active = is_active;
        }
    }
}

/// 新链接的输入数据
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewLink {
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub icon: Option<LinkIcon>,
}

/// Partial link update; same `None`/empty-string rules as [`ProfilePatch`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LinkPatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// 缺省保持不变；显式 `null` 清除图标
    #[serde(
        default,
        deserialize_with = "explicit_null",
        skip_serializing_if = "Option::is_none"
    )]
    pub icon: Option<Option<LinkIcon>>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

/// 字段存在时（包括 null）总是返回 Some
fn explicit_null<'de, D, T>(deserializer: D) -> std::result::Result<Option<Option<T>>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl LinkPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.url.is_none()
            && self.description.is_none()
            && self.icon.is_none()
            && self.is_active.is_none()
    }
}

/// 公开页面的一次点击
#[derive(Debug, Clone, PartialEq)]
pub struct LinkClickEvent {
    pub link_id: String,
    pub user_agent: Option<String>,
    pub referrer: Option<String>,
    pub clicked_at: DateTime<Utc>,
}

/// 账号登录方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, AsRefStr, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AuthProvider {
    Email,
    Google,
    Github,
}

/// 登录账号
#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    pub id: String,
    pub email: String,
    pub password_hash: Option<String>,
    pub provider: AuthProvider,
    pub created_at: DateTime<Utc>,
}

/// 空字符串视为清除
pub fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
