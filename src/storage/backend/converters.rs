use std::str::FromStr;

use chrono::{DateTime, Utc};
use sea_orm::ActiveValue::{NotSet, Set};
use tracing::warn;

use crate::storage::models::{
    Account, AuthProvider, Link, LinkClickEvent, LinkIcon, LinkPatch, NewLink, NewProfile,
    Profile, ProfilePatch, Theme, non_empty,
};
use migration::entities::{account, link, link_analytics, profile};

/// 将 profile Model 转换为 Profile
///
/// 未知的 theme 值回退为默认主题。
pub fn model_to_profile(model: profile::Model) -> Profile {
    let theme = Theme::from_str(&model.theme).unwrap_or_else(|_| {
        warn!(
            "Unknown theme '{}' on profile {}, falling back to default",
            model.theme, model.id
        );
        Theme::default()
    });

    Profile {
        id: model.id,
        user_id: model.user_id,
        username: model.username,
        display_name: model.display_name,
        bio: model.bio,
        avatar_url: model.avatar_url,
        theme,
        is_public: model.is_public,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

/// 新资料 → ActiveModel
pub fn new_profile_to_active_model(
    id: String,
    user_id: &str,
    profile: NewProfile,
    now: DateTime<Utc>,
) -> profile::ActiveModel {
    profile::ActiveModel {
        id: Set(id),
        user_id: Set(user_id.to_string()),
        username: Set(profile.username),
        display_name: Set(profile.display_name),
        bio: Set(profile.bio),
        avatar_url: Set(profile.avatar_url),
        theme: Set(profile.theme.as_ref().to_string()),
        is_public: Set(profile.is_public),
        created_at: Set(now),
        updated_at: Set(now),
    }
}

/// 部分更新：未给出的字段保持 NotSet
pub fn profile_patch_to_active_model(
    patch: &ProfilePatch,
    now: DateTime<Utc>,
) -> profile::ActiveModel {
    profile::ActiveModel {
        username: patch
            .username
            .as_ref()
            .map_or(NotSet, |v| Set(v.trim().to_string())),
        display_name: patch
            .display_name
            .as_deref()
            .map_or(NotSet, |v| Set(non_empty(v))),
        bio: patch.bio.as_deref().map_or(NotSet, |v| Set(non_empty(v))),
        avatar_url: patch
            .avatar_url
            .as_deref()
            .map_or(NotSet, |v| Set(non_empty(v))),
        theme: patch
            .theme
            .map_or(NotSet, |t| Set(t.as_ref().to_string())),
        is_public: patch.is_public.map_or(NotSet, Set),
        updated_at: Set(now),
        ..Default::default()
    }
}

/// 将 link Model 转换为 Link
pub fn model_to_link(model: link::Model) -> Link {
    let icon = model
        .icon
        .as_deref()
        .and_then(|raw| LinkIcon::from_str(raw).ok());

    Link {
        id: model.id,
        user_id: model.user_id,
        title: model.title,
        url: model.url,
        description: model.description,
        icon,
        is_active: model.is_active,
        position: model.position.max(0),
        created_at: model.created_at,
    }
}

/// 新链接 → ActiveModel，新链接默认启用
pub fn new_link_to_active_model(
    id: String,
    user_id: &str,
    link: NewLink,
    position: i32,
    now: DateTime<Utc>,
) -> link::ActiveModel {
    link::ActiveModel {
        id: Set(id),
        user_id: Set(user_id.to_string()),
        title: Set(link.title.trim().to_string()),
        url: Set(link.url.trim().to_string()),
        description: Set(link.description.as_deref().and_then(non_empty)),
        icon: Set(link.icon.map(|i| i.as_ref().to_string())),
        is_active: Set(true),
        position: Set(position),
        created_at: Set(now),
    }
}

pub fn link_patch_to_active_model(patch: &LinkPatch) -> link::ActiveModel {
    link::ActiveModel {
        title: patch
            .title
            .as_ref()
            .map_or(NotSet, |v| Set(v.trim().to_string())),
        url: patch
            .url
            .as_ref()
            .map_or(NotSet, |v| Set(v.trim().to_string())),
        description: patch
            .description
            .as_deref()
            .map_or(NotSet, |v| Set(non_empty(v))),
        icon: patch
            .icon
            .map_or(NotSet, |i| Set(i.map(|i| i.as_ref().to_string()))),
        is_active: patch.is_active.map_or(NotSet, Set),
        ..Default::default()
    }
}

pub fn click_to_active_model(event: LinkClickEvent) -> link_analytics::ActiveModel {
    link_analytics::ActiveModel {
        link_id: Set(event.link_id),
        user_agent: Set(event.user_agent),
        referrer: Set(event.referrer),
        clicked_at: Set(event.clicked_at),
        ..Default::default()
    }
}

pub fn model_to_account(model: account::Model) -> Account {
    Account {
        id: model.id,
        email: model.email,
        password_hash: model.password_hash,
        provider: AuthProvider::from_str(&model.provider).unwrap_or(AuthProvider::Email),
        created_at: model.created_at,
    }
}

pub fn account_to_active_model(account: Account) -> account::ActiveModel {
    account::ActiveModel {
        id: Set(account.id),
        email: Set(account.email),
        password_hash: Set(account.password_hash),
        provider: Set(account.provider.as_ref().to_string()),
        created_at: Set(account.created_at),
    }
}
