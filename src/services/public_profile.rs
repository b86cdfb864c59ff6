//! Public profile resolution and click tracking
//!
//! A private profile and a missing one resolve to the same `None`, so the
//! HTTP layer cannot tell them apart either.

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::errors::Result;
use crate::storage::models::{Link, LinkClickEvent, Profile};
use crate::storage::traits::Backend;
use crate::utils::is_valid_username;

pub const DEFAULT_SHARE_TEXT: &str = "Check out my links!";

/// 公开页面渲染所需数据
#[derive(Debug, Clone, Serialize)]
pub struct PublicPage {
    pub profile: Profile,
    /// 仅启用的链接，按 position 升序
    pub links: Vec<Link>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SharePayload {
    pub title: String,
    pub text: String,
    pub url: String,
}

impl SharePayload {
    pub fn for_profile(profile: &Profile, site_url: &str) -> Self {
        SharePayload {
            title: profile.title().to_string(),
            text: profile
                .bio
                .clone()
                .filter(|b| !b.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_SHARE_TEXT.to_string()),
            url: public_url(site_url, &profile.username),
        }
    }
}

/// {site_url}/{username}
pub fn public_url(site_url: &str, username: &str) -> String {
    format!("{}/{}", site_url.trim_end_matches('/'), username)
}

#[derive(Clone)]
pub struct PublicProfileService {
    store: Arc<dyn Backend>,
}

impl PublicProfileService {
    pub fn new(store: Arc<dyn Backend>) -> Self {
        Self { store }
    }

    /// username → 公开资料与启用的链接；私密或不存在都返回 None
    pub async fn resolve(&self, username: &str) -> Result<Option<PublicPage>> {
        if !is_valid_username(username) {
            return Ok(None);
        }

        let Some(profile) = self.store.find_public_profile(username).await? else {
            debug!("Public profile not found or private: {}", username);
            return Ok(None);
        };

        let links = self.store.list_active_links(&profile.user_id).await?;
        Ok(Some(PublicPage { profile, links }))
    }

    /// 仪表盘预览：忽略 is_public
    pub async fn preview(&self, user_id: &str) -> Result<Option<PublicPage>> {
        let Some(profile) = self.store.find_profile_by_owner(user_id).await? else {
            return Ok(None);
        };

        let links = self.store.list_active_links(user_id).await?;
        Ok(Some(PublicPage { profile, links }))
    }

    /// Link behind `/go/{id}`: it must be active and its owner's profile
    /// must be public.
    pub async fn click_target(&self, link_id: &str) -> Result<Option<Link>> {
        let Some(link) = self.store.find_link(link_id).await? else {
            return Ok(None);
        };
        if !link.is_active {
            return Ok(None);
        }

        let owner_public = self
            .store
            .find_profile_by_owner(&link.user_id)
            .await?
            .is_some_and(|p| p.is_public);

        Ok(owner_public.then_some(link))
    }

    /// 后台写入点击事件，失败只记录 warn
    pub fn track_click(
        &self,
        link_id: &str,
        user_agent: Option<String>,
        referrer: Option<String>,
    ) -> JoinHandle<()> {
        let store = self.store.clone();
        let event = LinkClickEvent {
            link_id: link_id.to_string(),
            user_agent,
            referrer,
            clicked_at: Utc::now(),
        };

        tokio::spawn(async move {
            let link_id = event.link_id.clone();
            if let Err(e) = store.record_click(event).await {
                warn!("Failed to record click for link {}: {}", link_id, e);
            }
        })
    }

    pub async fn share(&self, username: &str, site_url: &str) -> Result<Option<SharePayload>> {
        Ok(self
            .resolve(username)
            .await?
            .map(|page| SharePayload::for_profile(&page.profile, site_url)))
    }
}
