//! Dashboard state container
//!
//! Holds one user's profile and ordered link list in memory and keeps it
//! in step with the store. Every mutation writes to the store first and
//! only touches local state once the write succeeded; any error leaves
//! local state exactly as it was.

use std::collections::HashSet;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, warn};

use crate::errors::{BiolinkerError, Result};
use crate::storage::models::{Link, LinkPatch, NewLink, NewProfile, Profile, ProfilePatch, non_empty};
use crate::storage::traits::Backend;
use crate::utils::{
    is_reserved_username, is_valid_username, validate_link_url, validate_web_url,
    validation_error_message,
};

pub const USERNAME_REQUIRED: &str = "Username is required";

/// 序列化给 API 的只读视图
#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
    pub profile: Option<Profile>,
    pub links: Vec<Link>,
}

pub struct DashboardState {
    user_id: String,
    store: Arc<dyn Backend>,
    profile: Option<Profile>,
    links: Vec<Link>,
    loaded: bool,
}

impl DashboardState {
    pub fn new(user_id: impl Into<String>, store: Arc<dyn Backend>) -> Self {
        Self {
            user_id: user_id.into(),
            store,
            profile: None,
            links: Vec::new(),
            loaded: false,
        }
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn profile(&self) -> Option<&Profile> {
        self.profile.as_ref()
    }

    pub fn links(&self) -> &[Link] {
        &self.links
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn view(&self) -> DashboardView {
        DashboardView {
            profile: self.profile.clone(),
            links: self.links.clone(),
        }
    }

    /// Fetch profile and links. Local state is replaced only when both
    /// reads succeed; a missing profile is not an error.
    pub async fn load(&mut self) -> Result<()> {
        let profile = self.store.find_profile_by_owner(&self.user_id).await?;
        let links = self.store.list_links(&self.user_id).await?;

        debug!(
            "Dashboard loaded for {}: profile={}, {} links",
            self.user_id,
            profile.is_some(),
            links.len()
        );
        self.profile = profile;
        self.links = links;
        self.loaded = true;
        Ok(())
    }

    /// 首次访问时加载
    pub async fn ensure_loaded(&mut self) -> Result<()> {
        if self.loaded {
            return Ok(());
        }
        self.load().await
    }

    /// 追加一条链接，position 为当前链接数
    pub async fn add_link(&mut self, data: NewLink) -> Result<&Link> {
        let title = data.title.trim();
        let url = data.url.trim();
        if title.is_empty() || url.is_empty() {
            return Err(BiolinkerError::validation("Title and URL are required"));
        }
        validate_link_url(url)
            .map_err(|e| BiolinkerError::validation(validation_error_message(&e)))?;

        let position = self.links.len() as i32;
        let data = NewLink {
            title: title.to_string(),
            url: url.to_string(),
            description: data.description.as_deref().and_then(non_empty),
            icon: data.icon,
        };

        let link = self
            .store
            .insert_link(&self.user_id, data, position)
            .await?;
        self.links.push(link);
        Ok(&self.links[self.links.len() - 1])
    }

    /// 部分更新一条已存在的链接
    pub async fn update_link(&mut self, link_id: &str, patch: LinkPatch) -> Result<&Link> {
        if patch.is_empty() {
            return Err(BiolinkerError::validation("Nothing to update"));
        }
        let index = self.index_of(link_id)?;
        let patch = normalize_link_patch(patch)?;

        self.store
            .update_link(&self.user_id, link_id, &patch)
            .await?;
        self.links[index].apply(&patch);
        Ok(&self.links[index])
    }

    /// 删除一条链接，其余链接的 position 保持不变
    pub async fn delete_link(&mut self, link_id: &str) -> Result<Link> {
        let index = self.index_of(link_id)?;

        self.store.delete_link(&self.user_id, link_id).await?;
        Ok(self.links.remove(index))
    }

    /// Create the profile on first save, otherwise patch it by id. The
    /// canonical row is re-read afterwards and becomes the local profile.
    /// A create that conflicts with a row this owner already has is
    /// retried as an update of that row.
    pub async fn save_profile(&mut self, patch: ProfilePatch) -> Result<&Profile> {
        let patch = normalize_profile_patch(patch)?;

        match &self.profile {
            None => {
                let username = patch
                    .username
                    .clone()
                    .ok_or_else(|| BiolinkerError::validation(USERNAME_REQUIRED))?;

                let new_profile = NewProfile {
                    username,
                    display_name: patch.display_name.as_deref().and_then(non_empty),
                    bio: patch.bio.as_deref().and_then(non_empty),
                    avatar_url: patch.avatar_url.as_deref().and_then(non_empty),
                    theme: patch.theme.unwrap_or_default(),
                    is_public: patch.is_public.unwrap_or(true),
                };
                if let Err(err) = self.store.insert_profile(&self.user_id, new_profile).await {
                    // 上次创建可能已写入，只是回读失败：改为更新已有记录
                    let existing = match &err {
                        BiolinkerError::Conflict(_) => {
                            self.store.find_profile_by_owner(&self.user_id).await?
                        }
                        _ => None,
                    };
                    match existing {
                        Some(existing) => {
                            self.store.update_profile(&existing.id, &patch).await?;
                        }
                        None => return Err(err),
                    }
                }
            }
            Some(existing) => {
                if patch.is_empty() {
                    return Err(BiolinkerError::validation("Nothing to update"));
                }
                self.store.update_profile(&existing.id, &patch).await?;
            }
        }

        let fresh = self
            .store
            .find_profile_by_owner(&self.user_id)
            .await?
            .ok_or_else(|| BiolinkerError::internal("Profile missing after save"))?;
        Ok(self.profile.insert(fresh))
    }

    /// Apply a full ordering. `ordered_ids` must be a permutation of the
    /// current link ids; each link gets `position = index`.
    pub async fn reorder(&mut self, ordered_ids: &[String]) -> Result<&[Link]> {
        let current: HashSet<&str> = self.links.iter().map(|l| l.id.as_str()).collect();
        let requested: HashSet<&str> = ordered_ids.iter().map(String::as_str).collect();
        if ordered_ids.len() != self.links.len()
            || requested.len() != ordered_ids.len()
            || requested != current
        {
            return Err(BiolinkerError::validation(
                "Link order must list every link exactly once",
            ));
        }

        let changes: Vec<(String, i32)> = ordered_ids
            .iter()
            .enumerate()
            .filter_map(|(index, id)| {
                let position = index as i32;
                self.links
                    .iter()
                    .find(|l| &l.id == id)
                    .filter(|l| l.position != position)
                    .map(|_| (id.clone(), position))
            })
            .collect();

        if changes.is_empty() {
            return Ok(&self.links);
        }

        self.store
            .update_positions(&self.user_id, &changes)
            .await?;

        match self.store.list_links(&self.user_id).await {
            Ok(links) => self.links = links,
            Err(e) => {
                // 写入已成功，按请求顺序在本地重排
                warn!("Re-fetch after reorder failed for {}: {}", self.user_id, e);
                for (id, position) in &changes {
                    if let Some(link) = self.links.iter_mut().find(|l| &l.id == id) {
                        link.position = *position;
                    }
                }
                self.links.sort_by_key(|l| l.position);
            }
        }
        Ok(&self.links)
    }

    fn index_of(&self, link_id: &str) -> Result<usize> {
        self.links
            .iter()
            .position(|l| l.id == link_id)
            .ok_or_else(|| BiolinkerError::not_found(format!("Link not found: {}", link_id)))
    }
}

fn normalize_link_patch(mut patch: LinkPatch) -> Result<LinkPatch> {
    if let Some(title) = patch.title.as_mut() {
        *title = title.trim().to_string();
        if title.is_empty() {
            return Err(BiolinkerError::validation("Title cannot be empty"));
        }
    }
    if let Some(url) = patch.url.as_mut() {
        *url = url.trim().to_string();
        validate_link_url(url)
            .map_err(|e| BiolinkerError::validation(validation_error_message(&e)))?;
    }
    Ok(patch)
}

fn normalize_profile_patch(mut patch: ProfilePatch) -> Result<ProfilePatch> {
    if let Some(username) = patch.username.take() {
        let username = username.trim().to_string();
        if !username.is_empty() {
            if !is_valid_username(&username) {
                return Err(BiolinkerError::validation(
                    "Username may only contain letters, numbers, '_', '-' and '.' (max 32)",
                ));
            }
            if is_reserved_username(&username) {
                return Err(BiolinkerError::validation("This username is reserved"));
            }
            patch.username = Some(username);
        }
    }
    if let Some(avatar) = patch.avatar_url.as_deref().map(str::trim)
        && !avatar.is_empty()
    {
        validate_web_url(avatar)
            .map_err(|_| BiolinkerError::validation("Avatar URL must be an http(s) address"))?;
    }
    Ok(patch)
}
