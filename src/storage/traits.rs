//! Store seams used by the services.
//!
//! The dashboard and the public renderer only talk to these traits, so
//! tests can swap in doubles that fail on demand or count calls.

use async_trait::async_trait;

use crate::errors::Result;
use crate::storage::models::{
    Account, Link, LinkClickEvent, LinkPatch, NewLink, NewProfile, Profile, ProfilePatch,
};

#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// 按账号查找资料（不区分是否公开）
    async fn find_profile_by_owner(&self, user_id: &str) -> Result<Option<Profile>>;

    /// 按 username 查找公开资料，私密资料与不存在一样返回 None
    async fn find_public_profile(&self, username: &str) -> Result<Option<Profile>>;

    async fn insert_profile(&self, user_id: &str, profile: NewProfile) -> Result<()>;

    /// 按主键部分更新，命中 0 行返回 NotFound
    async fn update_profile(&self, profile_id: &str, patch: &ProfilePatch) -> Result<()>;
}

#[async_trait]
pub trait LinkStore: Send + Sync {
    /// 用户全部链接，按 position 升序
    async fn list_links(&self, user_id: &str) -> Result<Vec<Link>>;

    /// 仅启用的链接，按 position 升序
    async fn list_active_links(&self, user_id: &str) -> Result<Vec<Link>>;

    async fn find_link(&self, link_id: &str) -> Result<Option<Link>>;

    /// 插入并返回存储后的行
    async fn insert_link(&self, user_id: &str, link: NewLink, position: i32) -> Result<Link>;

    async fn update_link(&self, user_id: &str, link_id: &str, patch: &LinkPatch) -> Result<()>;

    async fn delete_link(&self, user_id: &str, link_id: &str) -> Result<()>;

    /// 在一个事务内批量写入 position
    async fn update_positions(&self, user_id: &str, positions: &[(String, i32)]) -> Result<()>;
}

/// 点击事件写入端
///
/// 写入失败不影响跳转，调用方只记录日志。
#[async_trait]
pub trait ClickSink: Send + Sync {
    async fn record_click(&self, event: LinkClickEvent) -> anyhow::Result<()>;
}

#[async_trait]
pub trait AccountStore: Send + Sync {
    async fn find_account(&self, account_id: &str) -> Result<Option<Account>>;

    async fn find_account_by_email(&self, email: &str) -> Result<Option<Account>>;

    async fn insert_account(&self, account: Account) -> Result<()>;
}

/// Everything the dashboard and public pages need from storage.
pub trait Backend: ProfileStore + LinkStore + ClickSink {}

impl<T: ProfileStore + LinkStore + ClickSink> Backend for T {}
