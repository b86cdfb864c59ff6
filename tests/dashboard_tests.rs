//! Dashboard state container tests
//!
//! Run against a temporary SQLite database, wrapped in a store double that
//! can be told to fail writes or reads and counts every store call.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use biolinker::config::DatabaseConfig;
use biolinker::errors::{BiolinkerError, Result};
use biolinker::services::dashboard::USERNAME_REQUIRED;
use biolinker::services::{DashboardState, Notice, NoticeVariant, Operation};
use biolinker::storage::{
    ClickSink, Link, LinkClickEvent, LinkIcon, LinkPatch, LinkStore, NewLink, NewProfile,
    PROFILE_EXISTS, Profile, ProfilePatch, ProfileStore, SeaOrmStorage, Theme,
};
use tempfile::TempDir;

// =============================================================================
// Test Setup
// =============================================================================

async fn create_storage() -> (Arc<SeaOrmStorage>, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("dashboard_test.db");
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());

    let storage = SeaOrmStorage::new(&db_url, "sqlite", &DatabaseConfig::default())
        .await
        .expect("Failed to create storage");
    (Arc::new(storage), temp_dir)
}

/// Store double: delegates to SQLite, fails on demand, counts calls
struct FlakyStore {
    inner: Arc<SeaOrmStorage>,
    fail_writes: AtomicBool,
    fail_reads: AtomicBool,
    writes: AtomicUsize,
    reads: AtomicUsize,
}

impl FlakyStore {
    fn new(inner: Arc<SeaOrmStorage>) -> Self {
        Self {
            inner,
            fail_writes: AtomicBool::new(false),
            fail_reads: AtomicBool::new(false),
            writes: AtomicUsize::new(0),
            reads: AtomicUsize::new(0),
        }
    }

    fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    fn calls(&self) -> usize {
        self.writes.load(Ordering::SeqCst) + self.reads.load(Ordering::SeqCst)
    }

    fn write(&self) -> Result<()> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(BiolinkerError::database_operation("simulated write failure"));
        }
        Ok(())
    }

    fn read(&self) -> Result<()> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(BiolinkerError::database_connection("simulated read failure"));
        }
        Ok(())
    }
}

#[async_trait]
impl ProfileStore for FlakyStore {
    async fn find_profile_by_owner(&self, user_id: &str) -> Result<Option<Profile>> {
        self.read()?;
        self.inner.find_profile_by_owner(user_id).await
    }

    async fn find_public_profile(&self, username: &str) -> Result<Option<Profile>> {
        self.read()?;
        self.inner.find_public_profile(username).await
    }

    async fn insert_profile(&self, user_id: &str, profile: NewProfile) -> Result<()> {
        self.write()?;
        self.inner.insert_profile(user_id, profile).await
    }

    async fn update_profile(&self, profile_id: &str, patch: &ProfilePatch) -> Result<()> {
        self.write()?;
        self.inner.update_profile(profile_id, patch).await
    }
}

#[async_trait]
impl LinkStore for FlakyStore {
    async fn list_links(&self, user_id: &str) -> Result<Vec<Link>> {
        self.read()?;
        self.inner.list_links(user_id).await
    }

    async fn list_active_links(&self, user_id: &str) -> Result<Vec<Link>> {
        self.read()?;
        self.inner.list_active_links(user_id).await
    }

    async fn find_link(&self, link_id: &str) -> Result<Option<Link>> {
        self.read()?;
        self.inner.find_link(link_id).await
    }

    async fn insert_link(&self, user_id: &str, link: NewLink, position: i32) -> Result<Link> {
        self.write()?;
        self.inner.insert_link(user_id, link, position).await
    }

    async fn update_link(&self, user_id: &str, link_id: &str, patch: &LinkPatch) -> Result<()> {
        self.write()?;
        self.inner.update_link(user_id, link_id, patch).await
    }

    async fn delete_link(&self, user_id: &str, link_id: &str) -> Result<()> {
        self.write()?;
        self.inner.delete_link(user_id, link_id).await
    }

    async fn update_positions(&self, user_id: &str, positions: &[(String, i32)]) -> Result<()> {
        self.write()?;
        self.inner.update_positions(user_id, positions).await
    }
}

#[async_trait]
impl ClickSink for FlakyStore {
    async fn record_click(&self, event: LinkClickEvent) -> anyhow::Result<()> {
        self.inner.record_click(event).await
    }
}

async fn setup() -> (DashboardState, Arc<FlakyStore>, TempDir) {
    let (storage, temp_dir) = create_storage().await;
    let store = Arc::new(FlakyStore::new(storage));
    let mut dashboard = DashboardState::new("user-1", store.clone());
    dashboard.load().await.expect("initial load");
    (dashboard, store, temp_dir)
}

fn new_link(title: &str, url: &str) -> NewLink {
    NewLink {
        title: title.to_string(),
        url: url.to_string(),
        description: None,
        icon: None,
    }
}

async fn add_three(dashboard: &mut DashboardState) -> Vec<String> {
    let mut ids = Vec::new();
    for (title, url) in [
        ("Site", "https://a.io"),
        ("Blog", "https://b.io"),
        ("Shop", "https://c.io"),
    ] {
        ids.push(dashboard.add_link(new_link(title, url)).await.unwrap().id.clone());
    }
    ids
}

// =============================================================================
// Load
// =============================================================================

#[tokio::test]
async fn test_load_without_profile_is_not_an_error() {
    let (dashboard, _store, _dir) = setup().await;
    assert!(dashboard.is_loaded());
    assert!(dashboard.profile().is_none());
    assert!(dashboard.links().is_empty());
}

#[tokio::test]
async fn test_failed_load_keeps_previous_state() {
    let (mut dashboard, store, _dir) = setup().await;
    add_three(&mut dashboard).await;

    store.set_fail_reads(true);
    assert!(dashboard.load().await.is_err());
    assert_eq!(dashboard.links().len(), 3);
}

// =============================================================================
// Add
// =============================================================================

#[tokio::test]
async fn test_add_link_positions_follow_list_length() {
    let (mut dashboard, _store, _dir) = setup().await;
    add_three(&mut dashboard).await;

    let positions: Vec<i32> = dashboard.links().iter().map(|l| l.position).collect();
    assert_eq!(positions, vec![0, 1, 2]);
    assert!(dashboard.links().iter().all(|l| l.is_active));
}

#[tokio::test]
async fn test_add_link_requires_title_and_url_without_store_call() {
    let (mut dashboard, store, _dir) = setup().await;
    let before = store.calls();

    let err = dashboard.add_link(new_link("   ", "https://a.io")).await.unwrap_err();
    assert!(err.is_validation());
    assert_eq!(err.message(), "Title and URL are required");

    let err = dashboard.add_link(new_link("Site", "")).await.unwrap_err();
    assert!(err.is_validation());

    assert_eq!(store.calls(), before);
    assert!(dashboard.links().is_empty());
}

#[tokio::test]
async fn test_add_link_rejects_dangerous_schemes() {
    let (mut dashboard, store, _dir) = setup().await;
    let before = store.calls();

    for url in ["javascript:alert(1)", "data:text/html,hi", "ftp://files.io"] {
        let err = dashboard.add_link(new_link("Bad", url)).await.unwrap_err();
        assert!(err.is_validation(), "{} should be rejected", url);
    }
    assert_eq!(store.calls(), before);

    dashboard
        .add_link(new_link("Mail", "mailto:jane@x.io"))
        .await
        .unwrap();
    dashboard.add_link(new_link("Call", "tel:+123456")).await.unwrap();
    assert_eq!(dashboard.links().len(), 2);
}

#[tokio::test]
async fn test_add_link_failure_leaves_local_list_unchanged() {
    let (mut dashboard, store, _dir) = setup().await;
    add_three(&mut dashboard).await;
    let before = dashboard.links().to_vec();

    store.set_fail_writes(true);
    let err = dashboard
        .add_link(new_link("Extra", "https://d.io"))
        .await
        .unwrap_err();
    assert!(!err.is_validation());
    assert_eq!(dashboard.links(), before.as_slice());

    let notice = Notice::failure(Operation::AddLink, &err);
    assert_eq!(notice.variant, NoticeVariant::Destructive);
    assert_eq!(notice.description, "Failed to add link. Please try again.");
}

#[tokio::test]
async fn test_add_link_keeps_optional_fields() {
    let (mut dashboard, _store, _dir) = setup().await;
    let link = dashboard
        .add_link(NewLink {
            title: "Code".to_string(),
            url: "https://github.com/jane".to_string(),
            description: Some("  my repos  ".to_string()),
            icon: Some(LinkIcon::Github),
        })
        .await
        .unwrap()
        .clone();

    assert_eq!(link.description.as_deref(), Some("my repos"));
    assert_eq!(link.icon, Some(LinkIcon::Github));
}

#[tokio::test]
async fn test_update_link_can_clear_icon() {
    let (mut dashboard, _store, _dir) = setup().await;
    let id = dashboard
        .add_link(NewLink {
            title: "Code".to_string(),
            url: "https://github.com/jane".to_string(),
            description: None,
            icon: Some(LinkIcon::Github),
        })
        .await
        .unwrap()
        .id
        .clone();

    let updated = dashboard
        .update_link(
            &id,
            LinkPatch {
                icon: Some(None),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .clone();
    assert_eq!(updated.icon, None);

    dashboard.load().await.unwrap();
    assert_eq!(dashboard.links()[0].icon, None);
    assert_eq!(dashboard.links()[0].title, "Code");
}

// =============================================================================
// Update / Delete
// =============================================================================

#[tokio::test]
async fn test_update_link_merges_patch_only() {
    let (mut dashboard, _store, _dir) = setup().await;
    let ids = add_three(&mut dashboard).await;
    let before = dashboard.links()[1].clone();

    let updated = dashboard
        .update_link(
            &ids[1],
            LinkPatch {
                title: Some("New blog".to_string()),
                is_active: Some(false),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .clone();

    assert_eq!(updated.title, "New blog");
    assert!(!updated.is_active);
    assert_eq!(updated.url, before.url);
    assert_eq!(updated.position, before.position);

    // 本地与存储一致
    dashboard.load().await.unwrap();
    assert_eq!(dashboard.links()[1].title, "New blog");
    assert!(!dashboard.links()[1].is_active);
}

#[tokio::test]
async fn test_update_unknown_link_is_not_found_without_store_call() {
    let (mut dashboard, store, _dir) = setup().await;
    add_three(&mut dashboard).await;
    let before = store.calls();

    let err = dashboard
        .update_link(
            "missing",
            LinkPatch {
                title: Some("x".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, BiolinkerError::NotFound(_)));
    assert_eq!(store.calls(), before);

    let notice = Notice::failure(Operation::UpdateLink, &err);
    assert_eq!(notice.title, "Error");
    assert_eq!(notice.description, "Link not found");
}

#[tokio::test]
async fn test_update_failure_leaves_local_unchanged() {
    let (mut dashboard, store, _dir) = setup().await;
    let ids = add_three(&mut dashboard).await;
    let before = dashboard.links().to_vec();

    store.set_fail_writes(true);
    let result = dashboard
        .update_link(
            &ids[0],
            LinkPatch {
                title: Some("Changed".to_string()),
                ..Default::default()
            },
        )
        .await;
    assert!(result.is_err());
    assert_eq!(dashboard.links(), before.as_slice());
}

#[tokio::test]
async fn test_empty_patch_is_rejected() {
    let (mut dashboard, store, _dir) = setup().await;
    let ids = add_three(&mut dashboard).await;
    let before = store.calls();

    let err = dashboard
        .update_link(&ids[0], LinkPatch::default())
        .await
        .unwrap_err();
    assert!(err.is_validation());
    assert_eq!(store.calls(), before);
}

#[tokio::test]
async fn test_delete_removes_exactly_one_and_keeps_positions() {
    let (mut dashboard, _store, _dir) = setup().await;
    let ids = add_three(&mut dashboard).await;

    let removed = dashboard.delete_link(&ids[1]).await.unwrap();
    assert_eq!(removed.id, ids[1]);

    let remaining: Vec<(&str, i32)> = dashboard
        .links()
        .iter()
        .map(|l| (l.id.as_str(), l.position))
        .collect();
    assert_eq!(remaining, vec![(ids[0].as_str(), 0), (ids[2].as_str(), 2)]);

    // 下一条新链接的 position = 当前长度，允许与已有 position 重复
    let added = dashboard
        .add_link(new_link("Next", "https://e.io"))
        .await
        .unwrap();
    assert_eq!(added.position, 2);
}

#[tokio::test]
async fn test_delete_failure_leaves_local_unchanged() {
    let (mut dashboard, store, _dir) = setup().await;
    let ids = add_three(&mut dashboard).await;

    store.set_fail_writes(true);
    assert!(dashboard.delete_link(&ids[0]).await.is_err());
    assert_eq!(dashboard.links().len(), 3);

    store.set_fail_writes(false);
    let before = store.calls();
    let err = dashboard.delete_link("missing").await.unwrap_err();
    assert!(matches!(err, BiolinkerError::NotFound(_)));
    assert_eq!(store.calls(), before);
}

// =============================================================================
// Profile
// =============================================================================

#[tokio::test]
async fn test_first_save_requires_username() {
    let (mut dashboard, store, _dir) = setup().await;
    let before = store.calls();

    let err = dashboard
        .save_profile(ProfilePatch {
            display_name: Some("Jane".to_string()),
            ..Default::default()
        })
        .await
        .unwrap_err();
    assert!(err.is_validation());
    assert_eq!(err.message(), USERNAME_REQUIRED);
    assert_eq!(store.calls(), before);

    let notice = Notice::failure(Operation::SaveProfile, &err);
    assert_eq!(notice.title, "Username required");
    assert_eq!(notice.description, "Please enter a username for your profile.");
}

#[tokio::test]
async fn test_first_save_creates_with_defaults() {
    let (mut dashboard, _store, _dir) = setup().await;

    let profile = dashboard
        .save_profile(ProfilePatch {
            username: Some("jane".to_string()),
            ..Default::default()
        })
        .await
        .unwrap()
        .clone();

    assert_eq!(profile.username, "jane");
    assert_eq!(profile.theme, Theme::Gradient);
    assert!(profile.is_public);
    assert_eq!(profile.user_id, "user-1");
}

#[tokio::test]
async fn test_second_save_updates_existing_profile() {
    let (mut dashboard, _store, _dir) = setup().await;
    let created = dashboard
        .save_profile(ProfilePatch {
            username: Some("jane".to_string()),
            bio: Some("hello".to_string()),
            ..Default::default()
        })
        .await
        .unwrap()
        .clone();

    let updated = dashboard
        .save_profile(ProfilePatch {
            theme: Some(Theme::Ocean),
            bio: Some("".to_string()),
            ..Default::default()
        })
        .await
        .unwrap()
        .clone();

    assert_eq!(updated.id, created.id);
    assert_eq!(updated.username, "jane");
    assert_eq!(updated.theme, Theme::Ocean);
    assert_eq!(updated.bio, None);
}

#[tokio::test]
async fn test_profile_save_failure_keeps_local_profile() {
    let (mut dashboard, store, _dir) = setup().await;
    dashboard
        .save_profile(ProfilePatch {
            username: Some("jane".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    let before = dashboard.profile().cloned();

    store.set_fail_writes(true);
    let err = dashboard
        .save_profile(ProfilePatch {
            display_name: Some("Jane".to_string()),
            ..Default::default()
        })
        .await
        .unwrap_err();
    assert_eq!(dashboard.profile().cloned(), before);

    let notice = Notice::failure(Operation::SaveProfile, &err);
    assert_eq!(
        notice.description,
        "Failed to update profile. Please try again."
    );
}

#[tokio::test]
async fn test_username_taken_by_another_user_is_conflict() {
    let (storage, _dir) = create_storage().await;

    let mut first = DashboardState::new("user-a", storage.clone());
    first.load().await.unwrap();
    first
        .save_profile(ProfilePatch {
            username: Some("jane".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();

    let mut second = DashboardState::new("user-b", storage.clone());
    second.load().await.unwrap();
    let err = second
        .save_profile(ProfilePatch {
            username: Some("jane".to_string()),
            ..Default::default()
        })
        .await
        .unwrap_err();

    assert!(matches!(err, BiolinkerError::Conflict(_)));
    assert!(second.profile().is_none());
}

#[tokio::test]
async fn test_save_after_failed_reread_updates_created_row() {
    let (mut dashboard, store, _dir) = setup().await;

    // 插入成功，但回读失败
    store.set_fail_reads(true);
    let err = dashboard
        .save_profile(ProfilePatch {
            username: Some("jane".to_string()),
            ..Default::default()
        })
        .await
        .unwrap_err();
    assert!(!matches!(err, BiolinkerError::Conflict(_)));
    assert!(dashboard.profile().is_none());

    store.set_fail_reads(false);
    let profile = dashboard
        .save_profile(ProfilePatch {
            username: Some("jane".to_string()),
            display_name: Some("Jane".to_string()),
            ..Default::default()
        })
        .await
        .unwrap()
        .clone();

    assert_eq!(profile.username, "jane");
    assert_eq!(profile.display_name.as_deref(), Some("Jane"));
    assert_eq!(profile.user_id, "user-1");
    assert_eq!(dashboard.profile().map(|p| p.id.clone()), Some(profile.id));
}

#[tokio::test]
async fn test_second_profile_for_owner_is_not_a_username_conflict() {
    let (storage, _dir) = create_storage().await;
    let new_profile = |username: &str| NewProfile {
        username: username.to_string(),
        display_name: None,
        bio: None,
        avatar_url: None,
        theme: Theme::default(),
        is_public: true,
    };

    storage.insert_profile("user-a", new_profile("jane")).await.unwrap();

    let err = storage
        .insert_profile("user-a", new_profile("janet"))
        .await
        .unwrap_err();
    assert!(matches!(err, BiolinkerError::Conflict(_)));
    assert_eq!(err.message(), PROFILE_EXISTS);

    let err = storage
        .insert_profile("user-b", new_profile("jane"))
        .await
        .unwrap_err();
    assert_eq!(err.message(), "Username is already taken");
}

#[tokio::test]
async fn test_reserved_and_malformed_usernames_rejected() {
    let (mut dashboard, store, _dir) = setup().await;
    let before = store.calls();

    for username in ["api", "go", "has space", "a/b"] {
        let err = dashboard
            .save_profile(ProfilePatch {
                username: Some(username.to_string()),
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert!(err.is_validation(), "{} should be rejected", username);
    }
    assert_eq!(store.calls(), before);
}

// =============================================================================
// Reorder
// =============================================================================

#[tokio::test]
async fn test_reorder_applies_full_permutation() {
    let (mut dashboard, _store, _dir) = setup().await;
    let ids = add_three(&mut dashboard).await;

    let order = vec![ids[2].clone(), ids[0].clone(), ids[1].clone()];
    let links = dashboard.reorder(&order).await.unwrap().to_vec();

    let got: Vec<&str> = links.iter().map(|l| l.id.as_str()).collect();
    assert_eq!(got, vec![ids[2].as_str(), ids[0].as_str(), ids[1].as_str()]);
    let positions: Vec<i32> = links.iter().map(|l| l.position).collect();
    assert_eq!(positions, vec![0, 1, 2]);
}

#[tokio::test]
async fn test_reorder_rejects_non_permutations() {
    let (mut dashboard, store, _dir) = setup().await;
    let ids = add_three(&mut dashboard).await;
    let before = store.calls();

    let partial = vec![ids[0].clone(), ids[1].clone()];
    let duplicated = vec![ids[0].clone(), ids[0].clone(), ids[1].clone()];
    let unknown = vec![ids[0].clone(), ids[1].clone(), "other".to_string()];

    for order in [partial, duplicated, unknown] {
        let err = dashboard.reorder(&order).await.unwrap_err();
        assert!(err.is_validation());
    }
    assert_eq!(store.calls(), before);
}

#[tokio::test]
async fn test_reorder_unchanged_order_writes_nothing() {
    let (mut dashboard, store, _dir) = setup().await;
    let ids = add_three(&mut dashboard).await;
    let before = store.calls();

    dashboard.reorder(&ids).await.unwrap();
    assert_eq!(store.calls(), before);
}

#[tokio::test]
async fn test_reorder_failure_keeps_order() {
    let (mut dashboard, store, _dir) = setup().await;
    let ids = add_three(&mut dashboard).await;
    let before = dashboard.links().to_vec();

    store.set_fail_writes(true);
    let order = vec![ids[1].clone(), ids[0].clone(), ids[2].clone()];
    assert!(dashboard.reorder(&order).await.is_err());
    assert_eq!(dashboard.links(), before.as_slice());
}

// =============================================================================
// Notices
// =============================================================================

#[test]
fn test_success_notices() {
    let notice = Notice::success(Operation::AddLink);
    assert_eq!(notice.variant, NoticeVariant::Success);
    assert_eq!(notice.title, "Link added");

    let notice = Notice::success(Operation::SaveProfile);
    assert_eq!(notice.title, "Profile updated");
}
