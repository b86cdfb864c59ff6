use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use tracing::info;

use super::SeaOrmStorage;
use super::converters::{model_to_profile, new_profile_to_active_model, profile_patch_to_active_model};
use super::map_write_err;
use crate::errors::{BiolinkerError, Result};
use crate::storage::models::{NewProfile, Profile, ProfilePatch};
use crate::storage::traits::ProfileStore;

use migration::entities::profile;

const USERNAME_TAKEN: &str = "Username is already taken";
pub const PROFILE_EXISTS: &str = "This account already has a profile";

#[async_trait]
impl ProfileStore for SeaOrmStorage {
    async fn find_profile_by_owner(&self, user_id: &str) -> Result<Option<Profile>> {
        let model = profile::Entity::find()
            .filter(profile::Column::UserId.eq(user_id))
            .one(&self.db)
            .await
            .map_err(|e| BiolinkerError::database_operation(format!("查询资料失败: {}", e)))?;

        Ok(model.map(model_to_profile))
    }

    async fn find_public_profile(&self, username: &str) -> Result<Option<Profile>> {
        let model = profile::Entity::find()
            .filter(profile::Column::Username.eq(username))
            .filter(profile::Column::IsPublic.eq(true))
            .one(&self.db)
            .await
            .map_err(|e| BiolinkerError::database_operation(format!("查询公开资料失败: {}", e)))?;

        Ok(model.map(model_to_profile))
    }

    async fn insert_profile(&self, user_id: &str, new_profile: NewProfile) -> Result<()> {
        let id = uuid::Uuid::new_v4().to_string();
        let username = new_profile.username.clone();
        let active = new_profile_to_active_model(id, user_id, new_profile, Utc::now());

        let inserted = profile::Entity::insert(active)
            .exec_without_returning(&self.db)
            .await
            .map_err(|e| map_write_err(e, USERNAME_TAKEN));

        // user_id 与 username 都是唯一索引，区分是哪一个冲突
        if let Err(BiolinkerError::Conflict(_)) = &inserted
            && self.find_profile_by_owner(user_id).await?.is_some()
        {
            return Err(BiolinkerError::conflict(PROFILE_EXISTS));
        }
        inserted?;

        info!("Profile created: {} (owner {})", username, user_id);
        Ok(())
    }

    async fn update_profile(&self, profile_id: &str, patch: &ProfilePatch) -> Result<()> {
        if patch.is_empty() {
            return Err(BiolinkerError::validation("Nothing to update"));
        }

        let result = profile::Entity::update_many()
            .set(profile_patch_to_active_model(patch, Utc::now()))
            .filter(profile::Column::Id.eq(profile_id))
            .exec(&self.db)
            .await
            .map_err(|e| map_write_err(e, USERNAME_TAKEN))?;

        if result.rows_affected == 0 {
            return Err(BiolinkerError::not_found(format!(
                "资料不存在: {}",
                profile_id
            )));
        }
        Ok(())
    }
}
