use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, EntityTrait, QueryFilter, QueryOrder,
    TransactionTrait,
};
use tracing::{debug, info};

use super::SeaOrmStorage;
use super::converters::{link_patch_to_active_model, model_to_link, new_link_to_active_model};
use crate::errors::{BiolinkerError, Result};
use crate::storage::models::{Link, LinkPatch, NewLink};
use crate::storage::traits::LinkStore;

use migration::entities::link;

#[async_trait]
impl LinkStore for SeaOrmStorage {
    async fn list_links(&self, user_id: &str) -> Result<Vec<Link>> {
        let models = link::Entity::find()
            .filter(link::Column::UserId.eq(user_id))
            .order_by_asc(link::Column::Position)
            .order_by_asc(link::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| BiolinkerError::database_operation(format!("查询链接失败: {}", e)))?;

        Ok(models.into_iter().map(model_to_link).collect())
    }

    async fn list_active_links(&self, user_id: &str) -> Result<Vec<Link>> {
        let models = link::Entity::find()
            .filter(link::Column::UserId.eq(user_id))
            .filter(link::Column::IsActive.eq(true))
            .order_by_asc(link::Column::Position)
            .order_by_asc(link::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| BiolinkerError::database_operation(format!("查询链接失败: {}", e)))?;

        Ok(models.into_iter().map(model_to_link).collect())
    }

    async fn find_link(&self, link_id: &str) -> Result<Option<Link>> {
        let model = link::Entity::find_by_id(link_id.to_string())
            .one(&self.db)
            .await
            .map_err(|e| BiolinkerError::database_operation(format!("查询链接失败: {}", e)))?;

        Ok(model.map(model_to_link))
    }

    async fn insert_link(&self, user_id: &str, new_link: NewLink, position: i32) -> Result<Link> {
        let id = uuid::Uuid::new_v4().to_string();
        let active = new_link_to_active_model(id, user_id, new_link, position, Utc::now());

        let model = active
            .insert(&self.db)
            .await
            .map_err(|e| BiolinkerError::database_operation(format!("新增链接失败: {}", e)))?;

        info!("Link created: {} (owner {}, position {})", model.id, user_id, position);
        Ok(model_to_link(model))
    }

    async fn update_link(&self, user_id: &str, link_id: &str, patch: &LinkPatch) -> Result<()> {
        if patch.is_empty() {
            return Err(BiolinkerError::validation("Nothing to update"));
        }

        let result = link::Entity::update_many()
            .set(link_patch_to_active_model(patch))
            .filter(link::Column::Id.eq(link_id))
            .filter(link::Column::UserId.eq(user_id))
            .exec(&self.db)
            .await
            .map_err(|e| BiolinkerError::database_operation(format!("更新链接失败: {}", e)))?;

        if result.rows_affected == 0 {
            return Err(BiolinkerError::not_found(format!("链接不存在: {}", link_id)));
        }
        Ok(())
    }

    async fn delete_link(&self, user_id: &str, link_id: &str) -> Result<()> {
        let result = link::Entity::delete_many()
            .filter(link::Column::Id.eq(link_id))
            .filter(link::Column::UserId.eq(user_id))
            .exec(&self.db)
            .await
            .map_err(|e| BiolinkerError::database_operation(format!("删除链接失败: {}", e)))?;

        if result.rows_affected == 0 {
            return Err(BiolinkerError::not_found(format!("链接不存在: {}", link_id)));
        }

        info!("Link deleted: {} (owner {})", link_id, user_id);
        Ok(())
    }

    async fn update_positions(&self, user_id: &str, positions: &[(String, i32)]) -> Result<()> {
        if positions.is_empty() {
            return Ok(());
        }

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| BiolinkerError::database_operation(format!("开始事务失败: {}", e)))?;

        for (link_id, position) in positions {
            let result = link::Entity::update_many()
                .set(link::ActiveModel {
                    position: Set(*position),
                    ..Default::default()
                })
                .filter(link::Column::Id.eq(link_id.as_str()))
                .filter(link::Column::UserId.eq(user_id))
                .exec(&txn)
                .await
                .map_err(|e| {
                    BiolinkerError::database_operation(format!("更新排序失败: {}", e))
                })?;

            // 未提交的事务在 drop 时回滚
            if result.rows_affected == 0 {
                return Err(BiolinkerError::not_found(format!("链接不存在: {}", link_id)));
            }
        }

        txn.commit()
            .await
            .map_err(|e| BiolinkerError::database_operation(format!("提交事务失败: {}", e)))?;

        debug!("Reordered {} links for {}", positions.len(), user_id);
        Ok(())
    }
}
