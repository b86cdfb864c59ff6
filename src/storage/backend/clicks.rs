//! ClickSink implementation for SeaOrmStorage

use async_trait::async_trait;
use sea_orm::EntityTrait;
use tracing::debug;

use super::SeaOrmStorage;
use super::converters::click_to_active_model;
use crate::storage::models::LinkClickEvent;
use crate::storage::traits::ClickSink;

use migration::entities::link_analytics;

#[async_trait]
impl ClickSink for SeaOrmStorage {
    async fn record_click(&self, event: LinkClickEvent) -> anyhow::Result<()> {
        let link_id = event.link_id.clone();

        link_analytics::Entity::insert(click_to_active_model(event))
            .exec_without_returning(&self.db)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to insert click for {}: {}", link_id, e))?;

        debug!(
            "Click recorded in {} database for link {}",
            self.backend_name.to_uppercase(),
            link_id
        );
        Ok(())
    }
}

impl SeaOrmStorage {
    /// 单个链接累计点击数
    pub async fn count_clicks(&self, link_id: &str) -> crate::errors::Result<u64> {
        use sea_orm::{ColumnTrait, PaginatorTrait, QueryFilter};

        link_analytics::Entity::find()
            .filter(link_analytics::Column::LinkId.eq(link_id))
            .count(&self.db)
            .await
            .map_err(Into::into)
    }
}
