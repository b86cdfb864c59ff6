use async_trait::async_trait;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use tracing::info;

use super::SeaOrmStorage;
use super::converters::{account_to_active_model, model_to_account};
use super::map_write_err;
use crate::errors::{BiolinkerError, Result};
use crate::storage::models::Account;
use crate::storage::traits::AccountStore;

use migration::entities::account;

#[async_trait]
impl AccountStore for SeaOrmStorage {
    async fn find_account(&self, account_id: &str) -> Result<Option<Account>> {
        let model = account::Entity::find_by_id(account_id.to_string())
            .one(&self.db)
            .await
            .map_err(|e| BiolinkerError::database_operation(format!("查询账号失败: {}", e)))?;

        Ok(model.map(model_to_account))
    }

    async fn find_account_by_email(&self, email: &str) -> Result<Option<Account>> {
        let model = account::Entity::find()
            .filter(account::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(|e| BiolinkerError::database_operation(format!("查询账号失败: {}", e)))?;

        Ok(model.map(model_to_account))
    }

    async fn insert_account(&self, account: Account) -> Result<()> {
        let id = account.id.clone();
        account::Entity::insert(account_to_active_model(account))
            .exec_without_returning(&self.db)
            .await
            .map_err(|e| map_write_err(e, "An account with this email already exists"))?;

        info!("Account created: {}", id);
        Ok(())
    }
}
