pub use sea_orm_migration::prelude::*;

pub mod entities;
mod m20260301_000001_accounts;
mod m20260301_000002_profiles;
mod m20260301_000003_links;
mod m20260301_000004_link_analytics;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260301_000001_accounts::Migration),
            Box::new(m20260301_000002_profiles::Migration),
            Box::new(m20260301_000003_links::Migration),
            Box::new(m20260301_000004_link_analytics::Migration),
        ]
    }
}
