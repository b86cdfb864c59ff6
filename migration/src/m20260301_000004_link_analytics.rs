//! 链接点击事件表迁移
//!
//! link_analytics 是只追加的事实表：公开页面每次点击写一行，
//! 记录 link_id、user_agent、referrer 与时间戳。

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(LinkAnalytics::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(LinkAnalytics::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(LinkAnalytics::LinkId)
                            .string_len(36)
                            .not_null(),
                    )
                    .col(ColumnDef::new(LinkAnalytics::UserAgent).text().null())
                    .col(ColumnDef::new(LinkAnalytics::Referrer).text().null())
                    .col(
                        ColumnDef::new(LinkAnalytics::ClickedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // link_id + 时间（单链接时间序列）
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_link_analytics_link_time")
                    .table(LinkAnalytics::Table)
                    .col(LinkAnalytics::LinkId)
                    .col(LinkAnalytics::ClickedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_link_analytics_link_time")
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(LinkAnalytics::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum LinkAnalytics {
    #[sea_orm(iden = "link_analytics")]
    Table,
    Id,
    LinkId,
    UserAgent,
    Referrer,
    ClickedAt,
}
