use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Events::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Events::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Events::CampaignId).big_integer().not_null())
                    .col(ColumnDef::new(Events::Email).string().not_null())
                    .col(
                        ColumnDef::new(Events::Time)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Events::Message).string().not_null())
                    .col(ColumnDef::new(Events::Details).json_binary())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Events::Table, Events::CampaignId)
                            .to(Campaigns::Table, Campaigns::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Reconciliation replays one recipient's events in time order.
        manager
            .create_index(
                Index::create()
                    .table(Events::Table)
                    .col(Events::CampaignId)
                    .col(Events::Email)
                    .col(Events::Time)
                    .name("idx_events_campaign_id_email_time")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Events::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Events {
    Table,
    Id,
    CampaignId,
    Email,
    Time,
    Message,
    Details,
}

#[derive(Iden)]
enum Campaigns {
    Table,
    Id,
}
