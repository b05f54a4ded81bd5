use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Results::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Results::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Results::CampaignId).big_integer().not_null())
                    .col(ColumnDef::new(Results::UserId).big_integer().not_null())
                    .col(
                        ColumnDef::new(Results::RId)
                            .string_len(7)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Results::Email).string().not_null())
                    .col(
                        ColumnDef::new(Results::FirstName)
                            .string()
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(Results::LastName)
                            .string()
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(Results::Position)
                            .string()
                            .not_null()
                            .default(""),
                    )
                    .col(ColumnDef::new(Results::Status).string().not_null())
                    .col(ColumnDef::new(Results::Ip).string())
                    .col(ColumnDef::new(Results::Latitude).double())
                    .col(ColumnDef::new(Results::Longitude).double())
                    .col(
                        ColumnDef::new(Results::SendDate)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Results::Reported)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Results::ModifiedDate)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Results::Version)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Results::Table, Results::CampaignId)
                            .to(Campaigns::Table, Campaigns::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(Results::Table)
                    .col(Results::CampaignId)
                    .name("idx_results_campaign_id")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Results::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Results {
    Table,
    Id,
    CampaignId,
    UserId,
    RId,
    Email,
    FirstName,
    LastName,
    Position,
    Status,
    Ip,
    Latitude,
    Longitude,
    SendDate,
    Reported,
    ModifiedDate,
    Version,
}

#[derive(Iden)]
enum Campaigns {
    Table,
    Id,
}
