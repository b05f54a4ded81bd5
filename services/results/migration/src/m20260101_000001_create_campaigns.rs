use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Campaigns::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Campaigns::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Campaigns::UserId).big_integer().not_null())
                    .col(ColumnDef::new(Campaigns::Name).string().not_null())
                    .col(
                        ColumnDef::new(Campaigns::CreatedDate)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Campaign lookups always scope by owner.
        manager
            .create_index(
                Index::create()
                    .table(Campaigns::Table)
                    .col(Campaigns::UserId)
                    .name("idx_campaigns_user_id")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Campaigns::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Campaigns {
    Table,
    Id,
    UserId,
    Name,
    CreatedDate,
}
