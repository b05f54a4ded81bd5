use sea_orm_migration::prelude::*;

mod m20260101_000001_create_campaigns;
mod m20260101_000002_create_results;
mod m20260101_000003_create_events;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260101_000001_create_campaigns::Migration),
            Box::new(m20260101_000002_create_results::Migration),
            Box::new(m20260101_000003_create_events::Migration),
        ]
    }
}
