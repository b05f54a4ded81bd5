use sea_orm_migration::prelude::*;

use tackle_results_migration::Migrator;

#[tokio::main]
async fn main() {
    cli::run_cli(Migrator).await;
}
