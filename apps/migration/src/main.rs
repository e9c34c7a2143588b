//! Migration CLI tool.
//!
//! `DATABASE_URL` selects the target database; `up`, `down`, `status` and
//! `fresh` come from the SeaORM migration CLI.

use sea_orm_migration::prelude::*;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt().with_env_filter("info").init();

    cli::run_cli(migration::Migrator).await;
}
