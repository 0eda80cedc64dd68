//! Schema migration command

use anyhow::{Context, Result};
use clap::Parser;

use minitwitter_server::db::migrations;
use minitwitter_server::{ConnectionProvider, DbConfig};

use crate::config::DbArgs;

/// Arguments for the migrate command
#[derive(Parser, Debug)]
pub struct MigrateArgs {
    #[command(flatten)]
    pub db: DbArgs,
}

pub async fn run_migrate(args: MigrateArgs) -> Result<()> {
    let provider = ConnectionProvider::connect(&DbConfig::from(args.db))
        .await
        .context("Failed to connect to database")?;

    migrations::run(&provider)
        .await
        .context("Failed to run migrations")?;

    provider.close().await;
    println!("Migrations applied");
    Ok(())
}
