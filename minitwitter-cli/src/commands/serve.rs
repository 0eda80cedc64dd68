//! HTTP server command

use std::net::{IpAddr, SocketAddr};

use anyhow::{Context, Result};
use clap::Parser;

use minitwitter_server::db::migrations;
use minitwitter_server::{run_server, ConnectionProvider, DbConfig, ServerConfig};

use crate::config::DbArgs;

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to bind to
    #[arg(long, env = "BIND_HOST", default_value = "127.0.0.1")]
    pub host: IpAddr,

    /// Port to listen on
    #[arg(long, short = 'p', env = "PORT", default_value_t = 3000)]
    pub port: u16,

    /// Allow permissive CORS (all origins) - use with caution
    #[arg(long, env = "CORS_PERMISSIVE")]
    pub cors_permissive: bool,

    /// Do not apply migrations at startup
    #[arg(long)]
    pub skip_migrations: bool,

    #[command(flatten)]
    pub db: DbArgs,
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs) -> Result<()> {
    let bind_addr = SocketAddr::new(args.host, args.port);
    let db_config = DbConfig::from(args.db);
    tracing::info!(?db_config, "Starting minitwitter server on {}", bind_addr);

    let provider = ConnectionProvider::connect(&db_config)
        .await
        .context("Failed to connect to database")?;

    if args.skip_migrations {
        tracing::info!("Skipping migrations");
    } else {
        migrations::run(&provider)
            .await
            .context("Failed to run migrations")?;
    }

    let config = ServerConfig {
        bind_addr,
        cors_permissive: args.cors_permissive,
    };

    // Run server (blocks until shutdown)
    run_server(provider, config).await.context("Server error")?;

    Ok(())
}
