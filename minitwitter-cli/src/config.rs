//! Database connection settings from flags, environment, or `.env`

use std::time::Duration;

use clap::Args;
use minitwitter_server::db::pool::{DEFAULT_MAX_CONNECTIONS, DEFAULT_PORT};
use minitwitter_server::DbConfig;

/// Arguments shared by every command that talks to the database
#[derive(Args, Debug, Clone)]
pub struct DbArgs {
    /// Database host
    #[arg(long = "db-host", env = "DB_HOST", value_name = "DB_HOST")]
    pub db_host: String,

    /// Database port
    #[arg(
        long = "db-port",
        env = "DB_PORT",
        value_name = "DB_PORT",
        default_value_t = DEFAULT_PORT
    )]
    pub db_port: u16,

    /// Database user
    #[arg(long = "db-user", env = "DB_USER", value_name = "DB_USER")]
    pub db_user: String,

    /// Database password
    #[arg(
        long = "db-password",
        env = "DB_PASSWORD",
        value_name = "DB_PASSWORD",
        hide_env_values = true
    )]
    pub db_password: String,

    /// Database name
    #[arg(long = "db-database", env = "DB_DATABASE", value_name = "DB_DATABASE")]
    pub db_database: String,

    /// Maximum pooled connections
    #[arg(
        long = "db-max-connections",
        env = "DB_MAX_CONNECTIONS",
        value_name = "DB_MAX_CONNECTIONS",
        default_value_t = DEFAULT_MAX_CONNECTIONS
    )]
    pub db_max_connections: u32,

    /// Seconds to wait for a free connection
    #[arg(
        long = "db-acquire-timeout",
        env = "DB_ACQUIRE_TIMEOUT",
        value_name = "DB_ACQUIRE_TIMEOUT",
        default_value_t = 5
    )]
    pub db_acquire_timeout_secs: u64,
}

impl From<DbArgs> for DbConfig {
    fn from(args: DbArgs) -> Self {
        let mut config = DbConfig::new(
            args.db_host,
            args.db_user,
            args.db_password,
            args.db_database,
        )
        .with_port(args.db_port)
        .with_acquire_timeout(Duration::from_secs(args.db_acquire_timeout_secs));
        config.max_connections = args.db_max_connections;
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct Harness {
        #[command(flatten)]
        db: DbArgs,
    }

    #[test]
    fn flags_build_config() {
        let harness = Harness::try_parse_from([
            "test",
            "--db-host",
            "db.internal",
            "--db-user",
            "app",
            "--db-password",
            "pw",
            "--db-database",
            "minitwitter",
            "--db-port",
            "6543",
        ])
        .unwrap();

        let config = DbConfig::from(harness.db);
        assert_eq!(config.user, "app");
        assert_eq!(config.host, "db.internal");
        assert_eq!(config.port, 6543);
        assert_eq!(config.database, "minitwitter");
        assert_eq!(config.acquire_timeout, Duration::from_secs(5));
    }
}
