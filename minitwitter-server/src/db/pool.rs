//! Connection provider
//!
//! Wraps an sqlx PgPool with explicit connection limits. Gateways call
//! [`ConnectionProvider::acquire`] once per operation; the connection goes
//! back to the pool when the guard is dropped.

use std::fmt;
use std::time::Duration;

use sqlx::pool::PoolConnection;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::{PgPool, Postgres};

use super::DbError;

/// Default maximum connections for the pool.
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Default PostgreSQL port
pub const DEFAULT_PORT: u16 = 5432;

/// Default time to wait for a free connection
pub const DEFAULT_ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

/// Credentials and location of the backing store
#[derive(Clone)]
pub struct DbConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub database: String,
    pub max_connections: u32,
    pub acquire_timeout: Duration,
}

impl DbConfig {
    pub fn new(
        host: impl Into<String>,
        user: impl Into<String>,
        password: impl Into<String>,
        database: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            port: DEFAULT_PORT,
            user: user.into(),
            password: password.into(),
            database: database.into(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            acquire_timeout: DEFAULT_ACQUIRE_TIMEOUT,
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_acquire_timeout(mut self, timeout: Duration) -> Self {
        self.acquire_timeout = timeout;
        self
    }

    fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(&self.password)
            .database(&self.database)
    }

    fn pool_options(&self) -> PgPoolOptions {
        PgPoolOptions::new()
            .max_connections(self.max_connections)
            .acquire_timeout(self.acquire_timeout)
    }
}

// Keeps the password out of logs.
impl fmt::Debug for DbConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DbConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"***")
            .field("database", &self.database)
            .field("max_connections", &self.max_connections)
            .field("acquire_timeout", &self.acquire_timeout)
            .finish()
    }
}

/// Hands out one connection per unit of work
#[derive(Clone)]
pub struct ConnectionProvider {
    pool: PgPool,
}

impl ConnectionProvider {
    /// Connect to PostgreSQL, failing fast if the store is unreachable
    /// or rejects the credentials.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let config = DbConfig::new("localhost", "minitwitter", "secret", "minitwitter");
    /// let provider = ConnectionProvider::connect(&config).await?;
    /// ```
    pub async fn connect(config: &DbConfig) -> Result<Self, DbError> {
        let pool = config
            .pool_options()
            .connect_with(config.connect_options())
            .await
            .map_err(DbError::Connection)?;

        tracing::info!(
            host = %config.host,
            port = config.port,
            database = %config.database,
            "connected to database"
        );
        Ok(Self { pool })
    }

    /// Build the provider without opening any connection yet.
    ///
    /// Connectivity problems surface on the first [`acquire`](Self::acquire).
    pub fn connect_lazy(config: &DbConfig) -> Self {
        let pool = config.pool_options().connect_lazy_with(config.connect_options());
        Self { pool }
    }

    /// Wrap an existing pool.
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Acquire a connection for a single operation.
    ///
    /// Dropping the returned guard releases it, including on error paths.
    pub async fn acquire(&self) -> Result<PoolConnection<Postgres>, DbError> {
        self.pool.acquire().await.map_err(|e| {
            tracing::warn!("failed to acquire database connection: {}", e);
            DbError::Connection(e)
        })
    }

    /// Round-trip `SELECT 1` on a fresh connection.
    pub async fn ping(&self) -> Result<(), DbError> {
        let mut conn = self.acquire().await?;
        sqlx::query("SELECT 1").execute(&mut *conn).await?;
        Ok(())
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Close the pool, waiting for checked-out connections to return.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unreachable_config() -> DbConfig {
        // Port 9 (discard) on loopback refuses connections.
        DbConfig::new("127.0.0.1", "nobody", "nothing", "nowhere")
            .with_port(9)
            .with_acquire_timeout(Duration::from_millis(500))
    }

    #[test]
    fn config_defaults() {
        let config = DbConfig::new("db", "app", "secret", "minitwitter");
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.max_connections, DEFAULT_MAX_CONNECTIONS);
        assert_eq!(config.acquire_timeout, DEFAULT_ACQUIRE_TIMEOUT);
    }

    #[test]
    fn config_debug_hides_password() {
        let config = DbConfig::new("db", "app", "super-secret", "minitwitter");
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("minitwitter"));
    }

    #[tokio::test]
    async fn unreachable_store_is_connection_error() {
        let provider = ConnectionProvider::connect_lazy(&unreachable_config());
        let err = provider
            .acquire()
            .await
            .err()
            .expect("acquire should fail");
        assert!(matches!(err, DbError::Connection(_)));
    }

    #[tokio::test]
    async fn connect_fails_fast_on_unreachable_store() {
        let err = ConnectionProvider::connect(&unreachable_config())
            .await
            .err()
            .expect("connect should fail");
        assert!(matches!(err, DbError::Connection(_)));
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn ping_succeeds_against_live_database() {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let pool = PgPool::connect(&url).await.expect("pool creation failed");
        let provider = ConnectionProvider::from_pool(pool);

        provider.ping().await.expect("ping failed");
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn concurrent_operations_release_connections() {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let pool = PgPoolOptions::new()
            .max_connections(2)
            .connect(&url)
            .await
            .expect("pool creation failed");
        let provider = ConnectionProvider::from_pool(pool);

        // More tasks than connections: each must give its connection back
        let handles: Vec<_> = (0..10)
            .map(|_| {
                let provider = provider.clone();
                tokio::spawn(async move { provider.ping().await })
            })
            .collect();

        for handle in handles {
            handle.await.expect("task panicked").expect("ping failed");
        }
    }
}
