//! Database client for VetClinic
//!
//! A thin wrapper over an `sqlx::Any` pool so the repositories do not care
//! which backend the URL points at.

use crate::error::DbError;
use sqlx::pool::PoolOptions;
use sqlx::Pool;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info};
use vetclinic_config::{AppConfig, DatabaseConfig};

const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// The SQL dialect behind the pool, used where DDL differs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DbBackend {
    Sqlite,
    Postgres,
}

impl DbBackend {
    pub fn from_url(db_url: &str) -> Result<Self, DbError> {
        if db_url.starts_with("sqlite:") {
            Ok(DbBackend::Sqlite)
        } else if db_url.starts_with("postgres:") || db_url.starts_with("postgresql:") {
            Ok(DbBackend::Postgres)
        } else {
            Err(DbError::UrlError(format!("Unsupported database URL: {}", db_url)))
        }
    }
}

/// Database client shared by every repository. Cloning is cheap.
#[derive(Debug, Clone)]
pub struct DbClient {
    pool: Pool<sqlx::Any>,
    backend: DbBackend,
}

impl DbClient {
    /// Create a new database client from the `database` section.
    ///
    /// # Errors
    ///
    /// Fails if the section is missing, the URL is empty or unsupported, or
    /// the first connection cannot be opened.
    pub async fn new(config: &Arc<AppConfig>) -> Result<Self, DbError> {
        let db_config = config
            .database
            .as_ref()
            .ok_or_else(|| DbError::ConfigError("Database configuration is missing".to_string()))?;

        Self::from_config(db_config).await
    }

    pub async fn from_config(db_config: &DatabaseConfig) -> Result<Self, DbError> {
        if db_config.url.is_empty() {
            return Err(DbError::ConfigError("Database URL is empty".to_string()));
        }

        let max_connections = db_config.max_connections.unwrap_or(DEFAULT_MAX_CONNECTIONS);
        Self::connect(&db_config.url, max_connections).await
    }

    /// Create a new database client from a database URL with the default pool size.
    pub async fn from_url(db_url: &str) -> Result<Self, DbError> {
        if db_url.is_empty() {
            return Err(DbError::UrlError("Database URL is empty".to_string()));
        }
        Self::connect(db_url, DEFAULT_MAX_CONNECTIONS).await
    }

    async fn connect(db_url: &str, max_connections: u32) -> Result<Self, DbError> {
        let backend = DbBackend::from_url(db_url)?;
        let pool = Self::create_pool(db_url, backend, max_connections).await?;
        Ok(Self { pool, backend })
    }

    async fn create_pool(
        db_url: &str,
        backend: DbBackend,
        max_connections: u32,
    ) -> Result<Pool<sqlx::Any>, DbError> {
        debug!("Creating database pool with URL: {}", db_url);

        // Registers every driver compiled into sqlx with the Any driver.
        sqlx::any::install_default_drivers();

        let in_memory = backend == DbBackend::Sqlite && db_url.contains(":memory:");

        // Every connection to an in-memory SQLite database opens a fresh,
        // empty database, so the pool must hold exactly one forever.
        let pool_options = if in_memory {
            PoolOptions::<sqlx::Any>::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            PoolOptions::<sqlx::Any>::new()
                .max_connections(max_connections.max(1))
                .acquire_timeout(Duration::from_secs(3))
                .idle_timeout(Duration::from_secs(600))
        };

        if backend == DbBackend::Sqlite && !in_memory {
            Self::ensure_sqlite_file(db_url)?;
        }

        let connect_options = sqlx::any::AnyConnectOptions::from_str(db_url)
            .map_err(|e| DbError::UrlError(e.to_string()))?;

        let pool = pool_options
            .connect_with(connect_options)
            .await
            .map_err(|e| {
                error!("Failed to create database pool: {}", e);
                DbError::PoolError(e.to_string())
            })?;

        info!("Database pool created successfully ({:?})", backend);
        Ok(pool)
    }

    /// SQLite through the Any driver does not create missing files, so the
    /// directory and an empty file are created up front.
    fn ensure_sqlite_file(db_url: &str) -> Result<(), DbError> {
        let db_path = db_url
            .strip_prefix("sqlite://")
            .or_else(|| db_url.strip_prefix("sqlite:"))
            .unwrap_or(db_url);
        // Drop connection parameters such as "?mode=rwc".
        let db_path = db_path.split('?').next().unwrap_or(db_path);
        if db_path.is_empty() {
            return Ok(());
        }

        let path = Path::new(db_path);
        if let Some(dir) = path.parent() {
            if !dir.as_os_str().is_empty() && !dir.exists() {
                debug!("Creating directory for SQLite database: {:?}", dir);
                std::fs::create_dir_all(dir).map_err(|e| {
                    error!("Failed to create directory for SQLite database: {}", e);
                    DbError::PoolError(format!("Failed to create directory: {}", e))
                })?;
            }
        }

        if !path.exists() {
            debug!("Creating empty SQLite database file: {}", db_path);
            std::fs::File::create(path).map_err(|e| {
                error!("Failed to create SQLite database file: {}", e);
                DbError::PoolError(format!("Failed to create database file: {}", e))
            })?;
        }
        Ok(())
    }

    pub fn pool(&self) -> &Pool<sqlx::Any> {
        &self.pool
    }

    pub fn backend(&self) -> DbBackend {
        self.backend
    }

    /// Execute a statement that returns no rows. Returns the affected row count.
    pub async fn execute(&self, query: &str) -> Result<u64, DbError> {
        sqlx::query(query)
            .execute(&self.pool)
            .await
            .map(|r| r.rows_affected())
            .map_err(DbError::from)
    }

    /// Check if the database answers a trivial query.
    pub async fn is_healthy(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }
}

impl std::fmt::Display for DbClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "DbClient({:?})", self.backend)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_from_url() {
        assert_eq!(DbBackend::from_url("sqlite::memory:").unwrap(), DbBackend::Sqlite);
        assert_eq!(
            DbBackend::from_url("postgres://u:p@localhost/vet").unwrap(),
            DbBackend::Postgres
        );
        assert!(DbBackend::from_url("mysql://localhost/vet").is_err());
    }

    #[tokio::test]
    async fn test_in_memory_client_is_healthy() {
        let client = DbClient::from_url("sqlite::memory:").await.unwrap();
        assert!(client.is_healthy().await);
        assert_eq!(client.backend(), DbBackend::Sqlite);
    }

    #[tokio::test]
    async fn test_empty_url_is_rejected() {
        let config = DatabaseConfig {
            url: String::new(),
            max_connections: None,
        };
        assert!(matches!(
            DbClient::from_config(&config).await,
            Err(DbError::ConfigError(_))
        ));
    }
}
