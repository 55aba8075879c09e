use std::sync::Arc;
use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use sqlx::sqlite::SqlitePoolOptions;
use tracing::info;

use beacon_core::{BeaconResult, DatabaseConfig, DeviceStore};

use super::postgres::PostgresDeviceRepository;
use super::sqlite::SqliteDeviceRepository;

const POSTGRES_SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS devices (
        id UUID PRIMARY KEY,
        name VARCHAR(255) NOT NULL UNIQUE,
        created_at TIMESTAMPTZ NOT NULL,
        last_updated TIMESTAMPTZ NOT NULL,
        last_triggered TIMESTAMPTZ NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_devices_last_updated ON devices (last_updated)",
    "CREATE INDEX IF NOT EXISTS idx_devices_last_triggered ON devices (last_triggered)",
];

const SQLITE_SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS devices (
        id TEXT PRIMARY KEY,
        name TEXT NOT NULL UNIQUE,
        created_at TEXT NOT NULL,
        last_updated TEXT NOT NULL,
        last_triggered TEXT NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_devices_last_updated ON devices (last_updated)",
    "CREATE INDEX IF NOT EXISTS idx_devices_last_triggered ON devices (last_triggered)",
];

/// Database type detection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatabaseType {
    PostgreSQL,
    SQLite,
}

impl DatabaseType {
    pub fn from_url(url: &str) -> Self {
        if url.starts_with("postgres://") || url.starts_with("postgresql://") {
            DatabaseType::PostgreSQL
        } else {
            DatabaseType::SQLite
        }
    }
}

/// Database connection pool
pub enum DatabasePool {
    PostgreSQL(sqlx::PgPool),
    SQLite(sqlx::SqlitePool),
}

/// 统一的数据库管理器，根据URL选择后端
pub struct DatabaseManager {
    pool: DatabasePool,
}

impl DatabaseManager {
    pub async fn new(config: &DatabaseConfig) -> BeaconResult<Self> {
        let acquire_timeout = Duration::from_secs(config.connection_timeout_seconds);
        let idle_timeout = Duration::from_secs(config.idle_timeout_seconds);

        let pool = match DatabaseType::from_url(&config.url) {
            DatabaseType::PostgreSQL => {
                let pool = PgPoolOptions::new()
                    .max_connections(config.max_connections)
                    .min_connections(config.min_connections)
                    .acquire_timeout(acquire_timeout)
                    .idle_timeout(idle_timeout)
                    .max_lifetime(Duration::from_secs(1800))
                    .connect(&config.url)
                    .await?;
                DatabasePool::PostgreSQL(pool)
            }
            DatabaseType::SQLite => {
                let mut options = SqlitePoolOptions::new()
                    .max_connections(config.max_connections)
                    .min_connections(config.min_connections)
                    .acquire_timeout(acquire_timeout);
                // 内存数据库随连接关闭而消失
                options = if config.url.contains(":memory:") {
                    options.idle_timeout(None).max_lifetime(None)
                } else {
                    options
                        .idle_timeout(idle_timeout)
                        .max_lifetime(Duration::from_secs(1800))
                };
                DatabasePool::SQLite(options.connect(&config.url).await?)
            }
        };

        info!("数据库连接池已创建: {:?}", Self::type_of(&pool));
        Ok(Self { pool })
    }

    fn type_of(pool: &DatabasePool) -> DatabaseType {
        match pool {
            DatabasePool::PostgreSQL(_) => DatabaseType::PostgreSQL,
            DatabasePool::SQLite(_) => DatabaseType::SQLite,
        }
    }

    pub fn database_type(&self) -> DatabaseType {
        Self::type_of(&self.pool)
    }

    /// 创建设备表和索引，可重复执行
    pub async fn migrate(&self) -> BeaconResult<()> {
        match &self.pool {
            DatabasePool::PostgreSQL(pool) => {
                for statement in POSTGRES_SCHEMA {
                    sqlx::query(statement).execute(pool).await?;
                }
            }
            DatabasePool::SQLite(pool) => {
                for statement in SQLITE_SCHEMA {
                    sqlx::query(statement).execute(pool).await?;
                }
            }
        }
        info!("数据库迁移完成");
        Ok(())
    }

    pub async fn health_check(&self) -> BeaconResult<()> {
        match &self.pool {
            DatabasePool::PostgreSQL(pool) => {
                sqlx::query("SELECT 1").execute(pool).await?;
            }
            DatabasePool::SQLite(pool) => {
                sqlx::query("SELECT 1").execute(pool).await?;
            }
        }
        Ok(())
    }

    pub async fn close(&self) {
        match &self.pool {
            DatabasePool::PostgreSQL(pool) => pool.close().await,
            DatabasePool::SQLite(pool) => pool.close().await,
        }
    }

    /// Factory method for the device store
    pub fn device_store(&self) -> Arc<dyn DeviceStore> {
        match &self.pool {
            DatabasePool::PostgreSQL(pool) => Arc::new(PostgresDeviceRepository::new(pool.clone())),
            DatabasePool::SQLite(pool) => Arc::new(SqliteDeviceRepository::new(pool.clone())),
        }
    }
}
