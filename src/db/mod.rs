use std::sync::Arc;

use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use thiserror::Error;
use tracing::{info, warn};

pub mod memory;
pub mod models;
pub mod pagination;
pub mod postgres;

pub use memory::MemoryContactStore;
pub use models::{ContactRequest, NewContactRequest};
pub use postgres::PgContactStore;

pub type DbPool = PgPool;

/// Value of `DATABASE_URL` that selects the in-process store.
pub const MEMORY_DATABASE_URL: &str = "memory";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(sqlx::Error),

    #[error("migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    /// The store could not be reached at all (pool exhausted or closed).
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => {
                StoreError::Unavailable(err.to_string())
            }
            other => StoreError::Database(other),
        }
    }
}

/// Persistence for contact requests.
///
/// Each call is atomic on its own; nothing is promised across calls.
#[async_trait]
pub trait ContactStore: Send + Sync {
    /// Insert one record and return it with its assigned id and timestamps.
    async fn create(&self, record: NewContactRequest) -> Result<ContactRequest, StoreError>;

    /// Total number of stored records.
    async fn count(&self) -> Result<i64, StoreError>;

    /// Records ordered newest first, skipping `offset` and returning at most `limit`.
    async fn list_newest(&self, offset: i64, limit: i64) -> Result<Vec<ContactRequest>, StoreError>;
}

pub type DynContactStore = Arc<dyn ContactStore>;

pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await
}

/// Build the store selected by `DATABASE_URL`.
///
/// `memory` -> in-process store (contents are lost on restart)
/// anything else -> Postgres pool with migrations applied
pub async fn build_store(database_url: &str) -> Result<DynContactStore, StoreError> {
    if database_url == MEMORY_DATABASE_URL {
        warn!("DATABASE_URL=memory; contact requests will not survive a restart");
        return Ok(Arc::new(MemoryContactStore::new()) as DynContactStore);
    }

    let pool = create_pool(database_url).await?;
    info!("Connected to Postgres");

    sqlx::migrate!("./migrations").run(&pool).await?;
    info!("Migrations applied");

    Ok(Arc::new(PgContactStore::new(pool)) as DynContactStore)
}
