use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::{
    consts::consts::EntityId,
    model::person::{NewPerson, Person, PersonUpdate},
};

pub mod memory;
pub mod options;
pub mod postgres;

use memory::MemoryPersonStore;
use options::PgConnectOptions;
use postgres::PgPersonStore;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Cannot create, record already exists: {0}")]
    DuplicateId(EntityId),

    #[error("Unable to connect to the database: {0}")]
    Connection(tokio_postgres::Error),

    #[error("Database query failed: {0}")]
    Query(tokio_postgres::Error),

    #[error("In-memory store lock poisoned")]
    Poisoned,
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Persistence of person records. Every engine must agree on:
/// - `create` rejects an existing id with [`StoreError::DuplicateId`]
/// - `update` / `remove` report the affected row count, 0 is not an error
/// - `list_all` is ordered by id
#[async_trait]
pub trait PersonStore: Send + Sync {
    /// Idempotently creates the backing table
    async fn ensure_schema(&self) -> StoreResult<()>;

    async fn list_all(&self) -> StoreResult<Vec<Person>>;

    async fn get_by_id(&self, id: &EntityId) -> StoreResult<Option<Person>>;

    async fn create(&self, person: NewPerson) -> StoreResult<Person>;

    async fn update(&self, id: &EntityId, update: PersonUpdate) -> StoreResult<u64>;

    async fn remove(&self, id: &EntityId) -> StoreResult<u64>;
}

#[derive(Debug, Clone)]
pub enum StorageEngine {
    Postgres(PgConnectOptions),
    Memory,
}

impl StorageEngine {
    /// Opens the engine. Schema provisioning is left to the caller
    pub async fn open(self) -> StoreResult<Arc<dyn PersonStore>> {
        match self {
            StorageEngine::Postgres(options) => {
                postgres::ensure_database(&options).await?;

                let store = PgPersonStore::connect(&options).await?;

                Ok(Arc::new(store))
            }
            StorageEngine::Memory => Ok(Arc::new(MemoryPersonStore::new())),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            StorageEngine::Postgres(_) => "postgres",
            StorageEngine::Memory => "memory",
        }
    }
}
