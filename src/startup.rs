use std::{process, sync::Arc};

use database::store::{PersonStore, StorageEngine, StoreError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StartupCrash {
    #[error("Unable to open the {engine} store: {source}")]
    OpenStore {
        engine: &'static str,
        source: StoreError,
    },

    #[error("Unable to create the people schema: {0}")]
    Schema(StoreError),
}

/// Opens the configured store and provisions its schema. Runs once, before the
/// server accepts connections
pub async fn open_store(engine: StorageEngine) -> Result<Arc<dyn PersonStore>, StartupCrash> {
    let engine_name = engine.name();

    log::info!("Checking database connection [store: {}]", engine_name);

    let store = engine
        .open()
        .await
        .map_err(|source| StartupCrash::OpenStore {
            engine: engine_name,
            source,
        })?;

    store.ensure_schema().await.map_err(StartupCrash::Schema)?;

    log::info!("Database connection OK, schema ready [store: {}]", engine_name);

    Ok(store)
}

pub fn crash_startup(reason: StartupCrash) -> ! {
    log::error!("Startup failed: {}", reason);

    process::exit(1);
}
