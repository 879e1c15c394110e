//! Startup and teardown of the bundled store.
//!
//! # Responsibilities
//! - Load configuration from an optional path
//! - Open the in-memory store, restoring its snapshot when configured
//! - Persist the snapshot after the server stops

use std::path::Path;
use std::sync::Arc;

use crate::config::{load_config, CafeConfig, ConfigError};
use crate::store::MemoryStore;

/// Load the config file, or fall back to defaults when no path is given.
pub fn load(path: Option<&Path>) -> Result<CafeConfig, ConfigError> {
    match path {
        Some(path) => load_config(path),
        None => Ok(CafeConfig::default()),
    }
}

/// Open the store described by the config.
pub fn open_store(config: &CafeConfig) -> std::io::Result<Arc<MemoryStore>> {
    let store = match &config.store.snapshot_path {
        Some(path) => MemoryStore::load_from_file(Path::new(path))?,
        None => MemoryStore::new(),
    };
    Ok(Arc::new(store))
}

/// Write the snapshot if one is configured. Failures are logged, not fatal.
pub fn persist_store(config: &CafeConfig, store: &MemoryStore) {
    if let Some(path) = &config.store.snapshot_path {
        if let Err(e) = store.save_to_file(Path::new(path)) {
            tracing::error!(path = %path, error = %e, "Failed to save store snapshot");
        }
    }
}
