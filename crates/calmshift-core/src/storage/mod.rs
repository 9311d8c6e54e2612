//! Persistence adapters.
//!
//! The slices know nothing about storage. A [`Persistor`] serializes whole
//! [`AppState`](crate::store::AppState) snapshots into any
//! [`KeyValueStore`] under a single root key, and the host decides when
//! to call it.

mod memory;
mod persist;
mod sqlite;

pub use memory::MemoryStore;
pub use persist::{Persistor, DEFAULT_ROOT_KEY, SNAPSHOT_VERSION};
pub use sqlite::SqliteStore;

use std::path::PathBuf;

use crate::error::{ConfigError, StorageError};

/// String key-value store the snapshot is written to.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn delete(&self, key: &str) -> Result<(), StorageError>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &S {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn delete(&self, key: &str) -> Result<(), StorageError> {
        (**self).delete(key)
    }
}

/// Resolve the data directory, creating it if needed.
///
/// `CALMSHIFT_DATA_DIR` wins when set. Otherwise `~/.config/calmshift`,
/// or `~/.config/calmshift-dev` when `CALMSHIFT_ENV=dev`.
///
/// # Errors
/// Returns an error if the directory cannot be created.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let dir = match std::env::var_os("CALMSHIFT_DATA_DIR") {
        Some(custom) if !custom.is_empty() => PathBuf::from(custom),
        _ => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("CALMSHIFT_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("calmshift-dev")
            } else {
                base_dir.join("calmshift")
            }
        }
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| ConfigError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}
