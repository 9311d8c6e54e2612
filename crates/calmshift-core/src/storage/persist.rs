use serde::{Deserialize, Serialize};

use super::KeyValueStore;
use crate::error::{CoreError, StorageError};
use crate::store::AppState;

/// Key the snapshot is stored under unless configured otherwise.
pub const DEFAULT_ROOT_KEY: &str = "persist:root";

/// Format version written into every envelope.
pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Serialize)]
struct EnvelopeRef<'a> {
    version: u32,
    state: &'a AppState,
}

#[derive(Deserialize)]
struct Envelope {
    version: u32,
    state: serde_json::Value,
}

/// Writes and restores whole-state snapshots.
pub struct Persistor<S> {
    store: S,
    root_key: String,
}

impl<S: KeyValueStore> Persistor<S> {
    pub fn new(store: S) -> Self {
        Self::with_root_key(store, DEFAULT_ROOT_KEY)
    }

    pub fn with_root_key(store: S, root_key: impl Into<String>) -> Self {
        Self {
            store,
            root_key: root_key.into(),
        }
    }

    pub fn root_key(&self) -> &str {
        &self.root_key
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Load the stored snapshot, if any, with derived fields rebuilt.
    ///
    /// # Errors
    /// Returns an error if the stored value cannot be read or decoded, or
    /// was written by a different format version.
    pub fn rehydrate(&self) -> Result<Option<AppState>, CoreError> {
        let Some(raw) = self.store.get(&self.root_key)? else {
            tracing::debug!(key = %self.root_key, "no persisted snapshot");
            return Ok(None);
        };

        let envelope: Envelope = serde_json::from_str(&raw).map_err(|e| self.corrupt(e))?;
        if envelope.version != SNAPSHOT_VERSION {
            return Err(StorageError::UnsupportedVersion {
                found: envelope.version,
                expected: SNAPSHOT_VERSION,
            }
            .into());
        }
        let state: AppState = serde_json::from_value(envelope.state).map_err(|e| self.corrupt(e))?;
        tracing::debug!(key = %self.root_key, bytes = raw.len(), "rehydrated snapshot");
        Ok(Some(state.rehydrated()))
    }

    /// Write `state` under the root key, replacing any previous snapshot.
    ///
    /// # Errors
    /// Returns an error if serialization or the underlying write fails.
    pub fn persist(&self, state: &AppState) -> Result<(), CoreError> {
        let json = serde_json::to_string(&EnvelopeRef {
            version: SNAPSHOT_VERSION,
            state,
        })?;
        self.store.set(&self.root_key, &json)?;
        tracing::debug!(key = %self.root_key, bytes = json.len(), "persisted snapshot");
        Ok(())
    }

    /// Remove the stored snapshot.
    pub fn purge(&self) -> Result<(), CoreError> {
        self.store.delete(&self.root_key)?;
        Ok(())
    }

    fn corrupt(&self, err: serde_json::Error) -> CoreError {
        StorageError::CorruptSnapshot {
            key: self.root_key.clone(),
            message: err.to_string(),
        }
        .into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use crate::tasks::NewTask;
    use chrono::{TimeZone, Utc};

    fn sample_state() -> AppState {
        let now = Utc.with_ymd_and_hms(2024, 8, 20, 14, 0, 0).unwrap();
        let mut state = AppState::default();
        state
            .tasks
            .add_task(NewTask::new("Water plants"), "t-1".into(), now)
            .unwrap();
        state.focus.start_session("s-1".into(), Some(30), None, None, now);
        state.focus.stop_session(true, None, now + chrono::Duration::minutes(30));
        state
    }

    #[test]
    fn missing_snapshot_is_none() {
        let persistor = Persistor::new(MemoryStore::new());
        assert!(persistor.rehydrate().unwrap().is_none());
    }

    #[test]
    fn persist_then_rehydrate() {
        let persistor = Persistor::new(MemoryStore::new());
        let state = sample_state();
        persistor.persist(&state).unwrap();
        assert_eq!(persistor.rehydrate().unwrap(), Some(state));
    }

    #[test]
    fn purge_removes_snapshot() {
        let persistor = Persistor::with_root_key(MemoryStore::new(), "custom");
        persistor.persist(&sample_state()).unwrap();
        assert!(persistor.store().get("custom").unwrap().is_some());
        persistor.purge().unwrap();
        assert!(persistor.rehydrate().unwrap().is_none());
    }

    #[test]
    fn rejects_unknown_version() {
        let store = MemoryStore::new();
        store
            .set(DEFAULT_ROOT_KEY, r#"{"version": 99, "state": {}}"#)
            .unwrap();
        let err = Persistor::new(&store).rehydrate().unwrap_err();
        assert!(matches!(
            err,
            CoreError::Storage(StorageError::UnsupportedVersion { found: 99, .. })
        ));
    }

    #[test]
    fn rejects_garbage() {
        let store = MemoryStore::new();
        store.set(DEFAULT_ROOT_KEY, "not json").unwrap();
        let err = Persistor::new(&store).rehydrate().unwrap_err();
        assert!(matches!(
            err,
            CoreError::Storage(StorageError::CorruptSnapshot { .. })
        ));
    }
}
