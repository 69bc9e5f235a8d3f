// SPDX-FileCopyrightText: 2026 Skillbridge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! [`StateStore`] implementations: in-memory and one-JSON-file-per-key.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use skillbridge_config::model::{StateBackend, StateConfig};
use skillbridge_core::{SkillBridgeError, StateStore};
use tokio::sync::RwLock;
use tracing::{debug, info};

fn state_error(e: impl std::error::Error + Send + Sync + 'static) -> SkillBridgeError {
    SkillBridgeError::State {
        source: Box::new(e),
    }
}

/// Process-local store. State is lost on restart.
#[derive(Debug, Default)]
pub struct MemoryStateStore {
    records: RwLock<HashMap<String, Value>>,
}

impl MemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl StateStore for MemoryStateStore {
    async fn read(&self, key: &str) -> Result<Option<Value>, SkillBridgeError> {
        Ok(self.records.read().await.get(key).cloned())
    }

    async fn write(&self, key: &str, value: Value) -> Result<(), SkillBridgeError> {
        self.records.write().await.insert(key.to_string(), value);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), SkillBridgeError> {
        self.records.write().await.remove(key);
        Ok(())
    }
}

/// Stores each key as `<directory>/<percent-encoded key>.json`.
///
/// Writes go to a temporary file that is renamed into place, so a crash never
/// leaves a half-written record.
#[derive(Debug, Clone)]
pub struct FileStateStore {
    directory: PathBuf,
}

impl FileStateStore {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let encoded: String = url::form_urlencoded::byte_serialize(key.as_bytes()).collect();
        self.directory.join(format!("{encoded}.json"))
    }
}

#[async_trait]
impl StateStore for FileStateStore {
    async fn read(&self, key: &str) -> Result<Option<Value>, SkillBridgeError> {
        let path = self.path_for(key);
        match tokio::fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice(&bytes).map(Some).map_err(state_error),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(state_error(e)),
        }
    }

    async fn write(&self, key: &str, value: Value) -> Result<(), SkillBridgeError> {
        tokio::fs::create_dir_all(&self.directory)
            .await
            .map_err(state_error)?;

        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        let bytes = serde_json::to_vec(&value).map_err(state_error)?;
        tokio::fs::write(&tmp, bytes).await.map_err(state_error)?;
        tokio::fs::rename(&tmp, &path).await.map_err(state_error)?;
        debug!(key, path = %path.display(), "state written");
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), SkillBridgeError> {
        match tokio::fs::remove_file(self.path_for(key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(state_error(e)),
        }
    }
}

/// Builds the store selected by `[state].backend`.
pub fn state_store_from_config(config: &StateConfig) -> Arc<dyn StateStore> {
    match config.backend {
        StateBackend::Memory => {
            info!("using in-memory state store");
            Arc::new(MemoryStateStore::new())
        }
        StateBackend::File => {
            info!(directory = %config.directory, "using file state store");
            Arc::new(FileStateStore::new(&config.directory))
        }
    }
}

/// Reads a typed record, falling back to its default when absent.
pub async fn load<T>(store: &dyn StateStore, key: &str) -> Result<T, SkillBridgeError>
where
    T: DeserializeOwned + Default,
{
    match store.read(key).await? {
        Some(value) => serde_json::from_value(value).map_err(state_error),
        None => Ok(T::default()),
    }
}

/// Writes a typed record.
pub async fn save<T>(store: &dyn StateStore, key: &str, record: &T) -> Result<(), SkillBridgeError>
where
    T: Serialize + ?Sized,
{
    let value = serde_json::to_value(record).map_err(state_error)?;
    store.write(key, value).await
}
