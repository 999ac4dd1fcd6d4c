//! Application state.

use std::sync::Arc;

use riskops_engine::{RiskEngine, DEFAULT_MODEL_VERSION};
use riskops_storage::{InMemoryStorage, StorageAdapter};

use crate::error::ApiResult;

/// Application state shared across handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Risk engine over the configured storage.
    pub engine: RiskEngine,

    /// Model version tag for requests that do not name one.
    pub model_version: Arc<str>,
}

impl AppState {
    /// Create state over a storage adapter.
    pub fn new(storage: Arc<dyn StorageAdapter>) -> Self {
        Self {
            engine: RiskEngine::new(storage),
            model_version: Arc::from(DEFAULT_MODEL_VERSION),
        }
    }

    /// Create state backed by a fresh in-memory store.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryStorage::new()))
    }

    /// Set the default model version tag.
    pub fn with_model_version(mut self, model_version: impl AsRef<str>) -> Self {
        self.model_version = Arc::from(model_version.as_ref());
        self
    }

    /// Run an engine call on the blocking pool.
    ///
    /// Storage backends do synchronous file I/O.
    pub async fn run<T, F>(&self, f: F) -> ApiResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&RiskEngine) -> ApiResult<T> + Send + 'static,
    {
        let engine = self.engine.clone();
        tokio::task::spawn_blocking(move || f(&engine)).await?
    }
}
