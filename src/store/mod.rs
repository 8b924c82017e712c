/// Counter storage — the single external dependency of the handler.
///
/// The store holds one record per counter key. Reads and writes are plain
/// get / full-overwrite operations; `increment` is offered for deployments
/// that opt into atomic writes.

pub mod dynamo;
pub mod memory;

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::{Backend, CounterConfig};
use crate::error::Result;
use crate::models::counter::CounterRecord;

pub use dynamo::DynamoStore;
pub use memory::MemoryStore;

#[async_trait]
pub trait CounterStore: Send + Sync {
    /// Fetches the record stored under `key`, if any.
    async fn get(&self, key: &str) -> Result<Option<CounterRecord>>;

    /// Writes `record`, replacing whatever is stored under its id.
    async fn put(&self, record: &CounterRecord) -> Result<()>;

    /// Adds one to the record under `key` in a single store operation and
    /// returns the new value. A missing record counts as 0.
    async fn increment(&self, key: &str) -> Result<u64>;

    /// Short backend name for logs.
    fn backend(&self) -> &'static str;
}

/// Builds the store named by the configuration.
///
/// Called once per process; the returned handle is shared by every
/// invocation that process serves.
pub fn build_store(config: &CounterConfig) -> Arc<dyn CounterStore> {
    let store: Arc<dyn CounterStore> = match config.backend {
        Backend::DynamoDb => Arc::new(DynamoStore::from_config(config)),
        Backend::Memory => Arc::new(MemoryStore::new()),
    };

    tracing::info!(backend = store.backend(), "counter store ready");
    store
}
