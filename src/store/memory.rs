use async_trait::async_trait;
use dashmap::DashMap;

use crate::error::{CounterError, Result};
use crate::models::counter::CounterRecord;
use crate::store::CounterStore;

/// Process-local counter store.
///
/// Counts live only as long as the process. Used for local runs and tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    views: DashMap<String, u64>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            views: DashMap::new(),
        }
    }

    /// A store that already holds `record`.
    pub fn with_record(record: CounterRecord) -> Self {
        let store = Self::new();
        store.views.insert(record.id, record.views);
        store
    }
}

#[async_trait]
impl CounterStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<CounterRecord>> {
        Ok(self
            .views
            .get(key)
            .map(|views| CounterRecord::new(key, *views.value())))
    }

    async fn put(&self, record: &CounterRecord) -> Result<()> {
        self.views.insert(record.id.clone(), record.views);
        Ok(())
    }

    async fn increment(&self, key: &str) -> Result<u64> {
        let mut views = self.views.entry(key.to_string()).or_insert(0);
        let next = views.checked_add(1).ok_or(CounterError::Overflow)?;
        *views = next;
        Ok(next)
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_put_overwrites_existing_record() {
        let store = MemoryStore::with_record(CounterRecord::new("0", 10));
        store.put(&CounterRecord::new("0", 3)).await.unwrap();
        assert_eq!(store.get("0").await.unwrap(), Some(CounterRecord::new("0", 3)));
    }

    #[tokio::test]
    async fn test_keys_are_independent() {
        let store = MemoryStore::with_record(CounterRecord::new("0", 10));
        assert_eq!(store.get("1").await.unwrap(), None);
        assert_eq!(store.increment("1").await.unwrap(), 1);
        assert_eq!(store.get("0").await.unwrap().unwrap().views, 10);
    }

    #[tokio::test]
    async fn test_increment_refuses_to_wrap() {
        let store = MemoryStore::with_record(CounterRecord::new("0", u64::MAX));
        let err = store.increment("0").await.unwrap_err();
        assert!(matches!(err, CounterError::Overflow));
        assert_eq!(store.get("0").await.unwrap().unwrap().views, u64::MAX);
    }

    #[tokio::test]
    async fn test_concurrent_increments_are_not_lost() {
        let store = Arc::new(MemoryStore::new());
        let tasks: Vec<_> = (0..50)
            .map(|_| {
                let store = Arc::clone(&store);
                tokio::spawn(async move { store.increment("0").await })
            })
            .collect();

        for task in tasks {
            task.await.unwrap().unwrap();
        }
        assert_eq!(store.get("0").await.unwrap().unwrap().views, 50);
    }
}
