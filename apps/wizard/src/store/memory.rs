use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use super::{apply_to_map, KeyValueStore, StoreError, StoreWrite};

/// In-memory store. Clones share the same map, so a test can keep a handle
/// and inspect what the wizard wrote.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<BTreeMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn keys(&self) -> Vec<String> {
        self.lock().keys().cloned().collect()
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<String, String>> {
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.lock().get(key).cloned()
    }

    fn apply(&mut self, batch: Vec<StoreWrite>) -> Result<(), StoreError> {
        apply_to_map(&mut self.lock(), batch);
        Ok(())
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        self.lock().clear();
        Ok(())
    }
}
