//! Durable key/value storage for the wizard.
//!
//! Values are JSON text. Writes go through [`KeyValueStore::apply`] so that a
//! group of keys can be committed as a unit.

use thiserror::Error;

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

pub const ADVICE_KEY: &str = "careerAdvice";
pub const COMPLETED_WEEKS_KEY: &str = "completedWeeks";
pub const ROLE_KEY: &str = "userRole";
pub const LEVEL_KEY: &str = "userLevel";

/// Every key the wizard owns.
pub const WIZARD_KEYS: [&str; 4] = [ADVICE_KEY, COMPLETED_WEEKS_KEY, ROLE_KEY, LEVEL_KEY];

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("store encoding error: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("could not replace store file: {0}")]
    Persist(#[from] tempfile::PersistError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreWrite {
    Set { key: String, value: String },
    Remove { key: String },
}

impl StoreWrite {
    pub fn set(key: &str, value: impl Into<String>) -> Self {
        StoreWrite::Set {
            key: key.to_string(),
            value: value.into(),
        }
    }

    pub fn remove(key: &str) -> Self {
        StoreWrite::Remove {
            key: key.to_string(),
        }
    }
}

/// Synchronous key/value store. Last write wins; a single owner is assumed.
pub trait KeyValueStore: Send {
    fn get(&self, key: &str) -> Option<String>;

    /// Applies every write or none of them.
    fn apply(&mut self, batch: Vec<StoreWrite>) -> Result<(), StoreError>;

    fn clear(&mut self) -> Result<(), StoreError>;

    fn set(&mut self, key: &str, value: String) -> Result<(), StoreError> {
        self.apply(vec![StoreWrite::set(key, value)])
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.apply(vec![StoreWrite::remove(key)])
    }
}

pub(crate) fn apply_to_map(
    map: &mut std::collections::BTreeMap<String, String>,
    batch: Vec<StoreWrite>,
) {
    for write in batch {
        match write {
            StoreWrite::Set { key, value } => {
                map.insert(key, value);
            }
            StoreWrite::Remove { key } => {
                map.remove(&key);
            }
        }
    }
}
