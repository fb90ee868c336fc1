use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, warn};

use super::{apply_to_map, KeyValueStore, StoreError, StoreWrite};

/// JSON-file-backed store. The whole map is rewritten on each write through a
/// temp file in the same directory, then renamed over the target.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileStore {
    /// Opens the store at `path`. A missing file is an empty store; a file
    /// that does not parse is discarded and overwritten with an empty map.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let mut store = Self {
            path,
            entries: BTreeMap::new(),
        };

        match std::fs::read_to_string(&store.path) {
            Ok(raw) => match serde_json::from_str::<BTreeMap<String, String>>(&raw) {
                Ok(entries) => {
                    debug!(
                        "Loaded {} entries from {}",
                        entries.len(),
                        store.path.display()
                    );
                    store.entries = entries;
                }
                Err(e) => {
                    warn!(
                        "Store file {} is unreadable ({e}); starting empty",
                        store.path.display()
                    );
                    store.flush()?;
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }

        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<(), StoreError> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut tmp = NamedTempFile::new_in(dir)?;
        serde_json::to_writer_pretty(&mut tmp, &self.entries)?;
        tmp.write_all(b"\n")?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path)?;
        Ok(())
    }

    /// Runs `mutate` then flushes, restoring the previous map if the flush fails.
    fn commit(
        &mut self,
        mutate: impl FnOnce(&mut BTreeMap<String, String>),
    ) -> Result<(), StoreError> {
        let previous = self.entries.clone();
        mutate(&mut self.entries);
        if let Err(e) = self.flush() {
            self.entries = previous;
            return Err(e);
        }
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn apply(&mut self, batch: Vec<StoreWrite>) -> Result<(), StoreError> {
        self.commit(|entries| apply_to_map(entries, batch))
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        self.commit(|entries| entries.clear())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_opens_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path().join("state.json")).unwrap();
        assert_eq!(store.get("careerAdvice"), None);
    }

    #[test]
    fn test_writes_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");

        let mut store = FileStore::open(&path).unwrap();
        store
            .apply(vec![
                StoreWrite::set("userRole", "\"Backend Engineer\""),
                StoreWrite::set("userLevel", "\"junior\""),
            ])
            .unwrap();
        store.remove("userLevel").unwrap();

        let reopened = FileStore::open(&path).unwrap();
        assert_eq!(
            reopened.get("userRole").as_deref(),
            Some("\"Backend Engineer\"")
        );
        assert_eq!(reopened.get("userLevel"), None);
    }

    #[test]
    fn test_corrupt_file_is_discarded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(&path, "{ not json").unwrap();

        let store = FileStore::open(&path).unwrap();
        assert_eq!(store.get("userRole"), None);

        let raw = std::fs::read_to_string(&path).unwrap();
        let parsed: BTreeMap<String, String> = serde_json::from_str(&raw).unwrap();
        assert!(parsed.is_empty());
    }

    #[test]
    fn test_failed_flush_keeps_previous_entries() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        let mut store = FileStore::open(&path).unwrap();
        store.set("userRole", "\"SRE\"".to_string()).unwrap();

        // Point the store at a directory that no longer exists.
        store.path = dir.path().join("gone").join("state.json");
        let result = store.set("userRole", "\"Data Scientist\"".to_string());

        assert!(result.is_err());
        assert_eq!(store.get("userRole").as_deref(), Some("\"SRE\""));
    }
}
