//! Key-value store persisted as one JSON object on disk.

use anyhow::Context;
use chromatch_core::{KeyValueStore, StoreError};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub(crate) struct FileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileStore {
    /// Opens `path`, a missing file starts out empty.
    pub fn open(path: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(raw) => serde_json::from_str(&raw)
                .with_context(|| format!("Could not parse {}", path.display()))?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(err) => {
                return Err(err).with_context(|| format!("Could not read {}", path.display()));
            }
        };
        log::debug!("Opened {} with {} keys", path.display(), entries.len());
        Ok(Self { path, entries })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<(), StoreError> {
        let raw = serde_json::to_string_pretty(&self.entries).map_err(|err| StoreError::Encode {
            key: self.path.display().to_string(),
            reason: err.to_string(),
        })?;
        fs::write(&self.path, raw).map_err(|err| StoreError::Backend(err.to_string()))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value);
        self.flush()
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        if self.entries.remove(key).is_some() {
            self.flush()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("chromatch-{}-{}", name, std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        dir.join("store.json")
    }

    #[test]
    fn values_survive_reopening() {
        let path = scratch("reopen");
        let _ = fs::remove_file(&path);

        let mut store = FileStore::open(&path).unwrap();
        store.set("chromatch:best-score:uniform-easy", "940".to_string()).unwrap();
        store.set("other", "1".to_string()).unwrap();
        store.remove("other").unwrap();

        let store = FileStore::open(&path).unwrap();
        assert_eq!(store.get("chromatch:best-score:uniform-easy").as_deref(), Some("940"));
        assert_eq!(store.get("other"), None);
        assert_eq!(store.path(), path.as_path());
    }

    #[test]
    fn garbage_file_is_an_error() {
        let path = scratch("garbage");
        fs::write(&path, "not json").unwrap();
        assert!(FileStore::open(&path).is_err());
    }
}
