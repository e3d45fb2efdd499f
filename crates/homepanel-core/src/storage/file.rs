//! JSON-file backed key-value store

use crate::ports::KeyValueStore;
use crate::{ApiError, Result};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use tracing::{debug, warn};

/// Durable store kept as a flat JSON object on disk.
///
/// The in-memory map is authoritative; every write is flushed to disk while
/// the write lock is held so two writers cannot interleave file contents.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    data: RwLock<BTreeMap<String, String>>,
}

impl FileStore {
    /// Open the store at `path`, loading existing entries if the file exists
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        let data = if path.exists() {
            let content = std::fs::read_to_string(&path).map_err(|e| {
                ApiError::Storage(format!("Failed to read {}: {}", path.display(), e))
            })?;
            if content.trim().is_empty() {
                BTreeMap::new()
            } else {
                serde_json::from_str(&content).map_err(|e| {
                    ApiError::Storage(format!("Failed to parse {}: {}", path.display(), e))
                })?
            }
        } else {
            BTreeMap::new()
        };

        debug!("Opened key-value store at {:?} ({} keys)", path, data.len());

        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, data: &BTreeMap<String, String>) {
        if let Err(e) = write_atomically(&self.path, data) {
            warn!("Failed to persist key-value store to {:?}: {}", self.path, e);
        }
    }
}

fn write_atomically(path: &Path, data: &BTreeMap<String, String>) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let content = serde_json::to_string_pretty(data)?;
    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, content)?;

    // Tokens live in here; restrict to owner only
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mut perms = std::fs::metadata(&tmp)?.permissions();
        perms.set_mode(0o600);
        std::fs::set_permissions(&tmp, perms)?;
    }

    std::fs::rename(&tmp, path)
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        let data = self.data.read().unwrap_or_else(|e| e.into_inner());
        data.get(key).cloned()
    }

    fn set_many(&self, entries: &[(&str, &str)]) {
        let mut data = self.data.write().unwrap_or_else(|e| e.into_inner());
        for (key, value) in entries {
            data.insert((*key).to_string(), (*value).to_string());
        }
        self.persist(&data);
    }

    fn remove_many(&self, keys: &[&str]) {
        let mut data = self.data.write().unwrap_or_else(|e| e.into_inner());
        let before = data.len();
        for key in keys {
            data.remove(*key);
        }
        if data.len() != before {
            self.persist(&data);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_values_survive_reopen() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("nested").join("storage.json");

        let store = FileStore::open(&path)?;
        store.set_many(&[("access_token", "a1"), ("theme_mode", "dark")]);
        store.remove("theme_mode");
        drop(store);

        let reopened = FileStore::open(&path)?;
        assert_eq!(reopened.get("access_token").as_deref(), Some("a1"));
        assert_eq!(reopened.get("theme_mode"), None);

        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn test_file_is_private() -> Result<()> {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir()?;
        let path = dir.path().join("storage.json");
        FileStore::open(&path)?.set("refresh_token", "r1");

        let mode = std::fs::metadata(&path)?.permissions().mode();
        assert_eq!(mode & 0o777, 0o600);

        Ok(())
    }

    #[test]
    fn test_corrupt_file_is_reported() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("storage.json");
        std::fs::write(&path, "{not json")?;

        let err = FileStore::open(&path).unwrap_err();
        assert!(matches!(err, ApiError::Storage(_)));

        Ok(())
    }
}
