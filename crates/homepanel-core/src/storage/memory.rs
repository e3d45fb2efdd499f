//! In-process key-value store

use crate::ports::KeyValueStore;
use std::collections::HashMap;
use std::sync::RwLock;

#[derive(Debug, Default)]
pub struct MemoryStore {
    data: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        let data = self.data.read().unwrap_or_else(|e| e.into_inner());
        data.get(key).cloned()
    }

    fn set_many(&self, entries: &[(&str, &str)]) {
        let mut data = self.data.write().unwrap_or_else(|e| e.into_inner());
        for (key, value) in entries {
            data.insert((*key).to_string(), (*value).to_string());
        }
    }

    fn remove_many(&self, keys: &[&str]) {
        let mut data = self.data.write().unwrap_or_else(|e| e.into_inner());
        for key in keys {
            data.remove(*key);
        }
    }
}
