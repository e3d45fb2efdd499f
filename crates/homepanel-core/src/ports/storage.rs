//! Durable key-value storage port

/// Client-side key-value storage (the equivalent of browser local storage).
///
/// Batch operations apply all entries under one write so that readers never
/// observe half of a multi-key update. Implementations keep an in-process
/// copy and never fail a read or write; persistence problems are logged.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;

    fn set_many(&self, entries: &[(&str, &str)]);

    fn remove_many(&self, keys: &[&str]);

    fn set(&self, key: &str, value: &str) {
        self.set_many(&[(key, value)]);
    }

    fn remove(&self, key: &str) {
        self.remove_many(&[key]);
    }
}
