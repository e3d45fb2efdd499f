//! Read-through cache for API queries, keyed by resource type and id

use dashmap::DashMap;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::{Duration, Instant};
use tracing::debug;

pub const DEFAULT_TTL: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Rooms,
    AcDevices,
    BroadlinkDevices,
    HueBridges,
    Jobs,
    Users,
    Temperature,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub resource: Resource,
    pub id: Option<i64>,
}

impl CacheKey {
    /// The collection itself (`GET /rooms`)
    pub fn list(resource: Resource) -> Self {
        Self { resource, id: None }
    }

    pub fn item(resource: Resource, id: i64) -> Self {
        Self {
            resource,
            id: Some(id),
        }
    }
}

struct CacheEntry {
    value: serde_json::Value,
    expires_at: Instant,
}

pub struct QueryCache {
    data: DashMap<CacheKey, CacheEntry>,
    ttl: Duration,
}

impl QueryCache {
    pub fn new() -> Self {
        Self::with_ttl(DEFAULT_TTL)
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            data: DashMap::new(),
            ttl,
        }
    }

    /// Cached value for `key`, if present, fresh and decodable as `T`
    pub fn get<T: DeserializeOwned>(&self, key: &CacheKey) -> Option<T> {
        let entry = self.data.get(key)?;
        if Instant::now() > entry.expires_at {
            drop(entry);
            self.data.remove(key);
            return None;
        }
        serde_json::from_value(entry.value.clone()).ok()
    }

    pub fn put<T: Serialize>(&self, key: CacheKey, value: &T) {
        match serde_json::to_value(value) {
            Ok(value) => {
                self.data.insert(
                    key,
                    CacheEntry {
                        value,
                        expires_at: Instant::now() + self.ttl,
                    },
                );
            }
            Err(e) => debug!("Not caching {:?}: {}", key, e),
        }
    }

    pub fn invalidate(&self, key: &CacheKey) {
        self.data.remove(key);
    }

    /// Drop the collection and every item of `resource`
    pub fn invalidate_resource(&self, resource: Resource) {
        self.data.retain(|key, _| key.resource != resource);
    }

    pub fn clear(&self) {
        self.data.clear();
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl Default for QueryCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_operations() {
        let cache = QueryCache::new();
        let key = CacheKey::item(Resource::Rooms, 1);

        cache.put(key, &vec![1, 2, 3]);
        assert_eq!(cache.get::<Vec<i32>>(&key), Some(vec![1, 2, 3]));

        assert_eq!(cache.get::<Vec<i32>>(&CacheKey::item(Resource::Rooms, 2)), None);

        cache.invalidate(&key);
        assert_eq!(cache.get::<Vec<i32>>(&key), None);
    }

    #[test]
    fn test_ttl() {
        let cache = QueryCache::with_ttl(Duration::from_millis(10));
        let key = CacheKey::list(Resource::Jobs);

        cache.put(key, &"jobs");
        assert_eq!(cache.get::<String>(&key).as_deref(), Some("jobs"));

        std::thread::sleep(Duration::from_millis(20));
        assert_eq!(cache.get::<String>(&key), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_invalidate_resource_keeps_others() {
        let cache = QueryCache::new();
        cache.put(CacheKey::list(Resource::Rooms), &1);
        cache.put(CacheKey::item(Resource::Rooms, 7), &2);
        cache.put(CacheKey::list(Resource::Users), &3);

        cache.invalidate_resource(Resource::Rooms);

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get::<i32>(&CacheKey::list(Resource::Users)), Some(3));
    }
}
