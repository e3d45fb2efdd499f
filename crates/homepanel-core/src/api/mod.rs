//! Typed access to the backend's REST resources
//!
//! Reads go through the query cache; mutations invalidate the keys they
//! touch. Every call is dispatched with the session's bearer credential.

mod devices;
mod rooms;
mod scheduler;
mod users;

use crate::cache::{CacheKey, QueryCache};
use crate::dispatcher::RequestDispatcher;
use crate::ports::ApiRequest;
use crate::Result;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

#[derive(Clone)]
pub struct HomeApi {
    dispatcher: RequestDispatcher,
    cache: Arc<QueryCache>,
}

impl HomeApi {
    pub fn new(dispatcher: RequestDispatcher, cache: Arc<QueryCache>) -> Self {
        Self { dispatcher, cache }
    }

    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    async fn query<T>(&self, key: CacheKey, path: String) -> Result<T>
    where
        T: Serialize + DeserializeOwned,
    {
        // Nothing cached outlives the session it was fetched with
        if !self.dispatcher.tokens().is_authenticated() {
            self.cache.clear();
        } else if let Some(hit) = self.cache.get::<T>(&key) {
            debug!("Cache hit for {:?}", key);
            return Ok(hit);
        }

        let value: T = self.dispatcher.send_json(ApiRequest::get(path)).await?;
        self.cache.put(key, &value);
        Ok(value)
    }

    async fn mutate<T: DeserializeOwned>(
        &self,
        request: ApiRequest,
        invalidates: &[CacheKey],
    ) -> Result<T> {
        let value = self.dispatcher.send_json(request).await?;
        self.invalidate(invalidates);
        Ok(value)
    }

    async fn mutate_empty(&self, request: ApiRequest, invalidates: &[CacheKey]) -> Result<()> {
        self.dispatcher.send_empty(request).await?;
        self.invalidate(invalidates);
        Ok(())
    }

    fn invalidate(&self, keys: &[CacheKey]) {
        for key in keys {
            self.cache.invalidate(key);
        }
    }
}
