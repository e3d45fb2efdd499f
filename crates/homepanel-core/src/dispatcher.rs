//! Authenticated request dispatch

use crate::events::SessionEvents;
use crate::ports::{ApiRequest, ApiResponse, HttpTransport};
use crate::refresh::RefreshCoordinator;
use crate::token_store::TokenStore;
use crate::Result;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::debug;

/// Sends requests with the current bearer credential and retries once
/// through the refresh coordinator when the backend answers 401.
#[derive(Clone)]
pub struct RequestDispatcher {
    transport: Arc<dyn HttpTransport>,
    tokens: TokenStore,
    refresh: Arc<RefreshCoordinator>,
}

impl RequestDispatcher {
    pub fn new(transport: Arc<dyn HttpTransport>, tokens: TokenStore, events: SessionEvents) -> Self {
        let refresh = Arc::new(RefreshCoordinator::new(
            transport.clone(),
            tokens.clone(),
            events,
        ));
        Self {
            transport,
            tokens,
            refresh,
        }
    }

    pub fn tokens(&self) -> &TokenStore {
        &self.tokens
    }

    pub fn transport(&self) -> &Arc<dyn HttpTransport> {
        &self.transport
    }

    /// Send `request`, attaching the access token read at send time.
    ///
    /// Statuses other than 401 are returned untouched. A 401 on a request
    /// that has not been retried yet triggers one refresh and one reissue;
    /// the reissued response is returned whatever its status.
    pub async fn send(&self, request: ApiRequest) -> Result<ApiResponse> {
        let token = self.tokens.get_access_token();
        let response = self
            .transport
            .execute(request.clone().with_bearer(token.as_deref()))
            .await?;

        if response.status != 401 || request.is_retried() {
            return Ok(response);
        }

        debug!("{} {} returned 401, refreshing session", request.method, request.path);
        let fresh = self.refresh.refresh_after(token.as_deref()).await?;

        let retry = request.mark_retried().with_bearer(Some(&fresh));
        self.transport.execute(retry).await
    }

    /// Send and decode a 2xx JSON body; other statuses become `ApiError::Status`
    pub async fn send_json<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T> {
        self.send(request).await?.into_result()?.json()
    }

    /// Send and discard the body of a 2xx response
    pub async fn send_empty(&self, request: ApiRequest) -> Result<()> {
        self.send(request).await?.into_result().map(|_| ())
    }
}
