//! Access-token refresh coordination
//!
//! A request that comes back 401 asks the coordinator for a fresh access
//! token. Refreshes are serialized behind one async lock: the first chain
//! to get the lock performs the refresh call, and chains queued behind it
//! notice the stored token has moved on and reuse it instead of spending
//! the refresh token a second time.

use crate::events::{SessionEvent, SessionEvents};
use crate::ports::{ApiRequest, HttpTransport};
use crate::routes::Route;
use crate::token_store::TokenStore;
use crate::{ApiError, Result};
use homepanel_types::{RefreshRequest, TokenResponse};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

pub const REFRESH_PATH: &str = "/auth/refresh";

pub struct RefreshCoordinator {
    transport: Arc<dyn HttpTransport>,
    tokens: TokenStore,
    events: SessionEvents,
    lock: Mutex<()>,
}

impl RefreshCoordinator {
    pub fn new(transport: Arc<dyn HttpTransport>, tokens: TokenStore, events: SessionEvents) -> Self {
        Self {
            transport,
            tokens,
            events,
            lock: Mutex::new(()),
        }
    }

    /// Obtain an access token newer than `stale`, the one the failed request
    /// carried.
    ///
    /// Returns `SessionExpired` when the backend rejects the refresh token
    /// (the store is cleared and `SessionEvent::Expired` emitted once) or
    /// when a concurrent chain already tore the session down. Any other
    /// refresh failure is returned as is.
    ///
    /// If a login or logout replaces the session while the refresh call is in
    /// flight, its result is discarded: the caller gets the new session's
    /// access token, or `SessionExpired` after a logout.
    pub async fn refresh_after(&self, stale: Option<&str>) -> Result<String> {
        let _guard = self.lock.lock().await;

        let current = self.tokens.get_access_token();
        if let Some(current) = current {
            if Some(current.as_str()) != stale {
                debug!("Access token already refreshed by a concurrent request");
                return Ok(current);
            }
        }

        let Some(refresh_token) = self.tokens.get_refresh_token() else {
            return Err(if stale.is_some() {
                ApiError::SessionExpired
            } else {
                ApiError::NotAuthenticated
            });
        };

        debug!("Refreshing access token");
        let request = ApiRequest::post(REFRESH_PATH).json(&RefreshRequest {
            refresh_token: refresh_token.clone(),
        })?;
        let response = self.transport.execute(request).await?;

        // A login or logout may have replaced the session while the call was
        // in flight; only the session we refreshed may be written or cleared.
        if response.status == 401 {
            if !self.tokens.clear_session_if(&refresh_token) {
                return self.superseded();
            }
            warn!("Refresh token rejected, session expired");
            self.events.emit(SessionEvent::Expired {
                redirect: Route::Login,
            });
            return Err(ApiError::SessionExpired);
        }

        let session = response.into_result()?.json::<TokenResponse>()?.into_session();
        if !self.tokens.replace_session(&refresh_token, &session) {
            return self.superseded();
        }
        self.events.emit(SessionEvent::Refreshed);
        info!("Access token refreshed");

        Ok(session.access_token)
    }

    /// Outcome for a refresh whose session changed underneath it
    fn superseded(&self) -> Result<String> {
        debug!("Session changed during refresh, discarding the result");
        self.tokens.get_access_token().ok_or(ApiError::SessionExpired)
    }
}
