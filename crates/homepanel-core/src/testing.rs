//! Scripted transport for unit tests

use crate::ports::{ApiRequest, ApiResponse, HttpTransport};
use crate::Result;
use async_trait::async_trait;
use std::sync::Mutex;
use tokio::sync::Notify;

type Handler = Box<dyn Fn(&ApiRequest) -> Result<ApiResponse> + Send + Sync>;

/// Answers every request with `handler` and records what was sent.
///
/// Yields once per call so that concurrently driven requests interleave
/// the way real network calls would.
pub(crate) struct MockTransport {
    handler: Handler,
    requests: Mutex<Vec<ApiRequest>>,
    gate: Option<Gate>,
}

/// Holds requests to one path until the test releases them
struct Gate {
    path: String,
    entered: Notify,
    release: Notify,
}

impl MockTransport {
    pub(crate) fn new(
        handler: impl Fn(&ApiRequest) -> Result<ApiResponse> + Send + Sync + 'static,
    ) -> Self {
        Self {
            handler: Box::new(handler),
            requests: Mutex::new(Vec::new()),
            gate: None,
        }
    }

    /// Park every request to `path` until `release` is called
    pub(crate) fn gated_on(mut self, path: &str) -> Self {
        self.gate = Some(Gate {
            path: path.to_string(),
            entered: Notify::new(),
            release: Notify::new(),
        });
        self
    }

    /// Resolves once a request to the gated path is parked
    pub(crate) async fn wait_until_parked(&self) {
        if let Some(gate) = &self.gate {
            gate.entered.notified().await;
        }
    }

    pub(crate) fn release(&self) {
        if let Some(gate) = &self.gate {
            gate.release.notify_one();
        }
    }

    pub(crate) fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub(crate) fn calls_to(&self, path: &str) -> usize {
        self.requests().iter().filter(|r| r.path == path).count()
    }
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse> {
        tokio::task::yield_now().await;
        self.requests.lock().unwrap().push(request.clone());
        if let Some(gate) = self.gate.as_ref().filter(|g| g.path == request.path) {
            gate.entered.notify_one();
            gate.release.notified().await;
        }
        (self.handler)(&request)
    }
}

pub(crate) fn tokens_json(access: &str, refresh: &str) -> String {
    serde_json::json!({
        "id": 1,
        "user_id": 1,
        "access_token": access,
        "refresh_token": refresh,
    })
    .to_string()
}
