//! End-to-end session scenarios against an in-process fake backend

use async_trait::async_trait;
use homepanel_core::ports::{ApiRequest, ApiResponse, HttpTransport, Method};
use homepanel_core::{
    ApiError, FileStore, MemoryStore, Route, RouteDecision, SessionEvent, SessionManager,
};
use homepanel_types::{LoginRequest, Session};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct BackendState {
    issued: u32,
    valid_access: HashSet<String>,
    valid_refresh: HashSet<String>,
    log: Vec<(Method, String, Option<String>)>,
    offline: bool,
}

/// Issues `T<n>`/`R<n>` token pairs and checks bearer tokens like the real server
#[derive(Default)]
struct FakeBackend {
    state: Mutex<BackendState>,
}

impl FakeBackend {
    fn issue(state: &mut BackendState) -> String {
        state.issued += 1;
        let (access, refresh) = (format!("T{}", state.issued), format!("R{}", state.issued));
        state.valid_access.insert(access.clone());
        state.valid_refresh.insert(refresh.clone());
        serde_json::json!({
            "id": state.issued,
            "user_id": 1,
            "access_token": access,
            "refresh_token": refresh,
        })
        .to_string()
    }

    fn expire_access_tokens(&self) {
        self.state.lock().unwrap().valid_access.clear();
    }

    fn revoke_refresh_tokens(&self) {
        self.state.lock().unwrap().valid_refresh.clear();
    }

    fn go_offline(&self) {
        self.state.lock().unwrap().offline = true;
    }

    fn calls_to(&self, path: &str) -> usize {
        self.state
            .lock()
            .unwrap()
            .log
            .iter()
            .filter(|(_, p, _)| p == path)
            .count()
    }

    /// Bearer tokens sent to `path`, in order
    fn bearers_for(&self, path: &str) -> Vec<Option<String>> {
        self.state
            .lock()
            .unwrap()
            .log
            .iter()
            .filter(|(_, p, _)| p == path)
            .map(|(_, _, bearer)| bearer.clone())
            .collect()
    }
}

#[async_trait]
impl HttpTransport for FakeBackend {
    async fn execute(&self, request: ApiRequest) -> homepanel_core::Result<ApiResponse> {
        tokio::task::yield_now().await;
        let mut state = self.state.lock().unwrap();
        if state.offline {
            return Err(ApiError::Transport("connection refused".into()));
        }
        let bearer = request.bearer().map(str::to_string);
        state
            .log
            .push((request.method, request.path.clone(), bearer.clone()));

        let response = match (request.method, request.path.as_str()) {
            (Method::Post, "/auth/login") if request.body.is_none() => ApiResponse::new(200, ""),
            (Method::Post, "/auth/login") => {
                let body: serde_json::Value =
                    serde_json::from_str(request.body.as_deref().unwrap_or("{}"))?;
                if body["username"] == "alice" && body["password"] == "pw" {
                    ApiResponse::new(200, Self::issue(&mut state))
                } else {
                    ApiResponse::new(401, r#"{"detail":"Incorrect username or password"}"#)
                }
            }
            (Method::Post, "/auth/refresh") => {
                let body: serde_json::Value =
                    serde_json::from_str(request.body.as_deref().unwrap_or("{}"))?;
                let presented = body["refresh_token"].as_str().unwrap_or_default().to_string();
                if state.valid_refresh.remove(&presented) {
                    ApiResponse::new(200, Self::issue(&mut state))
                } else {
                    ApiResponse::new(401, r#"{"detail":"Invalid refresh token"}"#)
                }
            }
            (_, path) => {
                let authorized = bearer
                    .as_ref()
                    .map(|t| state.valid_access.contains(t))
                    .unwrap_or(false);
                match (authorized, path) {
                    (false, _) => ApiResponse::new(401, r#"{"detail":"Not authenticated"}"#),
                    (true, "/auth/user") => ApiResponse::new(
                        200,
                        r#"{"id":1,"username":"alice","account_type":"ADMIN","enabled":true}"#,
                    ),
                    (true, "/rooms") => {
                        ApiResponse::new(200, r#"[{"id":1,"name":"Kitchen","controllers":[]}]"#)
                    }
                    (true, _) => ApiResponse::new(404, ""),
                }
            }
        };
        Ok(response)
    }
}

fn alice() -> LoginRequest {
    LoginRequest {
        username: "alice".into(),
        password: "pw".into(),
        long_lived: false,
    }
}

fn manager(backend: &Arc<FakeBackend>) -> SessionManager {
    SessionManager::new(backend.clone(), Arc::new(MemoryStore::new()))
}

#[tokio::test]
async fn login_then_authenticated_call() {
    let backend = Arc::new(FakeBackend::default());
    let session = manager(&backend);

    session.login(&alice()).await.unwrap();
    assert_eq!(session.tokens().get_access_token().as_deref(), Some("T1"));

    let rooms = session.api().rooms().await.unwrap();
    assert_eq!(rooms[0].name, "Kitchen");
    assert_eq!(backend.bearers_for("/rooms"), vec![Some("T1".to_string())]);
}

#[tokio::test]
async fn expired_access_token_is_refreshed_and_retried() {
    let backend = Arc::new(FakeBackend::default());
    let session = manager(&backend);
    let mut events = session.subscribe();
    session.login(&alice()).await.unwrap();
    backend.expire_access_tokens();

    session.api().rooms().await.unwrap();

    assert_eq!(backend.calls_to("/auth/refresh"), 1);
    assert_eq!(
        backend.bearers_for("/rooms"),
        vec![Some("T1".to_string()), Some("T2".to_string())]
    );
    assert_eq!(
        session.tokens().session(),
        Some(Session::new("T2", "R2"))
    );
    assert_eq!(events.recv().await.unwrap(), SessionEvent::LoggedIn);
    assert_eq!(events.recv().await.unwrap(), SessionEvent::Refreshed);
}

#[tokio::test]
async fn rejected_refresh_expires_the_session() {
    let backend = Arc::new(FakeBackend::default());
    let session = manager(&backend);
    session.login(&alice()).await.unwrap();
    let mut events = session.subscribe();
    backend.expire_access_tokens();
    backend.revoke_refresh_tokens();

    let err = session.api().rooms().await.unwrap_err();

    assert!(matches!(err, ApiError::SessionExpired));
    assert!(!session.is_authenticated());
    assert_eq!(session.tokens().get_refresh_token(), None);
    assert_eq!(
        events.try_recv().unwrap(),
        SessionEvent::Expired {
            redirect: Route::Login
        }
    );
    assert!(events.try_recv().is_err());
    assert_eq!(
        session.authorize(&Route::Rooms).await,
        RouteDecision::Redirect(Route::Login)
    );
}

#[tokio::test]
async fn concurrent_unauthorized_requests_share_one_refresh() {
    let backend = Arc::new(FakeBackend::default());
    let session = manager(&backend);
    session.login(&alice()).await.unwrap();
    backend.expire_access_tokens();

    let dispatcher = session.dispatcher();
    let (a, b, c) = tokio::join!(
        dispatcher.send(ApiRequest::get("/rooms")),
        dispatcher.send(ApiRequest::get("/rooms")),
        dispatcher.send(ApiRequest::get("/auth/user")),
    );

    assert_eq!(a.unwrap().status, 200);
    assert_eq!(b.unwrap().status, 200);
    assert_eq!(c.unwrap().status, 200);
    assert_eq!(backend.calls_to("/auth/refresh"), 1);
    assert_eq!(session.tokens().get_access_token().as_deref(), Some("T2"));
}

#[tokio::test]
async fn logout_clears_tokens_when_server_unreachable() {
    let backend = Arc::new(FakeBackend::default());
    let session = manager(&backend);
    session.login(&alice()).await.unwrap();
    backend.go_offline();

    assert_eq!(session.logout().await, Route::Login);
    assert_eq!(session.tokens().session(), None);
}

#[tokio::test]
async fn session_survives_restart_with_file_store() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("storage.json");
    let backend = Arc::new(FakeBackend::default());

    {
        let store = Arc::new(FileStore::open(&path).unwrap());
        let session = SessionManager::new(backend.clone(), store);
        session.login(&alice()).await.unwrap();
    }

    let store = Arc::new(FileStore::open(&path).unwrap());
    let session = SessionManager::new(backend.clone(), store);
    assert!(session.is_authenticated());
    assert_eq!(session.current_user().await.unwrap().username, "alice");
    assert_eq!(
        session.authorize(&Route::Users).await,
        RouteDecision::Allow
    );
}
