//! Session manager: login, logout and the signed-in user
//!
//! Owns the token store, dispatcher and query cache for one client. The
//! application shell holds a `SessionManager` and reacts to the events it
//! publishes instead of polling global state.

use crate::api::HomeApi;
use crate::cache::QueryCache;
use crate::config::ClientConfig;
use crate::dispatcher::RequestDispatcher;
use crate::events::{SessionEvent, SessionEvents};
use crate::http::ReqwestTransport;
use crate::ports::{ApiRequest, HttpTransport, KeyValueStore};
use crate::routes::{self, Route, RouteDecision};
use crate::token_store::TokenStore;
use crate::validation;
use crate::{ApiError, Result};
use futures::future::{BoxFuture, FutureExt, Shared};
use homepanel_types::{LoginRequest, RegisterRequest, Session, TokenResponse, User};
use std::sync::Arc;
use tokio::sync::{broadcast, Mutex};
use tracing::{debug, info, warn};

pub const LOGIN_PATH: &str = "/auth/login";
/// The backend is notified of logout on the login route
pub const LOGOUT_PATH: &str = LOGIN_PATH;
pub const USER_PATH: &str = "/auth/user";
pub const REGISTER_PATH: &str = "/auth/register";

type UserFetch = Shared<BoxFuture<'static, Result<User>>>;

enum UserSlot {
    Empty,
    Loading(UserFetch),
    Ready(User),
}

pub struct SessionManager {
    dispatcher: RequestDispatcher,
    events: SessionEvents,
    cache: Arc<QueryCache>,
    user: Mutex<UserSlot>,
}

impl SessionManager {
    pub fn new(transport: Arc<dyn HttpTransport>, storage: Arc<dyn KeyValueStore>) -> Self {
        let events = SessionEvents::new();
        let tokens = TokenStore::new(storage);
        Self {
            dispatcher: RequestDispatcher::new(transport, tokens, events.clone()),
            events,
            cache: Arc::new(QueryCache::new()),
            user: Mutex::new(UserSlot::Empty),
        }
    }

    /// Build a manager talking to the backend described by `config` over HTTP
    pub fn connect(config: &ClientConfig, storage: Arc<dyn KeyValueStore>) -> Result<Self> {
        let transport = ReqwestTransport::new(config)?;
        Ok(Self::new(Arc::new(transport), storage))
    }

    pub fn tokens(&self) -> &TokenStore {
        self.dispatcher.tokens()
    }

    pub fn dispatcher(&self) -> &RequestDispatcher {
        &self.dispatcher
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    /// Typed resource API sharing this session and its cache
    pub fn api(&self) -> HomeApi {
        HomeApi::new(self.dispatcher.clone(), self.cache.clone())
    }

    pub fn is_authenticated(&self) -> bool {
        self.tokens().is_authenticated()
    }

    /// Exchange credentials for a session.
    ///
    /// Sent without any stored credential and outside the refresh path. A
    /// rejected login leaves the token store untouched and returns the
    /// backend's status and body.
    pub async fn login(&self, request: &LoginRequest) -> Result<Session> {
        validation::validate_login(&request.username, &request.password)?;

        let response = self
            .dispatcher
            .transport()
            .execute(ApiRequest::post(LOGIN_PATH).json(request)?)
            .await?;
        let session = response.into_result()?.json::<TokenResponse>()?.into_session();

        self.tokens().set_session(&session);
        self.reset_cached_state().await;
        self.events.emit(SessionEvent::LoggedIn);
        info!("Logged in as {}", request.username);

        Ok(session)
    }

    /// Tell the backend (best effort), then drop the local session.
    ///
    /// Returns where the shell should navigate next.
    pub async fn logout(&self) -> Route {
        let notify = ApiRequest::post(LOGOUT_PATH)
            .with_bearer(self.tokens().get_access_token().as_deref());
        match self.dispatcher.transport().execute(notify).await {
            Ok(response) => debug!("Logout notification answered {}", response.status),
            Err(e) => warn!("Logout notification failed: {}", e),
        }

        self.tokens().clear_session();
        self.reset_cached_state().await;
        self.events.emit(SessionEvent::LoggedOut {
            redirect: Route::Login,
        });
        info!("Logged out");

        Route::Login
    }

    /// The signed-in user, fetched once and cached.
    ///
    /// Concurrent callers share a single in-flight `GET /auth/user`.
    pub async fn current_user(&self) -> Result<User> {
        if !self.is_authenticated() {
            *self.user.lock().await = UserSlot::Empty;
            return Err(ApiError::NotAuthenticated);
        }

        let fetch = {
            let mut slot = self.user.lock().await;
            match &*slot {
                UserSlot::Ready(user) => return Ok(user.clone()),
                UserSlot::Loading(fetch) => fetch.clone(),
                UserSlot::Empty => {
                    let dispatcher = self.dispatcher.clone();
                    let fetch = async move {
                        dispatcher
                            .send_json::<User>(ApiRequest::get(USER_PATH))
                            .await
                    }
                    .boxed()
                    .shared();
                    *slot = UserSlot::Loading(fetch.clone());
                    fetch
                }
            }
        };

        let result = fetch.clone().await;

        let mut slot = self.user.lock().await;
        // Logout or login may have replaced the slot while we waited
        if matches!(&*slot, UserSlot::Loading(current) if current.ptr_eq(&fetch)) {
            *slot = match &result {
                Ok(user) => UserSlot::Ready(user.clone()),
                Err(_) => UserSlot::Empty,
            };
        }

        result
    }

    /// The current user, or `Forbidden` unless it is an enabled admin
    pub async fn require_admin(&self) -> Result<User> {
        let user = self.current_user().await?;
        match routes::authorize(&Route::Users, Some(&user)) {
            RouteDecision::Allow => Ok(user),
            _ => Err(ApiError::Forbidden),
        }
    }

    /// Guard for the shell: may the current user open `route`?
    pub async fn authorize(&self, route: &Route) -> RouteDecision {
        if !route.requires_auth() {
            return RouteDecision::Allow;
        }
        match self.current_user().await {
            Ok(user) => routes::authorize(route, Some(&user)),
            Err(ApiError::NotAuthenticated | ApiError::SessionExpired) => {
                routes::authorize(route, None)
            }
            Err(_) => RouteDecision::Deny,
        }
    }

    /// Create an account (admin only on the backend)
    pub async fn register(&self, request: &RegisterRequest) -> Result<User> {
        validation::validate_login(&request.username, &request.password)?;
        self.require_admin().await?;

        let user = self
            .dispatcher
            .send_json::<User>(ApiRequest::post(REGISTER_PATH).json(request)?)
            .await?;
        self.cache
            .invalidate_resource(crate::cache::Resource::Users);
        info!("Registered user {}", user.username);

        Ok(user)
    }

    async fn reset_cached_state(&self) {
        *self.user.lock().await = UserSlot::Empty;
        self.cache.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::ApiResponse;
    use crate::refresh::REFRESH_PATH;
    use crate::storage::MemoryStore;
    use crate::testing::{tokens_json, MockTransport};
    use tokio_test::{assert_err, assert_ok};

    const ALICE: &str = r#"{"id":1,"username":"alice","account_type":"DEFAULT","enabled":true}"#;

    fn manager(transport: Arc<MockTransport>) -> SessionManager {
        SessionManager::new(transport, Arc::new(MemoryStore::new()))
    }

    fn login_request(username: &str, password: &str) -> LoginRequest {
        LoginRequest {
            username: username.into(),
            password: password.into(),
            long_lived: false,
        }
    }

    #[tokio::test]
    async fn test_login_stores_session_and_authenticates_next_call() {
        let transport = Arc::new(MockTransport::new(|req| match req.path.as_str() {
            LOGIN_PATH => Ok(ApiResponse::new(200, tokens_json("A1", "R1"))),
            USER_PATH => Ok(ApiResponse::new(200, ALICE)),
            _ => Ok(ApiResponse::new(404, "")),
        }));
        let manager = manager(transport.clone());
        let mut rx = manager.subscribe();

        manager.login(&login_request("alice", "pw")).await.unwrap();
        assert_eq!(manager.tokens().get_access_token().as_deref(), Some("A1"));
        assert_eq!(rx.try_recv().unwrap(), SessionEvent::LoggedIn);

        let user = manager.current_user().await.unwrap();
        assert_eq!(user.username, "alice");

        let sent = transport.requests();
        assert!(sent[0].bearer().is_none());
        assert_eq!(
            serde_json::from_str::<serde_json::Value>(sent[0].body.as_deref().unwrap()).unwrap(),
            serde_json::json!({"username": "alice", "password": "pw", "long_lived": false})
        );
        assert_eq!(sent[1].bearer(), Some("A1"));
    }

    #[tokio::test]
    async fn test_failed_login_keeps_store_and_returns_body() {
        let transport = Arc::new(MockTransport::new(|_| {
            Ok(ApiResponse::new(401, r#"{"detail":"Incorrect username or password"}"#))
        }));
        let manager = manager(transport);
        manager.tokens().set_session(&Session::new("OLD", "OLDR"));

        let err = manager.login(&login_request("alice", "nope")).await.unwrap_err();
        assert_eq!(err.status(), Some(401));
        assert_eq!(err.detail().as_deref(), Some("Incorrect username or password"));
        assert_eq!(manager.tokens().get_access_token().as_deref(), Some("OLD"));
    }

    #[tokio::test]
    async fn test_invalid_login_form_never_reaches_network() {
        let transport = Arc::new(MockTransport::new(|_| Ok(ApiResponse::new(200, ""))));
        let manager = manager(transport.clone());

        let err = manager.login(&login_request("", "pw")).await.unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn test_logout_clears_store_even_when_notification_fails() {
        let transport = Arc::new(MockTransport::new(|_| {
            Err(ApiError::Transport("network down".into()))
        }));
        let manager = manager(transport.clone());
        let mut rx = manager.subscribe();
        manager.tokens().set_session(&Session::new("A1", "R1"));

        let redirect = manager.logout().await;

        assert_eq!(redirect, Route::Login);
        assert!(!manager.is_authenticated());
        assert_eq!(manager.tokens().get_refresh_token(), None);
        assert_eq!(
            rx.try_recv().unwrap(),
            SessionEvent::LoggedOut {
                redirect: Route::Login
            }
        );

        let sent = transport.requests();
        assert_eq!(sent[0].path, LOGOUT_PATH);
        assert!(sent[0].body.is_none());
        assert_eq!(sent[0].bearer(), Some("A1"));
    }

    #[tokio::test]
    async fn test_concurrent_current_user_calls_share_one_fetch() {
        let transport = Arc::new(MockTransport::new(|_| Ok(ApiResponse::new(200, ALICE))));
        let manager = manager(transport.clone());
        manager.tokens().set_session(&Session::new("A1", "R1"));

        let (a, b, c) = tokio::join!(
            manager.current_user(),
            manager.current_user(),
            manager.current_user()
        );
        assert_eq!(a.unwrap(), b.unwrap());
        assert_eq!(c.unwrap().id, 1);

        // Cached afterwards
        manager.current_user().await.unwrap();
        assert_eq!(transport.calls_to(USER_PATH), 1);
    }

    #[tokio::test]
    async fn test_user_cache_dropped_on_logout() {
        let transport = Arc::new(MockTransport::new(|_| Ok(ApiResponse::new(200, ALICE))));
        let manager = manager(transport);
        manager.tokens().set_session(&Session::new("A1", "R1"));
        manager.current_user().await.unwrap();

        manager.logout().await;

        assert!(matches!(
            manager.current_user().await,
            Err(ApiError::NotAuthenticated)
        ));
        assert_eq!(
            manager.authorize(&Route::Rooms).await,
            RouteDecision::Redirect(Route::Login)
        );
    }

    #[tokio::test]
    async fn test_non_admin_is_denied_admin_views() {
        let transport = Arc::new(MockTransport::new(|_| Ok(ApiResponse::new(200, ALICE))));
        let manager = manager(transport.clone());
        manager.tokens().set_session(&Session::new("A1", "R1"));

        assert_eq!(manager.authorize(&Route::Users).await, RouteDecision::Deny);
        assert_eq!(manager.authorize(&Route::Rooms).await, RouteDecision::Allow);

        let err = manager
            .register(&RegisterRequest {
                username: "bob".into(),
                password: "secret".into(),
                account_type: Default::default(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Forbidden));
        assert_eq!(transport.calls_to(REGISTER_PATH), 0);
    }

    /// T1 is expired; refresh hands out T2/R2 but is parked until released,
    /// and a login issues T9/R9
    fn parked_refresh_backend() -> Arc<MockTransport> {
        Arc::new(
            MockTransport::new(|req| match req.path.as_str() {
                REFRESH_PATH => Ok(ApiResponse::new(200, tokens_json("T2", "R2"))),
                LOGIN_PATH if req.body.is_some() => {
                    Ok(ApiResponse::new(200, tokens_json("T9", "R9")))
                }
                LOGIN_PATH => Ok(ApiResponse::new(200, "")),
                _ if req.bearer() == Some("T1") => Ok(ApiResponse::new(401, "")),
                _ => Ok(ApiResponse::new(200, "[]")),
            })
            .gated_on(REFRESH_PATH),
        )
    }

    #[tokio::test]
    async fn test_logout_during_refresh_is_not_undone() {
        let transport = parked_refresh_backend();
        let manager = manager(transport.clone());
        manager.tokens().set_session(&Session::new("T1", "R1"));
        let mut rx = manager.subscribe();

        let pending = manager.dispatcher().send(ApiRequest::get("/rooms"));
        let interleave = async {
            transport.wait_until_parked().await;
            manager.logout().await;
            assert!(!manager.is_authenticated());
            transport.release();
        };
        let (result, ()) = tokio::join!(pending, interleave);

        let err = assert_err!(result);
        assert!(matches!(err, ApiError::SessionExpired));
        assert_eq!(manager.tokens().session(), None);
        assert_eq!(transport.calls_to("/rooms"), 1);
        assert_eq!(
            rx.try_recv().unwrap(),
            SessionEvent::LoggedOut {
                redirect: Route::Login
            }
        );
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_login_during_refresh_keeps_new_session() {
        let transport = parked_refresh_backend();
        let manager = manager(transport.clone());
        manager.tokens().set_session(&Session::new("T1", "R1"));

        let pending = manager.dispatcher().send(ApiRequest::get("/rooms"));
        let interleave = async {
            transport.wait_until_parked().await;
            assert_ok!(manager.login(&login_request("alice", "pw")).await);
            transport.release();
        };
        let (result, ()) = tokio::join!(pending, interleave);

        let response = assert_ok!(result);
        assert_eq!(response.status, 200);
        assert_eq!(manager.tokens().session(), Some(Session::new("T9", "R9")));

        let retried = transport
            .requests()
            .into_iter()
            .filter(|r| r.path == "/rooms")
            .last()
            .unwrap();
        assert_eq!(retried.bearer(), Some("T9"));
    }
}
