//! Application views and the guard deciding who may open them

use homepanel_types::User;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Login entry point
    Login,
    Home,
    Rooms,
    Room(i64),
    Devices,
    Scheduler,
    Users,
    Settings,
}

impl Route {
    pub fn path(&self) -> String {
        match self {
            Route::Login => "/login".into(),
            Route::Home => "/".into(),
            Route::Rooms => "/rooms".into(),
            Route::Room(id) => format!("/rooms/{}", id),
            Route::Devices => "/devices".into(),
            Route::Scheduler => "/scheduler".into(),
            Route::Users => "/users".into(),
            Route::Settings => "/settings".into(),
        }
    }

    pub fn requires_auth(&self) -> bool {
        !matches!(self, Route::Login)
    }

    /// Device registration and user management are admin-scoped
    pub fn requires_admin(&self) -> bool {
        matches!(self, Route::Devices | Route::Users)
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.path())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteDecision {
    Allow,
    Redirect(Route),
    Deny,
}

/// Decide whether `user` may open `route`.
///
/// Anonymous visitors are sent to the login view; signed-in users without
/// the admin account type are denied admin views. Disabled accounts are
/// treated as anonymous.
pub fn authorize(route: &Route, user: Option<&User>) -> RouteDecision {
    if !route.requires_auth() {
        return RouteDecision::Allow;
    }

    match user {
        Some(user) if user.enabled => {
            if route.requires_admin() && !user.is_admin() {
                RouteDecision::Deny
            } else {
                RouteDecision::Allow
            }
        }
        _ => RouteDecision::Redirect(Route::Login),
    }
}
