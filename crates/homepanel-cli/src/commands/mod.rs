pub mod ac;
pub mod auth;
pub mod broadlink;
pub mod config;
pub mod hue;
pub mod jobs;
pub mod rooms;
pub mod theme;
pub mod users;

use crate::config::{Settings, SettingsManager};
use anyhow::{Context as _, Result};
use colored::Colorize;
use homepanel_core::ports::KeyValueStore;
use homepanel_core::{
    ApiError, FileStore, HomeApi, Preferences, Route, RouteDecision, SessionEvent,
    SessionManager,
};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::debug;

/// Everything a command needs: settings, the session and local preferences
pub struct Context {
    pub settings: Settings,
    pub session: SessionManager,
    pub preferences: Preferences,
    events: broadcast::Receiver<SessionEvent>,
}

impl Context {
    pub fn load() -> Result<Self> {
        let manager = SettingsManager::from_env()?;
        let settings = manager.load()?;

        let storage: Arc<dyn KeyValueStore> = Arc::new(
            FileStore::open(manager.storage_path()).context("Failed to open local storage")?,
        );
        let session = SessionManager::connect(&settings.client_config(), storage.clone())?;
        debug!("Using server {}", settings.server_url);
        let events = session.subscribe();

        Ok(Self {
            settings,
            session,
            preferences: Preferences::new(storage),
            events,
        })
    }

    /// Print what happened to the session while the command ran
    pub fn report_session_events(&mut self) {
        loop {
            match self.events.try_recv() {
                Ok(event) => {
                    debug!("Session event: {:?}", event);
                    if let Some(notice) = session_notice(&event) {
                        eprintln!("{}", notice.yellow());
                    }
                }
                Err(broadcast::error::TryRecvError::Lagged(n)) => {
                    debug!("Missed {} session events", n);
                }
                Err(_) => break,
            }
        }
    }

    pub fn api(&self) -> HomeApi {
        self.session.api()
    }

    /// Fail unless the signed-in user may open `route`
    pub async fn guard(&self, route: Route) -> Result<HomeApi> {
        // Surface transport and expiry errors as they are
        self.session.current_user().await?;
        match self.session.authorize(&route).await {
            RouteDecision::Allow => Ok(self.api()),
            RouteDecision::Redirect(_) => Err(ApiError::NotAuthenticated.into()),
            RouteDecision::Deny => Err(ApiError::Forbidden.into()),
        }
    }
}

fn session_notice(event: &SessionEvent) -> Option<String> {
    match event {
        SessionEvent::Expired { redirect } => {
            let next = match redirect {
                Route::Login => "homepanel auth login".to_string(),
                other => other.path(),
            };
            Some(format!(
                "⚠️  Your session expired and has been cleared. Run `{}` to sign in again.",
                next
            ))
        }
        _ => None,
    }
}

pub(crate) fn on_off(on: bool) -> &'static str {
    if on {
        "on"
    } else {
        "off"
    }
}
