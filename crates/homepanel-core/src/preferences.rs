//! Persisted UI preferences

use crate::ports::KeyValueStore;
use homepanel_types::ThemeMode;
use std::sync::Arc;
use tracing::warn;

pub const THEME_KEY: &str = "theme_mode";

#[derive(Clone)]
pub struct Preferences {
    storage: Arc<dyn KeyValueStore>,
}

impl Preferences {
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        Self { storage }
    }

    /// Stored theme, or the default when unset or unreadable
    pub fn theme(&self) -> ThemeMode {
        match self.storage.get(THEME_KEY) {
            Some(raw) => raw.parse().unwrap_or_else(|e| {
                warn!("Ignoring stored theme: {}", e);
                ThemeMode::default()
            }),
            None => ThemeMode::default(),
        }
    }

    pub fn set_theme(&self, mode: ThemeMode) {
        self.storage.set(THEME_KEY, &mode.to_string());
    }

    pub fn toggle_theme(&self) -> ThemeMode {
        let next = self.theme().toggled();
        self.set_theme(next);
        next
    }
}
