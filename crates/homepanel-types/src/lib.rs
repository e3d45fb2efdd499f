//! Homepanel Types - Pure type definitions shared by client and CLI
//!
//! This crate contains only data types mirrored from the home-automation
//! backend API, with no async runtime dependencies.

pub mod device;
pub mod room;
pub mod scheduler;
pub mod temperature;
pub mod user;

pub use device::*;
pub use room::*;
pub use scheduler::*;
pub use temperature::*;
pub use user::*;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// UI colour scheme preference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
}

impl ThemeMode {
    pub fn toggled(self) -> Self {
        match self {
            ThemeMode::Light => ThemeMode::Dark,
            ThemeMode::Dark => ThemeMode::Light,
        }
    }
}

impl std::fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ThemeMode::Light => write!(f, "light"),
            ThemeMode::Dark => write!(f, "dark"),
        }
    }
}

#[derive(Debug, Error)]
#[error("unknown theme mode '{0}' (expected 'light' or 'dark')")]
pub struct ParseThemeModeError(String);

impl std::str::FromStr for ThemeMode {
    type Err = ParseThemeModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(ThemeMode::Light),
            "dark" => Ok(ThemeMode::Dark),
            other => Err(ParseThemeModeError(other.to_string())),
        }
    }
}
