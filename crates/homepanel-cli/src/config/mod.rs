//! Configuration management

use anyhow::{Context, Result};
use homepanel_core::config::{DEFAULT_SERVER_URL, DEFAULT_TIMEOUT};
use homepanel_core::ClientConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// CLI settings stored in `settings.toml`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    pub server_url: String,
    pub timeout_secs: u64,
    /// Ask the backend for a long-lived refresh token at login
    pub long_lived_login: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT.as_secs(),
            long_lived_login: false,
        }
    }
}

impl Settings {
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig::new(&self.server_url).with_timeout(Duration::from_secs(self.timeout_secs))
    }
}

pub struct SettingsManager {
    home: PathBuf,
}

impl SettingsManager {
    pub fn new(home: impl Into<PathBuf>) -> Self {
        Self { home: home.into() }
    }

    /// Home directory from `HOMEPANEL_HOME`, or `~/.homepanel`
    pub fn from_env() -> Result<Self> {
        if let Ok(path) = std::env::var("HOMEPANEL_HOME") {
            return Ok(Self::new(path));
        }
        let home = dirs::home_dir().context("Could not find home directory")?;
        Ok(Self::new(home.join(".homepanel")))
    }

    pub fn home(&self) -> &Path {
        &self.home
    }

    pub fn settings_path(&self) -> PathBuf {
        self.home.join("settings.toml")
    }

    /// Session tokens and preferences
    pub fn storage_path(&self) -> PathBuf {
        self.home.join("storage.json")
    }

    /// Defaults, then `settings.toml`, then `HOMEPANEL_*` environment variables
    pub fn load(&self) -> Result<Settings> {
        let defaults = Settings::default();
        let path = self.settings_path();

        let settings = ::config::Config::builder()
            .set_default("server_url", defaults.server_url)?
            .set_default("timeout_secs", defaults.timeout_secs as i64)?
            .set_default("long_lived_login", defaults.long_lived_login)?
            .add_source(
                ::config::File::from(path.as_path())
                    .format(::config::FileFormat::Toml)
                    .required(false),
            )
            .add_source(::config::Environment::with_prefix("HOMEPANEL").try_parsing(true))
            .build()
            .with_context(|| format!("Failed to read settings from {:?}", path))?;

        settings
            .try_deserialize()
            .with_context(|| format!("Failed to parse settings from {:?}", path))
    }

    pub fn save(&self, settings: &Settings) -> Result<()> {
        let path = self.settings_path();

        std::fs::create_dir_all(&self.home)
            .with_context(|| format!("Failed to create directory {:?}", self.home))?;

        let content = toml::to_string_pretty(settings).context("Failed to serialize settings")?;
        std::fs::write(&path, content)
            .with_context(|| format!("Failed to write settings to {:?}", path))?;

        // Owner only
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = std::fs::metadata(&path)?.permissions();
            perms.set_mode(0o600);
            std::fs::set_permissions(&path, perms)?;
        }

        Ok(())
    }

    /// Drop the settings file so defaults apply again
    pub fn reset(&self) -> Result<()> {
        let path = self.settings_path();
        if path.exists() {
            std::fs::remove_file(&path)
                .with_context(|| format!("Failed to remove {:?}", path))?;
        }
        Ok(())
    }
}
