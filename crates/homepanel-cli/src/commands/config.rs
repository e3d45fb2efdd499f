//! Config command - Manage CLI configuration

use crate::config::{Settings, SettingsManager};
use anyhow::{Context, Result};
use colored::Colorize;

/// Normalize a server URL, rejecting anything that is not http(s)
pub fn normalize_server_url(url: &str) -> Result<String> {
    let url = url.trim().trim_end_matches('/');
    if !url.starts_with("http://") && !url.starts_with("https://") {
        anyhow::bail!(
            "Invalid URL: {}. URL must start with http:// or https://",
            url
        );
    }
    Ok(url.to_string())
}

pub fn set_server(url: &str) -> Result<()> {
    let manager = SettingsManager::from_env()?;
    let mut settings = manager.load().context("Failed to load settings")?;

    settings.server_url = normalize_server_url(url)?;
    manager.save(&settings).context("Failed to save settings")?;

    println!(
        "{} Server URL set to: {}",
        "✓".green(),
        settings.server_url.cyan()
    );
    println!(
        "{}",
        "  Note: tokens from another server stay stored until `homepanel auth logout`."
            .yellow()
            .dimmed()
    );
    Ok(())
}

pub fn set_timeout(secs: u64) -> Result<()> {
    if secs == 0 {
        anyhow::bail!("Timeout must be at least one second");
    }
    let manager = SettingsManager::from_env()?;
    let mut settings = manager.load().context("Failed to load settings")?;

    settings.timeout_secs = secs;
    manager.save(&settings).context("Failed to save settings")?;

    println!("{} Request timeout set to {}s", "✓".green(), secs);
    Ok(())
}

pub fn set_long_lived(enabled: bool) -> Result<()> {
    let manager = SettingsManager::from_env()?;
    let mut settings = manager.load().context("Failed to load settings")?;

    settings.long_lived_login = enabled;
    manager.save(&settings).context("Failed to save settings")?;

    println!(
        "{} Long-lived login {}",
        "✓".green(),
        if enabled { "enabled" } else { "disabled" }
    );
    Ok(())
}

pub fn show() -> Result<()> {
    let manager = SettingsManager::from_env()?;
    let settings = manager.load().context("Failed to load settings")?;

    println!("{}", "Homepanel Configuration".bold().underline());
    println!();
    println!("{}", "Server Settings:".cyan().bold());
    println!("  URL:             {}", settings.server_url);
    println!("  Timeout:         {}s", settings.timeout_secs);
    println!("  Long-lived login: {}", settings.long_lived_login);
    println!();
    println!("{}", "Files:".cyan().bold());
    println!(
        "  Settings: {}",
        manager.settings_path().display().to_string().dimmed()
    );
    println!(
        "  Storage:  {}",
        manager.storage_path().display().to_string().dimmed()
    );
    Ok(())
}

pub fn reset() -> Result<()> {
    let manager = SettingsManager::from_env()?;
    manager.reset()?;

    let defaults = Settings::default();
    println!("{} Configuration reset to defaults", "✓".green());
    println!("  Server URL: {}", defaults.server_url.dimmed());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_server_url() {
        assert_eq!(
            normalize_server_url(" https://panel.lan/ ").unwrap(),
            "https://panel.lan"
        );
        assert!(normalize_server_url("panel.lan").is_err());
        assert!(normalize_server_url("ftp://panel.lan").is_err());
    }
}
