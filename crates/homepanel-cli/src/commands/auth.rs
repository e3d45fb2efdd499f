//! Authentication commands

use super::Context;
use anyhow::Result;
use colored::Colorize;
use homepanel_core::validation;
use homepanel_core::ApiError;
use homepanel_types::{AccountType, LoginRequest, RegisterRequest};

pub async fn login_interactive(ctx: &Context) -> Result<()> {
    println!("{}", "🔹 Login to Homepanel".blue().bold());
    println!();

    let username: String = dialoguer::Input::new()
        .with_prompt("Username")
        .interact_text()?;

    let password: String = dialoguer::Password::new()
        .with_prompt("Password")
        .interact()?;

    println!();
    println!("{}", "🔐 Authenticating...".dimmed());

    do_login(ctx, &username, &password).await
}

pub async fn login_non_interactive(ctx: &Context, username: &str, password: &str) -> Result<()> {
    println!("{}", "🔹 Login to Homepanel".blue().bold());
    println!();
    println!("   Username: {}", username.dimmed());
    println!("   Password: {}", "********".dimmed());
    println!();
    println!("{}", "🔐 Authenticating...".dimmed());

    do_login(ctx, username, password).await
}

async fn do_login(ctx: &Context, username: &str, password: &str) -> Result<()> {
    let request = LoginRequest {
        username: username.to_string(),
        password: password.to_string(),
        long_lived: ctx.settings.long_lived_login,
    };

    if let Err(e) = ctx.session.login(&request).await {
        anyhow::bail!("Login failed: {}", e.login_failure_message());
    }

    println!();
    println!("{}", "✅ Login successful!".green().bold());
    match ctx.session.current_user().await {
        Ok(user) => {
            println!();
            println!("   Welcome, {}!", user.username.cyan());
        }
        Err(e) => tracing::warn!("Could not load user after login: {}", e),
    }

    Ok(())
}

pub async fn logout(ctx: &Context) -> Result<()> {
    if !ctx.session.is_authenticated() {
        println!("{}", "⚠️  Not logged in".yellow());
        return Ok(());
    }

    ctx.session.logout().await;
    println!("{}", "✅ Logged out successfully".green());
    Ok(())
}

pub async fn whoami(ctx: &Context) -> Result<()> {
    if !ctx.session.is_authenticated() {
        println!("{}", "⚠️  Not logged in".yellow());
        return Ok(());
    }

    match ctx.session.current_user().await {
        Ok(user) => {
            println!("{}", "👤 User Info".blue().bold());
            println!();
            println!("   ID:       {}", user.id.to_string().dimmed());
            println!("   Username: {}", user.username.cyan());
            println!("   Role:     {}", user.account_type);
            if !user.enabled {
                println!("   {}", "Account disabled".red());
            }
        }
        // The expiry notice itself comes from the session events
        Err(ApiError::SessionExpired) => println!("{}", "⚠️  Not logged in".yellow()),
        Err(e) => {
            println!(
                "{}",
                format!("⚠️  Failed to get user info: {}", e.user_message()).yellow()
            );
        }
    }

    Ok(())
}

/// Create an account (admin only)
pub async fn register(ctx: &Context, username: &str, admin: bool) -> Result<()> {
    let password: String = dialoguer::Password::new()
        .with_prompt("Password")
        .interact()?;
    let confirm: String = dialoguer::Password::new()
        .with_prompt("Confirm password")
        .interact()?;
    validation::validate_registration(username, &password, &confirm)?;

    let request = RegisterRequest {
        username: username.to_string(),
        password,
        account_type: if admin {
            AccountType::Admin
        } else {
            AccountType::Default
        },
    };

    let user = ctx.session.register(&request).await.map_err(|e| {
        anyhow::anyhow!("Registration failed: {}", e.user_message())
    })?;
    println!(
        "{} Registered {} ({})",
        "✓".green(),
        user.username.cyan(),
        user.account_type
    );
    Ok(())
}
