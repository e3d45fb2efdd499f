//! User administration commands

use super::Context;
use anyhow::Result;
use colored::Colorize;
use homepanel_types::{AccountType, UserUpdate};

pub async fn list(ctx: &Context) -> Result<()> {
    ctx.session.require_admin().await?;
    let users = ctx.api().users().await?;

    println!("{}", "👥 Users".blue().bold());
    println!();
    for user in users {
        let status = if user.enabled {
            "✓".green()
        } else {
            "✗".red()
        };
        println!(
            "   {} {} {} ({})",
            status,
            format!("#{}", user.id).dimmed(),
            user.username.cyan(),
            user.account_type
        );
    }
    Ok(())
}

pub async fn set_enabled(ctx: &Context, id: i64, enabled: bool) -> Result<()> {
    let me = ctx.session.require_admin().await?;
    if me.id == id && !enabled {
        anyhow::bail!("Refusing to disable your own account");
    }

    let user = ctx.api().set_user_enabled(id, enabled).await?;
    println!(
        "{} {} {}",
        "✓".green(),
        user.username.cyan(),
        if user.enabled { "enabled" } else { "disabled" }
    );
    Ok(())
}

pub async fn set_role(ctx: &Context, id: i64, admin: bool) -> Result<()> {
    ctx.session.require_admin().await?;
    let update = UserUpdate {
        account_type: Some(if admin {
            AccountType::Admin
        } else {
            AccountType::Default
        }),
        ..Default::default()
    };

    let user = ctx.api().update_user(id, &update).await?;
    println!(
        "{} {} is now {}",
        "✓".green(),
        user.username.cyan(),
        user.account_type
    );
    Ok(())
}

pub async fn delete(ctx: &Context, id: i64, yes: bool) -> Result<()> {
    let me = ctx.session.require_admin().await?;
    if me.id == id {
        anyhow::bail!("Refusing to delete your own account");
    }
    if !yes
        && !dialoguer::Confirm::new()
            .with_prompt(format!("Delete user #{}?", id))
            .default(false)
            .interact()?
    {
        return Ok(());
    }

    ctx.api().delete_user(id).await?;
    println!("{} Deleted user #{}", "✓".green(), id);
    Ok(())
}
