//! Broadlink blaster commands

use super::Context;
use anyhow::Result;
use colored::Colorize;
use homepanel_core::Route;
use homepanel_types::NewBroadlinkDevice;

pub async fn list(ctx: &Context) -> Result<()> {
    let api = ctx.guard(Route::Devices).await?;
    let devices = api.broadlink_devices().await?;

    println!("{}", "📡 Broadlink devices".blue().bold());
    println!();
    if devices.is_empty() {
        println!("   (No Broadlink devices)");
    }
    for device in devices {
        println!(
            "   {} {} {} {}",
            format!("#{}", device.id).dimmed(),
            device.name.cyan(),
            device.ip.dimmed(),
            device.mac.dimmed()
        );
        if !device.commands.is_empty() {
            println!("      commands: {}", device.commands.join(", "));
        }
    }
    Ok(())
}

pub async fn lookup(ctx: &Context, ip: &str) -> Result<()> {
    let api = ctx.guard(Route::Devices).await?;
    let found = api.lookup_broadlink(ip).await?;
    println!(
        "{} Found {} at {} (MAC {})",
        "✓".green(),
        found.model.cyan(),
        found.ip,
        found.mac
    );
    Ok(())
}

/// Register a blaster; with no MAC the address is probed first
pub async fn add(ctx: &Context, name: &str, ip: &str, mac: Option<String>) -> Result<()> {
    let api = ctx.guard(Route::Devices).await?;
    let mac = match mac {
        Some(mac) => mac,
        None => api.lookup_broadlink(ip).await?.mac,
    };

    let device = api
        .add_broadlink_device(&NewBroadlinkDevice {
            name: name.to_string(),
            ip: ip.to_string(),
            mac,
        })
        .await?;
    println!(
        "{} Added Broadlink {} (#{})",
        "✓".green(),
        device.name.cyan(),
        device.id
    );
    Ok(())
}

pub async fn remove(ctx: &Context, id: i64) -> Result<()> {
    let api = ctx.guard(Route::Devices).await?;
    api.remove_broadlink_device(id).await?;
    println!("{} Removed Broadlink #{}", "✓".green(), id);
    Ok(())
}

pub async fn send(ctx: &Context, id: i64, command: &str) -> Result<()> {
    let api = ctx.guard(Route::Rooms).await?;
    api.send_broadlink_command(id, command).await?;
    println!("{} Sent '{}' via Broadlink #{}", "✓".green(), command, id);
    Ok(())
}
