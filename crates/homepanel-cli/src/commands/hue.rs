//! Philips Hue commands

use super::{on_off, Context};
use anyhow::Result;
use colored::Colorize;
use homepanel_core::Route;
use homepanel_types::HueGroupState;

pub async fn bridges(ctx: &Context) -> Result<()> {
    let api = ctx.guard(Route::Rooms).await?;
    let bridges = api.hue_bridges().await?;

    println!("{}", "💡 Hue bridges".blue().bold());
    println!();
    if bridges.is_empty() {
        println!("   (No bridges)");
    }
    for bridge in bridges {
        println!(
            "   {} {} {}",
            format!("#{}", bridge.id).dimmed(),
            bridge.name.cyan(),
            bridge.ip.dimmed()
        );
        for group in &bridge.groups {
            println!(
                "      group {} {} - {} {}%",
                group.id,
                group.name,
                on_off(group.on),
                (u32::from(group.brightness) * 100 / 254)
            );
        }
    }
    Ok(())
}

pub async fn set(ctx: &Context, bridge_id: i64, group_id: &str, state: HueGroupState) -> Result<()> {
    if state == HueGroupState::default() {
        anyhow::bail!("Nothing to change: pass --on, --off, --brightness or --scene");
    }

    let api = ctx.guard(Route::Rooms).await?;
    let group = api.set_hue_group(bridge_id, group_id, &state).await?;
    println!(
        "{} {} is {} at brightness {}",
        "✓".green(),
        group.name.cyan(),
        on_off(group.on),
        group.brightness
    );
    Ok(())
}
