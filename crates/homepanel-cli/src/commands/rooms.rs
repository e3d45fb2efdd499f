//! Room commands

use super::Context;
use anyhow::Result;
use colored::Colorize;
use homepanel_core::Route;
use homepanel_types::{Controller, NewRoom, RoomUpdate};

pub async fn list(ctx: &Context) -> Result<()> {
    let api = ctx.guard(Route::Rooms).await?;
    let rooms = api.rooms().await?;

    println!("{}", "🏠 Rooms".blue().bold());
    println!();
    if rooms.is_empty() {
        println!("   (No rooms)");
    }
    for room in rooms {
        println!(
            "   {} {} ({} controllers)",
            format!("#{}", room.id).dimmed(),
            room.name.cyan(),
            room.controllers.len()
        );
    }
    Ok(())
}

pub async fn show(ctx: &Context, id: i64) -> Result<()> {
    let api = ctx.guard(Route::Room(id)).await?;
    let room = api.room(id).await?;

    println!("{}", room.name.blue().bold());
    println!();
    if room.controllers.is_empty() {
        println!("   (No controllers)");
    }
    for controller in &room.controllers {
        println!("   • {}", controller);
    }

    // Rooms without a sensor have no readings
    match api.temperature(id).await {
        Ok(readings) => {
            if let Some(last) = readings.last() {
                print!("\n   🌡  {:.1}°C", last.celsius);
                if let Some(humidity) = last.humidity {
                    print!("  💧 {:.0}%", humidity);
                }
                println!(
                    "  {}",
                    last.recorded_at.format("%Y-%m-%d %H:%M").to_string().dimmed()
                );
            }
        }
        Err(e) => tracing::debug!("No temperature for room {}: {}", id, e),
    }
    Ok(())
}

pub async fn create(ctx: &Context, name: &str) -> Result<()> {
    let api = ctx.guard(Route::Rooms).await?;
    let room = api
        .create_room(&NewRoom {
            name: name.to_string(),
            controllers: vec![],
        })
        .await?;
    println!("{} Created room {} (#{})", "✓".green(), room.name.cyan(), room.id);
    Ok(())
}

pub async fn rename(ctx: &Context, id: i64, name: &str) -> Result<()> {
    let api = ctx.guard(Route::Room(id)).await?;
    let room = api
        .update_room(
            id,
            &RoomUpdate {
                name: Some(name.to_string()),
                ..Default::default()
            },
        )
        .await?;
    println!("{} Renamed room #{} to {}", "✓".green(), room.id, room.name.cyan());
    Ok(())
}

/// Attach a controller to a room, keeping the existing ones
pub async fn attach(ctx: &Context, id: i64, controller: Controller) -> Result<()> {
    let api = ctx.guard(Route::Room(id)).await?;
    let mut controllers = api.room(id).await?.controllers;
    if controllers.contains(&controller) {
        println!("{}", format!("⚠️  {} is already attached", controller).yellow());
        return Ok(());
    }
    controllers.push(controller.clone());

    api.update_room(
        id,
        &RoomUpdate {
            controllers: Some(controllers),
            ..Default::default()
        },
    )
    .await?;
    println!("{} Attached {} to room #{}", "✓".green(), controller, id);
    Ok(())
}

pub async fn detach(ctx: &Context, id: i64, controller: Controller) -> Result<()> {
    let api = ctx.guard(Route::Room(id)).await?;
    let mut controllers = api.room(id).await?.controllers;
    let before = controllers.len();
    controllers.retain(|c| c != &controller);
    if controllers.len() == before {
        anyhow::bail!("{} is not attached to room #{}", controller, id);
    }

    api.update_room(
        id,
        &RoomUpdate {
            controllers: Some(controllers),
            ..Default::default()
        },
    )
    .await?;
    println!("{} Detached {} from room #{}", "✓".green(), controller, id);
    Ok(())
}

pub async fn delete(ctx: &Context, id: i64, yes: bool) -> Result<()> {
    let api = ctx.guard(Route::Room(id)).await?;
    if !yes
        && !dialoguer::Confirm::new()
            .with_prompt(format!("Delete room #{}?", id))
            .default(false)
            .interact()?
    {
        return Ok(());
    }
    api.delete_room(id).await?;
    println!("{} Deleted room #{}", "✓".green(), id);
    Ok(())
}
