//! Air-conditioning commands

use super::{on_off, Context};
use anyhow::Result;
use clap::ValueEnum;
use colored::Colorize;
use homepanel_core::Route;
use homepanel_types::{AcCommand, AcMode, AcState, FanSpeed, NewAcDevice};

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ModeArg {
    Auto,
    Cool,
    Heat,
    Dry,
    Fan,
}

impl From<ModeArg> for AcMode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::Auto => AcMode::Auto,
            ModeArg::Cool => AcMode::Cool,
            ModeArg::Heat => AcMode::Heat,
            ModeArg::Dry => AcMode::Dry,
            ModeArg::Fan => AcMode::Fan,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SpeedArg {
    Auto,
    Low,
    Medium,
    High,
}

impl From<SpeedArg> for FanSpeed {
    fn from(arg: SpeedArg) -> Self {
        match arg {
            SpeedArg::Auto => FanSpeed::Auto,
            SpeedArg::Low => FanSpeed::Low,
            SpeedArg::Medium => FanSpeed::Medium,
            SpeedArg::High => FanSpeed::High,
        }
    }
}

fn describe(state: &AcState) -> String {
    format!(
        "{} {} {:.1}°C fan {:?}",
        on_off(state.power),
        state.mode,
        state.temperature,
        state.fan_speed
    )
    .to_lowercase()
}

pub async fn list(ctx: &Context) -> Result<()> {
    let api = ctx.guard(Route::Devices).await?;
    let devices = api.ac_devices().await?;

    println!("{}", "❄️  AC units".blue().bold());
    println!();
    if devices.is_empty() {
        println!("   (No AC units)");
    }
    for device in devices {
        let state = device
            .state
            .as_ref()
            .map(describe)
            .unwrap_or_else(|| "unknown".into());
        println!(
            "   {} {} {} - {}",
            format!("#{}", device.id).dimmed(),
            device.name.cyan(),
            device.ip.dimmed(),
            state
        );
    }
    Ok(())
}

pub async fn add(ctx: &Context, name: &str, ip: &str) -> Result<()> {
    let api = ctx.guard(Route::Devices).await?;
    let device = api
        .add_ac_device(&NewAcDevice {
            name: name.to_string(),
            ip: ip.to_string(),
        })
        .await?;
    println!("{} Added AC {} (#{})", "✓".green(), device.name.cyan(), device.id);
    Ok(())
}

pub async fn remove(ctx: &Context, id: i64) -> Result<()> {
    let api = ctx.guard(Route::Devices).await?;
    api.remove_ac_device(id).await?;
    println!("{} Removed AC #{}", "✓".green(), id);
    Ok(())
}

/// Send one command and print the state the unit reports back
pub async fn send(ctx: &Context, id: i64, command: AcCommand) -> Result<()> {
    let api = ctx.guard(Route::Rooms).await?;
    let state = api.send_ac_command(id, &command).await?;
    println!("{} AC #{} is now {}", "✓".green(), id, describe(&state).cyan());
    Ok(())
}
