use super::Context;
use anyhow::Result;
use colored::Colorize;
use homepanel_types::ThemeMode;

pub fn show(ctx: &Context) -> Result<()> {
    println!("Theme: {}", ctx.preferences.theme().to_string().cyan());
    Ok(())
}

pub fn set(ctx: &Context, mode: ThemeMode) -> Result<()> {
    ctx.preferences.set_theme(mode);
    println!("{} Theme set to {}", "✓".green(), mode.to_string().cyan());
    Ok(())
}

pub fn toggle(ctx: &Context) -> Result<()> {
    let mode = ctx.preferences.toggle_theme();
    println!("{} Theme switched to {}", "✓".green(), mode.to_string().cyan());
    Ok(())
}
