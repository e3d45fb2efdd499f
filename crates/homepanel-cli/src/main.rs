//! Homepanel CLI
//!
//! Command-line client for the homepanel home automation backend.

mod commands;
mod config;

use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use commands::ac::{ModeArg, SpeedArg};
use commands::Context;
use homepanel_core::ApiError;
use homepanel_types::{AcCommand, Controller, HueGroupState, Task, ThemeMode};
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "homepanel")]
#[command(author, version, about = "Homepanel - control rooms, devices and schedules from the terminal", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Authentication management
    Auth {
        #[command(subcommand)]
        action: AuthAction,
    },

    /// Rooms and the controllers attached to them
    Rooms {
        #[command(subcommand)]
        action: RoomAction,
    },

    /// Air-conditioning units
    Ac {
        #[command(subcommand)]
        action: AcAction,
    },

    /// Broadlink IR/RF blasters
    Broadlink {
        #[command(subcommand)]
        action: BroadlinkAction,
    },

    /// Philips Hue bridges and groups
    Hue {
        #[command(subcommand)]
        action: HueAction,
    },

    /// Scheduled jobs
    Jobs {
        #[command(subcommand)]
        action: JobAction,
    },

    /// User administration (admin only)
    Users {
        #[command(subcommand)]
        action: UserAction,
    },

    /// Light or dark output theme
    Theme {
        #[command(subcommand)]
        action: ThemeAction,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum AuthAction {
    /// Login to the homepanel server
    Login {
        /// Username (optional - will prompt if not provided)
        #[arg(short, long)]
        username: Option<String>,
        /// Password (optional - will prompt if not provided)
        #[arg(short, long, env = "HOMEPANEL_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
    /// Logout
    Logout,
    /// Show current user
    Whoami,
    /// Create a new account (admin only)
    Register {
        username: String,
        /// Grant administrator rights
        #[arg(long)]
        admin: bool,
    },
}

#[derive(Subcommand)]
enum RoomAction {
    /// List rooms
    List,
    /// Show a room with its controllers and latest temperature
    Show { id: i64 },
    /// Create a room
    Create { name: String },
    /// Rename a room
    Rename { id: i64, name: String },
    /// Attach a device controller to a room
    Attach {
        id: i64,
        #[command(flatten)]
        controller: ControllerArgs,
    },
    /// Detach a device controller from a room
    Detach {
        id: i64,
        #[command(flatten)]
        controller: ControllerArgs,
    },
    /// Delete a room
    Delete {
        id: i64,
        /// Skip confirmation
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Args)]
#[group(required = true, multiple = false)]
struct ControllerArgs {
    /// AC unit id
    #[arg(long)]
    ac: Option<i64>,
    /// Broadlink device id
    #[arg(long)]
    broadlink: Option<i64>,
    /// Hue group as BRIDGE_ID:GROUP_ID
    #[arg(long, value_name = "BRIDGE:GROUP")]
    hue: Option<String>,
}

impl ControllerArgs {
    fn into_controller(self) -> Result<Controller> {
        match (self.ac, self.broadlink, self.hue) {
            (Some(device_id), None, None) => Ok(Controller::Ac { device_id }),
            (None, Some(device_id), None) => Ok(Controller::Broadlink { device_id }),
            (None, None, Some(hue)) => {
                let (bridge, group) = hue
                    .split_once(':')
                    .ok_or_else(|| anyhow::anyhow!("Expected BRIDGE:GROUP, got '{}'", hue))?;
                Ok(Controller::HueRoom {
                    bridge_id: bridge.trim().parse()?,
                    group_id: group.trim().to_string(),
                })
            }
            _ => anyhow::bail!("Pass exactly one of --ac, --broadlink or --hue"),
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OnOff {
    On,
    Off,
}

impl From<OnOff> for bool {
    fn from(value: OnOff) -> Self {
        matches!(value, OnOff::On)
    }
}

#[derive(Subcommand)]
enum AcAction {
    /// List AC units (admin only)
    List,
    /// Register an AC unit (admin only)
    Add { name: String, ip: String },
    /// Remove an AC unit (admin only)
    Remove { id: i64 },
    /// Switch a unit on or off
    Power { id: i64, state: OnOff },
    /// Set the target temperature in °C
    Temp { id: i64, value: f32 },
    /// Set the operating mode
    Mode { id: i64, mode: ModeArg },
    /// Set the fan speed
    Fan { id: i64, speed: SpeedArg },
}

#[derive(Subcommand)]
enum BroadlinkAction {
    /// List Broadlink devices (admin only)
    List,
    /// Probe an address for a Broadlink device (admin only)
    Lookup { ip: String },
    /// Register a Broadlink device (admin only)
    Add {
        name: String,
        ip: String,
        /// MAC address; looked up from the device when omitted
        #[arg(long)]
        mac: Option<String>,
    },
    /// Remove a Broadlink device (admin only)
    Remove { id: i64 },
    /// Send a learned command
    Send { id: i64, command: String },
}

#[derive(Args)]
struct HueStateArgs {
    /// Switch the group on
    #[arg(long, conflicts_with = "off")]
    on: bool,
    /// Switch the group off
    #[arg(long)]
    off: bool,
    /// Brightness (0-254)
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=254))]
    brightness: Option<u8>,
    /// Scene to recall
    #[arg(long)]
    scene: Option<String>,
}

impl From<HueStateArgs> for HueGroupState {
    fn from(args: HueStateArgs) -> Self {
        let on = match (args.on, args.off) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        };
        HueGroupState {
            on,
            brightness: args.brightness,
            scene: args.scene,
        }
    }
}

#[derive(Subcommand)]
enum HueAction {
    /// List bridges and their groups
    Bridges,
    /// Change a group's state
    Set {
        bridge: i64,
        group: String,
        #[command(flatten)]
        state: HueStateArgs,
    },
}

#[derive(Args)]
struct TriggerArgs {
    /// Five-field cron expression
    #[arg(long, conflicts_with_all = ["every", "at"])]
    cron: Option<String>,
    /// Repeat every N seconds
    #[arg(long, conflicts_with = "at")]
    every: Option<u64>,
    /// Run once at an RFC 3339 date
    #[arg(long)]
    at: Option<String>,
}

#[derive(Subcommand)]
enum JobAction {
    /// List jobs
    List,
    /// Schedule switching an AC unit on or off
    AddPower {
        name: String,
        #[arg(long)]
        device: i64,
        #[arg(long)]
        state: OnOff,
        #[command(flatten)]
        trigger: TriggerArgs,
    },
    /// Schedule an AC temperature change
    AddTemperature {
        name: String,
        #[arg(long)]
        device: i64,
        #[arg(long)]
        temperature: f32,
        #[arg(long)]
        mode: Option<ModeArg>,
        #[command(flatten)]
        trigger: TriggerArgs,
    },
    /// Schedule a Broadlink command
    AddBroadlink {
        name: String,
        #[arg(long)]
        device: i64,
        #[arg(long)]
        command: String,
        #[command(flatten)]
        trigger: TriggerArgs,
    },
    /// Schedule a Hue group change
    AddHue {
        name: String,
        #[arg(long)]
        bridge: i64,
        #[arg(long)]
        group: String,
        #[command(flatten)]
        state: HueStateArgs,
        #[command(flatten)]
        trigger: TriggerArgs,
    },
    /// Resume a paused job
    Enable { id: i64 },
    /// Pause a job
    Disable { id: i64 },
    /// Delete a job
    Delete { id: i64 },
}

#[derive(Subcommand)]
enum UserAction {
    /// List users
    List,
    /// Re-enable a user
    Enable { id: i64 },
    /// Disable a user
    Disable { id: i64 },
    /// Grant or revoke administrator rights
    Role {
        id: i64,
        #[arg(long)]
        admin: bool,
    },
    /// Delete a user
    Delete {
        id: i64,
        /// Skip confirmation
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum ThemeAction {
    /// Show the current theme
    Show,
    /// Set the theme (light or dark)
    Set { mode: ThemeMode },
    /// Switch between light and dark
    Toggle,
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Set the server URL
    SetServer {
        /// Server URL (e.g., https://panel.example.com)
        url: String,
    },
    /// Set the request timeout in seconds
    SetTimeout { secs: u64 },
    /// Request long-lived sessions at login
    SetLongLived { state: OnOff },
    /// Show current configuration
    Show,
    /// Reset to default configuration
    Reset,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(if cli.verbose {
            "homepanel_cli=debug,homepanel_core=debug"
        } else {
            "homepanel_cli=info"
        })
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let result = run(cli.command).await;

    if let Err(ref e) = result {
        error!("Command failed: {:#}", e);
        match e.downcast_ref::<ApiError>() {
            Some(api) => {
                eprintln!("{} {}", "Error:".red().bold(), api.user_message());
                // Expiry is reported from the session events
                if matches!(api, ApiError::NotAuthenticated) {
                    eprintln!("  Run {} to sign in.", "homepanel auth login".cyan());
                }
            }
            None => eprintln!("{} {:#}", "Error:".red().bold(), e),
        }
        std::process::exit(1);
    }

    result
}

async fn run(command: Commands) -> Result<()> {
    // Config commands work without a reachable server
    if let Commands::Config { action } = command {
        return match action {
            ConfigAction::SetServer { url } => commands::config::set_server(&url),
            ConfigAction::SetTimeout { secs } => commands::config::set_timeout(secs),
            ConfigAction::SetLongLived { state } => commands::config::set_long_lived(state.into()),
            ConfigAction::Show => commands::config::show(),
            ConfigAction::Reset => commands::config::reset(),
        };
    }

    let mut ctx = Context::load()?;
    info!("Starting homepanel CLI");

    let result = match command {
        Commands::Auth { action } => match action {
            AuthAction::Login { username, password } => match (username, password) {
                (Some(u), Some(p)) => commands::auth::login_non_interactive(&ctx, &u, &p).await,
                _ => commands::auth::login_interactive(&ctx).await,
            },
            AuthAction::Logout => commands::auth::logout(&ctx).await,
            AuthAction::Whoami => commands::auth::whoami(&ctx).await,
            AuthAction::Register { username, admin } => {
                commands::auth::register(&ctx, &username, admin).await
            }
        },
        Commands::Rooms { action } => match action {
            RoomAction::List => commands::rooms::list(&ctx).await,
            RoomAction::Show { id } => commands::rooms::show(&ctx, id).await,
            RoomAction::Create { name } => commands::rooms::create(&ctx, &name).await,
            RoomAction::Rename { id, name } => commands::rooms::rename(&ctx, id, &name).await,
            RoomAction::Attach { id, controller } => {
                commands::rooms::attach(&ctx, id, controller.into_controller()?).await
            }
            RoomAction::Detach { id, controller } => {
                commands::rooms::detach(&ctx, id, controller.into_controller()?).await
            }
            RoomAction::Delete { id, yes } => commands::rooms::delete(&ctx, id, yes).await,
        },
        Commands::Ac { action } => match action {
            AcAction::List => commands::ac::list(&ctx).await,
            AcAction::Add { name, ip } => commands::ac::add(&ctx, &name, &ip).await,
            AcAction::Remove { id } => commands::ac::remove(&ctx, id).await,
            AcAction::Power { id, state } => {
                commands::ac::send(&ctx, id, AcCommand::Power { on: state.into() }).await
            }
            AcAction::Temp { id, value } => {
                commands::ac::send(&ctx, id, AcCommand::Temperature { value }).await
            }
            AcAction::Mode { id, mode } => {
                commands::ac::send(&ctx, id, AcCommand::Mode { mode: mode.into() }).await
            }
            AcAction::Fan { id, speed } => {
                commands::ac::send(&ctx, id, AcCommand::FanSpeed { speed: speed.into() }).await
            }
        },
        Commands::Broadlink { action } => match action {
            BroadlinkAction::List => commands::broadlink::list(&ctx).await,
            BroadlinkAction::Lookup { ip } => commands::broadlink::lookup(&ctx, &ip).await,
            BroadlinkAction::Add { name, ip, mac } => {
                commands::broadlink::add(&ctx, &name, &ip, mac).await
            }
            BroadlinkAction::Remove { id } => commands::broadlink::remove(&ctx, id).await,
            BroadlinkAction::Send { id, command } => {
                commands::broadlink::send(&ctx, id, &command).await
            }
        },
        Commands::Hue { action } => match action {
            HueAction::Bridges => commands::hue::bridges(&ctx).await,
            HueAction::Set {
                bridge,
                group,
                state,
            } => commands::hue::set(&ctx, bridge, &group, state.into()).await,
        },
        Commands::Jobs { action } => match action {
            JobAction::List => commands::jobs::list(&ctx).await,
            JobAction::AddPower {
                name,
                device,
                state,
                trigger,
            } => {
                let task = Task::AcPower {
                    device_id: device,
                    on: state.into(),
                };
                commands::jobs::add(&ctx, &name, task, trigger.parse()?).await
            }
            JobAction::AddTemperature {
                name,
                device,
                temperature,
                mode,
                trigger,
            } => {
                let task = Task::AcTemperature {
                    device_id: device,
                    temperature,
                    mode: mode.map(Into::into),
                };
                commands::jobs::add(&ctx, &name, task, trigger.parse()?).await
            }
            JobAction::AddBroadlink {
                name,
                device,
                command,
                trigger,
            } => {
                let task = Task::BroadlinkCommand {
                    device_id: device,
                    command,
                };
                commands::jobs::add(&ctx, &name, task, trigger.parse()?).await
            }
            JobAction::AddHue {
                name,
                bridge,
                group,
                state,
                trigger,
            } => {
                let task = Task::HueScene {
                    bridge_id: bridge,
                    group_id: group,
                    state: state.into(),
                };
                commands::jobs::add(&ctx, &name, task, trigger.parse()?).await
            }
            JobAction::Enable { id } => commands::jobs::set_enabled(&ctx, id, true).await,
            JobAction::Disable { id } => commands::jobs::set_enabled(&ctx, id, false).await,
            JobAction::Delete { id } => commands::jobs::delete(&ctx, id).await,
        },
        Commands::Users { action } => match action {
            UserAction::List => commands::users::list(&ctx).await,
            UserAction::Enable { id } => commands::users::set_enabled(&ctx, id, true).await,
            UserAction::Disable { id } => commands::users::set_enabled(&ctx, id, false).await,
            UserAction::Role { id, admin } => commands::users::set_role(&ctx, id, admin).await,
            UserAction::Delete { id, yes } => commands::users::delete(&ctx, id, yes).await,
        },
        Commands::Theme { action } => match action {
            ThemeAction::Show => commands::theme::show(&ctx),
            ThemeAction::Set { mode } => commands::theme::set(&ctx, mode),
            ThemeAction::Toggle => commands::theme::toggle(&ctx),
        },
        Commands::Config { .. } => unreachable!("handled before loading the session"),
    };

    ctx.report_session_events();
    result
}

impl TriggerArgs {
    fn parse(self) -> Result<homepanel_types::Trigger> {
        commands::jobs::parse_trigger(self.cron, self.every, self.at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_controller_args() {
        let hue = ControllerArgs {
            ac: None,
            broadlink: None,
            hue: Some("2:living".into()),
        };
        assert_eq!(
            hue.into_controller().unwrap(),
            Controller::HueRoom {
                bridge_id: 2,
                group_id: "living".into()
            }
        );

        let bad = ControllerArgs {
            ac: None,
            broadlink: None,
            hue: Some("living".into()),
        };
        assert!(bad.into_controller().is_err());
    }

    #[test]
    fn test_hue_flags_map_to_partial_state() {
        let cli = Cli::try_parse_from(["homepanel", "hue", "set", "1", "3", "--off"]).unwrap();
        let Commands::Hue {
            action: HueAction::Set { state, .. },
        } = cli.command
        else {
            panic!("expected hue set");
        };
        assert_eq!(
            HueGroupState::from(state),
            HueGroupState {
                on: Some(false),
                ..Default::default()
            }
        );
    }

    #[test]
    fn test_job_flags_parse() {
        let cli = Cli::try_parse_from([
            "homepanel",
            "jobs",
            "add-power",
            "Morning",
            "--device",
            "4",
            "--state",
            "on",
            "--cron",
            "0 7 * * *",
        ])
        .unwrap();
        assert!(matches!(
            cli.command,
            Commands::Jobs {
                action: JobAction::AddPower { device: 4, .. }
            }
        ));

        assert!(Cli::try_parse_from([
            "homepanel", "jobs", "add-power", "x", "--device", "4", "--state", "on", "--cron",
            "* * * * *", "--every", "60",
        ])
        .is_err());
    }
}
