//! Scheduler job types
//!
//! Trigger semantics belong to the backend; the client only mirrors the
//! shapes so that jobs can be listed, created and toggled.

use crate::device::{AcMode, HueGroupState};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What a job does when it fires
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Task {
    AcPower {
        device_id: i64,
        on: bool,
    },
    AcTemperature {
        device_id: i64,
        temperature: f32,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        mode: Option<AcMode>,
    },
    BroadlinkCommand {
        device_id: i64,
        command: String,
    },
    HueScene {
        bridge_id: i64,
        group_id: String,
        state: HueGroupState,
    },
}

impl std::fmt::Display for Task {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Task::AcPower { device_id, on } => {
                write!(f, "ac #{} power {}", device_id, if *on { "on" } else { "off" })
            }
            Task::AcTemperature {
                device_id,
                temperature,
                ..
            } => write!(f, "ac #{} set {:.1}°C", device_id, temperature),
            Task::BroadlinkCommand { device_id, command } => {
                write!(f, "broadlink #{} send '{}'", device_id, command)
            }
            Task::HueScene {
                bridge_id,
                group_id,
                ..
            } => write!(f, "hue bridge #{} group {}", bridge_id, group_id),
        }
    }
}

/// When a job fires
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Trigger {
    /// Five-field cron expression
    Cron { expression: String },
    Interval { seconds: u64 },
    Date { run_at: DateTime<Utc> },
}

impl std::fmt::Display for Trigger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Trigger::Cron { expression } => write!(f, "cron '{}'", expression),
            Trigger::Interval { seconds } => write!(f, "every {}s", seconds),
            Trigger::Date { run_at } => write!(f, "once at {}", run_at.format("%Y-%m-%d %H:%M")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: i64,
    pub name: String,
    pub enabled: bool,
    pub task: Task,
    pub trigger: Trigger,
    #[serde(default)]
    pub next_run: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewJob {
    pub name: String,
    pub task: Task,
    pub trigger: Trigger,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JobUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
}
