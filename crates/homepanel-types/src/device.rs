//! Device types for the supported integrations (AC, Broadlink, Hue)

use serde::{Deserialize, Serialize};

/// Air-conditioning operating mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AcMode {
    Auto,
    Cool,
    Heat,
    Dry,
    Fan,
}

impl std::fmt::Display for AcMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AcMode::Auto => write!(f, "auto"),
            AcMode::Cool => write!(f, "cool"),
            AcMode::Heat => write!(f, "heat"),
            AcMode::Dry => write!(f, "dry"),
            AcMode::Fan => write!(f, "fan"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FanSpeed {
    Auto,
    Low,
    Medium,
    High,
}

/// Last known state reported by an AC unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AcState {
    pub power: bool,
    pub mode: AcMode,
    pub temperature: f32,
    pub fan_speed: FanSpeed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AcDevice {
    pub id: i64,
    pub name: String,
    pub ip: String,
    #[serde(default)]
    pub state: Option<AcState>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAcDevice {
    pub name: String,
    pub ip: String,
}

/// Control command sent to an AC unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AcCommand {
    Power { on: bool },
    Temperature { value: f32 },
    Mode { mode: AcMode },
    FanSpeed { speed: FanSpeed },
}

/// Broadlink IR/RF blaster with its learned commands
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BroadlinkDevice {
    pub id: i64,
    pub name: String,
    pub ip: String,
    pub mac: String,
    #[serde(default)]
    pub commands: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewBroadlinkDevice {
    pub name: String,
    pub ip: String,
    pub mac: String,
}

/// Result of probing an address for a Broadlink device
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BroadlinkLookup {
    pub ip: String,
    pub mac: String,
    pub model: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BroadlinkSend {
    pub command: String,
}

/// A group of lights on a Hue bridge (a Hue "room")
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HueGroup {
    pub id: String,
    pub name: String,
    pub on: bool,
    pub brightness: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HueBridge {
    pub id: i64,
    pub name: String,
    pub ip: String,
    #[serde(default)]
    pub groups: Vec<HueGroup>,
}

/// Partial state change for a Hue group
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HueGroupState {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub on: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brightness: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scene: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ac_command_wire_format() {
        let cmd = AcCommand::Mode { mode: AcMode::Cool };
        assert_eq!(
            serde_json::to_value(&cmd).unwrap(),
            serde_json::json!({ "type": "mode", "mode": "cool" })
        );
    }

    #[test]
    fn test_hue_state_skips_unset() {
        let state = HueGroupState {
            on: Some(true),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&state).unwrap(),
            serde_json::json!({ "on": true })
        );
    }
}
