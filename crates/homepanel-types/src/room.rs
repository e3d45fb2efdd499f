//! Room types

use serde::{Deserialize, Serialize};

/// A room's association with one physical device integration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Controller {
    Ac { device_id: i64 },
    Broadlink { device_id: i64 },
    HueRoom { bridge_id: i64, group_id: String },
}

impl Controller {
    /// Device integration kind, as shown in listings
    pub fn kind(&self) -> &'static str {
        match self {
            Controller::Ac { .. } => "ac",
            Controller::Broadlink { .. } => "broadlink",
            Controller::HueRoom { .. } => "hue_room",
        }
    }
}

impl std::fmt::Display for Controller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Controller::Ac { device_id } => write!(f, "ac #{}", device_id),
            Controller::Broadlink { device_id } => write!(f, "broadlink #{}", device_id),
            Controller::HueRoom {
                bridge_id,
                group_id,
            } => write!(f, "hue bridge #{} group {}", bridge_id, group_id),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub controllers: Vec<Controller>,
}

/// Room creation request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewRoom {
    pub name: String,
    #[serde(default)]
    pub controllers: Vec<Controller>,
}

/// Partial room update
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RoomUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub controllers: Option<Vec<Controller>>,
}
