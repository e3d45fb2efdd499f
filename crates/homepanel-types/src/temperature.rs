//! Room temperature readings

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemperatureReading {
    pub room_id: i64,
    pub celsius: f32,
    #[serde(default)]
    pub humidity: Option<f32>,
    pub recorded_at: DateTime<Utc>,
}
