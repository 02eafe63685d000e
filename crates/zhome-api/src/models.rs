// Wire models for the backend's `/api/home/...` endpoints.
//
// Field names follow the JSON the backend and the device firmware
// exchange. Unknown fields are ignored; optional fields default.

use std::fmt;

use serde::{Deserialize, Serialize};

// ── RecordId ────────────────────────────────────────────────────────

/// Identifier of a backend record (device config, log row).
///
/// The backend emits integer primary keys for some tables and string
/// keys for others, so both shapes are accepted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Numeric(i64),
    Text(String),
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Numeric(n) => write!(f, "{n}"),
            Self::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<i64> for RecordId {
    fn from(n: i64) -> Self {
        Self::Numeric(n)
    }
}

impl From<&str> for RecordId {
    fn from(s: &str) -> Self {
        s.parse::<i64>()
            .map_or_else(|_| Self::Text(s.to_owned()), Self::Numeric)
    }
}

// ── Devices ─────────────────────────────────────────────────────────

/// A registered device as returned by `GET /api/home/devices`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Device {
    /// Hardware unique id reported by the firmware (hex string).
    pub id: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub platform: Option<String>,
    #[serde(default)]
    pub device_info: Option<DeviceInfo>,
    pub config: DeviceConfig,
}

/// Home Assistant `device` block announced by the firmware.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceInfo {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub manufacturer: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub identifiers: Option<String>,
    #[serde(default)]
    pub sw_version: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceConfig {
    pub id: RecordId,
    #[serde(default)]
    pub sensors: Vec<SensorEntry>,
    #[serde(default)]
    pub device_settings: Option<DeviceSettings>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceSettings {
    #[serde(default)]
    pub led_on_after_connect: Option<bool>,
    #[serde(default)]
    pub use_ping: Option<bool>,
}

/// One configured sensor inside a device config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorEntry {
    pub sensor_type: String,
    pub name: String,
    #[serde(default)]
    pub sensor_config: Option<serde_json::Value>,
}

// ── Sensors ─────────────────────────────────────────────────────────

/// Body of `POST /api/home/sensors/add`.
#[derive(Debug, Serialize)]
pub struct AddSensorRequest<'a, T: Serialize> {
    pub sensor_type: &'a str,
    pub name: &'a str,
    pub device_config_id: &'a RecordId,
    pub sensor_config: &'a T,
}

/// Reply of `POST /api/home/sensors/add`.
///
/// Only `success` is relied upon; anything else the backend sends is
/// kept in `extra` for display.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AddSensorResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

// ── Logs ────────────────────────────────────────────────────────────

/// A device log line as stored by the backend.
///
/// Devices publish these on `z-home/log/<unit_id>`; the backend
/// persists them and serves them from `GET /api/home/logs`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    #[serde(default)]
    pub id: Option<RecordId>,
    #[serde(default)]
    pub unit_id: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub message: String,
    #[serde(rename = "type", default = "default_log_type")]
    pub log_type: String,
    #[serde(default = "default_log_level")]
    pub level: u8,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default, alias = "created_at")]
    pub timestamp: Option<String>,
}

fn default_log_type() -> String {
    "info".into()
}

fn default_log_level() -> u8 {
    1
}

// ── MQTT ────────────────────────────────────────────────────────────

/// Broker details handed out by `GET /api/mqtt`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MqttDetails {
    #[serde(default)]
    pub port: Option<u16>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}
