// zhome-api: Async Rust client for the zhome home-automation backend

pub mod client;
pub mod devices;
pub mod error;
pub mod logs;
pub mod models;
pub mod sensors;
pub mod system;
pub mod transport;

pub use client::HomeClient;
pub use error::Error;
pub use models::{
    AddSensorRequest, AddSensorResponse, Device, DeviceConfig, DeviceInfo, DeviceSettings,
    LogEntry, MqttDetails, RecordId, SensorEntry,
};
pub use transport::TransportConfig;
