// ── Backend seam ──
//
// The subset of backend operations the forms and pollers depend on.
// `HomeClient` is the production implementation; tests substitute an
// in-memory fake.

use std::future::Future;

use serde_json::Value;
use zhome_api::{AddSensorResponse, Device, HomeClient, LogEntry, RecordId};

use crate::error::CoreError;
use crate::kind::SensorKind;

/// Backend operations used by the console.
pub trait HomeApi: Send + Sync + 'static {
    /// Submit a sensor configuration to a device config.
    fn add_sensor(
        &self,
        kind: SensorKind,
        name: &str,
        device_config_id: &RecordId,
        details: &Value,
    ) -> impl Future<Output = Result<AddSensorResponse, CoreError>> + Send;

    fn fetch_devices(&self) -> impl Future<Output = Result<Vec<Device>, CoreError>> + Send;

    fn fetch_logs(&self) -> impl Future<Output = Result<Vec<LogEntry>, CoreError>> + Send;
}

impl HomeApi for HomeClient {
    async fn add_sensor(
        &self,
        kind: SensorKind,
        name: &str,
        device_config_id: &RecordId,
        details: &Value,
    ) -> Result<AddSensorResponse, CoreError> {
        Ok(HomeClient::add_sensor(self, kind.as_wire(), name, device_config_id, details).await?)
    }

    async fn fetch_devices(&self) -> Result<Vec<Device>, CoreError> {
        Ok(HomeClient::fetch_devices(self).await?)
    }

    async fn fetch_logs(&self) -> Result<Vec<LogEntry>, CoreError> {
        Ok(HomeClient::fetch_logs(self).await?)
    }
}
