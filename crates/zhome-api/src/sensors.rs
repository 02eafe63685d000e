// Sensor endpoints

use serde::Serialize;
use tracing::debug;

use crate::client::HomeClient;
use crate::error::Error;
use crate::models::{AddSensorRequest, AddSensorResponse, RecordId};

impl HomeClient {
    /// Attach a new sensor to a device config.
    ///
    /// `POST /api/home/sensors/add` with
    /// `{"sensor_type", "name", "device_config_id", "sensor_config"}`
    ///
    /// A `200` reply still has to be checked for `success: true`; the
    /// backend reports rejected payloads in-band.
    pub async fn add_sensor<T: Serialize + Sync>(
        &self,
        kind: &str,
        name: &str,
        device_config_id: &RecordId,
        details: &T,
    ) -> Result<AddSensorResponse, Error> {
        let url = self.api_url("home/sensors/add")?;
        debug!(kind, name, %device_config_id, "adding sensor");
        let body = AddSensorRequest {
            sensor_type: kind,
            name,
            device_config_id,
            sensor_config: details,
        };
        self.post(url, &body).await
    }
}
