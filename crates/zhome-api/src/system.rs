// Backend-level endpoints

use tracing::debug;

use crate::client::HomeClient;
use crate::error::Error;
use crate::models::MqttDetails;

impl HomeClient {
    /// Broker connection details the backend hands out to devices.
    ///
    /// `GET /api/mqtt`
    pub async fn fetch_mqtt_details(&self) -> Result<MqttDetails, Error> {
        let url = self.api_url("mqtt")?;
        debug!("fetching mqtt details");
        self.get(url).await
    }
}
