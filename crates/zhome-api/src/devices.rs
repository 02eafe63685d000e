// Device endpoints

use tracing::debug;

use crate::client::HomeClient;
use crate::error::Error;
use crate::models::Device;

impl HomeClient {
    /// List all registered devices with their configs.
    ///
    /// `GET /api/home/devices`
    pub async fn fetch_devices(&self) -> Result<Vec<Device>, Error> {
        let url = self.api_url("home/devices")?;
        debug!("fetching devices");
        self.get(url).await
    }

    /// Fetch a single device by its hardware id.
    ///
    /// `GET /api/home/devices/{id}`
    pub async fn fetch_device(&self, id: &str) -> Result<Device, Error> {
        let url = self.api_url(&format!("home/devices/{id}"))?;
        debug!(id, "fetching device");
        self.get(url).await
    }
}
