// Log endpoints

use tracing::debug;

use crate::client::HomeClient;
use crate::error::Error;
use crate::models::LogEntry;

impl HomeClient {
    /// List device log entries collected by the backend.
    ///
    /// `GET /api/home/logs`
    pub async fn fetch_logs(&self) -> Result<Vec<LogEntry>, Error> {
        let url = self.api_url("home/logs")?;
        debug!("fetching logs");
        self.get(url).await
    }
}
