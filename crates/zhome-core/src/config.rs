// ── Runtime console configuration ──
//
// Describes *where* the backend lives and how often to poll it.
// Never touches disk: the CLI builds a `ConsoleConfig` from its
// profile and hands it in.

use std::time::Duration;

use url::Url;

use crate::topics::SlugMode;

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration for a console session against one backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleConfig {
    /// Backend root (e.g. `http://homeserver.local:5000`).
    pub url: Url,
    /// Request timeout.
    pub timeout: Duration,
    /// Device list polling interval. `None` = refresh only on demand.
    pub device_poll: Option<Duration>,
    /// Log list polling interval. `None` = refresh only on demand.
    pub log_poll: Option<Duration>,
    /// How sensor and device names become topic segments.
    pub slug_mode: SlugMode,
}

impl ConsoleConfig {
    /// Config with the default timeout, no polling and the default slug mode.
    pub fn new(url: Url) -> Self {
        Self {
            url,
            timeout: DEFAULT_TIMEOUT,
            device_poll: None,
            log_poll: None,
            slug_mode: SlugMode::default(),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set both polling intervals. Zero disables polling for that feed.
    pub fn with_polling(mut self, devices: Duration, logs: Duration) -> Self {
        self.device_poll = (!devices.is_zero()).then_some(devices);
        self.log_poll = (!logs.is_zero()).then_some(logs);
        self
    }

    pub fn with_slug_mode(mut self, mode: SlugMode) -> Self {
        self.slug_mode = mode;
        self
    }
}
