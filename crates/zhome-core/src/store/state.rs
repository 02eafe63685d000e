// ── Application state ──

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use zhome_api::{Device, LogEntry};

/// Which panel the device details area shows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DetailsView {
    #[default]
    Main,
    AddSensor,
}

/// A collection the pollers keep fresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feed {
    Devices,
    Logs,
}

impl fmt::Display for Feed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Devices => f.write_str("devices"),
            Self::Logs => f.write_str("logs"),
        }
    }
}

/// Everything the console renders from.
///
/// Lists are replaced wholesale; nothing mutates an entry in place.
#[derive(Debug, Clone, PartialEq)]
pub struct AppState {
    pub selected_device: Option<Device>,
    pub devices: Vec<Device>,
    pub logs: Vec<LogEntry>,
    pub should_update_devices: bool,
    pub should_update_logs: bool,
    pub details_view: DetailsView,
    /// Bumped on every dispatch.
    pub revision: u64,
    pub devices_refreshed_at: Option<DateTime<Utc>>,
    pub logs_refreshed_at: Option<DateTime<Utc>>,
}

impl Default for AppState {
    /// Empty lists with both refresh flags raised so the first poller
    /// activation performs the initial load.
    fn default() -> Self {
        Self {
            selected_device: None,
            devices: Vec::new(),
            logs: Vec::new(),
            should_update_devices: true,
            should_update_logs: true,
            details_view: DetailsView::Main,
            revision: 0,
            devices_refreshed_at: None,
            logs_refreshed_at: None,
        }
    }
}

impl AppState {
    /// Refresh flag for a feed.
    pub fn should_update(&self, feed: Feed) -> bool {
        match feed {
            Feed::Devices => self.should_update_devices,
            Feed::Logs => self.should_update_logs,
        }
    }

    pub fn refreshed_at(&self, feed: Feed) -> Option<DateTime<Utc>> {
        match feed {
            Feed::Devices => self.devices_refreshed_at,
            Feed::Logs => self.logs_refreshed_at,
        }
    }

    /// Find a device by hardware id, or by display name ignoring case.
    pub fn find_device(&self, ident: &str) -> Option<&Device> {
        self.devices.iter().find(|d| d.id == ident).or_else(|| {
            self.devices
                .iter()
                .find(|d| d.display_name.eq_ignore_ascii_case(ident))
        })
    }
}
