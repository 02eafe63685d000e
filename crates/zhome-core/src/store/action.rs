// ── Actions and reducer ──

use chrono::Utc;
use zhome_api::{Device, LogEntry};

use super::state::{AppState, DetailsView, Feed};

/// Every state transition the console can make.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    SelectDevice(Option<Device>),
    SetDevices(Vec<Device>),
    SetShouldUpdateDevices(bool),
    SetLogs(Vec<LogEntry>),
    SetShouldUpdateLogs(bool),
    SetDetailsView(DetailsView),
}

impl Action {
    /// The flag-setting action for a feed.
    pub fn set_should_update(feed: Feed, value: bool) -> Self {
        match feed {
            Feed::Devices => Self::SetShouldUpdateDevices(value),
            Feed::Logs => Self::SetShouldUpdateLogs(value),
        }
    }
}

/// Apply an action. Each action replaces exactly one field (plus the
/// refresh timestamp for list replacements); the caller bumps the
/// revision.
pub fn reduce(state: &mut AppState, action: Action) {
    match action {
        Action::SelectDevice(device) => state.selected_device = device,
        Action::SetDevices(devices) => {
            state.devices = devices;
            state.devices_refreshed_at = Some(Utc::now());
        }
        Action::SetShouldUpdateDevices(flag) => state.should_update_devices = flag,
        Action::SetLogs(logs) => {
            state.logs = logs;
            state.logs_refreshed_at = Some(Utc::now());
        }
        Action::SetShouldUpdateLogs(flag) => state.should_update_logs = flag,
        Action::SetDetailsView(view) => state.details_view = view,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fake::device;

    #[test]
    fn set_devices_replaces_list_and_stamps_refresh() {
        let mut state = AppState::default();
        reduce(&mut state, Action::SetDevices(vec![device("a", "Hall")]));
        reduce(&mut state, Action::SetDevices(vec![device("b", "Attic")]));

        assert_eq!(state.devices.len(), 1);
        assert_eq!(state.devices[0].id, "b");
        assert!(state.refreshed_at(Feed::Devices).is_some());
        assert!(state.refreshed_at(Feed::Logs).is_none());
    }

    #[test]
    fn flags_are_independent() {
        let mut state = AppState::default();
        reduce(&mut state, Action::set_should_update(Feed::Logs, false));
        assert!(state.should_update(Feed::Devices));
        assert!(!state.should_update(Feed::Logs));
    }

    #[test]
    fn details_view_and_selection() {
        let mut state = AppState::default();
        reduce(&mut state, Action::SetDetailsView(DetailsView::AddSensor));
        reduce(&mut state, Action::SelectDevice(Some(device("a", "Hall"))));
        assert_eq!(state.details_view, DetailsView::AddSensor);
        assert_eq!(state.selected_device.as_ref().map(|d| d.id.as_str()), Some("a"));

        reduce(&mut state, Action::SelectDevice(None));
        assert!(state.selected_device.is_none());
    }
}
