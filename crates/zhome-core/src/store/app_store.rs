// ── Store handle ──

use std::sync::Arc;

use tokio::sync::watch;
use tracing::trace;

use super::action::{Action, reduce};
use super::state::{AppState, Feed};

/// Shared handle to the application state.
///
/// Readers take cheap `Arc` snapshots or subscribe for change
/// notification; the only writer is [`dispatch`](Self::dispatch).
pub struct AppStore {
    state: watch::Sender<Arc<AppState>>,
}

impl AppStore {
    pub fn new() -> Self {
        Self::with_state(AppState::default())
    }

    pub fn with_state(state: AppState) -> Self {
        let (tx, _) = watch::channel(Arc::new(state));
        Self { state: tx }
    }

    /// Run the reducer for `action` and notify subscribers.
    pub fn dispatch(&self, action: Action) {
        self.state.send_modify(|current| {
            let state = Arc::make_mut(current);
            trace!(revision = state.revision, ?action, "dispatch");
            reduce(state, action);
            state.revision += 1;
        });
    }

    /// Apply `actions` as a single update with one notification, but
    /// only if `commit` agrees. `commit` runs under the state's write
    /// lock, so subscribers observe its side effects together with the
    /// actions. Returns whether the actions were applied.
    pub fn dispatch_batch_if(&self, actions: Vec<Action>, commit: impl FnOnce() -> bool) -> bool {
        self.state.send_if_modified(|current| {
            if !commit() {
                return false;
            }
            let state = Arc::make_mut(current);
            for action in actions {
                trace!(revision = state.revision, ?action, "dispatch");
                reduce(state, action);
            }
            state.revision += 1;
            true
        })
    }

    /// Point-in-time view of the state.
    pub fn snapshot(&self) -> Arc<AppState> {
        Arc::clone(&self.state.borrow())
    }

    /// Receive a notification after every dispatch.
    pub fn subscribe(&self) -> watch::Receiver<Arc<AppState>> {
        self.state.subscribe()
    }

    pub fn should_update(&self, feed: Feed) -> bool {
        self.state.borrow().should_update(feed)
    }
}

impl Default for AppStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::store::DetailsView;

    #[test]
    fn dispatch_bumps_revision_and_keeps_old_snapshots() {
        let store = AppStore::new();
        let before = store.snapshot();

        store.dispatch(Action::SetDetailsView(DetailsView::AddSensor));

        let after = store.snapshot();
        assert_eq!(before.revision, 0);
        assert_eq!(before.details_view, DetailsView::Main);
        assert_eq!(after.revision, 1);
        assert_eq!(after.details_view, DetailsView::AddSensor);
    }

    #[test]
    fn initial_state_requests_both_feeds() {
        let store = AppStore::new();
        assert!(store.should_update(Feed::Devices));
        assert!(store.should_update(Feed::Logs));
    }

    #[test]
    fn batch_lands_as_one_revision() {
        let store = AppStore::new();
        let applied = store.dispatch_batch_if(
            vec![
                Action::SetDetailsView(DetailsView::AddSensor),
                Action::SetShouldUpdateDevices(false),
            ],
            || true,
        );

        assert!(applied);
        let state = store.snapshot();
        assert_eq!(state.revision, 1);
        assert_eq!(state.details_view, DetailsView::AddSensor);
        assert!(!state.should_update_devices);
    }

    #[test]
    fn refused_batch_leaves_state_alone() {
        let store = AppStore::new();
        let mut rx = store.subscribe();

        let applied = store.dispatch_batch_if(vec![Action::SetShouldUpdateLogs(false)], || false);

        assert!(!applied);
        assert!(!rx.has_changed().unwrap());
        assert_eq!(store.snapshot().revision, 0);
        assert!(store.should_update(Feed::Logs));
    }

    #[tokio::test]
    async fn subscribers_see_dispatches() {
        let store = AppStore::new();
        let mut rx = store.subscribe();

        store.dispatch(Action::SetShouldUpdateLogs(false));

        rx.changed().await.unwrap();
        assert!(!rx.borrow_and_update().should_update_logs);
    }
}
