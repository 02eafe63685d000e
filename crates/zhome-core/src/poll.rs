// ── Feed polling ──
//
// One `Poller` per feed (devices, logs). An activation happens on
// mount and whenever the feed's refresh flag changes:
//
//   flag true           → fetch, then replace the list and lower the flag
//   flag false + period → arm a one-shot timer that raises the flag
//   flag false, no period → nothing until the flag changes
//
// Every activation clears the armed timer and bumps a generation
// counter. Fetch results carry the generation they started under and
// are dropped if a newer activation (or retirement) superseded them.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::task::AbortHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use zhome_api::{Device, LogEntry};

use crate::api::HomeApi;
use crate::error::CoreError;
use crate::store::{Action, AppStore, Feed};

/// Proof that a fetch was started by a given activation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    pub feed: Feed,
    pub generation: u64,
}

/// What an activation decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    /// The flag is raised; the caller should fetch and then `complete`.
    Fetch(FetchTicket),
    /// A timer will raise the flag after the polling interval.
    Armed,
    /// Nothing to do until the flag changes.
    Idle,
}

/// Payload of a finished fetch.
#[derive(Debug, Clone, PartialEq)]
pub enum FeedData {
    Devices(Vec<Device>),
    Logs(Vec<LogEntry>),
}

/// What `complete` did with a fetch result.
#[derive(Debug)]
pub enum Completion {
    Applied,
    /// Superseded or retired; the store was not touched.
    Stale,
    /// The fetch failed; the list was kept and the flag lowered.
    Failed(CoreError),
}

pub struct Poller {
    feed: Feed,
    interval: Option<Duration>,
    generation: Arc<AtomicU64>,
    /// Generation of the outstanding fetch, 0 when none.
    in_flight: AtomicU64,
    retired: AtomicBool,
    timer: Mutex<Option<AbortHandle>>,
}

impl Poller {
    pub fn new(feed: Feed, interval: Option<Duration>) -> Self {
        Self {
            feed,
            interval,
            generation: Arc::new(AtomicU64::new(0)),
            in_flight: AtomicU64::new(0),
            retired: AtomicBool::new(false),
            timer: Mutex::new(None),
        }
    }

    pub fn feed(&self) -> Feed {
        self.feed
    }

    pub fn interval(&self) -> Option<Duration> {
        self.interval
    }

    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Whether the latest activation's fetch has not completed yet.
    pub fn is_fetching(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst) != 0
    }

    /// React to a mount or flag change. Must run inside a tokio runtime
    /// when a polling interval is configured.
    pub fn activate(&self, store: &Arc<AppStore>) -> Activation {
        self.disarm();
        if self.retired.load(Ordering::SeqCst) {
            return Activation::Idle;
        }
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let due = store.should_update(self.feed);
        self.in_flight
            .store(if due { generation } else { 0 }, Ordering::SeqCst);

        if due {
            debug!(feed = %self.feed, generation, "fetch due");
            return Activation::Fetch(FetchTicket {
                feed: self.feed,
                generation,
            });
        }

        let Some(interval) = self.interval else {
            return Activation::Idle;
        };

        let feed = self.feed;
        let store = Arc::clone(store);
        let current = Arc::clone(&self.generation);
        let handle = tokio::spawn(async move {
            tokio::time::sleep(interval).await;
            if current.load(Ordering::SeqCst) == generation {
                debug!(%feed, "poll interval elapsed");
                store.dispatch(Action::set_should_update(feed, true));
            }
        });
        *self.lock_timer() = Some(handle.abort_handle());
        debug!(%feed, generation, ?interval, "poll timer armed");
        Activation::Armed
    }

    /// Finish a fetch started by `ticket`.
    ///
    /// The list replacement, selection refresh and flag reset land as one
    /// store update, and the outstanding fetch is released inside that
    /// same update. A driver woken by it therefore never sees the flag
    /// still raised with no fetch outstanding.
    pub fn complete(
        &self,
        store: &AppStore,
        ticket: FetchTicket,
        result: Result<FeedData, CoreError>,
    ) -> Completion {
        let lower = Action::set_should_update(self.feed, false);
        let (actions, failure) = match result {
            Ok(FeedData::Devices(devices)) => {
                let selected = store.snapshot().selected_device.as_ref().map(|d| d.id.clone());
                let fresh = selected.and_then(|id| devices.iter().find(|d| d.id == id).cloned());
                debug!(count = devices.len(), "devices refreshed");
                let mut actions = Vec::with_capacity(3);
                if let Some(device) = fresh {
                    actions.push(Action::SelectDevice(Some(device)));
                }
                actions.push(Action::SetDevices(devices));
                actions.push(lower);
                (actions, None)
            }
            Ok(FeedData::Logs(logs)) => {
                debug!(count = logs.len(), "logs refreshed");
                (vec![Action::SetLogs(logs), lower], None)
            }
            Err(e) => {
                warn!(feed = %self.feed, error = %e, "fetch failed");
                (vec![lower], Some(e))
            }
        };

        let applied = store.dispatch_batch_if(actions, || {
            self.in_flight
                .compare_exchange(ticket.generation, 0, Ordering::SeqCst, Ordering::SeqCst)
                .is_ok()
        });
        if !applied {
            debug!(feed = %ticket.feed, generation = ticket.generation, "discarding stale fetch");
            return Completion::Stale;
        }
        match failure {
            Some(e) => Completion::Failed(e),
            None => Completion::Applied,
        }
    }

    /// Stop for good: clear the timer and invalidate in-flight fetches.
    pub fn retire(&self) {
        self.retired.store(true, Ordering::SeqCst);
        self.in_flight.store(0, Ordering::SeqCst);
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.disarm();
    }

    fn disarm(&self) {
        if let Some(timer) = self.lock_timer().take() {
            timer.abort();
        }
    }

    fn lock_timer(&self) -> std::sync::MutexGuard<'_, Option<AbortHandle>> {
        self.timer.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        self.disarm();
    }
}

/// Fetch the data behind a feed.
pub async fn fetch<A: HomeApi>(api: &A, feed: Feed) -> Result<FeedData, CoreError> {
    match feed {
        Feed::Devices => api.fetch_devices().await.map(FeedData::Devices),
        Feed::Logs => api.fetch_logs().await.map(FeedData::Logs),
    }
}

// ── Driver task ─────────────────────────────────────────────────────

/// Drive a poller from store notifications until cancelled.
///
/// Activates on start, on every change of the feed's flag, and when the
/// flag is raised with no fetch outstanding (a lower-then-raise pair can
/// arrive as a single notification). Fetches run as separate tasks so a
/// slow backend never blocks re-activation.
pub async fn run_poller<A: HomeApi>(
    poller: Arc<Poller>,
    api: Arc<A>,
    store: Arc<AppStore>,
    cancel: CancellationToken,
) {
    let feed = poller.feed();
    let mut rx = store.subscribe();
    let mut last_flag = None;

    loop {
        // Read both under the same borrow so a completion is seen whole.
        let (flag, fetching) = {
            let state = rx.borrow_and_update();
            (state.should_update(feed), poller.is_fetching())
        };
        if last_flag != Some(flag) || (flag && !fetching) {
            let activation = poller.activate(&store);
            // `activate` rereads the flag; remember the value it acted on.
            last_flag = Some(matches!(activation, Activation::Fetch(_)));
            if let Activation::Fetch(ticket) = activation {
                let poller = Arc::clone(&poller);
                let api = Arc::clone(&api);
                let store = Arc::clone(&store);
                let cancel = cancel.clone();
                tokio::spawn(async move {
                    tokio::select! {
                        biased;
                        () = cancel.cancelled() => {}
                        result = fetch(api.as_ref(), ticket.feed) => {
                            poller.complete(&store, ticket, result);
                        }
                    }
                });
            }
        }

        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            changed = rx.changed() => {
                if changed.is_err() {
                    break;
                }
            }
        }
    }

    poller.retire();
    debug!(%feed, "poller stopped");
}
