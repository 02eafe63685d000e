// ── Console facade ──
//
// Owns the store, the backend handle and the two pollers. Consumers
// either `start()` the background pollers (watch views) or drive a
// single refresh cycle with `refresh_once()` (one-shot commands).

use std::sync::Arc;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};
use zhome_api::{Device, HomeClient, TransportConfig};

use crate::api::HomeApi;
use crate::config::ConsoleConfig;
use crate::error::CoreError;
use crate::poll::{Activation, Completion, Poller, fetch, run_poller};
use crate::selector::AddSensorView;
use crate::store::{Action, AppState, AppStore, DetailsView, Feed};

/// Entry point for consumers. Cheaply cloneable.
pub struct Console<A: HomeApi> {
    inner: Arc<ConsoleInner<A>>,
}

impl<A: HomeApi> Clone for Console<A> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

struct ConsoleInner<A> {
    config: ConsoleConfig,
    api: Arc<A>,
    store: Arc<AppStore>,
    devices: Arc<Poller>,
    logs: Arc<Poller>,
    cancel: CancellationToken,
    task_handles: Mutex<Vec<JoinHandle<()>>>,
}

impl Console<HomeClient> {
    /// Build a console talking HTTP to `config.url`.
    pub fn connect(config: ConsoleConfig) -> Result<Self, CoreError> {
        let transport = TransportConfig::default().with_timeout(config.timeout);
        let client = HomeClient::new(config.url.clone(), &transport)?;
        Ok(Self::with_api(config, client))
    }
}

impl<A: HomeApi> Console<A> {
    pub fn with_api(config: ConsoleConfig, api: A) -> Self {
        let devices = Arc::new(Poller::new(Feed::Devices, config.device_poll));
        let logs = Arc::new(Poller::new(Feed::Logs, config.log_poll));
        Self {
            inner: Arc::new(ConsoleInner {
                config,
                api: Arc::new(api),
                store: Arc::new(AppStore::new()),
                devices,
                logs,
                cancel: CancellationToken::new(),
                task_handles: Mutex::new(Vec::new()),
            }),
        }
    }

    pub fn config(&self) -> &ConsoleConfig {
        &self.inner.config
    }

    pub fn api(&self) -> &A {
        &self.inner.api
    }

    pub fn store(&self) -> &Arc<AppStore> {
        &self.inner.store
    }

    pub fn snapshot(&self) -> Arc<AppState> {
        self.inner.store.snapshot()
    }

    fn poller(&self, feed: Feed) -> &Arc<Poller> {
        match feed {
            Feed::Devices => &self.inner.devices,
            Feed::Logs => &self.inner.logs,
        }
    }

    // ── Lifecycle ────────────────────────────────────────────────

    /// Spawn the background pollers. Both flags start raised, so the
    /// first activation loads each list.
    pub async fn start(&self) {
        let mut handles = self.inner.task_handles.lock().await;
        if !handles.is_empty() {
            return;
        }
        for feed in [Feed::Devices, Feed::Logs] {
            handles.push(tokio::spawn(run_poller(
                Arc::clone(self.poller(feed)),
                Arc::clone(&self.inner.api),
                Arc::clone(&self.inner.store),
                self.inner.cancel.clone(),
            )));
        }
        info!(url = %self.inner.config.url, "console started");
    }

    /// Cancel background tasks and retire the pollers.
    pub async fn shutdown(&self) {
        self.inner.cancel.cancel();

        let mut handles = self.inner.task_handles.lock().await;
        for handle in handles.drain(..) {
            let _ = handle.await;
        }
        self.inner.devices.retire();
        self.inner.logs.retire();
        debug!("console stopped");
    }

    /// Raise a feed's flag so its poller refetches.
    pub fn request_refresh(&self, feed: Feed) {
        self.inner.store.dispatch(Action::set_should_update(feed, true));
    }

    /// Run one fetch cycle for `feed` in the caller's task.
    ///
    /// Meant for one-shot use without `start()`; the fetch error is
    /// returned as well as logged.
    pub async fn refresh_once(&self, feed: Feed) -> Result<(), CoreError> {
        self.request_refresh(feed);
        let poller = self.poller(feed);
        let Activation::Fetch(ticket) = poller.activate(&self.inner.store) else {
            return Err(CoreError::Internal(format!("{feed} poller is retired")));
        };
        let result = fetch(self.inner.api.as_ref(), feed).await;
        match poller.complete(&self.inner.store, ticket, result) {
            Completion::Applied => Ok(()),
            Completion::Failed(e) => Err(e),
            Completion::Stale => Err(CoreError::Internal(format!(
                "{feed} refresh was superseded"
            ))),
        }
    }

    // ── Selection ────────────────────────────────────────────────

    /// Select a device by hardware id or display name from the
    /// current device list.
    pub fn select_device(&self, ident: &str) -> Result<Device, CoreError> {
        let device = self
            .snapshot()
            .find_device(ident)
            .cloned()
            .ok_or_else(|| CoreError::DeviceNotFound {
                identifier: ident.to_owned(),
            })?;
        self.inner
            .store
            .dispatch(Action::SelectDevice(Some(device.clone())));
        Ok(device)
    }

    /// Open the add-sensor panel for the selected device.
    pub fn open_add_sensor(&self) -> Result<AddSensorView, CoreError> {
        let state = self.snapshot();
        let device = state
            .selected_device
            .as_ref()
            .ok_or(CoreError::NoDeviceSelected)?;
        self.inner
            .store
            .dispatch(Action::SetDetailsView(DetailsView::AddSensor));
        Ok(AddSensorView::new(device, self.inner.config.slug_mode))
    }
}
