// ── Add-sensor selector ──
//
// The details panel shown while adding a sensor: a kind menu until a
// kind is chosen, then exactly one form for that kind.

use std::fmt;

use zhome_api::Device;

use crate::api::HomeApi;
use crate::form::{FormContext, FormHooks, SensorForm, SubmitOutcome};
use crate::kind::SensorKind;
use crate::store::{Action, AppStore, DetailsView};
use crate::topics::SlugMode;

/// One entry of the kind menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuEntry {
    Sensor(SensorKind),
    Cancel,
}

impl fmt::Display for MenuEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sensor(kind) => f.write_str(kind.label()),
            Self::Cancel => f.write_str("Cancel"),
        }
    }
}

/// Selector state for one device.
#[derive(Debug, Clone)]
pub struct AddSensorView {
    context: FormContext,
    form: Option<SensorForm>,
}

impl AddSensorView {
    pub fn new(device: &Device, slug_mode: SlugMode) -> Self {
        Self {
            context: FormContext {
                device_name: device.display_name.clone(),
                device_config_id: device.config.id.clone(),
                slug_mode,
            },
            form: None,
        }
    }

    /// Menu shown while no kind is chosen: every kind, then Cancel.
    pub fn menu() -> Vec<MenuEntry> {
        SensorKind::all()
            .into_iter()
            .map(MenuEntry::Sensor)
            .chain(std::iter::once(MenuEntry::Cancel))
            .collect()
    }

    pub fn context(&self) -> &FormContext {
        &self.context
    }

    pub fn chosen(&self) -> Option<SensorKind> {
        self.form.as_ref().map(SensorForm::kind)
    }

    /// Mount the form for `kind`, replacing any mounted form.
    pub fn choose(&mut self, kind: SensorKind) -> &mut SensorForm {
        self.form.insert(SensorForm::new(kind, self.context.clone()))
    }

    pub fn form(&self) -> Option<&SensorForm> {
        self.form.as_ref()
    }

    pub fn form_mut(&mut self) -> Option<&mut SensorForm> {
        self.form.as_mut()
    }

    /// Apply a menu pick. Returns the mounted form, or `None` after Cancel.
    pub fn pick(&mut self, entry: MenuEntry, store: &AppStore) -> Option<&mut SensorForm> {
        match entry {
            MenuEntry::Sensor(kind) => Some(self.choose(kind)),
            MenuEntry::Cancel => {
                self.cancel(store);
                None
            }
        }
    }

    /// Drop the form and return the details panel to the main view.
    pub fn cancel(&mut self, store: &AppStore) {
        self.form = None;
        store.dispatch(Action::SetDetailsView(DetailsView::Main));
    }

    /// Submit the mounted form, wiring its hooks to the store: a save
    /// requests a device refresh and, when `close_on_save` is set,
    /// returns the details panel to the main view.
    ///
    /// Returns `None` when no kind has been chosen.
    pub async fn submit<A: HomeApi>(
        &mut self,
        api: &A,
        store: &AppStore,
        close_on_save: bool,
    ) -> Option<SubmitOutcome> {
        let form = self.form.as_mut()?;
        let refresh = || store.dispatch(Action::SetShouldUpdateDevices(true));
        let close = || store.dispatch(Action::SetDetailsView(DetailsView::Main));
        let hooks = FormHooks {
            refresh: &refresh,
            close: close_on_save.then_some(&close as &(dyn Fn() + Send + Sync)),
        };
        Some(form.submit(api, &hooks).await)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::api::fake::{FakeApi, device};
    use crate::form::{Field, FormPhase};
    use zhome_api::RecordId;

    fn view() -> AddSensorView {
        AddSensorView::new(&device("e661", "Living Room"), SlugMode::FirstSpace)
    }

    #[test]
    fn menu_lists_kinds_then_cancel() {
        let labels: Vec<String> = AddSensorView::menu().iter().map(ToString::to_string).collect();
        assert_eq!(
            labels,
            ["Motion Sensor", "Weather Sensor", "LED Dimmer", "Fan", "Button", "Cancel"]
        );
    }

    #[test]
    fn starts_without_a_form() {
        let view = view();
        assert!(view.chosen().is_none());
        assert!(view.form().is_none());
        assert_eq!(view.context().device_config_id, RecordId::Numeric(3));
        assert_eq!(view.context().device_name, "Living Room");
    }

    #[test]
    fn choosing_mounts_exactly_one_form() {
        let mut view = view();
        view.choose(SensorKind::Fan);
        view.choose(SensorKind::Led);
        assert_eq!(view.chosen(), Some(SensorKind::Led));
        assert_eq!(view.form().unwrap().kind(), SensorKind::Led);
    }

    #[test]
    fn cancel_returns_to_main_view() {
        let store = AppStore::new();
        store.dispatch(Action::SetDetailsView(DetailsView::AddSensor));

        let mut view = view();
        assert!(view.pick(MenuEntry::Cancel, &store).is_none());

        assert_eq!(store.snapshot().details_view, DetailsView::Main);
        assert!(view.chosen().is_none());
    }

    #[tokio::test]
    async fn saved_submission_refreshes_and_closes() {
        let api = FakeApi::accepting();
        let store = AppStore::new();
        store.dispatch(Action::SetShouldUpdateDevices(false));
        store.dispatch(Action::SetDetailsView(DetailsView::AddSensor));

        let mut view = view();
        let form = view.pick(MenuEntry::Sensor(SensorKind::Button), &store).unwrap();
        form.set(Field::Name, "Main Light").unwrap();

        let outcome = view.submit(&api, &store, true).await.unwrap();

        assert!(outcome.is_saved());
        let state = store.snapshot();
        assert!(state.should_update_devices);
        assert_eq!(state.details_view, DetailsView::Main);
        assert_eq!(view.form().unwrap().phase(), FormPhase::Saved);
        assert_eq!(
            api.submissions()[0].details["topics"]["state_topic"],
            "homeassistant/button/living_room/main_light/state"
        );
    }

    #[tokio::test]
    async fn rejected_submission_leaves_store_alone() {
        let api = FakeApi::rejecting();
        let store = AppStore::new();
        store.dispatch(Action::SetShouldUpdateDevices(false));
        store.dispatch(Action::SetDetailsView(DetailsView::AddSensor));
        let revision = store.snapshot().revision;

        let mut view = view();
        view.choose(SensorKind::Motion);
        let outcome = view.submit(&api, &store, true).await.unwrap();

        assert!(!outcome.is_saved());
        assert_eq!(store.snapshot().revision, revision);
        assert_eq!(store.snapshot().details_view, DetailsView::AddSensor);
    }

    #[tokio::test]
    async fn submit_without_choice_is_a_no_op() {
        let api = FakeApi::accepting();
        let store = AppStore::new();
        let mut view = view();
        assert!(view.submit(&api, &store, true).await.is_none());
        assert!(api.submissions().is_empty());
    }
}
