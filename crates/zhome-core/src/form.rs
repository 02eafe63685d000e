// ── Sensor forms ──
//
// One typed field set per sensor kind plus the submission state
// machine shared by all of them:
//
//   Editing ──submit──▶ Submitting ──success──▶ Saved (fields reset)
//                            │
//                            └──rejected / error──▶ Editing (fields kept)
//
// A failed submission is reported to the caller as a `SubmitOutcome`
// and nothing else; the form itself stays silent.

use serde_json::{Value, json};
use strum::Display;
use tracing::{debug, info};
use zhome_api::{AddSensorResponse, RecordId};

use crate::api::HomeApi;
use crate::error::CoreError;
use crate::kind::SensorKind;
use crate::topics::{SlugMode, TopicSet, build_topics_with};

// ── Fields ──────────────────────────────────────────────────────────

/// An editable input of a sensor form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "snake_case")]
pub enum Field {
    Name,
    Pin,
    EnablePin,
    Freq,
    RetriggerDelayMs,
    MeasurementIntervalMs,
    NameTemp,
    NameHumidity,
}

impl Field {
    pub fn label(self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::Pin => "Pin",
            Self::EnablePin => "Enable pin",
            Self::Freq => "Frequency (Hz)",
            Self::RetriggerDelayMs => "Re-trigger delay (ms)",
            Self::MeasurementIntervalMs => "Measurement interval (ms)",
            Self::NameTemp => "Temperature name",
            Self::NameHumidity => "Humidity name",
        }
    }

    pub fn is_numeric(self) -> bool {
        !matches!(self, Self::Name | Self::NameTemp | Self::NameHumidity)
    }
}

/// Coerce numeric text input. Anything that does not parse as an
/// integer becomes unset, which is sent as `null`.
pub fn parse_number(raw: &str) -> Option<i64> {
    raw.trim().parse().ok()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MotionFields {
    pub name: String,
    pub pin: Option<i64>,
    pub retrigger_delay_ms: Option<i64>,
}

impl Default for MotionFields {
    fn default() -> Self {
        Self {
            name: String::new(),
            pin: None,
            retrigger_delay_ms: Some(300),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeatherFields {
    pub name: String,
    pub pin: Option<i64>,
    pub measurement_interval_ms: Option<i64>,
    pub name_temp: String,
    pub name_humidity: String,
}

impl Default for WeatherFields {
    fn default() -> Self {
        Self {
            name: String::new(),
            pin: None,
            measurement_interval_ms: Some(60_000),
            name_temp: String::new(),
            name_humidity: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedFields {
    pub name: String,
    pub pin: Option<i64>,
    pub freq: Option<i64>,
}

impl Default for LedFields {
    fn default() -> Self {
        Self {
            name: String::new(),
            pin: None,
            freq: Some(1000),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FanFields {
    pub name: String,
    pub pin: Option<i64>,
    pub enable_pin: Option<i64>,
    pub freq: Option<i64>,
}

impl Default for FanFields {
    fn default() -> Self {
        Self {
            name: String::new(),
            pin: None,
            enable_pin: None,
            freq: Some(30_000),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ButtonFields {
    pub name: String,
    pub pin: Option<i64>,
    pub retrigger_delay_ms: Option<i64>,
}

impl Default for ButtonFields {
    fn default() -> Self {
        Self {
            name: String::new(),
            pin: None,
            retrigger_delay_ms: Some(300),
        }
    }
}

/// Field values of one form, tagged by kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SensorFields {
    Motion(MotionFields),
    Weather(WeatherFields),
    Led(LedFields),
    Fan(FanFields),
    Button(ButtonFields),
}

impl SensorFields {
    /// Fresh field values for a kind.
    pub fn defaults(kind: SensorKind) -> Self {
        match kind {
            SensorKind::Motion => Self::Motion(MotionFields::default()),
            SensorKind::Weather => Self::Weather(WeatherFields::default()),
            SensorKind::Led => Self::Led(LedFields::default()),
            SensorKind::Fan => Self::Fan(FanFields::default()),
            SensorKind::Button => Self::Button(ButtonFields::default()),
        }
    }

    pub fn kind(&self) -> SensorKind {
        match self {
            Self::Motion(_) => SensorKind::Motion,
            Self::Weather(_) => SensorKind::Weather,
            Self::Led(_) => SensorKind::Led,
            Self::Fan(_) => SensorKind::Fan,
            Self::Button(_) => SensorKind::Button,
        }
    }

    /// Inputs shown for a kind, in display order.
    pub fn inputs(kind: SensorKind) -> &'static [Field] {
        match kind {
            SensorKind::Motion | SensorKind::Button => {
                &[Field::Name, Field::Pin, Field::RetriggerDelayMs]
            }
            SensorKind::Weather => &[
                Field::Name,
                Field::Pin,
                Field::MeasurementIntervalMs,
                Field::NameTemp,
                Field::NameHumidity,
            ],
            SensorKind::Led => &[Field::Name, Field::Pin, Field::Freq],
            SensorKind::Fan => &[Field::Name, Field::Pin, Field::EnablePin, Field::Freq],
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Motion(f) => &f.name,
            Self::Weather(f) => &f.name,
            Self::Led(f) => &f.name,
            Self::Fan(f) => &f.name,
            Self::Button(f) => &f.name,
        }
    }

    /// Current value of a field as display text. `None` when the
    /// field is unset or not part of this kind.
    pub fn value(&self, field: Field) -> Option<String> {
        if field.is_numeric() {
            self.number(field).flatten().map(|n| n.to_string())
        } else {
            self.text(field).map(str::to_owned)
        }
    }

    /// Store raw input into a field, coercing numeric fields.
    pub fn set(&mut self, field: Field, raw: &str) -> Result<(), CoreError> {
        if field.is_numeric() {
            if let Some(slot) = self.number_mut(field) {
                *slot = parse_number(raw);
                return Ok(());
            }
        } else if let Some(slot) = self.text_mut(field) {
            raw.clone_into(slot);
            return Ok(());
        }
        Err(CoreError::ValidationFailed {
            message: format!("{} sensors have no {field} field", self.kind().label()),
        })
    }

    /// The `sensor_config` object submitted for these values.
    pub fn sensor_config(&self, topics: &TopicSet) -> Value {
        match self {
            Self::Motion(f) => json!({
                "pin": f.pin,
                "retrigger_delay_ms": f.retrigger_delay_ms,
                "topics": topics,
            }),
            Self::Weather(f) => json!({
                "pin": f.pin,
                "measurement_interval_ms": f.measurement_interval_ms,
                "name_temp": f.name_temp,
                "name_humidity": f.name_humidity,
                "topics": topics,
            }),
            Self::Led(f) => json!({
                "pin": f.pin,
                "freq": f.freq,
                "topics": topics,
            }),
            Self::Fan(f) => json!({
                "pin": f.pin,
                "enable_pin": f.enable_pin,
                "freq": f.freq,
                "topics": topics,
            }),
            Self::Button(f) => json!({
                "pin": f.pin,
                "retrigger_delay_ms": f.retrigger_delay_ms,
                "topics": topics,
            }),
        }
    }

    fn text(&self, field: Field) -> Option<&str> {
        match (self, field) {
            (Self::Motion(f), Field::Name) => Some(f.name.as_str()),
            (Self::Weather(f), Field::Name) => Some(f.name.as_str()),
            (Self::Weather(f), Field::NameTemp) => Some(f.name_temp.as_str()),
            (Self::Weather(f), Field::NameHumidity) => Some(f.name_humidity.as_str()),
            (Self::Led(f), Field::Name) => Some(f.name.as_str()),
            (Self::Fan(f), Field::Name) => Some(f.name.as_str()),
            (Self::Button(f), Field::Name) => Some(f.name.as_str()),
            _ => None,
        }
    }

    fn text_mut(&mut self, field: Field) -> Option<&mut String> {
        match (self, field) {
            (Self::Motion(f), Field::Name) => Some(&mut f.name),
            (Self::Weather(f), Field::Name) => Some(&mut f.name),
            (Self::Weather(f), Field::NameTemp) => Some(&mut f.name_temp),
            (Self::Weather(f), Field::NameHumidity) => Some(&mut f.name_humidity),
            (Self::Led(f), Field::Name) => Some(&mut f.name),
            (Self::Fan(f), Field::Name) => Some(&mut f.name),
            (Self::Button(f), Field::Name) => Some(&mut f.name),
            _ => None,
        }
    }

    fn number(&self, field: Field) -> Option<Option<i64>> {
        match (self, field) {
            (Self::Motion(f), Field::Pin) => Some(f.pin),
            (Self::Motion(f), Field::RetriggerDelayMs) => Some(f.retrigger_delay_ms),
            (Self::Weather(f), Field::Pin) => Some(f.pin),
            (Self::Weather(f), Field::MeasurementIntervalMs) => Some(f.measurement_interval_ms),
            (Self::Led(f), Field::Pin) => Some(f.pin),
            (Self::Led(f), Field::Freq) => Some(f.freq),
            (Self::Fan(f), Field::Pin) => Some(f.pin),
            (Self::Fan(f), Field::EnablePin) => Some(f.enable_pin),
            (Self::Fan(f), Field::Freq) => Some(f.freq),
            (Self::Button(f), Field::Pin) => Some(f.pin),
            (Self::Button(f), Field::RetriggerDelayMs) => Some(f.retrigger_delay_ms),
            _ => None,
        }
    }

    fn number_mut(&mut self, field: Field) -> Option<&mut Option<i64>> {
        match (self, field) {
            (Self::Motion(f), Field::Pin) => Some(&mut f.pin),
            (Self::Motion(f), Field::RetriggerDelayMs) => Some(&mut f.retrigger_delay_ms),
            (Self::Weather(f), Field::Pin) => Some(&mut f.pin),
            (Self::Weather(f), Field::MeasurementIntervalMs) => {
                Some(&mut f.measurement_interval_ms)
            }
            (Self::Led(f), Field::Pin) => Some(&mut f.pin),
            (Self::Led(f), Field::Freq) => Some(&mut f.freq),
            (Self::Fan(f), Field::Pin) => Some(&mut f.pin),
            (Self::Fan(f), Field::EnablePin) => Some(&mut f.enable_pin),
            (Self::Fan(f), Field::Freq) => Some(&mut f.freq),
            (Self::Button(f), Field::Pin) => Some(&mut f.pin),
            (Self::Button(f), Field::RetriggerDelayMs) => Some(&mut f.retrigger_delay_ms),
            _ => None,
        }
    }
}

// ── Form ────────────────────────────────────────────────────────────

/// What a form knows about the device it adds a sensor to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormContext {
    pub device_name: String,
    pub device_config_id: RecordId,
    pub slug_mode: SlugMode,
}

/// Callbacks a form invokes after a successful save.
pub struct FormHooks<'a> {
    /// Request a device list refresh.
    pub refresh: &'a (dyn Fn() + Send + Sync),
    /// Leave the add-sensor view, if the host wants that.
    pub close: Option<&'a (dyn Fn() + Send + Sync)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormPhase {
    Editing,
    Submitting,
    Saved,
}

/// Result of one submission.
#[derive(Debug)]
pub enum SubmitOutcome {
    /// Backend answered `success: true`; fields were reset.
    Saved(AddSensorResponse),
    /// Backend answered without `success: true`; fields kept.
    Rejected(AddSensorResponse),
    /// The request did not complete; fields kept.
    Failed(CoreError),
}

impl SubmitOutcome {
    pub fn is_saved(&self) -> bool {
        matches!(self, Self::Saved(_))
    }
}

/// An add-sensor form for one kind.
#[derive(Debug, Clone)]
pub struct SensorForm {
    context: FormContext,
    fields: SensorFields,
    phase: FormPhase,
}

impl SensorForm {
    pub fn new(kind: SensorKind, context: FormContext) -> Self {
        Self {
            context,
            fields: SensorFields::defaults(kind),
            phase: FormPhase::Editing,
        }
    }

    pub fn kind(&self) -> SensorKind {
        self.fields.kind()
    }

    pub fn context(&self) -> &FormContext {
        &self.context
    }

    pub fn fields(&self) -> &SensorFields {
        &self.fields
    }

    pub fn phase(&self) -> FormPhase {
        self.phase
    }

    /// Edit a field. Editing a saved form starts a new entry.
    pub fn set(&mut self, field: Field, raw: &str) -> Result<(), CoreError> {
        self.fields.set(field, raw)?;
        self.phase = FormPhase::Editing;
        Ok(())
    }

    /// Reset every field to its default.
    pub fn clear(&mut self) {
        self.fields = SensorFields::defaults(self.kind());
    }

    /// Topics for the current sensor name.
    pub fn topics(&self) -> TopicSet {
        build_topics_with(
            &self.context.device_name,
            self.fields.name(),
            self.kind(),
            self.context.slug_mode,
        )
    }

    /// The `sensor_config` object a submit would send right now.
    pub fn sensor_config(&self) -> Value {
        self.fields.sensor_config(&self.topics())
    }

    /// Submit the form.
    ///
    /// On `success: true` the fields are reset, `hooks.refresh` runs and
    /// then `hooks.close` if given. Otherwise the fields are left as
    /// they were and only the returned outcome says what happened.
    pub async fn submit<A: HomeApi>(&mut self, api: &A, hooks: &FormHooks<'_>) -> SubmitOutcome {
        self.phase = FormPhase::Submitting;
        let kind = self.kind();
        let details = self.sensor_config();
        debug!(%kind, name = self.fields.name(), "submitting sensor");

        let result = api
            .add_sensor(
                kind,
                self.fields.name(),
                &self.context.device_config_id,
                &details,
            )
            .await;

        match result {
            Ok(resp) if resp.success => {
                info!(%kind, device = %self.context.device_name, "sensor saved");
                self.clear();
                self.phase = FormPhase::Saved;
                (hooks.refresh)();
                if let Some(close) = hooks.close {
                    close();
                }
                SubmitOutcome::Saved(resp)
            }
            Ok(resp) => {
                debug!(%kind, message = ?resp.message, "sensor not saved");
                self.phase = FormPhase::Editing;
                SubmitOutcome::Rejected(resp)
            }
            Err(e) => {
                debug!(%kind, error = %e, "sensor submission failed");
                self.phase = FormPhase::Editing;
                SubmitOutcome::Failed(e)
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::api::fake::FakeApi;

    fn context() -> FormContext {
        FormContext {
            device_name: "Living Room".into(),
            device_config_id: RecordId::Numeric(3),
            slug_mode: SlugMode::FirstSpace,
        }
    }

    fn filled_button() -> SensorForm {
        let mut form = SensorForm::new(SensorKind::Button, context());
        form.set(Field::Name, "Main Light").unwrap();
        form.set(Field::Pin, "14").unwrap();
        form.set(Field::RetriggerDelayMs, "500").unwrap();
        form
    }

    #[test]
    fn defaults_per_kind() {
        let SensorFields::Fan(fan) = SensorFields::defaults(SensorKind::Fan) else {
            panic!("expected fan fields");
        };
        assert_eq!(fan.freq, Some(30_000));
        assert_eq!(fan.enable_pin, None);

        let led = SensorFields::defaults(SensorKind::Led);
        assert_eq!(led.value(Field::Freq).as_deref(), Some("1000"));

        let weather = SensorFields::defaults(SensorKind::Weather);
        assert_eq!(
            weather.value(Field::MeasurementIntervalMs).as_deref(),
            Some("60000")
        );
        assert_eq!(weather.value(Field::Pin), None);
    }

    #[test]
    fn button_payload_carries_fields_and_topics() {
        let form = filled_button();
        assert_eq!(
            form.sensor_config(),
            json!({
                "pin": 14,
                "retrigger_delay_ms": 500,
                "topics": {
                    "command_topic": "homeassistant/button/living_room/main_light/commands",
                    "state_topic": "homeassistant/button/living_room/main_light/state",
                    "availability_topic": "homeassistant/button/living_room/main_light/availability",
                    "discovery_topic": "homeassistant/button/living_room/main_light/config"
                }
            })
        );
    }

    #[test]
    fn unparsable_number_is_sent_as_null() {
        let mut form = SensorForm::new(SensorKind::Fan, context());
        form.set(Field::Pin, "twelve").unwrap();
        form.set(Field::Freq, " 25000 ").unwrap();

        let config = form.sensor_config();
        assert_eq!(config["pin"], Value::Null);
        assert_eq!(config["freq"], json!(25_000));
    }

    #[test]
    fn fields_outside_the_kind_are_refused() {
        let mut form = SensorForm::new(SensorKind::Led, context());
        let err = form.set(Field::EnablePin, "4").unwrap_err();
        assert!(matches!(err, CoreError::ValidationFailed { .. }));
    }

    #[test]
    fn weather_payload_keys() {
        let mut form = SensorForm::new(SensorKind::Weather, context());
        form.set(Field::Name, "Station").unwrap();
        form.set(Field::NameTemp, "Temperature").unwrap();
        form.set(Field::NameHumidity, "Humidity").unwrap();

        let config = form.sensor_config();
        assert_eq!(config["measurement_interval_ms"], json!(60_000));
        assert_eq!(config["name_temp"], json!("Temperature"));
        assert_eq!(
            config["topics"]["temperature_topic"],
            json!("homeassistant/sensor/living_room/station/temperature/state")
        );
    }

    #[tokio::test]
    async fn successful_submit_resets_fields_and_triggers_refresh() {
        let api = FakeApi::accepting();
        let refreshes = AtomicUsize::new(0);
        let closes = AtomicUsize::new(0);
        let refresh = || {
            refreshes.fetch_add(1, Ordering::SeqCst);
        };
        let close = || {
            closes.fetch_add(1, Ordering::SeqCst);
        };
        let hooks = FormHooks {
            refresh: &refresh,
            close: Some(&close),
        };

        let mut form = filled_button();
        let outcome = form.submit(&api, &hooks).await;

        assert!(outcome.is_saved());
        assert_eq!(form.phase(), FormPhase::Saved);
        assert_eq!(
            form.fields(),
            &SensorFields::Button(ButtonFields {
                name: String::new(),
                pin: None,
                retrigger_delay_ms: Some(300),
            })
        );
        assert_eq!(refreshes.load(Ordering::SeqCst), 1);
        assert_eq!(closes.load(Ordering::SeqCst), 1);

        let sent = api.submissions();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].kind, SensorKind::Button);
        assert_eq!(sent[0].name, "Main Light");
        assert_eq!(sent[0].device_config_id, RecordId::Numeric(3));
        assert_eq!(sent[0].details["pin"], json!(14));
    }

    #[tokio::test]
    async fn rejected_submit_keeps_fields_and_skips_refresh() {
        let api = FakeApi::rejecting();
        let refreshes = AtomicUsize::new(0);
        let refresh = || {
            refreshes.fetch_add(1, Ordering::SeqCst);
        };
        let hooks = FormHooks {
            refresh: &refresh,
            close: None,
        };

        let mut form = filled_button();
        let before = form.fields().clone();
        let outcome = form.submit(&api, &hooks).await;

        assert!(matches!(outcome, SubmitOutcome::Rejected(_)));
        assert_eq!(form.fields(), &before);
        assert_eq!(form.phase(), FormPhase::Editing);
        assert_eq!(refreshes.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn failed_submit_keeps_fields() {
        let api = FakeApi::failing();
        let refresh = || {};
        let hooks = FormHooks {
            refresh: &refresh,
            close: None,
        };

        let mut form = filled_button();
        let before = form.fields().clone();
        let outcome = form.submit(&api, &hooks).await;

        assert!(matches!(
            outcome,
            SubmitOutcome::Failed(CoreError::ConnectionFailed { .. })
        ));
        assert_eq!(form.fields(), &before);
    }
}
