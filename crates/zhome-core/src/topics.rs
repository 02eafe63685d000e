// ── Topic builder ──
//
// Pure derivation of the MQTT topic set a sensor announces and listens
// on. Every topic shares the prefix
// `homeassistant/<category>/<slug(device)>/<slug(sensor)>`; the role
// decides the suffix. Nothing is published from here.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::kind::SensorKind;

/// Root segment of every discovery topic.
pub const DISCOVERY_PREFIX: &str = "homeassistant";

// ── Slugs ───────────────────────────────────────────────────────────

/// How names are turned into topic segments.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum SlugMode {
    /// Lower-case and replace only the first space with `_`.
    /// This is what every device deployed so far was configured with.
    #[default]
    FirstSpace,
    /// Lower-case and replace every space with `_`.
    AllSpaces,
}

impl SlugMode {
    pub fn slug(self, name: &str) -> String {
        let lowered = name.to_lowercase();
        match self {
            Self::FirstSpace => lowered.replacen(' ', "_", 1),
            Self::AllSpaces => lowered.replace(' ', "_"),
        }
    }
}

/// Slug with the default mode.
pub fn slug(name: &str) -> String {
    SlugMode::default().slug(name)
}

// ── Roles ───────────────────────────────────────────────────────────

/// Key under which a topic is stored in a sensor's `topics` map.
///
/// The serialized names are what the firmware reads, including the
/// misspelled `humidity_availibility_topic`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TopicRole {
    CommandTopic,
    StateTopic,
    AvailabilityTopic,
    DiscoveryTopic,
    PercentageStateTopic,
    PercentageCommandTopic,
    BrightnessStateTopic,
    BrightnessCommandTopic,
    TemperatureTopic,
    TemperatureDiscovery,
    TemperatureAvailabilityTopic,
    HumidityTopic,
    HumidityDiscovery,
    #[serde(rename = "humidity_availibility_topic")]
    HumidityAvailabilityTopic,
}

impl TopicRole {
    /// Wire key of the role.
    pub fn key(self) -> &'static str {
        match self {
            Self::CommandTopic => "command_topic",
            Self::StateTopic => "state_topic",
            Self::AvailabilityTopic => "availability_topic",
            Self::DiscoveryTopic => "discovery_topic",
            Self::PercentageStateTopic => "percentage_state_topic",
            Self::PercentageCommandTopic => "percentage_command_topic",
            Self::BrightnessStateTopic => "brightness_state_topic",
            Self::BrightnessCommandTopic => "brightness_command_topic",
            Self::TemperatureTopic => "temperature_topic",
            Self::TemperatureDiscovery => "temperature_discovery",
            Self::TemperatureAvailabilityTopic => "temperature_availability_topic",
            Self::HumidityTopic => "humidity_topic",
            Self::HumidityDiscovery => "humidity_discovery",
            Self::HumidityAvailabilityTopic => "humidity_availibility_topic",
        }
    }
}

impl fmt::Display for TopicRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Role → suffix appended to the shared prefix, per kind.
fn layout(kind: SensorKind) -> &'static [(TopicRole, &'static str)] {
    use TopicRole as R;
    match kind {
        SensorKind::Button => &[
            (R::CommandTopic, "/commands"),
            (R::StateTopic, "/state"),
            (R::AvailabilityTopic, "/availability"),
            (R::DiscoveryTopic, "/config"),
        ],
        SensorKind::Fan => &[
            (R::CommandTopic, "/set"),
            (R::StateTopic, "/state"),
            (R::PercentageStateTopic, "/dim/state"),
            (R::PercentageCommandTopic, "/dim/set"),
            (R::AvailabilityTopic, "/availability"),
            (R::DiscoveryTopic, "/config"),
        ],
        SensorKind::Led => &[
            (R::CommandTopic, "/set"),
            (R::StateTopic, "/state"),
            (R::BrightnessStateTopic, "/brightness/state"),
            (R::BrightnessCommandTopic, "/brightness/set"),
            (R::AvailabilityTopic, "/availability"),
            (R::DiscoveryTopic, "/config"),
        ],
        SensorKind::Motion => &[
            (R::StateTopic, "/state"),
            (R::AvailabilityTopic, "/availability"),
            (R::DiscoveryTopic, "/config"),
        ],
        SensorKind::Weather => &[
            (R::TemperatureTopic, "/temperature/state"),
            (R::TemperatureDiscovery, "/temperature/config"),
            (R::TemperatureAvailabilityTopic, "/temperature/availability"),
            (R::HumidityTopic, "/humidity/state"),
            (R::HumidityDiscovery, "/humidity/config"),
            (R::HumidityAvailabilityTopic, "/humidity/availability"),
        ],
    }
}

// ── Topic set ───────────────────────────────────────────────────────

/// Derived role → topic map. Serializes as a flat JSON object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TopicSet(BTreeMap<TopicRole, String>);

impl TopicSet {
    pub fn get(&self, role: TopicRole) -> Option<&str> {
        self.0.get(&role).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (TopicRole, &str)> {
        self.0.iter().map(|(role, topic)| (*role, topic.as_str()))
    }
}

/// Shared prefix of every topic for the given names.
pub fn topic_base(device_name: &str, sensor_name: &str, kind: SensorKind, mode: SlugMode) -> String {
    format!(
        "{DISCOVERY_PREFIX}/{}/{}/{}",
        kind.category(),
        mode.slug(device_name),
        mode.slug(sensor_name),
    )
}

/// Build the topic set with the default slug mode.
pub fn build_topics(device_name: &str, sensor_name: &str, kind: SensorKind) -> TopicSet {
    build_topics_with(device_name, sensor_name, kind, SlugMode::default())
}

/// Build the topic set for a sensor named `sensor_name` on the device
/// displayed as `device_name`.
pub fn build_topics_with(
    device_name: &str,
    sensor_name: &str,
    kind: SensorKind,
    mode: SlugMode,
) -> TopicSet {
    let base = topic_base(device_name, sensor_name, kind, mode);
    TopicSet(
        layout(kind)
            .iter()
            .map(|(role, suffix)| (*role, format!("{base}{suffix}")))
            .collect(),
    )
}
