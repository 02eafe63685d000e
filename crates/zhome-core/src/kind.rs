// ── Sensor kinds ──
//
// The closed set of sensor types the firmware knows how to drive.
// Every per-kind decision (form fields, topic layout, menu label)
// dispatches on this enum so a new kind is a compile error until
// every site handles it.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoEnumIterator};

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum SensorKind {
    Motion,
    Weather,
    Led,
    Fan,
    Button,
}

impl SensorKind {
    /// All kinds in menu order.
    pub fn all() -> Vec<Self> {
        Self::iter().collect()
    }

    /// Wire name sent as `sensor_type`.
    pub fn as_wire(self) -> &'static str {
        match self {
            Self::Motion => "motion",
            Self::Weather => "weather",
            Self::Led => "led",
            Self::Fan => "fan",
            Self::Button => "button",
        }
    }

    /// Human label used by the sensor selector.
    pub fn label(self) -> &'static str {
        match self {
            Self::Motion => "Motion Sensor",
            Self::Weather => "Weather Sensor",
            Self::Led => "LED Dimmer",
            Self::Fan => "Fan",
            Self::Button => "Button",
        }
    }

    /// Home Assistant component the kind is discovered as. This is the
    /// second segment of every topic built for the kind.
    pub fn category(self) -> &'static str {
        match self {
            Self::Motion => "binary_sensor",
            Self::Weather => "sensor",
            Self::Led => "light",
            Self::Fan => "fan",
            Self::Button => "button",
        }
    }
}
