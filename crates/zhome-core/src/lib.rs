// zhome-core: Sensor configuration logic between zhome-api and the console front ends.

pub mod api;
pub mod config;
pub mod console;
pub mod error;
pub mod form;
pub mod kind;
pub mod poll;
pub mod selector;
pub mod store;
pub mod topics;

// ── Primary re-exports ──────────────────────────────────────────────
pub use api::HomeApi;
pub use config::ConsoleConfig;
pub use console::Console;
pub use error::CoreError;
pub use form::{Field, FormContext, FormHooks, FormPhase, SensorFields, SensorForm, SubmitOutcome};
pub use kind::SensorKind;
pub use poll::{Activation, Completion, FeedData, FetchTicket, Poller};
pub use selector::{AddSensorView, MenuEntry};
pub use store::{Action, AppState, AppStore, DetailsView, Feed, LogFilter};
pub use topics::{SlugMode, TopicRole, TopicSet, build_topics, build_topics_with, slug};

// Wire models consumers render directly.
pub use zhome_api::{
    AddSensorResponse, Device, HomeClient, LogEntry, MqttDetails, RecordId, SensorEntry,
};
