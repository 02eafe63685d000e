// ── Application store ──
//
// Single state container for the console. Written only through
// `AppStore::dispatch`; every dispatch runs the pure reducer and
// notifies subscribers through a `watch` channel.

mod action;
mod app_store;
mod filter;
mod state;

pub use action::{Action, reduce};
pub use app_store::AppStore;
pub use filter::LogFilter;
pub use state::{AppState, DetailsView, Feed};
