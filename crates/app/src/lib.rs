#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

pub mod log;
pub mod service;
pub mod settings;
pub mod state;

pub use service::Service;
pub use settings::{LogLevel, Settings, SettingsRepository, SettingsService};
pub use state::{AppState, Effect, Event, StateError, Transition, View, update};
