mod app;
mod commands;
mod config;
mod effects;
mod history;
pub mod logging;
mod ticker;
mod ui;

pub use app::{run_app, RunMode};
pub use config::AppConfig;
pub use logging::LogDestination;
