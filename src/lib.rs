#[macro_use]
pub mod macros;

pub mod cli;
pub mod commands;
pub mod config;
pub mod console;
pub mod dispatch;
pub mod error;
pub mod fallback;
pub mod gateway;
pub mod list;
pub mod orchestrator;
pub mod paths;
pub mod theme;
pub mod types;

pub use config::Config;
pub use dispatch::{Dispatcher, Page, Renderer, TextRenderer, ViewModel};
pub use error::{DashError, Result};
pub use gateway::{Gateway, HttpGateway, ListQuery};
pub use orchestrator::{LoadPhase, LoadSettings, Orchestrator};
pub use types::{
    Alert, AlertStatus, DashboardStats, Incident, IncidentStatus, Priority, Severity,
};
