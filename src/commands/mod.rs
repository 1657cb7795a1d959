//! One-shot CLI command handlers.
//!
//! Every handler prints either a rendered text view or, with `--json`, a
//! JSON document on stdout. Commands that show dashboard data run the
//! same startup load as the console, so they work offline too.

mod config;
mod console;
mod item;
mod list;
mod model;
mod theme;

pub use config::{cmd_config_get, cmd_config_set, cmd_config_show};
pub use console::cmd_console;
pub use item::{cmd_ack, cmd_alert, cmd_incident, cmd_incident_status, cmd_resolve};
pub use list::{ListOptions, cmd_alerts, cmd_dashboard, cmd_incidents};
pub use model::{cmd_health, cmd_metrics, cmd_predict, cmd_retrain};
pub use theme::{cmd_theme_set, cmd_theme_show, cmd_theme_toggle};

use serde_json::Value;
use tracing::warn;

use crate::config::Config;
use crate::dispatch::{Dispatcher, Page, TextRenderer};
use crate::error::Result;
use crate::gateway::{Gateway, HttpGateway};
use crate::orchestrator::{LoadPhase, LoadSettings, Orchestrator};
use crate::theme::{Theme, ThemeStore};

/// Output of a command in both of its forms.
pub struct CommandOutput {
    json: Value,
    text: Option<String>,
}

impl CommandOutput {
    pub fn new(json: Value) -> Self {
        Self { json, text: None }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Print JSON when requested, otherwise the text form. Commands without
    /// a text form print their JSON either way.
    pub fn print(self, output_json: bool) -> Result<()> {
        match self.text {
            Some(text) if !output_json => {
                println!("{}", text);
                Ok(())
            }
            _ => print_json(&self.json),
        }
    }
}

pub fn print_json(value: &Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub(crate) fn http_gateway(config: &Config) -> Result<HttpGateway> {
    HttpGateway::from_config(config)
}

/// Build an orchestrator for the configured backend and run the startup
/// load. Never fails on backend errors; those select the offline dataset.
pub(crate) async fn startup() -> Result<Orchestrator<HttpGateway>> {
    let config = Config::load()?;
    let mut orchestrator = Orchestrator::new(http_gateway(&config)?, LoadSettings::from(&config));
    orchestrator.load().await;
    Ok(orchestrator)
}

pub(crate) fn stored_theme() -> Theme {
    let store = ThemeStore::default_location();
    store.load().unwrap_or_else(|e| {
        warn!(error = %e, path = %store.path().display(), "ignoring unreadable preferences");
        Theme::default()
    })
}

/// Draw one frame of `page` to stdout.
pub(crate) fn render_page<G: Gateway>(orchestrator: &mut Orchestrator<G>, page: Page) -> Result<()> {
    Dispatcher::new(TextRenderer::stdout()).redraw(orchestrator, page, stored_theme())
}

pub(crate) fn is_offline<G: Gateway>(orchestrator: &Orchestrator<G>) -> bool {
    orchestrator.phase() == LoadPhase::Fallback
}
