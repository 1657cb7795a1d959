use owo_colors::OwoColorize;
use serde_json::json;

use super::CommandOutput;
use crate::error::Result;
use crate::theme::{Theme, ThemeStore};

fn theme_output(action: &str, theme: Theme, text: String) -> CommandOutput {
    CommandOutput::new(json!({
        "action": action,
        "theme": theme,
        "preferences_file": ThemeStore::default_location().path().to_string_lossy(),
    }))
    .with_text(text)
}

/// Print the stored theme.
pub fn cmd_theme_show(output_json: bool) -> Result<()> {
    let theme = ThemeStore::default_location().load()?;
    theme_output("show", theme, theme.to_string()).print(output_json)
}

pub fn cmd_theme_set(theme: Theme, output_json: bool) -> Result<()> {
    ThemeStore::default_location().save(theme)?;
    theme_output("set", theme, format!("Theme set to {}", theme.cyan())).print(output_json)
}

pub fn cmd_theme_toggle(output_json: bool) -> Result<()> {
    let theme = ThemeStore::default_location().toggle()?;
    theme_output("toggle", theme, format!("Theme switched to {}", theme.cyan()))
        .print(output_json)
}
