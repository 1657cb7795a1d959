//! Configuration commands.
//!
//! - `config show`: Display every key and the effective backend URL
//! - `config get`: Print one key
//! - `config set`: Validate and persist one key

use owo_colors::OwoColorize;
use serde_json::json;

use super::CommandOutput;
use crate::config::{API_URL_ENV, CONFIG_KEYS, Config};
use crate::error::Result;

/// Show current configuration
pub fn cmd_config_show(output_json: bool) -> Result<()> {
    let config = Config::load()?;
    let effective_url = config.api_url()?;
    let overridden = std::env::var(API_URL_ENV).is_ok_and(|url| !url.is_empty());

    let mut text = format!("{}\n\n", "Configuration:".cyan().bold());
    let mut values = serde_json::Map::new();
    for key in CONFIG_KEYS {
        let value = config.get(key)?;
        text.push_str(&format!("  {}: {}\n", key.cyan(), value));
        values.insert(key.to_string(), json!(value));
    }
    if overridden {
        text.push_str(&format!(
            "\n{} overrides api_url: {}\n",
            API_URL_ENV.yellow(),
            effective_url
        ));
    }
    text.push('\n');
    text.push_str(&format!(
        "{}",
        format!("Config file: {}", Config::config_path().display()).dimmed()
    ));

    CommandOutput::new(json!({
        "config": values,
        "effective_api_url": effective_url.as_str(),
        "config_file": Config::config_path().to_string_lossy(),
    }))
    .with_text(text)
    .print(output_json)
}

/// Get a specific configuration value
pub fn cmd_config_get(key: &str, output_json: bool) -> Result<()> {
    let value = Config::load()?.get(key)?;
    CommandOutput::new(json!({
        "key": key,
        "value": value,
    }))
    .with_text(value)
    .print(output_json)
}

/// Set a configuration value
pub fn cmd_config_set(key: &str, value: &str, output_json: bool) -> Result<()> {
    let mut config = Config::load()?;
    config.set(key, value)?;
    config.save()?;

    CommandOutput::new(json!({
        "action": "config_set",
        "key": key,
        "value": config.get(key)?,
        "success": true,
    }))
    .with_text(format!("Set {} to {}", key.cyan(), value))
    .print(output_json)
}
