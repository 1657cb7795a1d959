//! Backend health and model commands. These talk to the gateway directly
//! and have no offline fallback.

use owo_colors::OwoColorize;
use serde_json::{Map, Value, json};
use tabled::settings::Style;
use tabled::{Table, Tabled};

use super::{CommandOutput, http_gateway};
use crate::config::Config;
use crate::error::{DashError, Result};
use crate::gateway::Gateway;
use crate::types::ModelMetrics;

pub async fn cmd_health(output_json: bool) -> Result<()> {
    let gateway = http_gateway(&Config::load()?)?;
    let health = gateway.health().await?;
    let model = if health.model_loaded {
        "model loaded".green().to_string()
    } else {
        "model not loaded".red().to_string()
    };
    CommandOutput::new(json!(health))
        .with_text(format!(
            "{}: {} ({}) at {}",
            gateway.base_url(),
            health.status.bold(),
            model,
            health.timestamp
        ))
        .print(output_json)
}

/// Parse a feature map given as a JSON object.
pub fn parse_features(raw: &str) -> Result<Map<String, Value>> {
    match serde_json::from_str::<Value>(raw)? {
        Value::Object(features) => Ok(features),
        other => Err(DashError::Other(format!(
            "prediction features must be a JSON object, got {}",
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

pub async fn cmd_predict(features: &str, output_json: bool) -> Result<()> {
    let features = parse_features(features)?;
    let gateway = http_gateway(&Config::load()?)?;
    let result = gateway.predict(&features).await?;

    let mut text = format!(
        "{} (class {}, confidence {:.1}%)",
        result.prediction.bold(),
        result.prediction_index,
        result.confidence * 100.0
    );
    if !result.probabilities.is_empty() {
        let rows = result.probabilities.iter().map(|(class, probability)| Row {
            name: class.clone(),
            value: format!("{:.4}", probability),
        });
        text.push('\n');
        text.push_str(&rounded(rows));
    }
    CommandOutput::new(json!(result))
        .with_text(text)
        .print(output_json)
}

#[derive(Tabled)]
struct Row {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Value")]
    value: String,
}

fn rounded(rows: impl IntoIterator<Item = Row>) -> String {
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    table.to_string()
}

fn metrics_table(metrics: &ModelMetrics) -> String {
    let rows = [
        ("accuracy", format!("{:.4}", metrics.accuracy)),
        ("balanced accuracy", format!("{:.4}", metrics.balanced_accuracy)),
        ("precision (macro)", format!("{:.4}", metrics.precision_macro)),
        ("recall (macro)", format!("{:.4}", metrics.recall_macro)),
        ("f1 (macro)", format!("{:.4}", metrics.f1_macro)),
        ("roc auc", format!("{:.4}", metrics.roc_auc)),
        ("predictions", metrics.total_predictions.to_string()),
        ("true positives", metrics.true_positives.to_string()),
        ("true negatives", metrics.true_negatives.to_string()),
        ("false positives", metrics.false_positives.to_string()),
        ("false negatives", metrics.false_negatives.to_string()),
    ];
    rounded(rows.into_iter().map(|(name, value)| Row {
        name: name.to_string(),
        value,
    }))
}

pub async fn cmd_metrics(output_json: bool) -> Result<()> {
    let gateway = http_gateway(&Config::load()?)?;
    let metrics = gateway.model_metrics().await?;
    CommandOutput::new(json!(metrics))
        .with_text(metrics_table(&metrics))
        .print(output_json)
}

pub async fn cmd_retrain(output_json: bool) -> Result<()> {
    let gateway = http_gateway(&Config::load()?)?;
    let response = gateway.retrain_model().await?;
    CommandOutput::new(json!(response))
        .with_text(format!("{}: {}", response.status.bold(), response.message))
        .print(output_json)
}
