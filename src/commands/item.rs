use owo_colors::OwoColorize;
use serde_json::json;

use super::{CommandOutput, is_offline, startup};
use crate::dispatch::format_timestamp;
use crate::error::Result;
use crate::types::{Alert, AlertStatus, Incident, IncidentStatus};

fn alert_text(alert: &Alert) -> String {
    let mut out = format!(
        "{} {}\n",
        alert.id.cyan().bold(),
        format!("[{}]", alert.priority).yellow()
    );
    out.push_str(&format!("description: {}\n", alert.description));
    out.push_str(&format!("source: {}\n", alert.source));
    out.push_str(&format!("timestamp: {}\n", format_timestamp(&alert.timestamp)));
    out.push_str(&format!("status: {}", alert.status));
    if let Some(alert_type) = &alert.alert_type {
        out.push_str(&format!("\ntype: {}", alert_type));
    }
    if let Some(confidence) = alert.confidence {
        out.push_str(&format!("\nconfidence: {:.2}", confidence));
    }
    out
}

fn incident_text(incident: &Incident, related: &[&Alert]) -> String {
    let mut out = format!(
        "{} {} {}\n",
        incident.id.cyan().bold(),
        format!("[{}]", incident.severity).yellow(),
        incident.title
    );
    out.push_str(&format!("status: {}\n", incident.status));
    out.push_str(&format!("assigned to: {}\n", incident.assigned_to));
    out.push_str(&format!("created: {}\n", format_timestamp(&incident.created_at)));
    out.push_str(&format!(
        "last updated: {}\n",
        format_timestamp(&incident.last_updated_at)
    ));
    out.push_str(&format!("\n{}\n", incident.summary));
    out.push_str(&format!("\nRelated alerts ({}):", related.len()));
    for alert in related {
        out.push_str(&format!(
            "\n  [{}] {}  {}  {}",
            alert.priority, alert.id, alert.description, alert.source
        ));
    }
    out
}

fn offline_suffix(offline: bool) -> &'static str {
    if offline {
        " (offline, not sent to the backend)"
    } else {
        ""
    }
}

/// Show one alert.
pub async fn cmd_alert(id: &str, output_json: bool) -> Result<()> {
    let orchestrator = startup().await?;
    let alert = orchestrator.alert(id).await?;
    CommandOutput::new(json!(alert))
        .with_text(alert_text(&alert))
        .print(output_json)
}

/// Show one incident with its related alerts.
pub async fn cmd_incident(id: &str, output_json: bool) -> Result<()> {
    let orchestrator = startup().await?;
    let incident = orchestrator.incident(id).await?;
    // Ids that are not resident are left out.
    let related: Vec<&Alert> = incident
        .related_alert_ids
        .iter()
        .filter_map(|alert_id| orchestrator.alerts().find(alert_id))
        .collect();
    CommandOutput::new(json!({
        "incident": incident,
        "related_alerts": related,
    }))
    .with_text(incident_text(&incident, &related))
    .print(output_json)
}

async fn set_alert_status(id: &str, status: AlertStatus, verb: &str, output_json: bool) -> Result<()> {
    let mut orchestrator = startup().await?;
    let alert = orchestrator.update_alert_status(id, status).await?;
    let offline = is_offline(&orchestrator);
    CommandOutput::new(json!({
        "alert": alert,
        "action": verb,
        "offline": offline,
    }))
    .with_text(format!(
        "Alert {} {}{}",
        alert.id.cyan(),
        verb,
        offline_suffix(offline)
    ))
    .print(output_json)
}

/// Mark an alert acknowledged.
pub async fn cmd_ack(id: &str, output_json: bool) -> Result<()> {
    set_alert_status(id, AlertStatus::Acknowledged, "acknowledged", output_json).await
}

/// Mark an alert resolved.
pub async fn cmd_resolve(id: &str, output_json: bool) -> Result<()> {
    set_alert_status(id, AlertStatus::Resolved, "resolved", output_json).await
}

/// Move an incident to another status.
pub async fn cmd_incident_status(id: &str, status: IncidentStatus, output_json: bool) -> Result<()> {
    let mut orchestrator = startup().await?;
    let incident = orchestrator.update_incident_status(id, status).await?;
    let offline = is_offline(&orchestrator);
    CommandOutput::new(json!({
        "incident": incident,
        "action": "status_changed",
        "offline": offline,
    }))
    .with_text(format!(
        "Incident {} is now {}{}",
        incident.id.cyan(),
        incident.status,
        offline_suffix(offline)
    ))
    .print(output_json)
}
