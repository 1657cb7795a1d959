//! Offline stand-in dataset.
//!
//! Used when the startup load fails, so the dashboard stays populated and
//! every list operation can still be exercised. The shape is fixed (four
//! known alerts, 53 generated ones, four incidents referencing them); the
//! generated field values are random.

use jiff::Timestamp;
use rand::Rng;
use rand::seq::IndexedRandom;

use crate::types::{Alert, AlertStatus, Incident, IncidentStatus, Priority, Severity};

/// Number of randomly generated alerts appended after the fixed ones.
pub const GENERATED_ALERTS: usize = 53;

const DESCRIPTIONS: &[&str] = &[
    "DDoS attack detected on web server",
    "Malware signature found in file upload",
    "Brute force login attempt on SSH",
    "Unusual data exfiltration pattern",
    "Port scan from suspicious IP",
    "Cross-site scripting attempt",
    "Command & Control server communication",
    "Phishing link detected in email",
];

const HOUR: i64 = 3_600;
const DAY: i64 = 86_400;

#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub alerts: Vec<Alert>,
    pub incidents: Vec<Incident>,
}

/// Build a dataset relative to `now` using `rng` for the random fields.
pub fn generate<R: Rng + ?Sized>(rng: &mut R, now: Timestamp) -> Dataset {
    let mut alerts = fixed_alerts();
    alerts.extend((0..GENERATED_ALERTS).map(|i| random_alert(rng, now, i + 5)));

    Dataset {
        alerts,
        incidents: incidents(now),
    }
}

fn alert(
    id: &str,
    priority: Priority,
    description: &str,
    source: &str,
    timestamp: &str,
    status: AlertStatus,
) -> Alert {
    Alert {
        id: id.to_string(),
        priority,
        description: description.to_string(),
        source: source.to_string(),
        timestamp: timestamp.to_string(),
        status,
        alert_type: None,
        confidence: None,
    }
}

fn fixed_alerts() -> Vec<Alert> {
    vec![
        alert(
            "a1",
            Priority::Critical,
            "Potential Ransomware Activity Detected",
            "192.168.1.102",
            "2024-07-29T10:30:00Z",
            AlertStatus::New,
        ),
        alert(
            "a2",
            Priority::High,
            "Anomalous Outbound Connection",
            "10.0.5.23",
            "2024-07-29T10:27:00Z",
            AlertStatus::New,
        ),
        alert(
            "a3",
            Priority::High,
            "SQL Injection Attempt",
            "203.0.113.45",
            "2024-07-29T10:20:00Z",
            AlertStatus::New,
        ),
        alert(
            "a4",
            Priority::Medium,
            "Multiple Failed Login Attempts",
            "198.51.100.8",
            "2024-07-29T10:05:00Z",
            AlertStatus::Acknowledged,
        ),
    ]
}

fn random_alert<R: Rng + ?Sized>(rng: &mut R, now: Timestamp, n: usize) -> Alert {
    let priority = *Priority::ALL.choose(rng).unwrap_or(&Priority::Low);
    let status = *AlertStatus::ALL.choose(rng).unwrap_or(&AlertStatus::New);
    let description = DESCRIPTIONS.choose(rng).copied().unwrap_or(DESCRIPTIONS[0]);
    let source = format!(
        "192.168.{}.{}",
        rng.random_range(0..255u8),
        rng.random_range(0..255u8)
    );
    let age = rng.random_range(0..DAY);

    Alert {
        id: format!("a{}", n),
        priority,
        description: description.to_string(),
        source,
        timestamp: seconds_before(now, age),
        status,
        alert_type: None,
        confidence: None,
    }
}

/// RFC 3339 at whole-second precision, so timestamps compare as strings.
fn seconds_before(now: Timestamp, seconds: i64) -> String {
    Timestamp::from_second(now.as_second() - seconds)
        .unwrap_or(now)
        .to_string()
}

#[allow(clippy::too_many_arguments)]
fn incident(
    now: Timestamp,
    id: &str,
    title: &str,
    status: IncidentStatus,
    severity: Severity,
    assigned_to: &str,
    created_ago: i64,
    updated_ago: i64,
    related: &[&str],
    summary: &str,
) -> Incident {
    Incident {
        id: id.to_string(),
        title: title.to_string(),
        summary: summary.to_string(),
        status,
        severity,
        assigned_to: assigned_to.to_string(),
        created_at: seconds_before(now, created_ago),
        last_updated_at: seconds_before(now, updated_ago),
        related_alert_ids: related.iter().map(|s| s.to_string()).collect(),
        description: None,
        affected_systems: None,
        alerts_count: None,
    }
}

fn incidents(now: Timestamp) -> Vec<Incident> {
    vec![
        incident(
            now,
            "inc-1",
            "Coordinated Brute-Force Attack on Core Servers",
            IncidentStatus::UnderInvestigation,
            Severity::Critical,
            "Admin",
            2 * DAY,
            HOUR,
            &["a5", "a8", "a12"],
            "Multiple SSH brute-force attempts from a network of IPs targeting production servers.",
        ),
        incident(
            now,
            "inc-2",
            "Potential Data Exfiltration via DNS Tunneling",
            IncidentStatus::Open,
            Severity::High,
            "Analyst 1",
            DAY,
            2 * HOUR,
            &["a6", "a10"],
            "Anomalous DNS query patterns suggest data is being exfiltrated from an internal host.",
        ),
        incident(
            now,
            "inc-3",
            "Web Server Compromise via SQL Injection",
            IncidentStatus::Resolved,
            Severity::High,
            "Admin",
            5 * DAY,
            3 * DAY,
            &["a7", "a11", "a15", "a20"],
            "Web server was targeted with SQL injection, leading to unauthorized database access. The vulnerability has been patched.",
        ),
        incident(
            now,
            "inc-4",
            "Malware Outbreak in Marketing Department",
            IncidentStatus::Closed,
            Severity::Medium,
            "Analyst 2",
            10 * DAY,
            8 * DAY,
            &["a9", "a14"],
            "Phishing email led to a malware infection on two marketing workstations. Affected machines have been reimaged.",
        ),
    ]
}
