use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::DashError;

/// Alert priority. Orders by rank, so `Low < Critical`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Priority {
    Critical,
    High,
    Medium,
    Low,
}

wire_enum!(Priority, DashError::InvalidPriority, {
    Critical => "Critical",
    High => "High",
    Medium => "Medium",
    Low => "Low",
});

/// Incident severity. Same scale as [`Priority`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
}

wire_enum!(Severity, DashError::InvalidSeverity, {
    Critical => "Critical",
    High => "High",
    Medium => "Medium",
    Low => "Low",
});

macro_rules! rank_ordering {
    ($enum_name:ident) => {
        impl $enum_name {
            /// 0 for `Low` up to 3 for `Critical`.
            pub fn rank(&self) -> u8 {
                match self {
                    $enum_name::Low => 0,
                    $enum_name::Medium => 1,
                    $enum_name::High => 2,
                    $enum_name::Critical => 3,
                }
            }
        }

        impl Ord for $enum_name {
            fn cmp(&self, other: &Self) -> Ordering {
                self.rank().cmp(&other.rank())
            }
        }

        impl PartialOrd for $enum_name {
            fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
                Some(self.cmp(other))
            }
        }
    };
}

rank_ordering!(Priority);
rank_ordering!(Severity);

/// Alert lifecycle. Orders by lifecycle position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AlertStatus {
    New,
    Acknowledged,
    Resolved,
}

wire_enum!(AlertStatus, DashError::InvalidAlertStatus, {
    New => "New",
    Acknowledged => "Acknowledged",
    Resolved => "Resolved",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum IncidentStatus {
    Open,
    UnderInvestigation,
    Resolved,
    Closed,
}

wire_enum!(IncidentStatus, DashError::InvalidIncidentStatus, {
    Open => "Open",
    UnderInvestigation => "Under Investigation",
    Resolved => "Resolved",
    Closed => "Closed",
});

impl IncidentStatus {
    /// Open and under-investigation incidents still need attention.
    pub fn is_active(&self) -> bool {
        matches!(self, IncidentStatus::Open | IncidentStatus::UnderInvestigation)
    }
}

/// A single detection raised by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub id: String,
    pub priority: Priority,
    pub description: String,
    pub source: String,
    /// ISO-8601 instant
    pub timestamp: String,
    pub status: AlertStatus,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub alert_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

/// A grouping of alerts under investigation.
///
/// `related_alert_ids` is a list of references into the current alert set,
/// not ownership. Ids that no longer resolve are skipped when rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Incident {
    pub id: String,
    pub title: String,
    pub summary: String,
    pub status: IncidentStatus,
    pub severity: Severity,
    pub assigned_to: String,
    pub created_at: String,
    pub last_updated_at: String,
    #[serde(default)]
    pub related_alert_ids: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub affected_systems: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alerts_count: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelMetrics {
    pub accuracy: f64,
    pub precision_macro: f64,
    pub recall_macro: f64,
    pub f1_macro: f64,
    pub roc_auc: f64,
    pub balanced_accuracy: f64,
    pub total_predictions: u64,
    pub false_positives: u64,
    pub false_negatives: u64,
    pub true_positives: u64,
    pub true_negatives: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total_alerts: u64,
    pub critical_alerts: u64,
    pub open_incidents: u64,
    pub total_incidents: u64,
    pub model_metrics: ModelMetrics,
    #[serde(default)]
    pub recent_alerts: Vec<Alert>,
    #[serde(default)]
    pub recent_incidents: Vec<Incident>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub model_loaded: bool,
    pub timestamp: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub prediction: String,
    pub prediction_index: i64,
    pub confidence: f64,
    #[serde(default)]
    pub probabilities: BTreeMap<String, f64>,
    #[serde(default)]
    pub features_used: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrainResponse {
    pub status: String,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_orders_by_rank() {
        assert!(Priority::Low < Priority::Medium);
        assert!(Priority::High < Priority::Critical);
        let mut all = Priority::ALL.to_vec();
        all.sort();
        assert_eq!(
            all,
            vec![Priority::Low, Priority::Medium, Priority::High, Priority::Critical]
        );
    }

    #[test]
    fn test_incident_status_wire_name() {
        assert_eq!(
            IncidentStatus::UnderInvestigation.to_string(),
            "Under Investigation"
        );
        assert_eq!(
            "under_investigation".parse::<IncidentStatus>().unwrap(),
            IncidentStatus::UnderInvestigation
        );
        assert!(matches!(
            "pending".parse::<IncidentStatus>(),
            Err(DashError::InvalidIncidentStatus(_))
        ));
    }

    #[test]
    fn test_alert_deserializes_optional_fields() {
        let json = r#"{
            "id": "a1",
            "priority": "Critical",
            "description": "Potential Ransomware Activity Detected",
            "source": "192.168.1.102",
            "timestamp": "2024-07-29T10:30:00Z",
            "status": "New",
            "type": "ransomware",
            "confidence": 0.97
        }"#;
        let alert: Alert = serde_json::from_str(json).unwrap();
        assert_eq!(alert.priority, Priority::Critical);
        assert_eq!(alert.alert_type.as_deref(), Some("ransomware"));
        assert_eq!(alert.confidence, Some(0.97));

        let out = serde_json::to_value(&alert).unwrap();
        assert_eq!(out["type"], "ransomware");
    }

    #[test]
    fn test_alert_without_optional_fields_omits_them() {
        let json = r#"{"id":"a2","priority":"Low","description":"d","source":"s",
            "timestamp":"2024-07-29T10:27:00Z","status":"Resolved"}"#;
        let alert: Alert = serde_json::from_str(json).unwrap();
        assert!(alert.alert_type.is_none());
        let out = serde_json::to_value(&alert).unwrap();
        assert!(out.get("type").is_none());
        assert!(out.get("confidence").is_none());
    }

    #[test]
    fn test_incident_uses_camel_case() {
        let json = r#"{
            "id": "inc-1",
            "title": "Coordinated Brute-Force Attack on Core Servers",
            "summary": "s",
            "status": "Under Investigation",
            "severity": "Critical",
            "assignedTo": "Admin",
            "createdAt": "2024-07-27T10:00:00Z",
            "lastUpdatedAt": "2024-07-29T09:00:00Z",
            "relatedAlertIds": ["a5", "a8"],
            "alertsCount": 2
        }"#;
        let incident: Incident = serde_json::from_str(json).unwrap();
        assert_eq!(incident.assigned_to, "Admin");
        assert_eq!(incident.related_alert_ids, vec!["a5", "a8"]);
        assert_eq!(incident.alerts_count, Some(2));
        assert!(incident.status.is_active());
    }

    #[test]
    fn test_unknown_priority_is_rejected() {
        let json = r#"{"id":"a","priority":"Urgent","description":"","source":"",
            "timestamp":"","status":"New"}"#;
        assert!(serde_json::from_str::<Alert>(json).is_err());
    }
}
