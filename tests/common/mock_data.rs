//! Mock data builders and a scripted in-memory gateway.
//!
//! The gateway serves lists the way the backend does: filtered by the
//! query parameters, then cut to the requested page.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde_json::{Map, Value};

use idsdash::error::{DashError, Result};
use idsdash::gateway::{Gateway, ListQuery, Page};
use idsdash::list::{ListState, Listable, page_count, project};
use idsdash::types::{
    Alert, AlertStatus, DashboardStats, HealthStatus, Incident, IncidentStatus, ModelMetrics,
    PredictionResult, Priority, RetrainResponse, Severity,
};

/// Builder for test alerts
pub struct AlertBuilder {
    alert: Alert,
}

impl AlertBuilder {
    pub fn new(id: &str) -> Self {
        Self {
            alert: Alert {
                id: id.to_string(),
                priority: Priority::Medium,
                description: format!("Alert {}", id),
                source: "10.0.0.1".to_string(),
                timestamp: "2024-07-29T10:00:00Z".to_string(),
                status: AlertStatus::New,
                alert_type: None,
                confidence: None,
            },
        }
    }

    pub fn priority(mut self, priority: Priority) -> Self {
        self.alert.priority = priority;
        self
    }

    pub fn status(mut self, status: AlertStatus) -> Self {
        self.alert.status = status;
        self
    }

    pub fn description(mut self, description: &str) -> Self {
        self.alert.description = description.to_string();
        self
    }

    pub fn source(mut self, source: &str) -> Self {
        self.alert.source = source.to_string();
        self
    }

    pub fn timestamp(mut self, timestamp: &str) -> Self {
        self.alert.timestamp = timestamp.to_string();
        self
    }

    pub fn build(self) -> Alert {
        self.alert
    }
}

/// Builder for test incidents
pub struct IncidentBuilder {
    incident: Incident,
}

impl IncidentBuilder {
    pub fn new(id: &str) -> Self {
        Self {
            incident: Incident {
                id: id.to_string(),
                title: format!("Incident {}", id),
                summary: format!("Summary of {}", id),
                status: IncidentStatus::Open,
                severity: Severity::Medium,
                assigned_to: "Analyst".to_string(),
                created_at: "2024-07-29T09:00:00Z".to_string(),
                last_updated_at: "2024-07-29T10:00:00Z".to_string(),
                related_alert_ids: Vec::new(),
                description: None,
                affected_systems: None,
                alerts_count: None,
            },
        }
    }

    pub fn title(mut self, title: &str) -> Self {
        self.incident.title = title.to_string();
        self
    }

    pub fn severity(mut self, severity: Severity) -> Self {
        self.incident.severity = severity;
        self
    }

    pub fn status(mut self, status: IncidentStatus) -> Self {
        self.incident.status = status;
        self
    }

    pub fn related(mut self, ids: &[&str]) -> Self {
        self.incident.related_alert_ids = ids.iter().map(|id| id.to_string()).collect();
        self
    }

    pub fn last_updated(mut self, timestamp: &str) -> Self {
        self.incident.last_updated_at = timestamp.to_string();
        self
    }

    pub fn build(self) -> Incident {
        self.incident
    }
}

/// `n` alerts `a1..an` with distinct, increasing timestamps.
pub fn numbered_alerts(n: usize) -> Vec<Alert> {
    (1..=n)
        .map(|i| {
            AlertBuilder::new(&format!("a{}", i))
                .timestamp(&format!("2024-07-29T{:02}:{:02}:00Z", i / 60, i % 60))
                .build()
        })
        .collect()
}

pub fn sample_stats(recent: Vec<Alert>) -> DashboardStats {
    DashboardStats {
        total_alerts: 57,
        critical_alerts: 5,
        open_incidents: 3,
        total_incidents: 4,
        model_metrics: ModelMetrics {
            accuracy: 0.9512,
            ..Default::default()
        },
        recent_alerts: recent,
        recent_incidents: Vec::new(),
    }
}

fn server_error() -> DashError {
    DashError::Request {
        status: 500,
        reason: "Internal Server Error".to_string(),
    }
}

#[derive(Default)]
struct MockState {
    alerts: Vec<Alert>,
    incidents: Vec<Incident>,
    stats: Option<DashboardStats>,
    fail_stats: bool,
    fail_lists: bool,
    fail_updates: bool,
    alert_delays: HashMap<usize, Duration>,
    alert_queries: Vec<ListQuery>,
    incident_queries: Vec<ListQuery>,
    update_calls: usize,
}

/// In-memory backend. Clones share state, so a test can keep a handle
/// while the orchestrator owns another.
#[derive(Clone, Default)]
pub struct MockGateway {
    state: Arc<Mutex<MockState>>,
}

impl MockGateway {
    pub fn new(alerts: Vec<Alert>, incidents: Vec<Incident>) -> Self {
        let gateway = Self::default();
        {
            let mut state = gateway.state.lock().unwrap();
            state.stats = Some(sample_stats(alerts.iter().take(4).cloned().collect()));
            state.alerts = alerts;
            state.incidents = incidents;
        }
        gateway
    }

    /// Make the stats endpoint fail, which fails the startup load.
    pub fn fail_stats(&self, fail: bool) {
        self.state.lock().unwrap().fail_stats = fail;
    }

    pub fn fail_lists(&self, fail: bool) {
        self.state.lock().unwrap().fail_lists = fail;
    }

    pub fn fail_updates(&self, fail: bool) {
        self.state.lock().unwrap().fail_updates = fail;
    }

    /// Delay every alert list response for `page`.
    pub fn delay_alert_page(&self, page: usize, delay: Duration) {
        self.state.lock().unwrap().alert_delays.insert(page, delay);
    }

    pub fn set_alerts(&self, alerts: Vec<Alert>) {
        self.state.lock().unwrap().alerts = alerts;
    }

    pub fn set_incidents(&self, incidents: Vec<Incident>) {
        self.state.lock().unwrap().incidents = incidents;
    }

    pub fn alert_queries(&self) -> Vec<ListQuery> {
        self.state.lock().unwrap().alert_queries.clone()
    }

    pub fn incident_queries(&self) -> Vec<ListQuery> {
        self.state.lock().unwrap().incident_queries.clone()
    }

    pub fn update_calls(&self) -> usize {
        self.state.lock().unwrap().update_calls
    }

    pub fn stored_alert(&self, id: &str) -> Option<Alert> {
        self.state
            .lock()
            .unwrap()
            .alerts
            .iter()
            .find(|a| a.id == id)
            .cloned()
    }
}

/// Filter and paginate like the backend: filters from the query, the
/// default sort, then the requested page.
fn serve<T: Listable>(items: &[T], query: &ListQuery) -> Result<Page<T>> {
    let mut state: ListState<T> = ListState::new(query.per_page);
    for (name, value) in &query.filters {
        if *name == "search" {
            state.set_search(value.clone());
        } else {
            state.set_filter(name, value)?;
        }
    }
    let total = project(items, &state).total_matching;
    state.set_page(query.page)?;
    let page_items = project(items, &state)
        .visible
        .into_iter()
        .cloned()
        .collect();
    Ok(Page {
        items: page_items,
        total,
        page: query.page,
        per_page: query.per_page,
        total_pages: page_count(total, query.per_page),
    })
}

impl Gateway for MockGateway {
    async fn health(&self) -> Result<HealthStatus> {
        Ok(HealthStatus {
            status: "ok".to_string(),
            model_loaded: true,
            timestamp: "2024-07-29T10:00:00Z".to_string(),
        })
    }

    async fn predict(&self, _features: &Map<String, Value>) -> Result<PredictionResult> {
        Err(DashError::Other("predict is not scripted".to_string()))
    }

    async fn dashboard_stats(&self) -> Result<DashboardStats> {
        let state = self.state.lock().unwrap();
        if state.fail_stats {
            return Err(server_error());
        }
        state
            .stats
            .clone()
            .ok_or_else(|| DashError::Other("no stats".to_string()))
    }

    async fn list_alerts(&self, query: &ListQuery) -> Result<Page<Alert>> {
        let delay = {
            let mut state = self.state.lock().unwrap();
            state.alert_queries.push(query.clone());
            state.alert_delays.get(&query.page).copied()
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        let state = self.state.lock().unwrap();
        if state.fail_lists {
            return Err(server_error());
        }
        serve(&state.alerts, query)
    }

    async fn list_incidents(&self, query: &ListQuery) -> Result<Page<Incident>> {
        let mut state = self.state.lock().unwrap();
        state.incident_queries.push(query.clone());
        if state.fail_lists {
            return Err(server_error());
        }
        serve(&state.incidents, query)
    }

    async fn get_alert(&self, id: &str) -> Result<Alert> {
        self.stored_alert(id)
            .ok_or_else(|| DashError::AlertNotFound(id.to_string()))
    }

    async fn get_incident(&self, id: &str) -> Result<Incident> {
        let state = self.state.lock().unwrap();
        state
            .incidents
            .iter()
            .find(|i| i.id == id)
            .cloned()
            .ok_or_else(|| DashError::IncidentNotFound(id.to_string()))
    }

    async fn update_alert_status(&self, id: &str, status: AlertStatus) -> Result<Alert> {
        let mut state = self.state.lock().unwrap();
        state.update_calls += 1;
        if state.fail_updates {
            return Err(server_error());
        }
        let alert = state
            .alerts
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(|| DashError::AlertNotFound(id.to_string()))?;
        alert.status = status;
        Ok(alert.clone())
    }

    async fn update_incident_status(&self, id: &str, status: IncidentStatus) -> Result<Incident> {
        let mut state = self.state.lock().unwrap();
        state.update_calls += 1;
        if state.fail_updates {
            return Err(server_error());
        }
        let incident = state
            .incidents
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or_else(|| DashError::IncidentNotFound(id.to_string()))?;
        incident.status = status;
        incident.last_updated_at = "2024-07-30T00:00:00Z".to_string();
        Ok(incident.clone())
    }

    async fn model_metrics(&self) -> Result<ModelMetrics> {
        Ok(ModelMetrics::default())
    }

    async fn retrain_model(&self) -> Result<RetrainResponse> {
        Ok(RetrainResponse {
            status: "started".to_string(),
            message: "Retraining started".to_string(),
        })
    }
}
