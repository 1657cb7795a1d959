//! Typed access to the IDS backend.
//!
//! The [`Gateway`] trait is the seam between the orchestrator and the
//! network. [`HttpGateway`] talks to the real backend; tests drive the
//! orchestrator with in-memory implementations.

mod http;

use std::future::Future;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::Result;
use crate::list::{FilterSet, ListState, Listable};
use crate::types::{
    Alert, AlertStatus, DashboardStats, HealthStatus, Incident, IncidentStatus, ModelMetrics,
    PredictionResult, RetrainResponse,
};

pub use http::HttpGateway;

/// One page of a server-paginated list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: usize,
    pub page: usize,
    pub per_page: usize,
    pub total_pages: usize,
}

/// Page and filter parameters of a list request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub page: usize,
    pub per_page: usize,
    pub filters: Vec<(&'static str, String)>,
}

impl ListQuery {
    pub fn new(page: usize, per_page: usize) -> Self {
        Self {
            page,
            per_page,
            filters: Vec::new(),
        }
    }

    /// Query for the page currently selected in `state`.
    pub fn from_state<T: Listable>(state: &ListState<T>) -> Self {
        Self {
            page: state.current_page,
            per_page: state.items_per_page,
            filters: state.filters.query_params(),
        }
    }

    pub fn with_filters(mut self, filters: Vec<(&'static str, String)>) -> Self {
        self.filters = filters;
        self
    }

    /// `page`, `per_page`, then the active filters, as request parameters.
    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params = vec![
            ("page".to_string(), self.page.to_string()),
            ("per_page".to_string(), self.per_page.to_string()),
        ];
        params.extend(
            self.filters
                .iter()
                .map(|(name, value)| (name.to_string(), value.clone())),
        );
        params
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct AlertsResponse {
    alerts: Vec<Alert>,
    total: usize,
    page: usize,
    per_page: usize,
    total_pages: usize,
}

impl From<AlertsResponse> for Page<Alert> {
    fn from(r: AlertsResponse) -> Self {
        Page {
            items: r.alerts,
            total: r.total,
            page: r.page,
            per_page: r.per_page,
            total_pages: r.total_pages,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct IncidentsResponse {
    incidents: Vec<Incident>,
    total: usize,
    page: usize,
    per_page: usize,
    total_pages: usize,
}

impl From<IncidentsResponse> for Page<Incident> {
    fn from(r: IncidentsResponse) -> Self {
        Page {
            items: r.incidents,
            total: r.total,
            page: r.page,
            per_page: r.per_page,
            total_pages: r.total_pages,
        }
    }
}

/// Request/response operations against the backend. None of them retry or
/// cache, and concurrent calls may complete in any order.
pub trait Gateway: Send + Sync {
    fn health(&self) -> impl Future<Output = Result<HealthStatus>> + Send;

    /// Run the classifier over an arbitrary named feature map.
    fn predict(
        &self,
        features: &Map<String, Value>,
    ) -> impl Future<Output = Result<PredictionResult>> + Send;

    fn dashboard_stats(&self) -> impl Future<Output = Result<DashboardStats>> + Send;

    fn list_alerts(&self, query: &ListQuery) -> impl Future<Output = Result<Page<Alert>>> + Send;

    fn list_incidents(
        &self,
        query: &ListQuery,
    ) -> impl Future<Output = Result<Page<Incident>>> + Send;

    fn get_alert(&self, id: &str) -> impl Future<Output = Result<Alert>> + Send;

    fn get_incident(&self, id: &str) -> impl Future<Output = Result<Incident>> + Send;

    fn update_alert_status(
        &self,
        id: &str,
        status: AlertStatus,
    ) -> impl Future<Output = Result<Alert>> + Send;

    fn update_incident_status(
        &self,
        id: &str,
        status: IncidentStatus,
    ) -> impl Future<Output = Result<Incident>> + Send;

    fn model_metrics(&self) -> impl Future<Output = Result<ModelMetrics>> + Send;

    fn retrain_model(&self) -> impl Future<Output = Result<RetrainResponse>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Incident;

    #[test]
    fn test_query_params_order() {
        let query = ListQuery::new(2, 10).with_filters(vec![("priority", "High".to_string())]);
        assert_eq!(
            query.to_params(),
            vec![
                ("page".to_string(), "2".to_string()),
                ("per_page".to_string(), "10".to_string()),
                ("priority".to_string(), "High".to_string()),
            ]
        );
    }

    #[test]
    fn test_query_from_state_skips_all_sentinel() {
        let mut state: ListState<Incident> = ListState::new(10);
        state.set_filter("severity", "all").unwrap();
        state.set_search("");
        state.set_page(3).unwrap();
        let query = ListQuery::from_state(&state);
        assert_eq!(query.page, 3);
        assert!(query.filters.is_empty());
    }

    #[test]
    fn test_alerts_response_into_page() {
        let json = r#"{"alerts": [], "total": 0, "page": 1, "per_page": 10, "total_pages": 0}"#;
        let response: AlertsResponse = serde_json::from_str(json).unwrap();
        let page: Page<Alert> = response.into();
        assert!(page.items.is_empty());
        assert_eq!(page.per_page, 10);
    }
}
