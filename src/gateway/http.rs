use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value, json};
use tracing::debug;
use url::Url;

use crate::config::{Config, parse_api_url};
use crate::error::{DashError, Result};
use crate::gateway::{AlertsResponse, Gateway, IncidentsResponse, ListQuery, Page};
use crate::types::{
    Alert, AlertStatus, DashboardStats, HealthStatus, Incident, IncidentStatus, ModelMetrics,
    PredictionResult, RetrainResponse,
};

/// Gateway backed by the backend's JSON-over-HTTP API.
#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: Client,
    base_url: Url,
}

impl HttpGateway {
    /// Create a gateway from configuration
    ///
    /// Uses the configured request and connect timeouts and the effective
    /// API URL (`IDSDASH_API_URL` wins over the config file).
    pub fn from_config(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .connect_timeout(config.connect_timeout())
            .build()?;

        Ok(Self {
            client,
            base_url: config.api_url()?,
        })
    }

    /// Create a gateway for `base_url` with 30s total and 10s connect timeouts
    pub fn new(base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            client,
            base_url: parse_api_url(base_url)?,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| DashError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        url: Url,
        params: &[(String, String)],
        body: Option<&Value>,
    ) -> Result<T> {
        debug!(%method, %url, "backend request");

        let mut request = self
            .client
            .request(method, url)
            .header(CONTENT_TYPE, "application/json");
        if !params.is_empty() {
            request = request.query(params);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(request_error(status, &text));
        }

        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn get<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T> {
        self.send(Method::GET, self.endpoint(segments)?, &[], None)
            .await
    }
}

/// Non-2xx responses carry the canonical reason phrase, or the body text
/// when the status has none.
fn request_error(status: StatusCode, body: &str) -> DashError {
    let reason = status
        .canonical_reason()
        .map(str::to_string)
        .unwrap_or_else(|| body.trim().to_string());
    DashError::Request {
        status: status.as_u16(),
        reason,
    }
}

fn not_found_as(err: DashError, missing: impl FnOnce() -> DashError) -> DashError {
    match err.status() {
        Some(404) => missing(),
        _ => err,
    }
}

impl Gateway for HttpGateway {
    async fn health(&self) -> Result<HealthStatus> {
        self.get(&["health"]).await
    }

    async fn predict(&self, features: &Map<String, Value>) -> Result<PredictionResult> {
        let body = Value::Object(features.clone());
        self.send(Method::POST, self.endpoint(&["predict"])?, &[], Some(&body))
            .await
    }

    async fn dashboard_stats(&self) -> Result<DashboardStats> {
        self.get(&["dashboard", "stats"]).await
    }

    async fn list_alerts(&self, query: &ListQuery) -> Result<Page<Alert>> {
        let response: AlertsResponse = self
            .send(
                Method::GET,
                self.endpoint(&["alerts"])?,
                &query.to_params(),
                None,
            )
            .await?;
        Ok(response.into())
    }

    async fn list_incidents(&self, query: &ListQuery) -> Result<Page<Incident>> {
        let response: IncidentsResponse = self
            .send(
                Method::GET,
                self.endpoint(&["incidents"])?,
                &query.to_params(),
                None,
            )
            .await?;
        Ok(response.into())
    }

    async fn get_alert(&self, id: &str) -> Result<Alert> {
        self.get(&["alerts", id])
            .await
            .map_err(|e| not_found_as(e, || DashError::AlertNotFound(id.to_string())))
    }

    async fn get_incident(&self, id: &str) -> Result<Incident> {
        self.get(&["incidents", id])
            .await
            .map_err(|e| not_found_as(e, || DashError::IncidentNotFound(id.to_string())))
    }

    async fn update_alert_status(&self, id: &str, status: AlertStatus) -> Result<Alert> {
        let body = json!({ "status": status });
        self.send(
            Method::PATCH,
            self.endpoint(&["alerts", id, "status"])?,
            &[],
            Some(&body),
        )
        .await
        .map_err(|e| not_found_as(e, || DashError::AlertNotFound(id.to_string())))
    }

    async fn update_incident_status(&self, id: &str, status: IncidentStatus) -> Result<Incident> {
        let body = json!({ "status": status });
        self.send(
            Method::PATCH,
            self.endpoint(&["incidents", id, "status"])?,
            &[],
            Some(&body),
        )
        .await
        .map_err(|e| not_found_as(e, || DashError::IncidentNotFound(id.to_string())))
    }

    async fn model_metrics(&self) -> Result<ModelMetrics> {
        self.get(&["model", "metrics"]).await
    }

    async fn retrain_model(&self) -> Result<RetrainResponse> {
        self.send(Method::POST, self.endpoint(&["model", "retrain"])?, &[], None)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_segments() {
        let gateway = HttpGateway::new("http://localhost:5000/api").unwrap();
        assert_eq!(
            gateway.endpoint(&["alerts", "a1", "status"]).unwrap().as_str(),
            "http://localhost:5000/api/alerts/a1/status"
        );

        let trailing = HttpGateway::new("http://localhost:5000/api/").unwrap();
        assert_eq!(
            trailing.endpoint(&["dashboard", "stats"]).unwrap().as_str(),
            "http://localhost:5000/api/dashboard/stats"
        );
    }

    #[test]
    fn test_endpoint_escapes_ids() {
        let gateway = HttpGateway::new("http://localhost:5000/api").unwrap();
        assert_eq!(
            gateway.endpoint(&["alerts", "a/1"]).unwrap().as_str(),
            "http://localhost:5000/api/alerts/a%2F1"
        );
    }

    #[test]
    fn test_request_error_reason() {
        let err = request_error(StatusCode::SERVICE_UNAVAILABLE, "");
        assert_eq!(err.to_string(), "API request failed: 503 Service Unavailable");

        let custom = StatusCode::from_u16(599).unwrap();
        let err = request_error(custom, " backend melted \n");
        assert_eq!(err.to_string(), "API request failed: 599 backend melted");
    }

    #[test]
    fn test_new_rejects_non_http_url() {
        assert!(matches!(
            HttpGateway::new("file:///tmp/api"),
            Err(DashError::InvalidUrl(_))
        ));
    }
}
