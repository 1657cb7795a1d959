//! Fetch-or-fallback coordination for the two lists and dashboard stats.
//!
//! Startup issues the three loads concurrently. If all succeed the
//! orchestrator is `Ready` and every later state change refetches the
//! affected list; if any fails it switches to `Fallback`, synthesizes an
//! offline dataset and serves every later change from memory. The two
//! modes never mix.

mod sequence;
mod slot;

use jiff::Timestamp;
use rand::Rng;
use tracing::{info, warn};

use crate::config::Config;
use crate::error::{DashError, Result};
use crate::fallback;
use crate::gateway::{Gateway, ListQuery, Page};
use crate::types::{Alert, AlertStatus, DashboardStats, Incident, IncidentStatus};

pub use sequence::{RequestSequencer, RequestTicket};
pub use slot::{FetchOutcome, ListAction, ListSlot, ListView, PendingFetch, Residency};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadPhase {
    Idle,
    Loading,
    Ready,
    Fallback,
}

impl LoadPhase {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadPhase::Loading)
    }
}

/// Which list an action targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    Alerts,
    Incidents,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadSettings {
    pub items_per_page: usize,
    pub startup_page_size: usize,
}

impl Default for LoadSettings {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&Config> for LoadSettings {
    fn from(config: &Config) -> Self {
        Self {
            items_per_page: config.items_per_page,
            startup_page_size: config.startup_page_size,
        }
    }
}

type StartupData = (DashboardStats, Page<Alert>, Page<Incident>);

pub struct Orchestrator<G> {
    gateway: G,
    settings: LoadSettings,
    phase: LoadPhase,
    alerts: ListSlot<Alert>,
    incidents: ListSlot<Incident>,
    stats: Option<DashboardStats>,
    notice: Option<String>,
}

impl<G: Gateway> Orchestrator<G> {
    pub fn new(gateway: G, settings: LoadSettings) -> Self {
        Self {
            gateway,
            settings,
            phase: LoadPhase::Idle,
            alerts: ListSlot::new(settings.items_per_page),
            incidents: ListSlot::new(settings.items_per_page),
            stats: None,
            notice: None,
        }
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub fn phase(&self) -> LoadPhase {
        self.phase
    }

    pub fn alerts(&self) -> &ListSlot<Alert> {
        &self.alerts
    }

    pub fn alerts_mut(&mut self) -> &mut ListSlot<Alert> {
        &mut self.alerts
    }

    pub fn incidents(&self) -> &ListSlot<Incident> {
        &self.incidents
    }

    pub fn incidents_mut(&mut self) -> &mut ListSlot<Incident> {
        &mut self.incidents
    }

    /// Stats from the last successful startup load. None in fallback.
    pub fn stats(&self) -> Option<&DashboardStats> {
        self.stats.as_ref()
    }

    /// Message for the operator about the last failed action, if any.
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn set_notice(&mut self, message: impl Into<String>) {
        self.notice = Some(message.into());
    }

    pub fn clear_notice(&mut self) {
        self.notice = None;
    }

    /// Enter `Loading`. Callers render once after this and before `load`.
    pub fn begin_loading(&mut self) {
        if self.phase != LoadPhase::Loading {
            info!(from = ?self.phase, "loading dashboard data");
        }
        self.phase = LoadPhase::Loading;
    }

    /// Startup load: stats and both lists concurrently, or fallback data.
    pub async fn load(&mut self) -> LoadPhase {
        self.begin_loading();
        let fetched = self.fetch_startup().await;
        self.finish_startup(fetched, &mut rand::rng(), Timestamp::now())
    }

    /// Like [`Orchestrator::load`], with the fallback randomness and clock
    /// supplied by the caller.
    pub async fn load_with<R: Rng + ?Sized>(&mut self, rng: &mut R, now: Timestamp) -> LoadPhase {
        self.begin_loading();
        let fetched = self.fetch_startup().await;
        self.finish_startup(fetched, rng, now)
    }

    async fn fetch_startup(&self) -> Result<StartupData> {
        let alert_query = ListQuery::new(1, self.settings.startup_page_size);
        let incident_query = ListQuery::new(1, self.settings.startup_page_size);
        futures::try_join!(
            self.gateway.dashboard_stats(),
            self.gateway.list_alerts(&alert_query),
            self.gateway.list_incidents(&incident_query),
        )
    }

    fn finish_startup<R: Rng + ?Sized>(
        &mut self,
        fetched: Result<StartupData>,
        rng: &mut R,
        now: Timestamp,
    ) -> LoadPhase {
        match fetched {
            Ok((stats, alerts, incidents)) => {
                info!(
                    alerts = alerts.items.len(),
                    incidents = incidents.items.len(),
                    "backend data loaded"
                );
                self.stats = Some(stats);
                self.alerts.load_snapshot(alerts.items);
                self.incidents.load_snapshot(incidents.items);
                self.phase = LoadPhase::Ready;
            }
            Err(e) => {
                warn!(error = %e, "startup load failed, using offline fallback data");
                let data = fallback::generate(rng, now);
                self.stats = None;
                self.alerts.load_snapshot(data.alerts);
                self.incidents.load_snapshot(data.incidents);
                self.phase = LoadPhase::Fallback;
            }
        }
        self.incidents.reconcile_expanded();
        self.phase
    }

    /// Apply an operator action to one list, then refetch (Ready) or
    /// re-project locally (any other phase). Returns false if nothing changed.
    pub async fn apply_list_action(&mut self, kind: ListKind, action: &ListAction) -> Result<bool> {
        let changed = match kind {
            ListKind::Alerts => self.alerts.apply(action)?,
            ListKind::Incidents => self.incidents.apply(action)?,
        };
        if changed {
            self.sync_list(kind).await;
        }
        Ok(changed)
    }

    /// Bring one list in line with its state after direct state edits.
    pub async fn sync_list(&mut self, kind: ListKind) {
        match (self.phase, kind) {
            (LoadPhase::Ready, ListKind::Alerts) => {
                self.refresh_alerts().await;
            }
            (LoadPhase::Ready, ListKind::Incidents) => {
                self.refresh_incidents().await;
            }
            (_, ListKind::Alerts) => {
                self.alerts.clamp_local();
            }
            (_, ListKind::Incidents) => {
                self.incidents.clamp_local();
                self.incidents.reconcile_expanded();
            }
        }
    }

    /// Scoped refetch of the alert page selected by the current state.
    /// Refetches once more if the response pulled the page back in range.
    pub async fn refresh_alerts(&mut self) -> FetchOutcome {
        let pending = self.alerts.begin_fetch();
        let result = self.gateway.list_alerts(&pending.query).await;
        let outcome = self.alerts.apply_page(pending, result);
        if outcome != (FetchOutcome::Applied { clamped: true }) {
            return outcome;
        }

        let pending = self.alerts.begin_fetch();
        let result = self.gateway.list_alerts(&pending.query).await;
        self.alerts.apply_page(pending, result)
    }

    /// Scoped refetch of the incident page selected by the current state.
    pub async fn refresh_incidents(&mut self) -> FetchOutcome {
        let pending = self.incidents.begin_fetch();
        let result = self.gateway.list_incidents(&pending.query).await;
        let mut outcome = self.incidents.apply_page(pending, result);
        if outcome == (FetchOutcome::Applied { clamped: true }) {
            let pending = self.incidents.begin_fetch();
            let result = self.gateway.list_incidents(&pending.query).await;
            outcome = self.incidents.apply_page(pending, result);
        }
        self.incidents.reconcile_expanded();
        outcome
    }

    /// Expand or collapse one incident's detail row. The id must be loaded.
    pub fn toggle_incident(&mut self, id: &str) -> Result<()> {
        if self.incidents.find(id).is_none() {
            return Err(DashError::IncidentNotFound(id.to_string()));
        }
        self.incidents.state.toggle_expanded(id);
        Ok(())
    }

    /// Change an alert's status.
    ///
    /// Against the backend the resident copy changes only after the
    /// gateway confirms; a failure leaves it untouched and sets the notice.
    /// In fallback the change is applied locally.
    pub async fn update_alert_status(&mut self, id: &str, status: AlertStatus) -> Result<Alert> {
        if self.phase == LoadPhase::Fallback {
            let alert = self
                .alerts
                .find_mut(id)
                .ok_or_else(|| DashError::AlertNotFound(id.to_string()))?;
            alert.status = status;
            let updated = alert.clone();
            self.alerts.clamp_local();
            info!(id, %status, "alert status changed offline");
            return Ok(updated);
        }

        match self.gateway.update_alert_status(id, status).await {
            Ok(updated) => {
                self.alerts.replace(updated.clone());
                if let Some(stats) = self.stats.as_mut()
                    && let Some(recent) = stats.recent_alerts.iter_mut().find(|a| a.id == id)
                {
                    *recent = updated.clone();
                }
                info!(id, %status, "alert status changed");
                Ok(updated)
            }
            Err(e) => {
                warn!(id, error = %e, "alert status update failed");
                self.notice = Some(format!("Could not update alert {}: {}", id, e));
                Err(e)
            }
        }
    }

    /// Change an incident's status. Same policy as alerts.
    pub async fn update_incident_status(
        &mut self,
        id: &str,
        status: IncidentStatus,
    ) -> Result<Incident> {
        if self.phase == LoadPhase::Fallback {
            let incident = self
                .incidents
                .find_mut(id)
                .ok_or_else(|| DashError::IncidentNotFound(id.to_string()))?;
            incident.status = status;
            let updated = incident.clone();
            self.incidents.clamp_local();
            info!(id, %status, "incident status changed offline");
            return Ok(updated);
        }

        match self.gateway.update_incident_status(id, status).await {
            Ok(updated) => {
                self.incidents.replace(updated.clone());
                info!(id, %status, "incident status changed");
                Ok(updated)
            }
            Err(e) => {
                warn!(id, error = %e, "incident status update failed");
                self.notice = Some(format!("Could not update incident {}: {}", id, e));
                Err(e)
            }
        }
    }

    /// A resident alert, or the backend's copy when not resident.
    pub async fn alert(&self, id: &str) -> Result<Alert> {
        if let Some(alert) = self.alerts.find(id) {
            return Ok(alert.clone());
        }
        match self.phase {
            LoadPhase::Fallback => Err(DashError::AlertNotFound(id.to_string())),
            _ => self.gateway.get_alert(id).await,
        }
    }

    /// A resident incident, or the backend's copy when not resident.
    pub async fn incident(&self, id: &str) -> Result<Incident> {
        if let Some(incident) = self.incidents.find(id) {
            return Ok(incident.clone());
        }
        match self.phase {
            LoadPhase::Fallback => Err(DashError::IncidentNotFound(id.to_string())),
            _ => self.gateway.get_incident(id).await,
        }
    }
}
