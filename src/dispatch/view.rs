//! Pure view-model computation.
//!
//! Everything a renderer needs for one frame is derived here from the
//! orchestrator, the active page and the theme. Nothing in this module
//! mutates state or performs I/O.

use std::fmt;

use crate::dispatch::page::{Page, UNDER_CONSTRUCTION};
use crate::gateway::Gateway;
use crate::list::{AlertColumn, FilterControl, FilterSet, IncidentColumn, Listable, SortDirection};
use crate::orchestrator::{ListSlot, LoadPhase, Orchestrator};
use crate::theme::Theme;
use crate::types::{Alert, AlertStatus, Incident, IncidentStatus, Priority};

/// Number of alerts previewed on the dashboard.
pub const RECENT_ALERTS: usize = 4;

pub const NO_ALERTS: &str = "No alerts found.";
pub const NO_INCIDENTS: &str = "No incidents found.";

const ALERT_HEADERS: &[(AlertColumn, &str)] = &[
    (AlertColumn::Priority, "Priority"),
    (AlertColumn::Timestamp, "Timestamp"),
    (AlertColumn::Description, "Description"),
    (AlertColumn::Source, "Source IP"),
    (AlertColumn::Status, "Status"),
];

const INCIDENT_HEADERS: &[(IncidentColumn, &str)] = &[
    (IncidentColumn::Severity, "Severity"),
    (IncidentColumn::Title, "Title"),
    (IncidentColumn::Status, "Status"),
    (IncidentColumn::AssignedTo, "Assigned To"),
    (IncidentColumn::LastUpdatedAt, "Last Updated"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortIndicator {
    Asc,
    Desc,
    Unsorted,
}

impl SortIndicator {
    pub fn symbol(&self) -> &'static str {
        match self {
            SortIndicator::Asc => "▲",
            SortIndicator::Desc => "▼",
            SortIndicator::Unsorted => "",
        }
    }
}

/// A sortable column header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    /// Name accepted by `sort <column>`
    pub column: String,
    pub label: &'static str,
    pub indicator: SortIndicator,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toolbar {
    pub search: String,
    pub filters: Vec<FilterControl>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub start: usize,
    pub end: usize,
    pub total: usize,
    pub page: usize,
    pub page_count: usize,
    pub prev_enabled: bool,
    pub next_enabled: bool,
}

impl Pagination {
    pub fn new(page: usize, page_count: usize, per_page: usize, total: usize, shown: usize) -> Self {
        let (start, end) = if total == 0 || shown == 0 {
            (0, 0)
        } else {
            let start = page.saturating_sub(1) * per_page + 1;
            (start, start + shown - 1)
        };
        Self {
            start,
            end,
            total,
            page,
            page_count,
            prev_enabled: page > 1,
            next_enabled: page < page_count,
        }
    }

    pub fn range_label(&self) -> String {
        format!("Showing {}-{} of {}", self.start, self.end, self.total)
    }

    pub fn page_label(&self) -> String {
        format!("Page {} of {}", self.page, self.page_count)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AlertsView {
    pub toolbar: Toolbar,
    pub headers: Vec<Header>,
    pub rows: Vec<Alert>,
    pub pagination: Pagination,
    pub empty_message: Option<&'static str>,
}

/// Summary and related alerts of the expanded incident.
#[derive(Debug, Clone, PartialEq)]
pub struct IncidentDetail {
    pub summary: String,
    /// Related alerts that resolve against the loaded alerts, in reference order
    pub related: Vec<Alert>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IncidentRow {
    pub incident: Incident,
    pub detail: Option<IncidentDetail>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IncidentsView {
    pub toolbar: Toolbar,
    pub headers: Vec<Header>,
    pub rows: Vec<IncidentRow>,
    pub pagination: Pagination,
    pub empty_message: Option<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatCard {
    pub title: &'static str,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    pub cards: Vec<StatCard>,
    pub recent_alerts: Vec<Alert>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    Loading,
    Dashboard(DashboardView),
    Alerts(AlertsView),
    Incidents(IncidentsView),
    Placeholder {
        title: &'static str,
        message: &'static str,
    },
}

/// A console command that is valid on the current frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Affordance {
    pub command: String,
    pub description: &'static str,
}

impl Affordance {
    fn new(command: impl Into<String>, description: &'static str) -> Self {
        Self {
            command: command.into(),
            description,
        }
    }
}

/// Everything needed to draw one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewModel {
    pub page: Page,
    pub title: &'static str,
    pub theme: Theme,
    pub loading: bool,
    /// Serving fallback data because the backend was unreachable
    pub offline: bool,
    pub notice: Option<String>,
    pub body: Body,
    pub affordances: Vec<Affordance>,
}

pub fn compute_view_model<G: Gateway>(
    orchestrator: &Orchestrator<G>,
    page: Page,
    theme: Theme,
) -> ViewModel {
    let loading = orchestrator.phase().is_loading();
    let body = if loading {
        Body::Loading
    } else {
        match page {
            Page::Dashboard => Body::Dashboard(compute_dashboard(orchestrator)),
            Page::Alerts => Body::Alerts(compute_alerts_view(orchestrator.alerts())),
            Page::Incidents => Body::Incidents(compute_incidents_view(
                orchestrator.incidents(),
                orchestrator.alerts().items(),
            )),
            Page::Analytics | Page::RlModel | Page::Reports => Body::Placeholder {
                title: page.placeholder_title().unwrap_or(page.label()),
                message: UNDER_CONSTRUCTION,
            },
        }
    };
    let affordances = compute_affordances(page, &body);

    ViewModel {
        page,
        title: page.label(),
        theme,
        loading,
        offline: orchestrator.phase() == LoadPhase::Fallback,
        notice: orchestrator.notice().map(str::to_string),
        body,
        affordances,
    }
}

fn headers<C: Copy + PartialEq + fmt::Display>(
    defs: &[(C, &'static str)],
    active: C,
    direction: SortDirection,
) -> Vec<Header> {
    defs.iter()
        .map(|&(column, label)| Header {
            column: column.to_string(),
            label,
            indicator: match (column == active, direction) {
                (false, _) => SortIndicator::Unsorted,
                (true, SortDirection::Asc) => SortIndicator::Asc,
                (true, SortDirection::Desc) => SortIndicator::Desc,
            },
        })
        .collect()
}

fn toolbar<T: Listable>(slot: &ListSlot<T>) -> Toolbar {
    Toolbar {
        search: slot.state.filters.search().to_string(),
        filters: slot.state.filters.controls(),
    }
}

pub fn compute_alerts_view(slot: &ListSlot<Alert>) -> AlertsView {
    let view = slot.view();
    let pagination = Pagination::new(
        view.page,
        view.page_count,
        view.per_page,
        view.total_matching,
        view.rows.len(),
    );
    AlertsView {
        toolbar: toolbar(slot),
        headers: headers(ALERT_HEADERS, slot.state.sort_column, slot.state.sort_direction),
        empty_message: view.rows.is_empty().then_some(NO_ALERTS),
        rows: view.rows.into_iter().cloned().collect(),
        pagination,
    }
}

/// Incident table plus the expanded detail. Related alert ids are looked
/// up in `alerts`; ids that do not resolve are left out.
pub fn compute_incidents_view(slot: &ListSlot<Incident>, alerts: &[Alert]) -> IncidentsView {
    let view = slot.view();
    let expanded = slot.state.expanded_id.as_deref();
    let pagination = Pagination::new(
        view.page,
        view.page_count,
        view.per_page,
        view.total_matching,
        view.rows.len(),
    );

    let rows = view
        .rows
        .iter()
        .map(|incident| IncidentRow {
            incident: (*incident).clone(),
            detail: (expanded == Some(incident.id.as_str())).then(|| IncidentDetail {
                summary: incident.summary.clone(),
                related: incident
                    .related_alert_ids
                    .iter()
                    .filter_map(|id| alerts.iter().find(|a| &a.id == id))
                    .cloned()
                    .collect(),
            }),
        })
        .collect();

    IncidentsView {
        toolbar: toolbar(slot),
        headers: headers(
            INCIDENT_HEADERS,
            slot.state.sort_column,
            slot.state.sort_direction,
        ),
        empty_message: view.rows.is_empty().then_some(NO_INCIDENTS),
        rows,
        pagination,
    }
}

/// Stat cards and recent alerts: from backend stats when available,
/// otherwise derived from the resident data.
pub fn compute_dashboard<G: Gateway>(orchestrator: &Orchestrator<G>) -> DashboardView {
    match orchestrator.stats() {
        Some(stats) => DashboardView {
            cards: vec![
                card("Active Alerts", stats.total_alerts),
                card("Open Incidents", stats.open_incidents),
                card("Critical Alerts", stats.critical_alerts),
                StatCard {
                    title: "Model Accuracy",
                    value: format!("{:.1}%", stats.model_metrics.accuracy * 100.0),
                },
            ],
            recent_alerts: stats.recent_alerts.iter().take(RECENT_ALERTS).cloned().collect(),
        },
        None => {
            let alerts = orchestrator.alerts().items();
            let incidents = orchestrator.incidents().items();
            let count = |n: usize| n as u64;
            DashboardView {
                cards: vec![
                    card(
                        "Active Alerts",
                        count(alerts.iter().filter(|a| a.status != AlertStatus::Resolved).count()),
                    ),
                    card(
                        "Open Incidents",
                        count(incidents.iter().filter(|i| i.status.is_active()).count()),
                    ),
                    card(
                        "Critical Alerts",
                        count(alerts.iter().filter(|a| a.priority == Priority::Critical).count()),
                    ),
                    StatCard {
                        title: "Model Accuracy",
                        value: "n/a".to_string(),
                    },
                ],
                recent_alerts: alerts.iter().take(RECENT_ALERTS).cloned().collect(),
            }
        }
    }
}

fn card(title: &'static str, value: u64) -> StatCard {
    StatCard {
        title,
        value: value.to_string(),
    }
}

/// Commands valid for the frame, in display order.
pub fn compute_affordances(page: Page, body: &Body) -> Vec<Affordance> {
    let mut out = Vec::new();

    match body {
        Body::Loading => {}
        Body::Alerts(view) => {
            list_affordances(&mut out, &view.toolbar, &view.pagination);
            if !view.rows.is_empty() {
                out.push(Affordance::new("ack <id>", "acknowledge an alert"));
                out.push(Affordance::new("resolve <id>", "resolve an alert"));
            }
        }
        Body::Incidents(view) => {
            list_affordances(&mut out, &view.toolbar, &view.pagination);
            if !view.rows.is_empty() {
                out.push(Affordance::new("expand <id>", "show or hide incident detail"));
                let statuses: Vec<&str> = IncidentStatus::ALL.iter().map(|s| s.as_str()).collect();
                out.push(Affordance::new(
                    format!("status <id> <{}>", statuses.join("|")),
                    "change incident status",
                ));
            }
        }
        Body::Dashboard(view) => {
            if !view.recent_alerts.is_empty() {
                out.push(Affordance::new("ack <id>", "acknowledge an alert"));
            }
        }
        Body::Placeholder { .. } => {}
    }

    if !matches!(body, Body::Loading) {
        let others: Vec<&str> = Page::ALL
            .iter()
            .filter(|p| **p != page)
            .map(|p| p.as_str())
            .collect();
        out.push(Affordance::new(
            format!("goto <{}>", others.join("|")),
            "switch page",
        ));
        out.push(Affordance::new("theme", "toggle light/dark"));
        out.push(Affordance::new("refresh", "reload from the backend"));
    }
    out.push(Affordance::new("help", "list commands"));
    out.push(Affordance::new("quit", "exit"));
    out
}

fn list_affordances(out: &mut Vec<Affordance>, toolbar: &Toolbar, pagination: &Pagination) {
    if pagination.prev_enabled {
        out.push(Affordance::new("prev", "previous page"));
    }
    if pagination.next_enabled {
        out.push(Affordance::new("next", "next page"));
    }
    if pagination.page_count > 1 {
        out.push(Affordance::new(
            format!("page <1-{}>", pagination.page_count),
            "jump to page",
        ));
    }
    for control in &toolbar.filters {
        out.push(Affordance::new(
            format!("filter {} <{}>", control.name, control.options.join("|")),
            "filter rows",
        ));
    }
    out.push(Affordance::new("search <text>", "search rows"));
    out.push(Affordance::new("sort <column>", "sort by column"));
    out.push(Affordance::new("reset", "clear filters and sort"));
}
