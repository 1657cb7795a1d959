use serde_json::{Value, json};

use super::{is_offline, render_page, startup};
use crate::dispatch::{Page, RECENT_ALERTS};
use crate::error::Result;
use crate::list::{Listable, SortDirection};
use crate::orchestrator::{ListKind, ListSlot, ListView};

/// List selection given on the command line.
#[derive(Debug, Clone, Default)]
pub struct ListOptions {
    pub page: Option<usize>,
    pub per_page: Option<usize>,
    /// `(filter name, value)` pairs, e.g. `("priority", "High")`
    pub filters: Vec<(&'static str, String)>,
    pub search: Option<String>,
    pub sort: Option<String>,
    pub direction: Option<SortDirection>,
}

impl ListOptions {
    /// Apply to a slot's state. Returns false when no option was given.
    ///
    /// A sort column without a direction sorts ascending; a direction
    /// without a column applies to the current sort column.
    fn apply_to<T: Listable>(&self, slot: &mut ListSlot<T>) -> Result<bool> {
        let state = &mut slot.state;
        let mut changed = false;

        if let Some(per_page) = self.per_page {
            state.set_items_per_page(per_page)?;
            changed = true;
        }
        for (name, value) in &self.filters {
            state.set_filter(name, value)?;
            changed = true;
        }
        if let Some(search) = &self.search {
            state.set_search(search.clone());
            changed = true;
        }
        if let Some(column) = &self.sort {
            state.sort_column = column.parse()?;
            state.sort_direction = self.direction.unwrap_or_default();
            changed = true;
        } else if let Some(direction) = self.direction {
            state.sort_direction = direction;
            changed = true;
        }
        if let Some(page) = self.page {
            state.set_page(page)?;
            changed = true;
        }
        Ok(changed)
    }
}

fn page_json<T: serde::Serialize>(key: &str, view: &ListView<'_, T>, offline: bool) -> Value {
    let mut value = json!({
        "page": view.page,
        "page_count": view.page_count,
        "per_page": view.per_page,
        "total": view.total_matching,
        "offline": offline,
    });
    value[key] = json!(view.rows);
    value
}

/// Show the dashboard: stat cards and recent alerts.
pub async fn cmd_dashboard(output_json: bool) -> Result<()> {
    let mut orchestrator = startup().await?;

    if output_json {
        let recent: Vec<_> = match orchestrator.stats() {
            Some(stats) => stats.recent_alerts.iter().take(RECENT_ALERTS).collect(),
            None => orchestrator.alerts().items().iter().take(RECENT_ALERTS).collect(),
        };
        return super::print_json(&json!({
            "stats": orchestrator.stats(),
            "recent_alerts": recent,
            "offline": is_offline(&orchestrator),
        }));
    }

    render_page(&mut orchestrator, Page::Dashboard)
}

/// Show one page of alerts.
pub async fn cmd_alerts(options: ListOptions, output_json: bool) -> Result<()> {
    let mut orchestrator = startup().await?;
    if options.apply_to(orchestrator.alerts_mut())? {
        orchestrator.sync_list(ListKind::Alerts).await;
    }

    if output_json {
        let view = orchestrator.alerts().view();
        return super::print_json(&page_json("alerts", &view, is_offline(&orchestrator)));
    }

    render_page(&mut orchestrator, Page::Alerts)
}

/// Show one page of incidents, optionally with one incident expanded.
pub async fn cmd_incidents(
    options: ListOptions,
    expand: Option<String>,
    output_json: bool,
) -> Result<()> {
    let mut orchestrator = startup().await?;
    if options.apply_to(orchestrator.incidents_mut())? {
        orchestrator.sync_list(ListKind::Incidents).await;
    }
    if let Some(id) = &expand {
        orchestrator.toggle_incident(id)?;
    }

    if output_json {
        let view = orchestrator.incidents().view();
        let mut value = page_json("incidents", &view, is_offline(&orchestrator));
        if let Some(id) = &expand
            && let Some(incident) = orchestrator.incidents().find(id)
        {
            let related: Vec<_> = incident
                .related_alert_ids
                .iter()
                .filter_map(|alert_id| orchestrator.alerts().find(alert_id))
                .collect();
            value["expanded"] = json!({
                "incident": incident,
                "related_alerts": related,
            });
        }
        return super::print_json(&value);
    }

    render_page(&mut orchestrator, Page::Incidents)
}
