use std::fmt;
use std::str::FromStr;

use crate::error::{DashError, Result};
use crate::types::{Alert, AlertStatus, Incident, IncidentStatus, Priority, Severity};

/// An enum filter value: the `all` sentinel or one exact value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice<T> {
    All,
    Only(T),
}

impl<T> Default for Choice<T> {
    fn default() -> Self {
        Choice::All
    }
}

impl<T: PartialEq> Choice<T> {
    pub fn matches(&self, value: &T) -> bool {
        match self {
            Choice::All => true,
            Choice::Only(wanted) => wanted == value,
        }
    }
}

impl<T: FromStr<Err = DashError>> Choice<T> {
    /// `all` (any case) is the sentinel; anything else must parse as `T`.
    pub fn parse(raw: &str) -> Result<Self> {
        if raw.trim().eq_ignore_ascii_case("all") {
            Ok(Choice::All)
        } else {
            raw.parse().map(Choice::Only)
        }
    }
}

impl<T: fmt::Display> fmt::Display for Choice<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Choice::All => write!(f, "all"),
            Choice::Only(value) => write!(f, "{}", value),
        }
    }
}

/// One enum filter as shown in a toolbar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterControl {
    pub name: &'static str,
    pub current: String,
    pub options: Vec<String>,
}

impl FilterControl {
    fn new<T: fmt::Display>(name: &'static str, current: &Choice<T>, all: &[T]) -> Self {
        let mut options = vec!["all".to_string()];
        options.extend(all.iter().map(|v| v.to_string()));
        Self {
            name,
            current: current.to_string(),
            options,
        }
    }
}

/// The named predicate set of one list type.
pub trait FilterSet<T>: Default + Clone + PartialEq + fmt::Debug {
    /// True iff every predicate accepts `item`.
    fn matches(&self, item: &T) -> bool;

    /// Set an enum predicate by name. `value` may be `all`.
    fn set(&mut self, name: &str, value: &str) -> Result<()>;

    fn search(&self) -> &str;

    fn set_search(&mut self, text: String);

    /// Request parameters for a server-side query. The `all` sentinel and
    /// an empty search are left out.
    fn query_params(&self) -> Vec<(&'static str, String)>;

    fn controls(&self) -> Vec<FilterControl>;
}

/// Case-insensitive substring match over `fields`. An empty search matches.
pub fn matches_search(search: &str, fields: &[&str]) -> bool {
    let needle = search.to_lowercase();
    needle.is_empty() || fields.iter().any(|f| f.to_lowercase().contains(&needle))
}

fn push_choice<T: fmt::Display>(
    params: &mut Vec<(&'static str, String)>,
    name: &'static str,
    choice: &Choice<T>,
) {
    if let Choice::Only(value) = choice {
        params.push((name, value.to_string()));
    }
}

fn push_search(params: &mut Vec<(&'static str, String)>, search: &str) {
    if !search.is_empty() {
        params.push(("search", search.to_string()));
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AlertFilters {
    pub priority: Choice<Priority>,
    pub status: Choice<AlertStatus>,
    pub search: String,
}

impl FilterSet<Alert> for AlertFilters {
    fn matches(&self, alert: &Alert) -> bool {
        self.priority.matches(&alert.priority)
            && self.status.matches(&alert.status)
            && matches_search(&self.search, &[alert.description.as_str(), alert.source.as_str()])
    }

    fn set(&mut self, name: &str, value: &str) -> Result<()> {
        match name {
            "priority" => self.priority = Choice::parse(value)?,
            "status" => self.status = Choice::parse(value)?,
            _ => return Err(DashError::InvalidFilter(name.to_string())),
        }
        Ok(())
    }

    fn search(&self) -> &str {
        &self.search
    }

    fn set_search(&mut self, text: String) {
        self.search = text;
    }

    fn query_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        push_choice(&mut params, "priority", &self.priority);
        push_choice(&mut params, "status", &self.status);
        push_search(&mut params, &self.search);
        params
    }

    fn controls(&self) -> Vec<FilterControl> {
        vec![
            FilterControl::new("priority", &self.priority, Priority::ALL),
            FilterControl::new("status", &self.status, AlertStatus::ALL),
        ]
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct IncidentFilters {
    pub severity: Choice<Severity>,
    pub status: Choice<IncidentStatus>,
    pub search: String,
}

impl FilterSet<Incident> for IncidentFilters {
    fn matches(&self, incident: &Incident) -> bool {
        self.severity.matches(&incident.severity)
            && self.status.matches(&incident.status)
            && matches_search(&self.search, &[incident.title.as_str(), incident.id.as_str()])
    }

    fn set(&mut self, name: &str, value: &str) -> Result<()> {
        match name {
            "severity" => self.severity = Choice::parse(value)?,
            "status" => self.status = Choice::parse(value)?,
            _ => return Err(DashError::InvalidFilter(name.to_string())),
        }
        Ok(())
    }

    fn search(&self) -> &str {
        &self.search
    }

    fn set_search(&mut self, text: String) {
        self.search = text;
    }

    fn query_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        push_choice(&mut params, "severity", &self.severity);
        push_choice(&mut params, "status", &self.status);
        push_search(&mut params, &self.search);
        params
    }

    fn controls(&self) -> Vec<FilterControl> {
        vec![
            FilterControl::new("severity", &self.severity, Severity::ALL),
            FilterControl::new("status", &self.status, IncidentStatus::ALL),
        ]
    }
}
