use std::cmp::Ordering;
use std::fmt;

use crate::error::DashError;
use crate::list::Listable;
use crate::list::filter::{AlertFilters, IncidentFilters};
use crate::types::{Alert, Incident};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn flip(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }

    /// Apply the direction to an ascending comparison. Equal stays equal,
    /// which keeps a stable sort stable in both directions.
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortDirection::Asc => write!(f, "asc"),
            SortDirection::Desc => write!(f, "desc"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertColumn {
    Id,
    Priority,
    Timestamp,
    Description,
    Source,
    Status,
}

wire_enum!(AlertColumn, DashError::InvalidSortColumn, {
    Id => "id",
    Priority => "priority",
    Timestamp => "timestamp",
    Description => "description",
    Source => "source",
    Status => "status",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IncidentColumn {
    Id,
    Title,
    Severity,
    Status,
    AssignedTo,
    CreatedAt,
    LastUpdatedAt,
}

wire_enum!(IncidentColumn, DashError::InvalidSortColumn, {
    Id => "id",
    Title => "title",
    Severity => "severity",
    Status => "status",
    AssignedTo => "assignedTo",
    CreatedAt => "createdAt",
    LastUpdatedAt => "lastUpdatedAt",
});

impl Listable for Alert {
    type Filters = AlertFilters;
    type Column = AlertColumn;

    const LIST_NAME: &'static str = "alerts";

    const DEFAULT_SORT: (AlertColumn, SortDirection) = (AlertColumn::Timestamp, SortDirection::Desc);

    fn id(&self) -> &str {
        &self.id
    }

    fn compare_by(&self, other: &Self, column: AlertColumn) -> Ordering {
        match column {
            AlertColumn::Id => self.id.cmp(&other.id),
            AlertColumn::Priority => self.priority.cmp(&other.priority),
            // ISO-8601 instants sort chronologically as strings
            AlertColumn::Timestamp => self.timestamp.cmp(&other.timestamp),
            AlertColumn::Description => self.description.cmp(&other.description),
            AlertColumn::Source => self.source.cmp(&other.source),
            AlertColumn::Status => self.status.cmp(&other.status),
        }
    }
}

impl Listable for Incident {
    type Filters = IncidentFilters;
    type Column = IncidentColumn;

    const LIST_NAME: &'static str = "incidents";

    const DEFAULT_SORT: (IncidentColumn, SortDirection) =
        (IncidentColumn::LastUpdatedAt, SortDirection::Desc);

    fn id(&self) -> &str {
        &self.id
    }

    fn compare_by(&self, other: &Self, column: IncidentColumn) -> Ordering {
        match column {
            IncidentColumn::Id => self.id.cmp(&other.id),
            IncidentColumn::Title => self.title.cmp(&other.title),
            IncidentColumn::Severity => self.severity.cmp(&other.severity),
            IncidentColumn::Status => self.status.cmp(&other.status),
            IncidentColumn::AssignedTo => self.assigned_to.cmp(&other.assigned_to),
            IncidentColumn::CreatedAt => self.created_at.cmp(&other.created_at),
            IncidentColumn::LastUpdatedAt => self.last_updated_at.cmp(&other.last_updated_at),
        }
    }
}
