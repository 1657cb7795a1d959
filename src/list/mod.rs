//! Per-list view state and the pure filter-sort-paginate projection.
//!
//! Both lists (alerts and incidents) share one implementation, parameterized
//! by the [`Listable`] trait which supplies the item-specific filter set,
//! sortable columns and searchable fields.

mod filter;
mod project;
mod sort;
mod state;

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::error::DashError;

pub use filter::{AlertFilters, Choice, FilterControl, FilterSet, IncidentFilters, matches_search};
pub use project::{Projection, page_count, project};
pub use sort::{AlertColumn, IncidentColumn, SortDirection};
pub use state::ListState;

/// An item type that can be listed, filtered and sorted.
pub trait Listable: Clone + fmt::Debug {
    type Filters: FilterSet<Self>;
    type Column: Copy + Eq + fmt::Debug + fmt::Display + FromStr<Err = DashError>;

    /// Plural noun used in logs and messages, e.g. `alerts`.
    const LIST_NAME: &'static str;

    /// Sort applied to a freshly created list.
    const DEFAULT_SORT: (Self::Column, SortDirection);

    fn id(&self) -> &str;

    /// Ascending natural order of the two items on `column`.
    fn compare_by(&self, other: &Self, column: Self::Column) -> Ordering;
}
