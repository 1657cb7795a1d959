use crate::error::{DashError, Result};
use crate::list::filter::FilterSet;
use crate::list::project::page_count;
use crate::list::sort::SortDirection;
use crate::list::Listable;
use crate::types::Incident;

/// Mutable view configuration of one list.
///
/// Every mutation is a synchronous transition with no I/O. Whoever owns the
/// state (the orchestrator) observes it afterwards and decides whether to
/// refetch or re-project.
#[derive(Debug, Clone, PartialEq)]
pub struct ListState<T: Listable> {
    /// 1-based
    pub current_page: usize,
    pub items_per_page: usize,
    pub sort_column: T::Column,
    pub sort_direction: SortDirection,
    pub filters: T::Filters,
    /// Only ever set for incidents.
    pub expanded_id: Option<String>,
}

impl<T: Listable> ListState<T> {
    pub fn new(items_per_page: usize) -> Self {
        let (sort_column, sort_direction) = T::DEFAULT_SORT;
        Self {
            current_page: 1,
            items_per_page: items_per_page.max(1),
            sort_column,
            sort_direction,
            filters: T::Filters::default(),
            expanded_id: None,
        }
    }

    pub fn set_page(&mut self, page: usize) -> Result<()> {
        if page == 0 {
            return Err(DashError::InvalidPage(page.to_string()));
        }
        self.current_page = page;
        Ok(())
    }

    pub fn set_items_per_page(&mut self, per_page: usize) -> Result<()> {
        if per_page == 0 {
            return Err(DashError::InvalidPage(format!("{} items per page", per_page)));
        }
        self.items_per_page = per_page;
        self.current_page = 1;
        Ok(())
    }

    /// Change one enum predicate and return to the first page.
    pub fn set_filter(&mut self, name: &str, value: &str) -> Result<()> {
        self.filters.set(name, value)?;
        self.current_page = 1;
        Ok(())
    }

    /// Replace the free-text search and return to the first page.
    pub fn set_search(&mut self, text: impl Into<String>) {
        self.filters.set_search(text.into());
        self.current_page = 1;
    }

    /// Same column flips the direction, a new column starts ascending.
    pub fn set_sort(&mut self, column: T::Column) {
        if self.sort_column == column {
            self.sort_direction = self.sort_direction.flip();
        } else {
            self.sort_column = column;
            self.sort_direction = SortDirection::Asc;
        }
    }

    /// Back to defaults, keeping the page size.
    pub fn reset(&mut self) {
        *self = Self::new(self.items_per_page);
    }

    pub fn page_count(&self, total_matching: usize) -> usize {
        page_count(total_matching, self.items_per_page)
    }

    /// Pull `current_page` into `[1, page_count]`. Returns true if it moved.
    pub fn clamp_page(&mut self, total_matching: usize) -> bool {
        let clamped = self.current_page.clamp(1, self.page_count(total_matching));
        let moved = clamped != self.current_page;
        self.current_page = clamped;
        moved
    }
}

impl ListState<Incident> {
    /// Collapse if `id` is already expanded, otherwise expand only `id`.
    pub fn toggle_expanded(&mut self, id: &str) {
        if self.expanded_id.as_deref() == Some(id) {
            self.expanded_id = None;
        } else {
            self.expanded_id = Some(id.to_string());
        }
    }

    /// Drop the expanded id if it no longer names a loaded incident.
    pub fn reconcile_expanded(&mut self, loaded: &[Incident]) -> bool {
        match &self.expanded_id {
            Some(id) if !loaded.iter().any(|i| &i.id == id) => {
                self.expanded_id = None;
                true
            }
            _ => false,
        }
    }
}
