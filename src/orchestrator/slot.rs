use tracing::{debug, warn};

use crate::error::Result;
use crate::gateway::{ListQuery, Page};
use crate::list::{ListState, Listable, page_count, project};
use crate::orchestrator::sequence::{RequestSequencer, RequestTicket};
use crate::types::Incident;

/// What the resident items represent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Residency {
    /// A whole dataset. The engine filters and paginates it locally.
    Snapshot,
    /// One server page, fetched with `query`, out of `total` matching items.
    /// The backend takes no sort parameter, so sorting reorders this page only.
    ServerPage { query: ListQuery, total: usize },
}

/// A state change requested by the operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListAction {
    SetPage(usize),
    NextPage,
    PrevPage,
    SetFilter { name: String, value: String },
    SetSearch(String),
    SetSort(String),
    SetItemsPerPage(usize),
    Reset,
}

/// An issued but not yet applied list request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingFetch {
    pub ticket: RequestTicket,
    pub query: ListQuery,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The response replaced the resident items. `clamped` is set when the
    /// current page fell outside the new page range.
    Applied { clamped: bool },
    /// A newer response was already applied.
    Stale,
    /// The request failed; the previous items stay resident.
    Failed,
}

/// The rows to display plus pagination figures.
#[derive(Debug, PartialEq)]
pub struct ListView<'a, T> {
    pub rows: Vec<&'a T>,
    pub total_matching: usize,
    pub page: usize,
    pub page_count: usize,
    pub per_page: usize,
}

/// One list owned by the orchestrator: its view state, resident items and
/// request sequencer.
#[derive(Debug)]
pub struct ListSlot<T: Listable> {
    pub state: ListState<T>,
    items: Vec<T>,
    residency: Residency,
    sequencer: RequestSequencer,
}

impl<T: Listable> ListSlot<T> {
    pub fn new(items_per_page: usize) -> Self {
        Self {
            state: ListState::new(items_per_page),
            items: Vec::new(),
            residency: Residency::Snapshot,
            sequencer: RequestSequencer::default(),
        }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn residency(&self) -> &Residency {
        &self.residency
    }

    pub fn find(&self, id: &str) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }

    pub fn find_mut(&mut self, id: &str) -> Option<&mut T> {
        self.items.iter_mut().find(|item| item.id() == id)
    }

    /// Swap in an updated copy of a resident item. False if `id` is absent.
    pub fn replace(&mut self, updated: T) -> bool {
        match self.find_mut(updated.id()) {
            Some(slot) => {
                *slot = updated;
                true
            }
            None => false,
        }
    }

    /// Make `items` the whole resident dataset. Requests still in flight
    /// become stale.
    pub fn load_snapshot(&mut self, items: Vec<T>) {
        self.items = items;
        self.residency = Residency::Snapshot;
        self.sequencer.supersede_all();
        self.clamp_local();
    }

    /// Clamp the page against the locally filtered count. No-op for a
    /// server page, whose range comes from the server total.
    pub fn clamp_local(&mut self) -> bool {
        if self.residency != Residency::Snapshot {
            return false;
        }
        let total = project(&self.items, &self.state).total_matching;
        self.state.clamp_page(total)
    }

    /// Apply one operator action to the state. Returns false when nothing
    /// changed, e.g. `next` on the last page.
    pub fn apply(&mut self, action: &ListAction) -> Result<bool> {
        match action {
            ListAction::SetPage(page) => self.state.set_page(*page)?,
            ListAction::NextPage => {
                let (page, pages) = self.page_position();
                if page >= pages {
                    return Ok(false);
                }
                self.state.set_page(page + 1)?;
            }
            ListAction::PrevPage => {
                let (page, _) = self.page_position();
                if page <= 1 {
                    return Ok(false);
                }
                self.state.set_page(page - 1)?;
            }
            ListAction::SetFilter { name, value } => self.state.set_filter(name, value)?,
            ListAction::SetSearch(text) => self.state.set_search(text.clone()),
            ListAction::SetSort(column) => self.state.set_sort(column.parse()?),
            ListAction::SetItemsPerPage(per_page) => self.state.set_items_per_page(*per_page)?,
            ListAction::Reset => self.state.reset(),
        }
        Ok(true)
    }

    fn page_position(&self) -> (usize, usize) {
        let view = self.view();
        (view.page, view.page_count)
    }

    /// Tag a request for the page and filters currently selected.
    pub fn begin_fetch(&mut self) -> PendingFetch {
        PendingFetch {
            ticket: self.sequencer.issue(),
            query: ListQuery::from_state(&self.state),
        }
    }

    /// Apply the response to `pending` unless a newer one already landed.
    /// Failures leave the resident items untouched.
    pub fn apply_page(&mut self, pending: PendingFetch, result: Result<Page<T>>) -> FetchOutcome {
        let page = match result {
            Ok(page) => page,
            Err(e) => {
                warn!(
                    list = T::LIST_NAME,
                    request = pending.ticket.number(),
                    error = %e,
                    "refetch failed, keeping last good view"
                );
                return FetchOutcome::Failed;
            }
        };

        if !self.sequencer.accept(pending.ticket) {
            debug!(
                list = T::LIST_NAME,
                request = pending.ticket.number(),
                last_applied = self.sequencer.last_applied(),
                "discarding stale response"
            );
            return FetchOutcome::Stale;
        }

        let total = page.total;
        self.items = page.items;
        self.residency = Residency::ServerPage {
            query: pending.query,
            total,
        };
        let clamped = self.state.clamp_page(total);
        FetchOutcome::Applied { clamped }
    }

    /// Run the engine over the resident items.
    pub fn view(&self) -> ListView<'_, T> {
        match &self.residency {
            Residency::Snapshot => {
                let projection = project(&self.items, &self.state);
                ListView {
                    total_matching: projection.total_matching,
                    page: self.state.current_page,
                    page_count: self.state.page_count(projection.total_matching),
                    per_page: self.state.items_per_page,
                    rows: projection.visible,
                }
            }
            Residency::ServerPage { query, total } => {
                // The resident items already are the requested page.
                let mut local = self.state.clone();
                local.current_page = 1;
                local.items_per_page = self.items.len().max(1);
                let projection = project(&self.items, &local);

                if query.filters == ListQuery::from_state(&self.state).filters {
                    ListView {
                        rows: projection.visible,
                        total_matching: *total,
                        page: query.page,
                        page_count: page_count(*total, query.per_page),
                        per_page: query.per_page,
                    }
                } else {
                    // Filters changed but the refetch did not land.
                    ListView {
                        total_matching: projection.total_matching,
                        page: 1,
                        page_count: 1,
                        per_page: projection.total_matching.max(1),
                        rows: projection.visible,
                    }
                }
            }
        }
    }
}

impl ListSlot<Incident> {
    /// Clear the expanded id if it no longer names a resident incident.
    pub fn reconcile_expanded(&mut self) -> bool {
        let cleared = self.state.reconcile_expanded(&self.items);
        if cleared {
            debug!("expanded incident no longer loaded, collapsing");
        }
        cleared
    }
}
