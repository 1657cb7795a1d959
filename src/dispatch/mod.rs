//! Render dispatch: one full redraw per state change.
//!
//! The [`Dispatcher`] computes a fresh [`ViewModel`] from the orchestrator
//! on every call and hands it to a [`Renderer`]. Affordances are part of
//! the view model, so they are rebuilt with every frame.

mod page;
mod text;
mod view;

use tracing::debug;

use crate::error::Result;
use crate::gateway::Gateway;
use crate::orchestrator::Orchestrator;
use crate::theme::Theme;

pub use page::{Page, UNDER_CONSTRUCTION};
pub use text::{TextRenderer, format_timestamp, render_text};
pub use view::{
    Affordance, AlertsView, Body, DashboardView, Header, IncidentDetail, IncidentRow,
    IncidentsView, NO_ALERTS, NO_INCIDENTS, Pagination, RECENT_ALERTS, SortIndicator, StatCard,
    Toolbar, ViewModel, compute_affordances, compute_alerts_view, compute_dashboard,
    compute_incidents_view, compute_view_model,
};

/// Draws a complete frame.
pub trait Renderer {
    fn draw(&mut self, view: &ViewModel) -> Result<()>;
}

/// Keeps every frame instead of drawing it.
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    pub frames: Vec<ViewModel>,
}

impl RecordingRenderer {
    pub fn last(&self) -> Option<&ViewModel> {
        self.frames.last()
    }
}

impl Renderer for RecordingRenderer {
    fn draw(&mut self, view: &ViewModel) -> Result<()> {
        self.frames.push(view.clone());
        Ok(())
    }
}

pub struct Dispatcher<R> {
    renderer: R,
    redraws: u64,
}

impl<R: Renderer> Dispatcher<R> {
    pub fn new(renderer: R) -> Self {
        Self {
            renderer,
            redraws: 0,
        }
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn into_renderer(self) -> R {
        self.renderer
    }

    pub fn redraws(&self) -> u64 {
        self.redraws
    }

    /// Replace the whole frame.
    ///
    /// Collapses an expanded incident that is no longer loaded before the
    /// view is computed, and consumes the pending notice once it is drawn.
    pub fn redraw<G: Gateway>(
        &mut self,
        orchestrator: &mut Orchestrator<G>,
        page: Page,
        theme: Theme,
    ) -> Result<()> {
        orchestrator.incidents_mut().reconcile_expanded();
        let view = compute_view_model(orchestrator, page, theme);
        self.redraws += 1;
        debug!(
            frame = self.redraws,
            %page,
            loading = view.loading,
            offline = view.offline,
            "redraw"
        );
        self.renderer.draw(&view)?;
        orchestrator.clear_notice();
        Ok(())
    }
}
