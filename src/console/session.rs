use jiff::Timestamp;
use rand::Rng;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, warn};

use crate::console::{ConsoleAction, parse_command};
use crate::dispatch::{Dispatcher, Page, Renderer};
use crate::error::{DashError, Result};
use crate::gateway::Gateway;
use crate::orchestrator::{ListAction, ListKind, Orchestrator};
use crate::theme::{Theme, ThemeStore};
use crate::types::{AlertStatus, IncidentStatus};

/// Whether the console keeps reading input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// An interactive console: orchestrator, dispatcher, active page and theme.
pub struct Session<G, R> {
    orchestrator: Orchestrator<G>,
    dispatcher: Dispatcher<R>,
    themes: ThemeStore,
    theme: Theme,
    page: Page,
}

impl<G: Gateway, R: Renderer> Session<G, R> {
    /// Unreadable preferences fall back to the light theme.
    pub fn new(orchestrator: Orchestrator<G>, renderer: R, themes: ThemeStore, page: Page) -> Self {
        let theme = themes.load().unwrap_or_else(|e| {
            warn!(error = %e, path = %themes.path().display(), "ignoring unreadable preferences");
            Theme::default()
        });
        Self {
            orchestrator,
            dispatcher: Dispatcher::new(renderer),
            themes,
            theme,
            page,
        }
    }

    pub fn orchestrator(&self) -> &Orchestrator<G> {
        &self.orchestrator
    }

    pub fn dispatcher(&self) -> &Dispatcher<R> {
        &self.dispatcher
    }

    pub fn page(&self) -> Page {
        self.page
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn redraw(&mut self) -> Result<()> {
        self.dispatcher
            .redraw(&mut self.orchestrator, self.page, self.theme)
    }

    /// Show the loading frame, run the startup load, show the result.
    pub async fn start(&mut self) -> Result<()> {
        self.orchestrator.begin_loading();
        self.redraw()?;
        self.orchestrator.load().await;
        self.redraw()
    }

    /// [`Session::start`] with caller-supplied fallback randomness and clock.
    pub async fn start_with<Rg: Rng + ?Sized>(&mut self, rng: &mut Rg, now: Timestamp) -> Result<()> {
        self.orchestrator.begin_loading();
        self.redraw()?;
        self.orchestrator.load_with(rng, now).await;
        self.redraw()
    }

    /// Read commands until `quit` or end of input.
    pub async fn run<I: AsyncBufRead + Unpin>(&mut self, input: I) -> Result<()> {
        let mut lines = input.lines();
        while let Some(line) = lines.next_line().await? {
            if self.execute_line(&line).await? == Flow::Quit {
                break;
            }
        }
        Ok(())
    }

    /// Parse and apply one line. Operator mistakes and backend failures are
    /// shown as a notice; only rendering and I/O errors are returned.
    pub async fn execute_line(&mut self, line: &str) -> Result<Flow> {
        match parse_command(line) {
            Ok(Some(action)) => self.handle(action).await,
            Ok(None) => Ok(Flow::Continue),
            Err(e) => {
                self.orchestrator.set_notice(e.to_string());
                self.redraw()?;
                Ok(Flow::Continue)
            }
        }
    }

    /// Apply one action and redraw at most once.
    pub async fn handle(&mut self, action: ConsoleAction) -> Result<Flow> {
        debug!(?action, page = %self.page, "console action");
        let redraw = match self.apply(action).await {
            Ok(Some(redraw)) => redraw,
            Ok(None) => return Ok(Flow::Quit),
            Err(e) => {
                if self.orchestrator.notice().is_none() {
                    self.orchestrator.set_notice(e.to_string());
                }
                true
            }
        };
        if redraw {
            self.redraw()?;
        }
        Ok(Flow::Continue)
    }

    /// `Ok(None)` means quit; `Ok(Some(false))` means nothing changed.
    async fn apply(&mut self, action: ConsoleAction) -> Result<Option<bool>> {
        match action {
            ConsoleAction::Quit => return Ok(None),
            ConsoleAction::Goto(page) => self.page = page,
            ConsoleAction::List(list_action) => {
                let kind = self.current_list()?;
                return self.apply_list(kind, &list_action).await.map(Some);
            }
            ConsoleAction::Expand(id) => self.orchestrator.toggle_incident(&id)?,
            ConsoleAction::Ack(id) => {
                self.orchestrator
                    .update_alert_status(&id, AlertStatus::Acknowledged)
                    .await?;
            }
            ConsoleAction::Resolve(id) => {
                self.orchestrator
                    .update_alert_status(&id, AlertStatus::Resolved)
                    .await?;
            }
            ConsoleAction::SetStatus { id, status } => {
                if self.page == Page::Alerts {
                    let status: AlertStatus = status.parse()?;
                    self.orchestrator.update_alert_status(&id, status).await?;
                } else {
                    let status: IncidentStatus = status.parse()?;
                    self.orchestrator.update_incident_status(&id, status).await?;
                }
            }
            ConsoleAction::ToggleTheme => {
                let theme = self.theme.toggle();
                self.themes.save(theme)?;
                self.theme = theme;
            }
            ConsoleAction::Refresh => {
                self.orchestrator.begin_loading();
                self.redraw()?;
                self.orchestrator.load().await;
            }
            ConsoleAction::Help => {}
        }
        Ok(Some(true))
    }

    async fn apply_list(&mut self, kind: ListKind, action: &ListAction) -> Result<bool> {
        self.orchestrator.apply_list_action(kind, action).await
    }

    fn current_list(&self) -> Result<ListKind> {
        match self.page {
            Page::Alerts => Ok(ListKind::Alerts),
            Page::Incidents => Ok(ListKind::Incidents),
            other => Err(DashError::Other(format!(
                "the {} page has no list; use 'goto alerts' or 'goto incidents'",
                other.label()
            ))),
        }
    }
}
