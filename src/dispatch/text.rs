use std::env;
use std::io::{self, IsTerminal, Write};

use jiff::Timestamp;
use owo_colors::{OwoColorize, Style as Paint};
use tabled::builder::Builder;
use tabled::settings::Style;

use crate::dispatch::Renderer;
use crate::dispatch::page::Page;
use crate::dispatch::view::{
    AlertsView, Body, DashboardView, Header, IncidentsView, Toolbar, ViewModel,
};
use crate::error::Result;
use crate::theme::Theme;
use crate::types::Alert;

/// Plain-text renderer: tables via `tabled`, accents via `owo-colors`.
pub struct TextRenderer<W> {
    out: W,
    color: bool,
}

impl TextRenderer<io::Stdout> {
    /// Render to stdout, with colour only on a terminal and without `NO_COLOR`.
    pub fn stdout() -> Self {
        let out = io::stdout();
        let color = out.is_terminal() && env::var_os("NO_COLOR").is_none();
        Self { out, color }
    }
}

impl<W: Write> TextRenderer<W> {
    pub fn new(out: W, color: bool) -> Self {
        Self { out, color }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Renderer for TextRenderer<W> {
    fn draw(&mut self, view: &ViewModel) -> Result<()> {
        let text = render_text(view, self.color);
        self.out.write_all(text.as_bytes())?;
        self.out.flush()?;
        Ok(())
    }
}

/// `2024-07-29T10:30:00Z` becomes `2024-07-29 10:30 UTC`. Unparsable
/// values are shown as received.
pub fn format_timestamp(raw: &str) -> String {
    match raw.parse::<Timestamp>() {
        Ok(ts) => ts.strftime("%Y-%m-%d %H:%M UTC").to_string(),
        Err(_) => raw.to_string(),
    }
}

struct Painter {
    color: bool,
    theme: Theme,
}

impl Painter {
    fn paint(&self, text: &str, style: Paint) -> String {
        if self.color {
            text.style(style).to_string()
        } else {
            text.to_string()
        }
    }

    fn accent(&self, text: &str) -> String {
        let style = match self.theme {
            Theme::Light => Paint::new().blue().bold(),
            Theme::Dark => Paint::new().bright_cyan().bold(),
        };
        self.paint(text, style)
    }

    fn dim(&self, text: &str) -> String {
        self.paint(text, Paint::new().dimmed())
    }

    fn warn(&self, text: &str) -> String {
        self.paint(text, Paint::new().yellow().bold())
    }

    fn level(&self, text: &str, rank: u8) -> String {
        let style = match rank {
            3 => Paint::new().bright_red().bold(),
            2 => Paint::new().red(),
            1 => Paint::new().yellow(),
            _ => Paint::new().green(),
        };
        self.paint(text, style)
    }
}

/// Render a whole frame as text, ending in a newline.
pub fn render_text(view: &ViewModel, color: bool) -> String {
    let painter = Painter {
        color,
        theme: view.theme,
    };
    let mut lines: Vec<String> = Vec::new();

    lines.push(nav_line(view.page, &painter));
    let mut title = format!("# {}", view.title);
    if view.offline {
        title.push_str(" (offline: showing fallback data)");
    }
    lines.push(painter.accent(&title));
    if let Some(notice) = &view.notice {
        lines.push(painter.warn(&format!("! {}", notice)));
    }
    lines.push(String::new());

    match &view.body {
        Body::Loading => lines.push("Loading...".to_string()),
        Body::Placeholder { title, message } => {
            lines.push(painter.accent(title));
            lines.push((*message).to_string());
        }
        Body::Dashboard(dashboard) => render_dashboard(&mut lines, dashboard, &painter),
        Body::Alerts(alerts) => render_alerts(&mut lines, alerts, &painter),
        Body::Incidents(incidents) => render_incidents(&mut lines, incidents, &painter),
    }

    lines.push(String::new());
    let commands: Vec<&str> = view.affordances.iter().map(|a| a.command.as_str()).collect();
    lines.push(painter.dim(&format!("Commands: {}", commands.join(" · "))));

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

fn nav_line(active: Page, painter: &Painter) -> String {
    Page::ALL
        .iter()
        .map(|page| {
            if *page == active {
                painter.accent(&format!("[{}]", page.label()))
            } else {
                page.label().to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("  ")
}

fn alert_line(alert: &Alert, painter: &Painter) -> String {
    format!(
        "{} {}  {}  {}  {}",
        painter.level(&format!("[{}]", alert.priority), alert.priority.rank()),
        alert.id,
        alert.description,
        alert.source,
        painter.dim(&format_timestamp(&alert.timestamp)),
    )
}

fn render_dashboard(lines: &mut Vec<String>, view: &DashboardView, painter: &Painter) {
    let mut builder = Builder::default();
    builder.push_record(view.cards.iter().map(|c| c.title.to_string()));
    builder.push_record(view.cards.iter().map(|c| c.value.clone()));
    let mut table = builder.build();
    table.with(Style::rounded());
    lines.push(table.to_string());

    lines.push(String::new());
    lines.push(painter.accent("Recent Alerts"));
    if view.recent_alerts.is_empty() {
        lines.push("No recent alerts.".to_string());
    }
    for alert in &view.recent_alerts {
        lines.push(alert_line(alert, painter));
    }
}

fn toolbar_line(toolbar: &Toolbar) -> String {
    let mut parts = vec![format!("search: \"{}\"", toolbar.search)];
    parts.extend(
        toolbar
            .filters
            .iter()
            .map(|f| format!("{}: {}", f.name, f.current)),
    );
    parts.join("  ")
}

fn header_cells(headers: &[Header]) -> Vec<String> {
    let mut cells = vec!["ID".to_string()];
    cells.extend(headers.iter().map(|h| {
        let symbol = h.indicator.symbol();
        if symbol.is_empty() {
            h.label.to_string()
        } else {
            format!("{} {}", h.label, symbol)
        }
    }));
    cells
}

fn table(headers: &[Header], rows: Vec<Vec<String>>) -> String {
    let mut builder = Builder::default();
    builder.push_record(header_cells(headers));
    for row in rows {
        builder.push_record(row);
    }
    let mut table = builder.build();
    table.with(Style::rounded());
    table.to_string()
}

fn render_alerts(lines: &mut Vec<String>, view: &AlertsView, painter: &Painter) {
    lines.push(painter.dim(&toolbar_line(&view.toolbar)));
    if let Some(message) = view.empty_message {
        lines.push(message.to_string());
    } else {
        let rows = view
            .rows
            .iter()
            .map(|a| {
                vec![
                    a.id.clone(),
                    a.priority.to_string(),
                    format_timestamp(&a.timestamp),
                    a.description.clone(),
                    a.source.clone(),
                    a.status.to_string(),
                ]
            })
            .collect();
        lines.push(table(&view.headers, rows));
    }
    lines.push(format!(
        "{}  ·  {}",
        view.pagination.range_label(),
        view.pagination.page_label()
    ));
}

fn render_incidents(lines: &mut Vec<String>, view: &IncidentsView, painter: &Painter) {
    lines.push(painter.dim(&toolbar_line(&view.toolbar)));
    if let Some(message) = view.empty_message {
        lines.push(message.to_string());
    } else {
        let rows = view
            .rows
            .iter()
            .map(|row| {
                let i = &row.incident;
                let marker = if row.detail.is_some() { "▾ " } else { "" };
                vec![
                    format!("{}{}", marker, i.id),
                    i.severity.to_string(),
                    i.title.clone(),
                    i.status.to_string(),
                    i.assigned_to.clone(),
                    format_timestamp(&i.last_updated_at),
                ]
            })
            .collect();
        lines.push(table(&view.headers, rows));
    }

    for row in &view.rows {
        let Some(detail) = &row.detail else { continue };
        let incident = &row.incident;
        lines.push(String::new());
        lines.push(format!(
            "{} {}",
            painter.level(
                &format!("[{}]", incident.severity),
                incident.severity.rank()
            ),
            painter.accent(&incident.title)
        ));
        lines.push(detail.summary.clone());
        lines.push(format!("Related alerts ({}):", detail.related.len()));
        for alert in &detail.related {
            lines.push(format!("  {}", alert_line(alert, painter)));
        }
    }

    lines.push(format!(
        "{}  ·  {}",
        view.pagination.range_label(),
        view.pagination.page_label()
    ));
}
