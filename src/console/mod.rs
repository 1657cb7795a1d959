//! Line-driven operator console.
//!
//! Each input line is mapped to a [`ConsoleAction`] by the pure
//! [`parse_command`] and then applied by a [`Session`].

mod session;

use crate::dispatch::Page;
use crate::error::{DashError, Result};
use crate::orchestrator::ListAction;

pub use session::{Flow, Session};

/// One operator command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleAction {
    Goto(Page),
    /// Applies to the list shown on the current page
    List(ListAction),
    Expand(String),
    Ack(String),
    Resolve(String),
    /// Status name is interpreted against the current page's item type
    SetStatus { id: String, status: String },
    ToggleTheme,
    Refresh,
    Help,
    Quit,
}

fn usage(command: &str, args: &str) -> DashError {
    DashError::Other(format!("usage: {} {}", command, args))
}

fn required<'a>(arg: Option<&'a str>, command: &str, args: &str) -> Result<&'a str> {
    match arg.map(str::trim) {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(usage(command, args)),
    }
}

/// Parse one console line. Blank lines yield `None`.
pub fn parse_command(line: &str) -> Result<Option<ConsoleAction>> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let (command, rest) = match line.split_once(char::is_whitespace) {
        Some((command, rest)) => (command, rest.trim()),
        None => (line, ""),
    };
    let rest_opt = (!rest.is_empty()).then_some(rest);

    let action = match command.to_ascii_lowercase().as_str() {
        "goto" | "go" => {
            let target = required(rest_opt, "goto", "<page>")?;
            ConsoleAction::Goto(target.trim_start_matches('#').parse()?)
        }
        "page" => {
            let raw = required(rest_opt, "page", "<n>")?;
            let n = raw
                .parse::<usize>()
                .map_err(|_| DashError::InvalidPage(raw.to_string()))?;
            ConsoleAction::List(ListAction::SetPage(n))
        }
        "next" | "n" => ConsoleAction::List(ListAction::NextPage),
        "prev" | "p" => ConsoleAction::List(ListAction::PrevPage),
        "filter" => {
            let args = required(rest_opt, "filter", "<name> <value>")?;
            let (name, value) = args
                .split_once(char::is_whitespace)
                .ok_or_else(|| usage("filter", "<name> <value>"))?;
            ConsoleAction::List(ListAction::SetFilter {
                name: name.to_ascii_lowercase(),
                value: value.trim().to_string(),
            })
        }
        "search" => ConsoleAction::List(ListAction::SetSearch(rest.to_string())),
        "sort" => {
            let column = required(rest_opt, "sort", "<column>")?;
            ConsoleAction::List(ListAction::SetSort(column.to_string()))
        }
        "reset" => ConsoleAction::List(ListAction::Reset),
        "expand" => ConsoleAction::Expand(required(rest_opt, "expand", "<id>")?.to_string()),
        "ack" => ConsoleAction::Ack(required(rest_opt, "ack", "<id>")?.to_string()),
        "resolve" => ConsoleAction::Resolve(required(rest_opt, "resolve", "<id>")?.to_string()),
        "status" => {
            let args = required(rest_opt, "status", "<id> <status>")?;
            let (id, status) = args
                .split_once(char::is_whitespace)
                .ok_or_else(|| usage("status", "<id> <status>"))?;
            ConsoleAction::SetStatus {
                id: id.to_string(),
                status: status.trim().to_string(),
            }
        }
        "theme" => ConsoleAction::ToggleTheme,
        "refresh" | "reload" => ConsoleAction::Refresh,
        "help" | "?" => ConsoleAction::Help,
        "quit" | "exit" | "q" => ConsoleAction::Quit,
        other => {
            return Err(DashError::Other(format!(
                "unknown command '{}', type 'help' for a list",
                other
            )));
        }
    };
    Ok(Some(action))
}
