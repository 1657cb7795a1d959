use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use std::fmt::Display;
use std::io;
use std::str::FromStr;

use crate::commands::ListOptions;
use crate::dispatch::Page;
use crate::list::SortDirection;
use crate::theme::Theme;
use crate::types::{AlertStatus, IncidentStatus, Priority, Severity};

#[derive(Parser)]
#[command(name = "idsdash")]
#[command(about = "Terminal dashboard for the Adaptive IDS security-monitoring backend")]
#[command(version)]
pub struct Cli {
    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Print JSON instead of tables
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Paging and sorting options shared by the list commands.
#[derive(Args, Debug, Clone, Default)]
pub struct ListArgs {
    /// Page number, starting at 1
    #[arg(long)]
    pub page: Option<usize>,

    /// Rows per page (default: items_per_page from the config)
    #[arg(long)]
    pub per_page: Option<usize>,

    /// Case-insensitive text search
    #[arg(short, long)]
    pub search: Option<String>,

    /// Column to sort by
    #[arg(long)]
    pub sort: Option<String>,

    /// Sort descending
    #[arg(long, conflicts_with = "asc")]
    pub desc: bool,

    /// Sort ascending
    #[arg(long)]
    pub asc: bool,
}

impl ListArgs {
    fn into_options(self, filters: Vec<(&'static str, String)>) -> ListOptions {
        let direction = if self.desc {
            Some(SortDirection::Desc)
        } else if self.asc {
            Some(SortDirection::Asc)
        } else {
            None
        };
        ListOptions {
            page: self.page,
            per_page: self.per_page,
            filters,
            search: self.search,
            sort: self.sort,
            direction,
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show stat cards and recent alerts
    #[command(visible_alias = "d")]
    Dashboard,

    /// List alerts
    #[command(visible_alias = "a")]
    Alerts {
        #[command(flatten)]
        list: ListArgs,

        /// Only alerts with this priority: Critical, High, Medium, Low
        #[arg(short, long, value_parser = parse_priority)]
        priority: Option<Priority>,

        /// Only alerts with this status: New, Acknowledged, Resolved
        #[arg(long, value_parser = parse_alert_status)]
        status: Option<AlertStatus>,
    },

    /// List incidents
    #[command(visible_alias = "i")]
    Incidents {
        #[command(flatten)]
        list: ListArgs,

        /// Only incidents with this severity: Critical, High, Medium, Low
        #[arg(long, value_parser = parse_severity)]
        severity: Option<Severity>,

        /// Only incidents with this status: Open, Under Investigation, Resolved, Closed
        #[arg(long, value_parser = parse_incident_status)]
        status: Option<IncidentStatus>,

        /// Show the detail row of this incident
        #[arg(short, long)]
        expand: Option<String>,
    },

    /// Show one alert
    Alert {
        /// Alert ID
        id: String,
    },

    /// Show one incident and its related alerts
    Incident {
        /// Incident ID
        id: String,
    },

    /// Acknowledge an alert
    Ack {
        /// Alert ID
        id: String,
    },

    /// Resolve an alert
    Resolve {
        /// Alert ID
        id: String,
    },

    /// Change an incident's status
    IncidentStatus {
        /// Incident ID
        id: String,

        /// New status: Open, Under Investigation, Resolved, Closed
        #[arg(value_parser = parse_incident_status)]
        status: IncidentStatus,
    },

    /// Check backend health
    Health,

    /// Classify one traffic sample
    Predict {
        /// Feature map as a JSON object, e.g. '{"duration": 0, "protocol_type": "tcp"}'
        features: String,
    },

    /// Show model performance metrics
    Metrics,

    /// Ask the backend to retrain the model
    Retrain,

    /// Show or change the colour theme
    Theme {
        #[command(subcommand)]
        action: Option<ThemeAction>,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for [possible values: bash, zsh, fish, powershell, elvish]
        shell: Shell,
    },

    /// Interactive console: one command per line, `help` lists them
    Console {
        /// Page to open: dashboard, alerts, incidents, analytics, rl_model, reports
        #[arg(long, default_value = "dashboard", value_parser = parse_page)]
        page: Page,
    },
}

#[derive(Subcommand)]
pub enum ThemeAction {
    /// Print the stored theme
    Show,
    /// Store a theme
    Set {
        /// light or dark
        #[arg(value_parser = parse_theme)]
        theme: Theme,
    },
    /// Switch between light and dark
    Toggle,
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show all configuration values
    Show,
    /// Print one configuration value
    Get {
        /// Config key, e.g. api_url
        key: String,
    },
    /// Set one configuration value
    Set {
        /// Config key, e.g. items_per_page
        key: String,
        /// New value
        value: String,
    },
}

impl Commands {
    /// Execute the command, dispatching to the appropriate handler.
    pub async fn run(self, output_json: bool) -> crate::error::Result<()> {
        use crate::commands::{
            cmd_ack, cmd_alert, cmd_alerts, cmd_config_get, cmd_config_set, cmd_config_show,
            cmd_console, cmd_dashboard, cmd_health, cmd_incident, cmd_incident_status,
            cmd_incidents, cmd_metrics, cmd_predict, cmd_resolve, cmd_retrain, cmd_theme_set,
            cmd_theme_show, cmd_theme_toggle,
        };

        match self {
            Commands::Dashboard => cmd_dashboard(output_json).await,
            Commands::Alerts {
                list,
                priority,
                status,
            } => {
                let mut filters = Vec::new();
                if let Some(priority) = priority {
                    filters.push(("priority", priority.to_string()));
                }
                if let Some(status) = status {
                    filters.push(("status", status.to_string()));
                }
                cmd_alerts(list.into_options(filters), output_json).await
            }
            Commands::Incidents {
                list,
                severity,
                status,
                expand,
            } => {
                let mut filters = Vec::new();
                if let Some(severity) = severity {
                    filters.push(("severity", severity.to_string()));
                }
                if let Some(status) = status {
                    filters.push(("status", status.to_string()));
                }
                cmd_incidents(list.into_options(filters), expand, output_json).await
            }
            Commands::Alert { id } => cmd_alert(&id, output_json).await,
            Commands::Incident { id } => cmd_incident(&id, output_json).await,
            Commands::Ack { id } => cmd_ack(&id, output_json).await,
            Commands::Resolve { id } => cmd_resolve(&id, output_json).await,
            Commands::IncidentStatus { id, status } => {
                cmd_incident_status(&id, status, output_json).await
            }
            Commands::Health => cmd_health(output_json).await,
            Commands::Predict { features } => cmd_predict(&features, output_json).await,
            Commands::Metrics => cmd_metrics(output_json).await,
            Commands::Retrain => cmd_retrain(output_json).await,
            Commands::Theme { action } => match action.unwrap_or(ThemeAction::Show) {
                ThemeAction::Show => cmd_theme_show(output_json),
                ThemeAction::Set { theme } => cmd_theme_set(theme, output_json),
                ThemeAction::Toggle => cmd_theme_toggle(output_json),
            },
            Commands::Config { action } => match action {
                ConfigAction::Show => cmd_config_show(output_json),
                ConfigAction::Get { key } => cmd_config_get(&key, output_json),
                ConfigAction::Set { key, value } => cmd_config_set(&key, &value, output_json),
            },
            Commands::Completions { shell } => {
                generate_completions(shell);
                Ok(())
            }
            Commands::Console { page } => cmd_console(page).await,
        }
    }
}

fn parse_with_validation<T>(s: &str, field_name: &str, valid_values: &[T]) -> Result<T, String>
where
    T: FromStr + Display,
{
    s.parse().map_err(|_| {
        let valid: Vec<String> = valid_values.iter().map(|v| v.to_string()).collect();
        format!(
            "Invalid {}. Must be one of: {}",
            field_name,
            valid.join(", ")
        )
    })
}

fn parse_priority(s: &str) -> Result<Priority, String> {
    parse_with_validation(s, "priority", Priority::ALL)
}

fn parse_severity(s: &str) -> Result<Severity, String> {
    parse_with_validation(s, "severity", Severity::ALL)
}

fn parse_alert_status(s: &str) -> Result<AlertStatus, String> {
    parse_with_validation(s, "status", AlertStatus::ALL)
}

fn parse_incident_status(s: &str) -> Result<IncidentStatus, String> {
    parse_with_validation(s, "status", IncidentStatus::ALL)
}

fn parse_theme(s: &str) -> Result<Theme, String> {
    parse_with_validation(s, "theme", Theme::ALL)
}

fn parse_page(s: &str) -> Result<Page, String> {
    parse_with_validation(s.trim_start_matches('#'), "page", Page::ALL)
}

/// Generate shell completions to stdout
pub fn generate_completions(shell: Shell) {
    let mut cmd = Cli::command();
    clap_complete::generate(shell, &mut cmd, "idsdash", &mut io::stdout());
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("idsdash").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_alerts_arguments() {
        let cli = parse(&[
            "alerts", "--page", "2", "-p", "high", "--status", "new", "--sort", "priority",
            "--desc", "--json",
        ]);
        assert!(cli.json);
        let Commands::Alerts {
            list,
            priority,
            status,
        } = cli.command
        else {
            panic!("expected alerts");
        };
        assert_eq!(priority, Some(Priority::High));
        assert_eq!(status, Some(AlertStatus::New));

        let options = list.into_options(vec![("priority", "High".to_string())]);
        assert_eq!(options.page, Some(2));
        assert_eq!(options.sort.as_deref(), Some("priority"));
        assert_eq!(options.direction, Some(SortDirection::Desc));
        assert_eq!(options.filters.len(), 1);
    }

    #[test]
    fn test_desc_and_asc_conflict() {
        let result = Cli::try_parse_from(["idsdash", "alerts", "--desc", "--asc"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_incident_status_accepts_spaced_name() {
        let cli = parse(&["incident-status", "inc-1", "Under Investigation"]);
        let Commands::IncidentStatus { id, status } = cli.command else {
            panic!("expected incident-status");
        };
        assert_eq!(id, "inc-1");
        assert_eq!(status, IncidentStatus::UnderInvestigation);
    }

    #[test]
    fn test_invalid_priority_lists_valid_values() {
        let err = Cli::try_parse_from(["idsdash", "alerts", "--priority", "urgent"])
            .err()
            .unwrap();
        let message = err.to_string();
        assert!(message.contains("Invalid priority"));
        assert!(message.contains("Critical, High, Medium, Low"));
    }

    #[test]
    fn test_console_page_accepts_fragment() {
        let cli = parse(&["console", "--page", "#rl_model"]);
        assert!(matches!(
            cli.command,
            Commands::Console {
                page: Page::RlModel
            }
        ));
        let cli = parse(&["console"]);
        assert!(matches!(
            cli.command,
            Commands::Console {
                page: Page::Dashboard
            }
        ));
    }

    #[test]
    fn test_theme_without_action_shows() {
        let cli = parse(&["theme"]);
        assert!(matches!(cli.command, Commands::Theme { action: None }));
        let cli = parse(&["theme", "set", "dark"]);
        assert!(matches!(
            cli.command,
            Commands::Theme {
                action: Some(ThemeAction::Set { theme: Theme::Dark })
            }
        ));
    }
}
