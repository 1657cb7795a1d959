use thiserror::Error;

#[derive(Error, Debug)]
pub enum DashError {
    // Backend errors
    #[error("API request failed: {status} {reason}")]
    Request { status: u16, reason: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("alert '{0}' not found")]
    AlertNotFound(String),

    #[error("incident '{0}' not found")]
    IncidentNotFound(String),

    // Local validation errors
    #[error("invalid priority '{0}'")]
    InvalidPriority(String),

    #[error("invalid severity '{0}'")]
    InvalidSeverity(String),

    #[error("invalid alert status '{0}'")]
    InvalidAlertStatus(String),

    #[error("invalid incident status '{0}'")]
    InvalidIncidentStatus(String),

    #[error("invalid sort column '{0}'")]
    InvalidSortColumn(String),

    #[error("invalid filter '{0}'")]
    InvalidFilter(String),

    #[error("invalid theme '{0}', expected 'light' or 'dark'")]
    InvalidTheme(String),

    #[error("invalid page '{0}'")]
    InvalidPage(String),

    #[error("unknown page '{0}'")]
    UnknownPage(String),

    #[error("invalid URL '{0}'")]
    InvalidUrl(String),

    // Local storage errors
    #[error("configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    YamlParse(#[from] serde_yaml_ng::Error),

    #[error("{0}")]
    Other(String),
}

impl DashError {
    /// True for failures that came from talking to the backend: non-2xx
    /// responses, transport errors and unparsable bodies.
    pub fn is_request_failure(&self) -> bool {
        matches!(
            self,
            DashError::Request { .. }
                | DashError::Http(_)
                | DashError::Json(_)
                | DashError::AlertNotFound(_)
                | DashError::IncidentNotFound(_)
        )
    }

    /// HTTP status carried by a `Request` error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            DashError::Request { status, .. } => Some(*status),
            DashError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, DashError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_error_display() {
        let err = DashError::Request {
            status: 503,
            reason: "Service Unavailable".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "API request failed: 503 Service Unavailable"
        );
        assert_eq!(err.status(), Some(503));
    }

    #[test]
    fn test_is_request_failure() {
        let request = DashError::Request {
            status: 500,
            reason: "Internal Server Error".to_string(),
        };
        assert!(request.is_request_failure());
        assert!(DashError::AlertNotFound("a1".to_string()).is_request_failure());
        assert!(!DashError::InvalidTheme("blue".to_string()).is_request_failure());
        assert!(!DashError::Config("bad".to_string()).is_request_failure());
    }
}
