use crate::error::DashError;

/// Navigation target, addressed by a location fragment such as `#alerts`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Page {
    #[default]
    Dashboard,
    Alerts,
    Incidents,
    Analytics,
    RlModel,
    Reports,
}

wire_enum!(Page, DashError::UnknownPage, {
    Dashboard => "dashboard",
    Alerts => "alerts",
    Incidents => "incidents",
    Analytics => "analytics",
    RlModel => "rl_model",
    Reports => "reports",
});

impl Page {
    /// Resolve a location fragment. Unknown or empty fragments go to the
    /// dashboard.
    pub fn from_fragment(fragment: &str) -> Page {
        let id = fragment.trim().trim_start_matches('#');
        id.parse().unwrap_or_default()
    }

    pub fn fragment(&self) -> String {
        format!("#{}", self.as_str())
    }

    pub fn label(&self) -> &'static str {
        match self {
            Page::Dashboard => "Dashboard",
            Page::Alerts => "Alerts",
            Page::Incidents => "Incidents",
            Page::Analytics => "Analytics",
            Page::RlModel => "RL Model",
            Page::Reports => "Reports",
        }
    }

    /// Heading of a page that has no content yet.
    pub fn placeholder_title(&self) -> Option<&'static str> {
        match self {
            Page::Analytics => Some("Network Analytics"),
            Page::RlModel => Some("RL Model Health & Explainability"),
            Page::Reports => Some("Export Reports"),
            _ => None,
        }
    }
}

pub const UNDER_CONSTRUCTION: &str = "This section is under construction.";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_fragment() {
        assert_eq!(Page::from_fragment("#alerts"), Page::Alerts);
        assert_eq!(Page::from_fragment("rl_model"), Page::RlModel);
        assert_eq!(Page::from_fragment(""), Page::Dashboard);
        assert_eq!(Page::from_fragment("#"), Page::Dashboard);
        assert_eq!(Page::from_fragment("#settings"), Page::Dashboard);
    }

    #[test]
    fn test_parse_is_strict() {
        assert!(matches!(
            "settings".parse::<Page>(),
            Err(DashError::UnknownPage(_))
        ));
        assert_eq!("RL-Model".parse::<Page>().unwrap(), Page::RlModel);
    }

    #[test]
    fn test_labels_and_fragments() {
        let labels: Vec<&str> = Page::ALL.iter().map(|p| p.label()).collect();
        assert_eq!(
            labels,
            vec!["Dashboard", "Alerts", "Incidents", "Analytics", "RL Model", "Reports"]
        );
        assert_eq!(Page::Reports.fragment(), "#reports");
        assert_eq!(Page::Alerts.placeholder_title(), None);
        assert_eq!(
            Page::RlModel.placeholder_title(),
            Some("RL Model Health & Explainability")
        );
    }
}
