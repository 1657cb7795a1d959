use serde_json::Value;

mod common;
use common::IdsDashTest;

fn json(stdout: &str) -> Value {
    serde_json::from_str(stdout).expect("stdout should be JSON")
}

// ============================================================================
// Completions
// ============================================================================

#[test]
fn test_completions_for_each_shell() {
    let test = IdsDashTest::new();
    for shell in ["bash", "zsh", "fish"] {
        let stdout = test.run_success(&["completions", shell]);
        assert!(stdout.contains("idsdash"), "{} completions", shell);
        assert!(stdout.contains("incidents"), "{} completions", shell);
    }
}

#[test]
fn test_completions_reject_unknown_shell() {
    let test = IdsDashTest::new();
    test.run_failure(&["completions", "tcsh"]);
}

// ============================================================================
// Offline lists
// ============================================================================

#[test]
fn test_alerts_offline_uses_fallback_data() {
    let test = IdsDashTest::new();
    let value = json(&test.run_success(&["alerts", "--json"]));

    assert_eq!(value["offline"], true);
    assert_eq!(value["total"], 57);
    assert_eq!(value["page"], 1);
    assert_eq!(value["alerts"].as_array().unwrap().len(), 10);
}

#[test]
fn test_alerts_page_past_end_is_clamped() {
    let test = IdsDashTest::new();
    let value = json(&test.run_success(&["alerts", "--json", "--page", "99"]));
    assert_eq!(value["page"], value["page_count"]);
    assert_eq!(value["page_count"], 6);
}

#[test]
fn test_alerts_priority_filter() {
    let test = IdsDashTest::new();
    let value = json(&test.run_success(&["a", "-p", "critical", "--per-page", "100", "--json"]));

    let rows = value["alerts"].as_array().unwrap();
    assert!(!rows.is_empty());
    assert!(rows.iter().all(|a| a["priority"] == "Critical"));
    assert_eq!(value["total"].as_u64().unwrap() as usize, rows.len());
}

#[test]
fn test_invalid_priority_lists_choices() {
    let test = IdsDashTest::new();
    let stderr = test.run_failure(&["alerts", "--priority", "urgent"]);
    assert!(stderr.contains("Invalid priority. Must be one of: Critical, High, Medium, Low"));
}

#[test]
fn test_incidents_expand_offline() {
    let test = IdsDashTest::new();
    let value = json(&test.run_success(&["incidents", "--expand", "inc-1", "--json"]));

    assert_eq!(value["offline"], true);
    assert_eq!(value["total"], 4);
    assert_eq!(value["expanded"]["incident"]["id"], "inc-1");
    let related: Vec<&str> = value["expanded"]["related_alerts"]
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["id"].as_str().unwrap())
        .collect();
    assert_eq!(related, vec!["a5", "a8", "a12"]);
}

#[test]
fn test_incidents_text_marks_offline() {
    let test = IdsDashTest::new();
    let stdout = test.run_success(&["incidents"]);
    assert!(stdout.contains("offline: showing fallback data"));
    assert!(stdout.contains("Coordinated Brute-Force Attack on Core Servers"));
}

#[test]
fn test_unknown_alert_fails_offline() {
    let test = IdsDashTest::new();
    let stderr = test.run_failure(&["alert", "a999"]);
    assert!(stderr.contains("alert 'a999' not found"));
}

// ============================================================================
// Backend-only commands
// ============================================================================

#[test]
fn test_health_needs_backend() {
    let test = IdsDashTest::new();
    let stderr = test.run_failure(&["health"]);
    assert!(stderr.contains("error: HTTP error"));
}

// ============================================================================
// Config and theme
// ============================================================================

#[test]
fn test_config_set_then_get() {
    let test = IdsDashTest::new();
    test.run_success(&["config", "set", "items_per_page", "25"]);

    assert_eq!(test.run_success(&["config", "get", "items_per_page"]).trim(), "25");
    assert!(test.read_file("config.yaml").contains("items_per_page: 25"));

    let value = json(&test.run_success(&["alerts", "--json"]));
    assert_eq!(value["per_page"], 25);
}

#[test]
fn test_config_rejects_unknown_key() {
    let test = IdsDashTest::new();
    let stderr = test.run_failure(&["config", "set", "colour", "blue"]);
    assert!(stderr.contains("unknown config key 'colour'"));
}

#[test]
fn test_config_show_notes_env_override() {
    let test = IdsDashTest::new();
    let value = json(&test.run_success(&["config", "show", "--json"]));
    assert_eq!(value["effective_api_url"], common::UNREACHABLE_API);
}

#[test]
fn test_theme_set_persists() {
    let test = IdsDashTest::new();
    test.run_success(&["theme", "set", "dark"]);

    assert!(test.read_file("preferences.yaml").contains("theme: dark"));
    let value = json(&test.run_success(&["theme", "--json"]));
    assert_eq!(value["theme"], "dark");

    let value = json(&test.run_success(&["theme", "toggle", "--json"]));
    assert_eq!(value["theme"], "light");
}

// ============================================================================
// Console
// ============================================================================

#[test]
fn test_console_exits_at_end_of_input() {
    let test = IdsDashTest::new();
    let stdout = test.run_success(&["console", "--page", "#reports"]);
    assert!(stdout.contains("Loading..."));
    assert!(stdout.contains("This section is under construction."));
}
