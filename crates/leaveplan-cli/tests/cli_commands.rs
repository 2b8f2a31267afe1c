//! CLI integration tests
//!
//! Run the built `leaveplan` binary and check output and exit codes.
//!
//! ## Exit Code Contract
//!
//! | Exit Code | Meaning |
//! |-----------|---------|
//! | 0 | Plans found |
//! | 1 | Hard error |
//! | 2 | Usage error (clap) |
//! | 3 | No plan satisfies the request |

use std::io::Write;
use std::process::{Command, Output};

use tempfile::NamedTempFile;

fn leaveplan(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_leaveplan"))
        .args(args)
        .env_remove("LEAVEPLAN_CONFIG")
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to execute leaveplan")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

fn config_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

const JULY_BLOCK_CONFIG: &str = r#"
[planner]
max_plans = 3

[calendar]
name = "july-block"

[[calendar.holidays]]
name = "Summer Block"
start = "2025-07-01"
end = "2025-07-05"
"#;

// =============================================================================
// plan
// =============================================================================

#[test]
fn plan_around_golden_week() {
    let output = leaveplan(&[
        "plan", "--start", "2025-09-22", "--end", "2025-10-19", "--days", "3",
    ]);

    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));
    let text = stdout(&output);
    assert!(text.contains("#1  score 400.0"), "{text}");
    assert!(text.contains("(12天)"), "{text}");
}

#[test]
fn plan_with_config_calendar() {
    let config = config_file(JULY_BLOCK_CONFIG);
    let output = leaveplan(&[
        "--config",
        config.path().to_str().unwrap(),
        "plan",
        "--start",
        "2025-07-01",
        "--end",
        "2025-07-31",
        "--days",
        "3",
    ]);

    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));
    let text = stdout(&output);
    assert!(text.contains("leave: 2025-07-07, 2025-07-08, 2025-07-09"));
    assert!(text.contains("2025-07-01 至 2025-07-09 (9天)"));
    // max_plans = 3
    assert!(text.contains("#3"));
    assert!(!text.contains("#4"));
}

#[test]
fn plan_json_output() {
    let config = config_file(JULY_BLOCK_CONFIG);
    let output = leaveplan(&[
        "-c",
        config.path().to_str().unwrap(),
        "plan",
        "--start",
        "2025-07-01",
        "--end",
        "2025-07-31",
        "-d",
        "3",
        "--limit",
        "1",
        "--format",
        "json",
    ]);

    assert_eq!(output.status.code(), Some(0));
    let plans: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(plans.as_array().map(Vec::len), Some(1));
    assert_eq!(plans[0]["continuous_days"], 9);
    assert_eq!(plans[0]["total_days"], 3);
}

#[test]
fn plan_honours_constraint_flags() {
    let config = config_file(JULY_BLOCK_CONFIG);
    let output = leaveplan(&[
        "-c",
        config.path().to_str().unwrap(),
        "plan",
        "--start",
        "2025-07-01",
        "--end",
        "2025-07-31",
        "-d",
        "3",
        "--exclude",
        "2025-07-07",
        "--mandatory",
        "2025-07-21..2025-07-31:1",
        "--max-continuous",
        "2",
        "-f",
        "json",
    ]);

    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));
    let plans: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    for plan in plans.as_array().unwrap() {
        let dates: Vec<&str> = plan["dates"]
            .as_array()
            .unwrap()
            .iter()
            .map(|d| d.as_str().unwrap())
            .collect();
        assert!(!dates.contains(&"2025-07-07"));
        assert!(dates.iter().any(|d| *d >= "2025-07-21"));
    }
}

// =============================================================================
// Exit codes
// =============================================================================

#[test]
fn exit_3_when_no_plan_fits() {
    let output = leaveplan(&["plan", "--start", "2025-07-07", "--end", "2025-07-08", "--days", "10"]);

    assert_eq!(output.status.code(), Some(3));
    assert!(stdout(&output).contains("No plan satisfies the request"));
}

#[test]
fn exit_3_json_prints_empty_list() {
    let output = leaveplan(&[
        "plan", "--start", "2025-07-07", "--end", "2025-07-08", "--days", "10", "--format", "json",
    ]);

    assert_eq!(output.status.code(), Some(3));
    assert_eq!(stdout(&output).trim(), "[]");
}

#[test]
fn usage_error_is_not_a_missing_plan() {
    let output = leaveplan(&["plan", "--start", "2025-07-07", "--end", "2025-07-08", "--days", "abc"]);

    assert_eq!(output.status.code(), Some(2));
    assert!(stdout(&output).is_empty());
}

#[test]
fn exit_1_on_malformed_date() {
    let output = leaveplan(&["plan", "--start", "2025-07-01", "--end", "next week", "--days", "3"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("Invalid date"), "{}", stderr(&output));
}

#[test]
fn exit_1_on_malformed_mandatory_range() {
    let output = leaveplan(&[
        "plan", "--start", "2025-07-01", "--end", "2025-07-31", "--days", "3", "--mandatory", "July:2",
    ]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("START..END:N"));
}

#[test]
fn exit_1_on_unknown_config_key() {
    let config = config_file("[planner]\nthreshold = 5\n");
    let output = leaveplan(&[
        "-c",
        config.path().to_str().unwrap(),
        "plan",
        "--start",
        "2025-07-01",
        "--end",
        "2025-07-31",
        "--days",
        "3",
    ]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("unknown field"), "{}", stderr(&output));
}

// =============================================================================
// suggest
// =============================================================================

#[test]
fn suggest_reports_statistics() {
    let config = config_file(JULY_BLOCK_CONFIG);
    let output = leaveplan(&[
        "-c",
        config.path().to_str().unwrap(),
        "suggest",
        "--start",
        "2025-07-01",
        "--end",
        "2025-07-31",
        "--days",
        "3",
        "--max-continuous",
        "3",
    ]);

    assert_eq!(output.status.code(), Some(0));
    let text = stdout(&output);
    assert!(text.contains("Range: 19 workdays, 5 holidays, 7 weekend days; 3 leave days requested"));
    assert!(text.contains("Max continuous leave: 3"));
}

#[test]
fn suggest_json_echoes_constraints() {
    let output = leaveplan(&[
        "suggest",
        "--start",
        "2025-01-01",
        "--end",
        "2025-03-31",
        "--days",
        "5",
        "--exclude",
        "2025-01-27",
        "--format",
        "json",
    ]);

    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));
    let result: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(result["summary"]["requested_days"], 5);
    assert_eq!(
        result["summary"]["constraints"]["excluded_dates"][0],
        "2025-01-27"
    );
    assert!(!result["plans"].as_array().unwrap().is_empty());
}

// =============================================================================
// calendar
// =============================================================================

#[test]
fn calendar_lists_makeup_workdays() {
    let output = leaveplan(&["calendar", "--start", "2025-09-27", "--end", "2025-10-12"]);

    assert_eq!(output.status.code(), Some(0));
    let text = stdout(&output);
    assert!(text.contains("2025-09-28 Sun  make-up workday"));
    assert!(text.contains("2025-10-01 Wed  holiday (National Day and Mid-Autumn Festival)"));
    assert!(text.contains("8 holidays, 2 make-up workdays"));
}

#[test]
fn calendar_json_with_calendar_file() {
    let calendar = config_file(
        "name = \"four-day-week\"\nworking_days = [1, 2, 3, 4]\n",
    );
    let output = leaveplan(&[
        "--calendar",
        calendar.path().to_str().unwrap(),
        "calendar",
        "--start",
        "2025-07-07",
        "--end",
        "2025-07-13",
        "--format",
        "json",
    ]);

    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["calendar"], "four-day-week");
    assert_eq!(report["days"].as_array().map(Vec::len), Some(7));
    // Friday is a rest day in a Mon-Thu week
    assert_eq!(report["days"][4]["kind"], "rest-day");
}

#[test]
fn calendar_outside_coverage_warns() {
    let output = leaveplan(&["calendar", "--start", "2025-12-31", "--end", "2026-01-01"]);

    assert_eq!(output.status.code(), Some(0));
    assert!(stdout(&output).contains("warning: 3 oracle lookups failed"));
}
