use std::process::{Command, Output};

fn run_cli(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_archery-cli"))
        .args(args)
        .env_remove("ARCHERY_API_BASE")
        .output()
        .expect("Failed to execute command")
}

fn run_json(args: &[&str]) -> serde_json::Value {
    let output = run_cli(args);
    assert!(
        output.status.success(),
        "Command should succeed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("Should be JSON format")
}

#[test]
fn test_cli_spine_offline_fallback() {
    let json = run_json(&[
        "--offline",
        "spine",
        "--draw-weight", "60",
        "--arrow-length", "29",
        "--point-weight", "100",
        "--output", "json",
    ]);

    assert_eq!(json["recommended_spine"].as_f64(), Some(763.0));
    assert_eq!(json["spine_range"]["min"].as_f64(), Some(738.0));
    assert_eq!(json["source"], "fallback");
}

#[test]
fn test_cli_spine_wood() {
    let json = run_json(&[
        "--offline",
        "spine",
        "--draw-weight", "50",
        "--arrow-length", "28",
        "--point-weight", "100",
        "--material", "wood",
        "--bow-type", "longbow",
        "--output", "json",
    ]);

    assert_eq!(json["recommended_spine"], "50#");
    assert_eq!(json["spine_range"]["min"], "45#");
    assert_eq!(json["spine_range"]["max"], "55#");
}

#[test]
fn test_cli_spine_table() {
    let output = run_cli(&["--offline", "spine", "--draw-weight", "45", "--bow-type", "recurve"]);

    assert!(output.status.success(), "Command should succeed");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("SPINE RECOMMENDATION"), "Should contain table output: {}", stdout);
    assert!(stdout.contains("local approximation"), "Should flag the fallback");
}

#[test]
fn test_cli_speed_reference_bow() {
    let json = run_json(&[
        "speed",
        "--draw-weight", "70",
        "--draw-length", "30",
        "--arrow-weight", "350",
        "--output", "json",
    ]);

    assert_eq!(json["speed_fps"].as_f64(), Some(279.7));
    assert_eq!(json["rating"], "Moderate");
}

#[test]
fn test_cli_speed_rejects_weightless_arrow() {
    let output = run_cli(&["speed", "--arrow-weight", "0"]);
    assert!(!output.status.success(), "Zero arrow weight should fail");
}

#[test]
fn test_cli_performance_json() {
    let json = run_json(&[
        "--offline",
        "performance",
        "--gpi", "8.9",
        "--arrow-length", "30",
        "--point-weight", "100",
        "--fletching-weight", "0",
        "--output", "json",
    ]);

    assert_eq!(json["total_weight"].as_f64(), Some(377.0));
    assert_eq!(json["foc_percentage"].as_f64(), Some(26.5));
    assert_eq!(json["speed_source"], "live_estimated");
    assert!(json["performance_score"].as_u64().is_some());
}

#[test]
fn test_cli_performance_csv() {
    let output = run_cli(&["--offline", "performance", "--gpi", "9.5", "--output", "csv"]);

    assert!(output.status.success(), "Command should succeed");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("metric,value"), "Should be CSV format: {}", stdout);
    assert!(stdout.contains("kinetic_energy_initial,"));
}

#[test]
fn test_cli_compatibility() {
    let json = run_json(&["compatibility", "--arrow-spine", "400", "--recommended", "400", "--output", "json"]);
    assert_eq!(json["score"], 100);
    assert_eq!(json["in_tolerance"], true);

    let json = run_json(&["compatibility", "--arrow-spine", "300", "--recommended", "400", "--output", "json"]);
    assert_eq!(json["score"], 0);
    assert_eq!(json["in_tolerance"], false);
}

#[test]
fn test_cli_best_match() {
    let json = run_json(&[
        "best-match",
        "--recommended", "400",
        "--spines", "500,400,340",
        "--output", "json",
    ]);

    assert_eq!(json["best_spine"].as_f64(), Some(400.0));
    assert_eq!(json["compatibility"]["score"], 100);
}

#[test]
fn test_cli_best_match_without_candidates() {
    let json = run_json(&["best-match", "--recommended", "400", "--spines", "0", "--output", "json"]);
    assert!(json.is_null());
}

#[test]
fn test_cli_info() {
    let output = run_cli(&["--offline", "info"]);

    assert!(output.status.success(), "Info command should succeed");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("ARCHERY ENGINE"));
}

#[test]
fn test_cli_help() {
    let output = run_cli(&["--help"]);

    assert!(output.status.success(), "Help command should succeed");
    let stdout = String::from_utf8_lossy(&output.stdout);
    for command in ["spine", "speed", "performance", "compatibility", "best-match", "info"] {
        assert!(stdout.contains(command), "Should list {} command", command);
    }
}

#[test]
fn test_cli_invalid_bow_type() {
    let output = run_cli(&["--offline", "spine", "--bow-type", "crossbow"]);
    assert!(!output.status.success(), "Unknown bow type should fail");
}

#[test]
fn test_cli_invalid_command() {
    let output = run_cli(&["invalid-command"]);
    assert!(!output.status.success(), "Invalid command should fail");
}

#[test]
fn test_cli_missing_required_args() {
    let output = run_cli(&["compatibility"]);
    assert!(!output.status.success(), "Should fail with missing args");
}
