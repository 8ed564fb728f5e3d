use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};
use std::time::{SystemTime, UNIX_EPOCH};

use resonance::config::CATALOG_ENV;

fn bin() -> &'static str {
    env!("CARGO_BIN_EXE_resonance")
}

fn unique_temp_path(name: &str, ext: &str) -> PathBuf {
    let stamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock should be after unix epoch")
        .as_nanos();
    std::env::temp_dir().join(format!("resonance-{name}-{stamp}.{ext}"))
}

fn write_fixture(name: &str, ext: &str, body: &str) -> PathBuf {
    let path = unique_temp_path(name, ext);
    fs::write(&path, body).expect("fixture should be written");
    path
}

fn run(args: &[&str]) -> Output {
    Command::new(bin())
        .args(args)
        .env_remove(CATALOG_ENV)
        .output()
        .expect("binary should run")
}

const LOADOUT: &str = r#"{
    "class_name": "stormblade",
    "spec_name": "iaido",
    "base_stats": { "agility": 1200, "crit": 4000, "haste": 3000, "luck": 5000 }
}"#;

#[test]
fn missing_command_returns_usage() {
    let output = run(&[]);
    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("usage: resonance"));
}

#[test]
fn stats_command_emits_json() {
    let path = write_fixture("stats", "json", LOADOUT);
    let output = run(&["stats", path.to_string_lossy().as_ref()]);

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    let payload: serde_json::Value = serde_json::from_str(&stdout).expect("stats should emit json");
    assert_eq!(payload["class_name"], "stormblade");
    assert!(payload["percentages"]["crit"].as_f64().is_some_and(|pct| pct > 5.0));
    assert!(payload["aspd"].is_number());

    let _ = fs::remove_file(path);
}

#[test]
fn stats_command_requires_a_path() {
    let output = run(&["stats"]);
    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("usage: resonance stats"));
}

#[test]
fn stats_command_reports_bad_json() {
    let path = write_fixture("broken", "json", "{ not json");
    let output = run(&["stats", path.to_string_lossy().as_ref()]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("invalid JSON"));
    let _ = fs::remove_file(path);
}

#[test]
fn simulate_command_prints_table_and_exports_trace() {
    let loadout = write_fixture("sim", "json", LOADOUT);
    let csv = unique_temp_path("trace", "csv");
    let output = run(&[
        "simulate",
        loadout.to_string_lossy().as_ref(),
        "--duration",
        "30",
        "--trace-csv",
        csv.to_string_lossy().as_ref(),
        "--table",
    ]);

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("skill\tcasts\thits\tdamage\tshare"));
    assert!(stdout.contains("dps"));
    let exported = fs::read_to_string(&csv).expect("trace csv should exist");
    assert!(exported.starts_with("time,skill,"));

    let _ = fs::remove_file(loadout);
    let _ = fs::remove_file(csv);
}

#[test]
fn simulate_command_accepts_sequence_rotation() {
    let loadout = write_fixture("sim-seq", "json", LOADOUT);
    let rotation = write_fixture(
        "rotation",
        "json",
        r#"{ "sequence": [ { "skill": "thunder_strike", "repeat": 1 }, { "skill": "gale_slash", "repeat": 3 } ] }"#,
    );
    let output = run(&[
        "simulate",
        loadout.to_string_lossy().as_ref(),
        "--rotation",
        rotation.to_string_lossy().as_ref(),
    ]);

    assert_eq!(output.status.code(), Some(0));
    let payload: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("simulate should emit json");
    assert!(payload["dps"].as_f64().is_some_and(|dps| dps > 0.0));
    assert!(payload["breakdown"]["gale_slash"].is_object());

    let _ = fs::remove_file(loadout);
    let _ = fs::remove_file(rotation);
}

#[test]
fn optimize_command_emits_outcome() {
    let loadout = write_fixture("opt", "json", LOADOUT);
    let target = write_fixture(
        "target",
        "json",
        r#"{ "crit": 30, "haste": 20, "luck": 25 }"#,
    );
    let options = write_fixture(
        "options",
        "json",
        r#"{ "population": 4, "generations": 10 }"#,
    );
    let output = run(&[
        "optimize",
        loadout.to_string_lossy().as_ref(),
        target.to_string_lossy().as_ref(),
        "--options",
        options.to_string_lossy().as_ref(),
        "--seed",
        "3",
    ]);

    assert_eq!(output.status.code(), Some(0));
    let payload: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("optimize should emit json");
    assert_eq!(payload["history"].as_array().map(Vec::len), Some(11));
    assert!(payload["distance"].is_number());

    for path in [loadout, target, options] {
        let _ = fs::remove_file(path);
    }
}

#[test]
fn compare_command_needs_two_loadouts() {
    let loadout = write_fixture("cmp", "json", LOADOUT);
    let output = run(&["compare", loadout.to_string_lossy().as_ref()]);
    assert_eq!(output.status.code(), Some(2));

    let second = write_fixture("cmp-b", "json", LOADOUT);
    let output = run(&[
        "compare",
        loadout.to_string_lossy().as_ref(),
        second.to_string_lossy().as_ref(),
    ]);
    assert_eq!(output.status.code(), Some(0));
    let payload: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("compare should emit json");
    assert_eq!(payload.as_array().map(Vec::len), Some(2));

    let _ = fs::remove_file(loadout);
    let _ = fs::remove_file(second);
}

#[test]
fn validate_command_passes_on_builtin_catalog() {
    let output = run(&["validate"]);
    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("validation passed"));
}

#[test]
fn validate_command_fails_on_empty_catalog() {
    let catalog = write_fixture("empty-catalog", "json", "{}");
    let output = Command::new(bin())
        .arg("validate")
        .env(CATALOG_ENV, &catalog)
        .output()
        .expect("validate should run");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("validation failed"));

    let _ = fs::remove_file(catalog);
}

#[test]
fn validate_command_loads_sample_catalog() {
    let catalog = concat!(env!("CARGO_MANIFEST_DIR"), "/data/catalog.yaml");
    let output = Command::new(bin())
        .arg("validate")
        .env(CATALOG_ENV, catalog)
        .output()
        .expect("validate should run");

    assert_eq!(output.status.code(), Some(0));
}
