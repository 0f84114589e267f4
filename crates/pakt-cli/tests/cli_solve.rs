use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

const CATALOG: &str = r#"{
  "A": {
    "1": {"depends": ["B>=2"], "channel": "main", "filename": "A-1-0.tar.bz2"}
  },
  "B": {
    "1": {"channel": "main"},
    "2": {"channel": "main"},
    "3": {"channel": "main"}
  },
  "C": {
    "1": {"channel": "main"},
    "2": {"channel": "r"}
  }
}"#;

fn pakt_cmd(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("pakt").unwrap();
    cmd.env("HOME", home.path()).env_remove("RUST_LOG");
    cmd
}

fn setup() -> TempDir {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("catalog.json"), CATALOG).unwrap();
    tmp
}

#[test]
fn test_solve_prints_plan_in_install_order() {
    let tmp = setup();
    pakt_cmd(&tmp)
        .current_dir(tmp.path())
        .args(["solve", "A", "--catalog", "catalog.json"])
        .assert()
        .success()
        .stdout("B 3 main\nA 1 main\n")
        .stderr(predicate::str::contains("Resolved"));
}

#[test]
fn test_solve_json_output() {
    let tmp = setup();
    let output = pakt_cmd(&tmp)
        .current_dir(tmp.path())
        .args(["solve", "A", "--catalog", "catalog.json", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let plan: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let plan = plan.as_array().unwrap();
    assert_eq!(plan.len(), 2);
    assert_eq!(plan[1]["name"], "A");
    assert_eq!(plan[1]["metadata"]["filename"], "A-1-0.tar.bz2");
}

#[test]
fn test_solve_unsatisfiable_reports_conflict() {
    let tmp = setup();
    pakt_cmd(&tmp)
        .current_dir(tmp.path())
        .args(["solve", "A", "B=1", "--catalog", "catalog.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no installable set of packages"));
}

#[test]
fn test_solve_malformed_spec_fails() {
    let tmp = setup();
    pakt_cmd(&tmp)
        .current_dir(tmp.path())
        .args(["solve", "A 1 2 3", "--catalog", "catalog.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("malformed package spec"));
}

#[test]
fn test_solve_channel_flag_changes_priority() {
    let tmp = setup();
    pakt_cmd(&tmp)
        .current_dir(tmp.path())
        .args(["solve", "C", "--catalog", "catalog.json"])
        .assert()
        .success()
        .stdout("C 1 main\n");

    pakt_cmd(&tmp)
        .current_dir(tmp.path())
        .args(["solve", "C", "--catalog", "catalog.json", "-c", "r", "-c", "defaults"])
        .assert()
        .success()
        .stdout("C 2 r\n");
}

#[test]
fn test_solve_uses_config_channels() {
    let tmp = setup();
    let config_dir = tmp.path().join(".pakt");
    fs::create_dir_all(&config_dir).unwrap();
    fs::write(config_dir.join("config.toml"), "channels = [\"r\", \"main\"]\n").unwrap();

    pakt_cmd(&tmp)
        .current_dir(tmp.path())
        .args(["solve", "C", "--catalog", "catalog.json"])
        .assert()
        .success()
        .stdout("C 2 r\n");
}

#[test]
fn test_solve_without_cache_fails() {
    let tmp = TempDir::new().unwrap();
    pakt_cmd(&tmp)
        .current_dir(tmp.path())
        .args(["solve", "A"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No repodata found"));
}

#[test]
fn test_solve_requires_specs() {
    let tmp = setup();
    pakt_cmd(&tmp)
        .current_dir(tmp.path())
        .args(["solve"])
        .assert()
        .failure();
}
