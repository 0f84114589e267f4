use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

const CATALOG: &str = r#"{
  "app": {"1.0": {"depends": ["lib"], "channel": "main"}},
  "lib": {"0.5": {"depends": ["base"], "channel": "main"}},
  "base": {"2": {"channel": "main"}},
  "other": {"1": {"channel": "main"}}
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
fn test_why_prints_path() {
    let tmp = setup();
    pakt_cmd(&tmp)
        .current_dir(tmp.path())
        .args(["why", "base", "app", "--catalog", "catalog.json"])
        .assert()
        .success()
        .stdout("Path to base:\n<root>\n  app 1.0\n    lib 0.5\n      base 2\n");
}

#[test]
fn test_why_not_installed_fails() {
    let tmp = setup();
    pakt_cmd(&tmp)
        .current_dir(tmp.path())
        .args(["why", "other", "app", "--catalog", "catalog.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("'other' is not part"));
}
