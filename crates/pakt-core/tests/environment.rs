use pakt_core::environment::Environment;
use tempfile::TempDir;

#[test]
fn parse_full_environment() {
    let env = Environment::parse_toml(
        r#"
name = "analysis"
channels = ["conda-forge", "defaults"]
dependencies = ["numpy>=1.16,<2", "pandas"]
"#,
    )
    .unwrap();
    assert_eq!(env.name.as_deref(), Some("analysis"));
    assert_eq!(
        env.channels,
        Some(vec!["conda-forge".to_string(), "defaults".to_string()])
    );
    assert_eq!(env.dependencies, vec!["numpy>=1.16,<2", "pandas"]);
}

#[test]
fn channels_are_optional() {
    let env = Environment::parse_toml("dependencies = [\"python\"]").unwrap();
    assert!(env.channels.is_none());
    assert!(env.name.is_none());
}

#[test]
fn empty_spec_is_rejected() {
    let err = Environment::parse_toml("dependencies = [\"python\", \" \"]").unwrap_err();
    assert!(err.to_string().contains("Environment error"), "got: {err}");
}

#[test]
fn from_path_reads_file() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("environment.toml");
    std::fs::write(&path, "dependencies = [\"a\", \"b=1\"]").unwrap();
    let env = Environment::from_path(&path).unwrap();
    assert_eq!(env.dependencies.len(), 2);
}
