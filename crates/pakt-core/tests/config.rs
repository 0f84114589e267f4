use pakt_core::config::{dirs_path, GlobalConfig};
use tempfile::TempDir;

#[test]
fn test_global_config_default_channels() {
    let config = GlobalConfig::default();
    assert_eq!(config.channels, vec!["defaults".to_string()]);
    let order = config.channel_order();
    let names: Vec<&str> = order.iter().collect();
    assert_eq!(names, vec!["main", "free", "pro", "r"]);
}

#[test]
fn test_global_config_default_cache_dir() {
    let config = GlobalConfig::default();
    assert_eq!(config.cache.dir, "~/.pakt/pkgs");
    assert!(config.cache_dir().ends_with(".pakt/pkgs"));
}

#[test]
fn test_global_config_empty_toml_uses_defaults() {
    let config: GlobalConfig = toml::from_str("").unwrap();
    assert_eq!(config.channels, vec!["defaults".to_string()]);
    assert!(config.default_packages.is_empty());
    assert!(!config.offline);
}

#[test]
fn test_dirs_path_contains_pakt() {
    assert!(dirs_path().ends_with(".pakt"));
}

#[test]
fn test_global_config_parse_from_toml() {
    let toml = r#"
channels = ["conda-forge", "defaults"]
default-packages = ["python"]
offline = true

[cache]
dir = "/custom/cache"
"#;
    let config: GlobalConfig = toml::from_str(toml).unwrap();
    assert_eq!(config.channels, vec!["conda-forge", "defaults"]);
    assert_eq!(config.default_packages, vec!["python"]);
    assert!(config.offline);
    assert_eq!(config.cache.dir, "/custom/cache");
    assert_eq!(config.channel_order().priority("conda-forge"), 5);
}

#[test]
fn test_load_from_missing_file_is_default() {
    let tmp = TempDir::new().unwrap();
    let config = GlobalConfig::load_from(&tmp.path().join("config.toml")).unwrap();
    assert_eq!(config.channels, vec!["defaults".to_string()]);
}

#[test]
fn test_load_from_invalid_file_fails() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("config.toml");
    std::fs::write(&path, "channels = 3").unwrap();
    let err = GlobalConfig::load_from(&path).unwrap_err();
    assert!(err.to_string().contains("Config error"), "got: {err}");
}
