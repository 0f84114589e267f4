use pakt_util::errors::PaktError;

#[test]
fn test_io_error_display() {
    let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
    let err = PaktError::from(io_err);
    assert!(err.to_string().contains("I/O error"), "got: {err}");
}

#[test]
fn test_config_error_display() {
    let err = PaktError::Config {
        message: "bad channels".to_string(),
    };
    assert_eq!(err.to_string(), "Config error: bad channels");
}

#[test]
fn test_catalog_error_display() {
    let err = PaktError::Catalog {
        message: "no repodata".to_string(),
    };
    assert_eq!(err.to_string(), "Catalog error: no repodata");
}

#[test]
fn test_environment_error_display() {
    let err = PaktError::Environment {
        message: "missing dependencies".to_string(),
    };
    assert_eq!(err.to_string(), "Environment error: missing dependencies");
}

#[test]
fn test_resolution_error_display() {
    let err = PaktError::Resolution {
        message: "conflict".to_string(),
    };
    assert_eq!(err.to_string(), "Dependency resolution failed: conflict");
}

#[test]
fn test_generic_error_display() {
    let err = PaktError::Generic {
        message: "something broke".to_string(),
    };
    assert_eq!(err.to_string(), "something broke");
}

#[test]
fn test_io_error_from_conversion() {
    let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
    let pakt_err: PaktError = io_err.into();
    assert!(matches!(pakt_err, PaktError::Io(_)));
}
