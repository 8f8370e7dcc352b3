use super::*;

/// # Safety
/// Tests must run with `--test-threads=1` to avoid env races.
unsafe fn clear_server_env() {
    unsafe {
        std::env::remove_var("PORT");
        std::env::remove_var("DATABASE_URL");
        std::env::remove_var("DB_MAX_CONNECTIONS");
        std::env::remove_var("DETECTOR_URL");
        std::env::remove_var("DETECTOR_TIMEOUT_SECS");
    }
}

#[test]
fn from_env_defaults() {
    unsafe { clear_server_env() };

    let cfg = ServerConfig::from_env().unwrap();
    assert_eq!(cfg.port, DEFAULT_PORT);
    assert!(cfg.database_url.is_none());
    assert_eq!(cfg.db_max_connections, DEFAULT_DB_MAX_CONNECTIONS);
    assert!(cfg.detector.is_none());
}

#[test]
fn from_env_parses_overrides() {
    unsafe {
        clear_server_env();
        std::env::set_var("PORT", "8080");
        std::env::set_var("DATABASE_URL", "postgres://localhost/wireframe");
        std::env::set_var("DB_MAX_CONNECTIONS", "12");
        std::env::set_var("DETECTOR_URL", "http://localhost:5000/api/detect-objects");
        std::env::set_var("DETECTOR_TIMEOUT_SECS", "15");
    }

    let cfg = ServerConfig::from_env().unwrap();
    assert_eq!(cfg.port, 8080);
    assert_eq!(cfg.database_url.as_deref(), Some("postgres://localhost/wireframe"));
    assert_eq!(cfg.db_max_connections, 12);
    assert_eq!(
        cfg.detector,
        Some(DetectorConfig { url: "http://localhost:5000/api/detect-objects".into(), timeout_secs: 15 })
    );

    unsafe { clear_server_env() };
}

#[test]
fn malformed_numbers_fall_back_to_defaults() {
    unsafe {
        clear_server_env();
        std::env::set_var("DB_MAX_CONNECTIONS", "lots");
        std::env::set_var("DETECTOR_URL", "http://detector");
        std::env::set_var("DETECTOR_TIMEOUT_SECS", "-1");
    }

    let cfg = ServerConfig::from_env().unwrap();
    assert_eq!(cfg.db_max_connections, DEFAULT_DB_MAX_CONNECTIONS);
    assert_eq!(cfg.detector.unwrap().timeout_secs, DEFAULT_DETECTOR_TIMEOUT_SECS);

    unsafe { clear_server_env() };
}

#[test]
fn invalid_port_is_an_error() {
    unsafe {
        clear_server_env();
        std::env::set_var("PORT", "http");
    }

    assert!(matches!(ServerConfig::from_env(), Err(ConfigError::InvalidPort(p)) if p == "http"));

    unsafe { clear_server_env() };
}

#[test]
fn blank_urls_are_treated_as_unset() {
    unsafe {
        clear_server_env();
        std::env::set_var("DATABASE_URL", "  ");
        std::env::set_var("DETECTOR_URL", "");
    }

    let cfg = ServerConfig::from_env().unwrap();
    assert!(cfg.database_url.is_none());
    assert!(cfg.detector.is_none());

    unsafe { clear_server_env() };
}
