use hub_sync::application::config::{Config, Credentials, ServiceConfig};
use hub_sync::model::http::RestClient;
use std::env;
use std::time::Duration;

#[test]
fn test_basic_auth_needs_both_halves() {
    assert_eq!(
        Credentials::basic("admin", "secret").basic_auth(),
        Some(("admin", "secret"))
    );

    let username_only = Credentials {
        username: Some("admin".to_string()),
        ..Default::default()
    };
    assert!(username_only.basic_auth().is_none());
    assert!(Credentials::anonymous().basic_auth().is_none());
}

#[test]
fn test_credentials_never_serialize_secrets() {
    let credentials = Credentials {
        token: Some("perm:token".to_string()),
        ..Credentials::basic("admin", "secret")
    };

    let json = serde_json::to_string(&credentials).unwrap();
    assert!(json.contains("admin"));
    assert!(!json.contains("secret"));
    assert!(!json.contains("perm:token"));

    let shown = credentials.to_string();
    assert!(!shown.contains("secret"));
}

#[test]
fn test_service_config_from_env() {
    unsafe {
        env::set_var("HSCFG_URL", "http://hub.local/hub");
        env::set_var("HSCFG_USERNAME", "admin");
        env::set_var("HSCFG_PASSWORD", "secret");
        env::set_var("HSCFG_TIMEOUT", "7");
        env::remove_var("HSCFG_TOKEN");
    }

    let config = ServiceConfig::from_env("HSCFG", "http://localhost");

    assert_eq!(config.base_url, "http://hub.local/hub");
    assert_eq!(config.credentials.basic_auth(), Some(("admin", "secret")));
    assert!(config.credentials.token.is_none());
    assert_eq!(config.timeout, Some(7));

    unsafe {
        env::remove_var("HSCFG_URL");
        env::remove_var("HSCFG_USERNAME");
        env::remove_var("HSCFG_PASSWORD");
        env::remove_var("HSCFG_TIMEOUT");
    }
}

#[test]
fn test_service_config_defaults() {
    unsafe {
        env::remove_var("HSNONE_URL");
        env::remove_var("HSNONE_USERNAME");
        env::remove_var("HSNONE_PASSWORD");
        env::remove_var("HSNONE_TIMEOUT");
    }

    let config = ServiceConfig::from_env("HSNONE", "http://localhost:8080");

    assert_eq!(config.base_url, "http://localhost:8080");
    assert_eq!(config.credentials, Credentials::anonymous());
    assert_eq!(config.timeout, Some(30));
}

#[test]
fn test_service_config_zero_timeout_means_none() {
    unsafe {
        env::set_var("HSZERO_TIMEOUT", "0");
    }

    let config = ServiceConfig::from_env("HSZERO", "http://localhost:8080");
    assert!(config.timeout.is_none());

    let client = RestClient::from_config(&config).unwrap();
    assert!(client.timeout().is_none());

    unsafe {
        env::remove_var("HSZERO_TIMEOUT");
    }
}

#[test]
fn test_from_config_applies_timeout() {
    let config = ServiceConfig {
        base_url: "http://hub.local/hub".to_string(),
        credentials: Credentials::anonymous(),
        timeout: Some(12),
    };

    let client = RestClient::from_config(&config).unwrap();
    assert_eq!(client.timeout(), Some(Duration::from_secs(12)));
}

#[test]
fn test_config_page_size_is_positive() {
    let config = Config::new();
    assert!(config.page_size > 0);
}
