//! Configuration loading and validation tests
//!
//! Tests focus on observable behavior: what loads, what is rejected and
//! which defaults apply.

use naver_search_mcp::config::{ConfigError, ServerConfig};
use std::io::Write;
use std::time::Duration;
use tempfile::NamedTempFile;

#[test]
fn test_config_loads_successfully_from_valid_toml() {
    let mut temp_file = NamedTempFile::new().unwrap();
    writeln!(
        temp_file,
        r#"
[server]
name = "search-tools"

[naver]
base_url = "http://localhost:9999"
client_id_env = "SEARCH_ID"
client_secret_env = "SEARCH_SECRET"
timeout_secs = 12

[health]
port = 8081
"#
    )
    .unwrap();

    let config = ServerConfig::load_from_file(temp_file.path()).unwrap();

    assert_eq!(config.server.name, "search-tools");
    assert_eq!(config.naver.base_url, "http://localhost:9999");
    assert_eq!(config.naver.client_id_env, "SEARCH_ID");
    assert_eq!(config.naver.timeout_secs, 12);
    assert_eq!(config.health.port, Some(8081));
    assert_eq!(
        config.health.socket_addr(),
        Some("127.0.0.1:8081".parse().unwrap())
    );
}

#[test]
fn test_explicit_path_is_preferred() {
    let mut temp_file = NamedTempFile::new().unwrap();
    writeln!(temp_file, "[server]\nname = \"explicit\"").unwrap();

    let (config, source) = ServerConfig::load(Some(temp_file.path())).unwrap();

    assert_eq!(config.server.name, "explicit");
    assert_eq!(source.as_deref(), Some(temp_file.path()));
}

#[test]
fn test_missing_file_is_read_error() {
    let result = ServerConfig::load_from_file(std::path::Path::new("/nonexistent/naver-search.toml"));
    assert!(matches!(result, Err(ConfigError::FileRead(_))));
}

#[test]
fn test_malformed_toml_is_parse_error() {
    let mut temp_file = NamedTempFile::new().unwrap();
    writeln!(temp_file, "[naver\nbase_url = ").unwrap();

    let result = ServerConfig::load_from_file(temp_file.path());
    assert!(matches!(result, Err(ConfigError::TomlParse(_))));
}

#[test]
fn test_wrong_field_type_is_parse_error() {
    let mut temp_file = NamedTempFile::new().unwrap();
    writeln!(temp_file, "[naver]\ntimeout_secs = \"thirty\"").unwrap();

    let result = ServerConfig::load_from_file(temp_file.path());
    assert!(matches!(result, Err(ConfigError::TomlParse(_))));
}

#[test]
fn test_invalid_values_rejected_on_load() {
    let mut temp_file = NamedTempFile::new().unwrap();
    writeln!(temp_file, "[naver]\ntimeout_secs = 0").unwrap();

    let result = ServerConfig::load_from_file(temp_file.path());
    assert!(matches!(result, Err(ConfigError::InvalidConfig(_))));
}

#[test]
fn test_credentials_resolved_from_named_variables() {
    std::env::set_var("NAVER_SEARCH_CONFIG_TEST_ID", "id-value");
    std::env::set_var("NAVER_SEARCH_CONFIG_TEST_SECRET", "secret-value");

    let mut config = ServerConfig::default();
    config.naver.client_id_env = "NAVER_SEARCH_CONFIG_TEST_ID".to_string();
    config.naver.client_secret_env = "NAVER_SEARCH_CONFIG_TEST_SECRET".to_string();

    let credentials = config.resolve_credentials().unwrap();
    assert_eq!(credentials.client_id, "id-value");
    assert_eq!(credentials.client_secret, "secret-value");

    let naver = config.naver_config(credentials);
    assert_eq!(naver.timeout, Duration::from_secs(30));
}

#[test]
fn test_empty_credential_is_missing() {
    std::env::set_var("NAVER_SEARCH_CONFIG_TEST_EMPTY_ID", "");
    std::env::set_var("NAVER_SEARCH_CONFIG_TEST_EMPTY_SECRET", "secret");

    let mut config = ServerConfig::default();
    config.naver.client_id_env = "NAVER_SEARCH_CONFIG_TEST_EMPTY_ID".to_string();
    config.naver.client_secret_env = "NAVER_SEARCH_CONFIG_TEST_EMPTY_SECRET".to_string();

    match config.resolve_credentials() {
        Err(ConfigError::EnvVarNotFound(name)) => {
            assert_eq!(name, "NAVER_SEARCH_CONFIG_TEST_EMPTY_ID")
        }
        other => panic!("expected EnvVarNotFound, got {other:?}"),
    }
}
