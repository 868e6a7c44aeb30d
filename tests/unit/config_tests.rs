// Configuration module unit tests

use dragonfly_imgproxy::config::*;
use dragonfly_imgproxy::dragonfly::DragonflyEngine;
use dragonfly_imgproxy::error::ErrorStatusMode;
use std::io::Write;
use tempfile::NamedTempFile;

#[test]
fn test_can_deserialize_minimal_valid_yaml_config() {
    let yaml = r#"
dragonfly:
  secret: "my-super-secret-key"
upstream:
  host: "127.0.0.1"
"#;
    let config: Config = serde_yaml::from_str(yaml).expect("Failed to deserialize YAML");

    assert_eq!(config.dragonfly.secret, "my-super-secret-key");
    assert_eq!(config.upstream.host, "127.0.0.1");
}

#[test]
fn test_config_round_trips_through_yaml() {
    let yaml = r#"
server:
  address: "127.0.0.1"
  port: 8081
  error_status: strict
dragonfly:
  secret: "k"
  url_prefix: "s3://bucket/"
upstream:
  host: "imgproxy"
  port: 8080
  tls: false
  timeout_secs: 10
logging:
  level: warn
  format: json
"#;
    let config = Config::from_yaml_with_env(yaml).unwrap();
    let serialized = serde_yaml::to_string(&config).unwrap();
    let reparsed = Config::from_yaml_with_env(&serialized).unwrap();

    assert_eq!(reparsed.server.port, 8081);
    assert_eq!(reparsed.server.error_status, ErrorStatusMode::Strict);
    assert_eq!(reparsed.dragonfly.url_prefix, "s3://bucket/");
    assert_eq!(reparsed.upstream.timeout_secs, 10);
    assert_eq!(reparsed.logging.level, "warn");
}

#[test]
fn test_secret_from_environment_feeds_the_engine() {
    std::env::set_var("DRAGONFLY_UNIT_TEST_SECRET", "env-secret");
    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file
        .write_all(
            br#"
dragonfly:
  secret: "${DRAGONFLY_UNIT_TEST_SECRET}"
  url_prefix: "https://images.example.com/"
upstream:
  host: "imgproxy"
"#,
        )
        .unwrap();
    temp_file.flush().unwrap();

    let config = Config::from_file(temp_file.path()).unwrap();
    config.validate().unwrap();

    let engine = DragonflyEngine::new(&config.dragonfly).unwrap();
    assert_eq!(engine.url_prefix(), "https://images.example.com/");
}

#[test]
fn test_invalid_yaml_is_reported() {
    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file.write_all(b"dragonfly: [unterminated").unwrap();
    temp_file.flush().unwrap();

    assert!(Config::from_file(temp_file.path()).is_err());
}

#[test]
fn test_logging_config_rejects_unknown_format() {
    let result: Result<LoggingConfig, _> = serde_yaml::from_str("format: xml");
    assert!(result.is_err());
}
