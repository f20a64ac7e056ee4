// SPDX-FileCopyrightText: 2026 ResolveNow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for configuration loading and validation.

use resolvenow_config::diagnostic::ConfigError;
use resolvenow_config::{load_and_validate_str, load_config, load_config_from_str};

const SECRET: &str = "an-hs256-secret-long-enough-for-tests";

#[test]
fn full_toml_deserializes() {
    let toml = format!(
        r#"
[server]
host = "0.0.0.0"
port = 8088
log_level = "debug"
cors_origins = ["http://localhost:3000"]

[storage]
database_path = "/tmp/resolvenow-test.db"
wal_mode = false

[auth]
jwt_secret = "{SECRET}"
token_ttl_hours = 12

[lifecycle]
enforce_forward_transitions = true

[realtime]
outbound_buffer = 8

[prometheus]
enabled = true
"#
    );

    let config = load_and_validate_str(&toml).expect("valid config");
    assert_eq!(config.server.host, "0.0.0.0");
    assert_eq!(config.server.port, 8088);
    assert_eq!(config.server.cors_origins, vec!["http://localhost:3000"]);
    assert_eq!(config.storage.database_path, "/tmp/resolvenow-test.db");
    assert!(!config.storage.wal_mode);
    assert_eq!(config.auth.jwt_secret, SECRET);
    assert_eq!(config.auth.token_ttl_hours, 12);
    assert!(config.lifecycle.enforce_forward_transitions);
    assert_eq!(config.realtime.outbound_buffer, 8);
    assert!(config.prometheus.enabled);
}

#[test]
fn empty_toml_yields_defaults() {
    let config = load_config_from_str("").expect("defaults");
    assert_eq!(config.server.port, 5000);
    assert_eq!(config.auth.token_ttl_hours, 168);
}

#[test]
fn misspelled_key_gets_suggestion() {
    let toml = "[auth]\njwt_secrte = \"x\"\n";
    let errors = load_and_validate_str(toml).unwrap_err();
    let unknown = errors
        .iter()
        .find_map(|e| match e {
            ConfigError::UnknownKey {
                key, suggestion, ..
            } => Some((key.clone(), suggestion.clone())),
            _ => None,
        })
        .expect("unknown key error");
    assert_eq!(unknown.0, "jwt_secrte");
    assert_eq!(unknown.1.as_deref(), Some("jwt_secret"));
}

#[test]
fn unknown_section_is_rejected() {
    let errors = load_and_validate_str("[mailer]\nhost = \"smtp\"\n").unwrap_err();
    assert!(matches!(errors[0], ConfigError::UnknownKey { .. }));
}

#[test]
fn wrong_type_is_reported() {
    let toml = format!("[server]\nport = \"eighty\"\n[auth]\njwt_secret = \"{SECRET}\"\n");
    let errors = load_and_validate_str(&toml).unwrap_err();
    assert!(matches!(
        errors[0],
        ConfigError::InvalidType { .. } | ConfigError::Other(_)
    ));
    assert!(errors[0].to_string().contains("port") || errors[0].to_string().contains("eighty"));
}

#[test]
fn short_secret_fails_validation() {
    let errors = load_and_validate_str("[auth]\njwt_secret = \"tiny\"\n").unwrap_err();
    assert!(
        errors
            .iter()
            .any(|e| matches!(e, ConfigError::Validation { message } if message.contains("jwt_secret")))
    );
}

#[test]
fn env_overrides_local_file() {
    figment::Jail::expect_with(|jail| {
        jail.create_file(
            "resolvenow.toml",
            &format!("[server]\nport = 7000\n[auth]\njwt_secret = \"{SECRET}\"\n"),
        )?;
        jail.set_env("RESOLVENOW_SERVER_PORT", "7100");
        jail.set_env("RESOLVENOW_LIFECYCLE_ENFORCE_FORWARD_TRANSITIONS", "true");

        let config = load_config()?;
        assert_eq!(config.server.port, 7100);
        assert!(config.lifecycle.enforce_forward_transitions);
        assert_eq!(config.auth.jwt_secret, SECRET);
        Ok(())
    });
}

#[test]
fn env_secret_keeps_underscores() {
    figment::Jail::expect_with(|jail| {
        jail.set_env("RESOLVENOW_AUTH_JWT_SECRET", SECRET);
        let config = load_config()?;
        assert_eq!(config.auth.jwt_secret, SECRET);
        Ok(())
    });
}
