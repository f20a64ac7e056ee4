// SPDX-FileCopyrightText: 2026 ResolveNow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Semantic checks that serde attributes cannot express.

use crate::diagnostic::ConfigError;
use crate::model::ResolveNowConfig;

/// Minimum HS256 key length, in bytes.
pub const MIN_JWT_SECRET_LEN: usize = 32;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration.
///
/// Collects every failure instead of stopping at the first one.
pub fn validate_config(config: &ResolveNowConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();
    let mut fail = |message: String| errors.push(ConfigError::Validation { message });

    let host = config.server.host.trim();
    if host.is_empty() {
        fail("server.host must not be empty".to_string());
    } else if host.parse::<std::net::IpAddr>().is_err()
        && !host
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-')
    {
        fail(format!(
            "server.host `{host}` is not a valid IP address or hostname"
        ));
    }

    if !LOG_LEVELS.contains(&config.server.log_level.as_str()) {
        fail(format!(
            "server.log_level `{}` must be one of: {}",
            config.server.log_level,
            LOG_LEVELS.join(", ")
        ));
    }

    if config.storage.database_path.trim().is_empty() {
        fail("storage.database_path must not be empty".to_string());
    }

    let secret_len = config.auth.jwt_secret.len();
    if secret_len == 0 {
        fail("auth.jwt_secret must be set (RESOLVENOW_AUTH_JWT_SECRET)".to_string());
    } else if secret_len < MIN_JWT_SECRET_LEN {
        fail(format!(
            "auth.jwt_secret must be at least {MIN_JWT_SECRET_LEN} bytes, got {secret_len}"
        ));
    }

    if config.auth.token_ttl_hours == 0 {
        fail("auth.token_ttl_hours must be greater than zero".to_string());
    }

    if config.realtime.outbound_buffer == 0 {
        fail("realtime.outbound_buffer must be greater than zero".to_string());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> ResolveNowConfig {
        let mut config = ResolveNowConfig::default();
        config.auth.jwt_secret = "0123456789abcdef0123456789abcdef".into();
        config
    }

    #[test]
    fn valid_config_passes() {
        assert!(validate_config(&valid()).is_ok());
    }

    #[test]
    fn missing_secret_is_rejected() {
        let errors = validate_config(&ResolveNowConfig::default()).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].to_string().contains("auth.jwt_secret"));
    }

    #[test]
    fn short_secret_is_rejected() {
        let mut config = valid();
        config.auth.jwt_secret = "short".into();
        let errors = validate_config(&config).unwrap_err();
        assert!(errors[0].to_string().contains("at least 32 bytes"));
    }

    #[test]
    fn collects_all_errors() {
        let mut config = valid();
        config.server.host = "".into();
        config.server.log_level = "loud".into();
        config.storage.database_path = "  ".into();
        config.auth.token_ttl_hours = 0;
        config.realtime.outbound_buffer = 0;
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 5);
    }

    #[test]
    fn hostname_and_ipv6_hosts_are_accepted() {
        let mut config = valid();
        config.server.host = "api.example.com".into();
        assert!(validate_config(&config).is_ok());
        config.server.host = "::1".into();
        assert!(validate_config(&config).is_ok());
        config.server.host = "bad host!".into();
        assert!(validate_config(&config).is_err());
    }
}
