// SPDX-FileCopyrightText: 2026 ResolveNow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration for the ResolveNow service.
//!
//! TOML files layered over compiled defaults, `RESOLVENOW_*` environment
//! overrides, strict unknown-key rejection, and miette diagnostics with
//! typo suggestions.
//!
//! ```no_run
//! let config = resolvenow_config::load_and_validate().expect("config errors");
//! println!("listening on {}:{}", config.server.host, config.server.port);
//! ```

pub mod diagnostic;
pub mod loader;
pub mod model;
pub mod validation;

use std::path::Path;

pub use diagnostic::{ConfigError, render_errors};
pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::ResolveNowConfig;

/// Load from the standard hierarchy and validate.
pub fn load_and_validate() -> Result<ResolveNowConfig, Vec<ConfigError>> {
    match loader::load_config() {
        Ok(config) => {
            validation::validate_config(&config)?;
            Ok(config)
        }
        Err(err) => Err(diagnostic::figment_to_config_errors(
            err,
            &collect_toml_sources(),
        )),
    }
}

/// Load from one explicit file (plus env overrides) and validate.
pub fn load_and_validate_path(path: &Path) -> Result<ResolveNowConfig, Vec<ConfigError>> {
    tracing::debug!(path = %path.display(), "loading configuration file");
    match loader::load_config_from_path(path) {
        Ok(config) => {
            validation::validate_config(&config)?;
            Ok(config)
        }
        Err(err) => {
            let sources = read_source(path).into_iter().collect::<Vec<_>>();
            Err(diagnostic::figment_to_config_errors(err, &sources))
        }
    }
}

/// Load from an inline TOML string and validate.
pub fn load_and_validate_str(toml_content: &str) -> Result<ResolveNowConfig, Vec<ConfigError>> {
    match loader::load_config_from_str(toml_content) {
        Ok(config) => {
            validation::validate_config(&config)?;
            Ok(config)
        }
        Err(err) => {
            let sources = vec![("<inline>".to_string(), toml_content.to_string())];
            Err(diagnostic::figment_to_config_errors(err, &sources))
        }
    }
}

/// Effective configuration as TOML, with the signing secret masked.
pub fn render_effective(config: &ResolveNowConfig) -> Result<String, ConfigError> {
    let mut shown = config.clone();
    if !shown.auth.jwt_secret.is_empty() {
        shown.auth.jwt_secret = "[redacted]".to_string();
    }
    toml::to_string_pretty(&shown).map_err(|e| ConfigError::Other(e.to_string()))
}

fn read_source(path: &Path) -> Option<(String, String)> {
    let content = std::fs::read_to_string(path).ok()?;
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir().ok()?.join(path)
    };
    Some((absolute.display().to_string(), content))
}

/// Contents of whichever config files exist, for diagnostic spans.
fn collect_toml_sources() -> Vec<(String, String)> {
    [
        Path::new(loader::LOCAL_CONFIG).to_path_buf(),
        loader::user_config_path(),
        Path::new(loader::SYSTEM_CONFIG).to_path_buf(),
    ]
    .iter()
    .filter_map(|p| read_source(p))
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn effective_config_masks_secret() {
        let mut config = ResolveNowConfig::default();
        config.auth.jwt_secret = "0123456789abcdef0123456789abcdef".into();
        let rendered = render_effective(&config).unwrap();
        assert!(rendered.contains("[redacted]"));
        assert!(!rendered.contains("0123456789abcdef"));
        assert!(rendered.contains("[server]"));
    }
}
