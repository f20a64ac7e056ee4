// SPDX-FileCopyrightText: 2026 ResolveNow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Figment-based loader.
//!
//! Merge order (later overrides earlier):
//! 1. Compiled defaults
//! 2. `/etc/resolvenow/resolvenow.toml`
//! 3. `~/.config/resolvenow/resolvenow.toml`
//! 4. `./resolvenow.toml`
//! 5. `RESOLVENOW_*` environment variables

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::ResolveNowConfig;

pub(crate) const SYSTEM_CONFIG: &str = "/etc/resolvenow/resolvenow.toml";
pub(crate) const LOCAL_CONFIG: &str = "resolvenow.toml";

/// Config sections, used to map `RESOLVENOW_<SECTION>_<KEY>` onto `section.key`.
const SECTIONS: &[&str] = &[
    "server",
    "storage",
    "auth",
    "lifecycle",
    "realtime",
    "prometheus",
];

pub(crate) fn user_config_path() -> PathBuf {
    dirs::config_dir()
        .map(|d| d.join("resolvenow/resolvenow.toml"))
        .unwrap_or_default()
}

/// Load configuration from the standard hierarchy with env var overrides.
pub fn load_config() -> Result<ResolveNowConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from an inline TOML string only (no files, no env).
pub fn load_config_from_str(toml_content: &str) -> Result<ResolveNowConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(ResolveNowConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from one explicit file, with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<ResolveNowConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(ResolveNowConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// The full layered Figment, before extraction.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(ResolveNowConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG))
        .merge(Toml::file(user_config_path()))
        .merge(Toml::file(LOCAL_CONFIG))
        .merge(env_provider())
}

/// Env provider with explicit section mapping.
///
/// `Env::split("_")` would turn `RESOLVENOW_AUTH_JWT_SECRET` into
/// `auth.jwt.secret`; only the first underscore after a known section
/// name is a separator.
fn env_provider() -> Env {
    Env::prefixed("RESOLVENOW_").map(|key| map_env_key(&key.as_str().to_ascii_lowercase()).into())
}

pub(crate) fn map_env_key(key: &str) -> String {
    for section in SECTIONS {
        if let Some(rest) = key
            .strip_prefix(section)
            .and_then(|rest| rest.strip_prefix('_'))
        {
            return format!("{section}.{rest}");
        }
    }
    key.to_string()
}
