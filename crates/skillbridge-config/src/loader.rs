// SPDX-FileCopyrightText: 2026 Skillbridge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./skillbridge.toml` > `~/.config/skillbridge/skillbridge.toml`
//! > `/etc/skillbridge/skillbridge.toml` with environment variable overrides via the
//! `SKILLBRIDGE_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::BridgeConfig;

/// Config file name searched in each hierarchy level.
pub const CONFIG_FILE: &str = "skillbridge.toml";

/// Section names that env var keys are split on (first underscore after the section).
const SECTIONS: &[&str] = &[
    "assistant",
    "dispatch",
    "transport",
    "credentials",
    "state",
    "server",
    "skills",
];

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/skillbridge/skillbridge.toml`
/// 3. `~/.config/skillbridge/skillbridge.toml`
/// 4. `./skillbridge.toml`
/// 5. `SKILLBRIDGE_*` environment variables
pub fn load_config() -> Result<BridgeConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
pub fn load_config_from_str(toml_content: &str) -> Result<BridgeConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(BridgeConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<BridgeConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(BridgeConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used for hierarchy loading, before extraction.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(BridgeConfig::default()))
        .merge(Toml::file(Path::new("/etc/skillbridge").join(CONFIG_FILE)))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("skillbridge").join(CONFIG_FILE))
                .unwrap_or_default(),
        ))
        .merge(Toml::file(CONFIG_FILE))
        .merge(env_provider())
}

/// Env provider mapping `SKILLBRIDGE_<SECTION>_<KEY>` to `<section>.<key>`.
///
/// Uses `Env::map()` rather than `Env::split("_")` so keys containing underscores
/// survive: `SKILLBRIDGE_CREDENTIALS_APP_PASSWORD` is `credentials.app_password`.
fn env_provider() -> Env {
    Env::prefixed("SKILLBRIDGE_").map(|key| map_env_key(key.as_str()).into())
}

/// Maps a lowercased, prefix-stripped env var name onto a dotted config path.
pub fn map_env_key(key: &str) -> String {
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
