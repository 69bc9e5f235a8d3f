// SPDX-FileCopyrightText: 2026 Skillbridge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that serde attributes cannot express.

use crate::diagnostic::ConfigError;
use crate::model::{BridgeConfig, CredentialsMode};

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration.
///
/// Collects every failure instead of stopping at the first one.
pub fn validate_config(config: &BridgeConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();
    let mut fail = |message: String| errors.push(ConfigError::Validation { message });

    let threshold = config.dispatch.threshold;
    if !(0.0..=1.0).contains(&threshold) {
        fail(format!(
            "dispatch.threshold must be between 0.0 and 1.0, got {threshold}"
        ));
    }

    if !LOG_LEVELS.contains(&config.assistant.log_level.as_str()) {
        fail(format!(
            "assistant.log_level `{}` must be one of: {}",
            config.assistant.log_level,
            LOG_LEVELS.join(", ")
        ));
    }

    if config.assistant.error_message.trim().is_empty() {
        fail("assistant.error_message must not be empty".to_string());
    }

    if config.transport.timeout_secs == Some(0) {
        fail("transport.timeout_secs must be greater than 0 when set".to_string());
    }

    let addr = config.server.bind_address.trim();
    if addr.is_empty() {
        fail("server.bind_address must not be empty".to_string());
    } else if addr.parse::<std::net::IpAddr>().is_err()
        && !addr
            .chars()
            .all(|c| c.is_alphanumeric() || c == '.' || c == '-')
    {
        fail(format!(
            "server.bind_address `{addr}` is not a valid IP address or hostname"
        ));
    }

    match config.credentials.mode {
        CredentialsMode::Anonymous => {}
        CredentialsMode::Static => {
            if config
                .credentials
                .static_token
                .as_deref()
                .is_none_or(|t| t.trim().is_empty())
            {
                fail("credentials.static_token is required when credentials.mode = \"static\"".to_string());
            }
        }
        CredentialsMode::ClientCredentials => {
            for (key, value) in [
                ("app_id", &config.credentials.app_id),
                ("app_password", &config.credentials.app_password),
            ] {
                if value.as_deref().is_none_or(|v| v.trim().is_empty()) {
                    fail(format!(
                        "credentials.{key} is required when credentials.mode = \"client_credentials\""
                    ));
                }
            }
            if url::Url::parse(&config.credentials.token_endpoint).is_err() {
                fail(format!(
                    "credentials.token_endpoint `{}` is not a valid URL",
                    config.credentials.token_endpoint
                ));
            }
        }
    }

    if let Some(endpoint) = &config.credentials.user_token_endpoint
        && url::Url::parse(endpoint).is_err()
    {
        fail(format!(
            "credentials.user_token_endpoint `{endpoint}` is not a valid URL"
        ));
    }

    for (i, path) in config.skills.manifest_files.iter().enumerate() {
        if path.trim().is_empty() {
            fail(format!("skills.manifest_files[{i}] must not be empty"));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
