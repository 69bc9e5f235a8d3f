// SPDX-FileCopyrightText: 2026 Skillbridge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for skillbridge.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Top-level skillbridge configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BridgeConfig {
    /// Assistant identity and user-facing messages.
    #[serde(default)]
    pub assistant: AssistantConfig,

    /// Intent dispatch settings.
    #[serde(default)]
    pub dispatch: DispatchConfig,

    /// Outbound HTTP settings for skill calls.
    #[serde(default)]
    pub transport: TransportConfig,

    /// How bearer tokens for skill calls are obtained.
    #[serde(default)]
    pub credentials: CredentialsConfig,

    /// Conversation and user state persistence.
    #[serde(default)]
    pub state: StateConfig,

    /// HTTP listener for inbound activities.
    #[serde(default)]
    pub server: ServerConfig,

    /// Registered skill manifests.
    #[serde(default)]
    pub skills: SkillsConfig,
}

/// Assistant identity and user-facing message configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AssistantConfig {
    /// Display name of the assistant.
    #[serde(default = "default_assistant_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Sent to the user when forwarding to a skill fails.
    #[serde(default = "default_error_message")]
    pub error_message: String,

    /// Sent when no skill matches the utterance. `None` stays silent.
    #[serde(default)]
    pub fallback_message: Option<String>,

    /// Switch confirmation prompt. `{skill}` is replaced with the target skill name.
    #[serde(default = "default_switch_prompt")]
    pub switch_prompt: String,

    /// Sent when a switch confirmation answer is neither yes nor no.
    #[serde(default = "default_switch_retry_prompt")]
    pub switch_retry_prompt: String,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            name: default_assistant_name(),
            log_level: default_log_level(),
            error_message: default_error_message(),
            fallback_message: None,
            switch_prompt: default_switch_prompt(),
            switch_retry_prompt: default_switch_retry_prompt(),
        }
    }
}

fn default_assistant_name() -> String {
    "skillbridge".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_error_message() -> String {
    "Sorry, it looks like something went wrong.".to_string()
}

fn default_switch_prompt() -> String {
    "Would you like to switch to {skill}?".to_string()
}

fn default_switch_retry_prompt() -> String {
    "Please answer yes or no.".to_string()
}

/// Intent dispatch configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DispatchConfig {
    /// Minimum recognizer score (inclusive) for an intent to select a skill.
    #[serde(default = "default_threshold")]
    pub threshold: f64,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
        }
    }
}

fn default_threshold() -> f64 {
    0.5
}

/// Outbound HTTP configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TransportConfig {
    /// Whole-request timeout for a skill call. `None` keeps the HTTP client default.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: Option<u64>,

    /// User-Agent header sent to skills.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

fn default_timeout_secs() -> Option<u64> {
    Some(30)
}

fn default_user_agent() -> String {
    concat!("skillbridge/", env!("CARGO_PKG_VERSION")).to_string()
}

/// Token acquisition strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum CredentialsMode {
    /// No Authorization header (local development).
    #[default]
    Anonymous,
    /// A fixed bearer token.
    Static,
    /// OAuth2 client-credentials grant per skill audience.
    ClientCredentials,
}

/// Credential configuration for skill calls.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CredentialsConfig {
    #[serde(default)]
    pub mode: CredentialsMode,

    /// Assistant app id (OAuth client id).
    #[serde(default)]
    pub app_id: Option<String>,

    /// Assistant app password (OAuth client secret).
    #[serde(default)]
    pub app_password: Option<String>,

    /// Token used when `mode = "static"`.
    #[serde(default)]
    pub static_token: Option<String>,

    /// OAuth2 token endpoint.
    #[serde(default = "default_token_endpoint")]
    pub token_endpoint: String,

    /// Appended to the skill app id to build the requested scope.
    #[serde(default = "default_scope_suffix")]
    pub scope_suffix: String,

    /// Base URL of the user token service that answers skill token requests.
    /// Unset means token requests end the skill conversation.
    #[serde(default)]
    pub user_token_endpoint: Option<String>,

    /// Audience of the bearer token presented to the user token service.
    #[serde(default = "default_user_token_audience")]
    pub user_token_audience: String,
}

impl Default for CredentialsConfig {
    fn default() -> Self {
        Self {
            mode: CredentialsMode::default(),
            app_id: None,
            app_password: None,
            static_token: None,
            token_endpoint: default_token_endpoint(),
            scope_suffix: default_scope_suffix(),
            user_token_endpoint: None,
            user_token_audience: default_user_token_audience(),
        }
    }
}

fn default_token_endpoint() -> String {
    "https://login.microsoftonline.com/botframework.com/oauth2/v2.0/token".to_string()
}

fn default_scope_suffix() -> String {
    "/.default".to_string()
}

fn default_user_token_audience() -> String {
    "https://api.botframework.com".to_string()
}

/// State persistence backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum StateBackend {
    /// Process memory; lost on restart.
    #[default]
    Memory,
    /// One JSON file per key under `state.directory`.
    File,
}

/// State persistence configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StateConfig {
    #[serde(default)]
    pub backend: StateBackend,

    /// Directory for the file backend.
    #[serde(default = "default_state_directory")]
    pub directory: String,
}

impl Default for StateConfig {
    fn default() -> Self {
        Self {
            backend: StateBackend::default(),
            directory: default_state_directory(),
        }
    }
}

fn default_state_directory() -> String {
    dirs::data_local_dir()
        .map(|d| d.join("skillbridge/state").display().to_string())
        .unwrap_or_else(|| "./skillbridge-state".to_string())
}

/// HTTP listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            port: default_port(),
        }
    }
}

fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3978
}

/// Skill manifest sources.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SkillsConfig {
    /// JSON files holding one manifest or an array of manifests.
    #[serde(default)]
    pub manifest_files: Vec<String>,
}
