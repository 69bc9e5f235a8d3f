// SPDX-FileCopyrightText: 2026 Skillbridge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for skill dispatch and forwarding.

use thiserror::Error;

/// The primary error type used across skillbridge collaborators and the dialog layer.
#[derive(Debug, Error)]
pub enum SkillBridgeError {
    /// Configuration errors (invalid values, unreadable files).
    #[error("configuration error: {0}")]
    Config(String),

    /// A skill manifest failed to load or validate.
    #[error("manifest error: {0}")]
    Manifest(String),

    /// No manifest is registered under the given skill id.
    #[error("skill not found: {skill_id}")]
    SkillNotFound { skill_id: String },

    /// The requested action is not declared by the skill's manifest.
    #[error(
        "action `{action_id}` could not be found within the `{skill_id}` skill manifest action definition"
    )]
    ActionNotFound { skill_id: String, action_id: String },

    /// Forwarding to a skill endpoint failed (network, non-success status, bad JSON).
    #[error("transport error: {message}")]
    Transport {
        message: String,
        /// HTTP status returned by the skill, when one was received.
        status: Option<u16>,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A bearer token could not be obtained.
    #[error("credentials error: {message}")]
    Credentials {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Conversation or user state could not be read or written.
    #[error("state error: {source}")]
    State {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The intent recognizer failed.
    #[error("recognizer error: {0}")]
    Recognizer(String),

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl SkillBridgeError {
    /// Builds a transport error without an underlying source.
    pub fn transport(message: impl Into<String>, status: Option<u16>) -> Self {
        Self::Transport {
            message: message.into(),
            status,
            source: None,
        }
    }

    /// Returns true for failures that came from talking to a skill.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }
}
