// SPDX-FileCopyrightText: 2026 Skillbridge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Persisted dialog records.
//!
//! These are plain serde values written to a [`StateStore`](skillbridge_core::StateStore)
//! at the end of every turn and read back at the start of the next one. Nothing
//! here holds references to live objects, so a conversation survives a restart.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use skillbridge_core::Activity;

/// Values the assistant knows about a user that can fill skill slots.
pub type SkillContext = Map<String, Value>;

/// Where the skill dialog is in its lifecycle for one conversation.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, strum::AsRefStr)]
#[serde(tag = "status", rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SkillDialogState {
    /// No skill is active.
    #[default]
    Idle,
    /// A skill owns the conversation; inbound activities are forwarded to it.
    AwaitingSkillResponse {
        skill_id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        action_id: Option<String>,
    },
    /// The user was asked whether to leave the active skill for another one.
    ConfirmingSwitch {
        skill_id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        action_id: Option<String>,
        target_skill_id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        target_action_id: Option<String>,
        /// The utterance that triggered the interruption.
        pending_activity: Box<Activity>,
    },
}

impl SkillDialogState {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    /// The skill that currently owns the conversation, if any.
    pub fn active_skill(&self) -> Option<&str> {
        match self {
            Self::Idle => None,
            Self::AwaitingSkillResponse { skill_id, .. }
            | Self::ConfirmingSwitch { skill_id, .. } => Some(skill_id),
        }
    }
}

/// Per-conversation record.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ConversationState {
    #[serde(default)]
    pub dialog: SkillDialogState,
    #[serde(default)]
    pub turn_count: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Parameters for one skill invocation.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SkillDialogOptions {
    pub skill_id: String,
    pub action_id: Option<String>,
    /// Slot values that take precedence over the user's [`SkillContext`].
    pub slots: Map<String, Value>,
}

impl SkillDialogOptions {
    pub fn new(skill_id: impl Into<String>) -> Self {
        Self {
            skill_id: skill_id.into(),
            ..Self::default()
        }
    }

    pub fn with_action(mut self, action_id: impl Into<String>) -> Self {
        self.action_id = Some(action_id.into());
        self
    }

    pub fn with_slot(mut self, name: impl Into<String>, value: Value) -> Self {
        self.slots.insert(name.into(), value);
        self
    }
}
