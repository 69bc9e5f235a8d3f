// SPDX-FileCopyrightText: 2026 Skillbridge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Skill manifest model.
//!
//! A manifest describes one remotely deployed skill: where it lives, which app id
//! tokens must be minted for, the OAuth connections it needs, and the actions it
//! exposes together with the slots and triggers of each action. Field names follow
//! the camelCase JSON produced by skill manifest generators.

use serde::{Deserialize, Serialize};

/// Static metadata for a remote skill. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillManifest {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_url: Option<String>,
    /// App id of the skill; used as the audience when requesting bearer tokens.
    #[serde(default)]
    pub msa_app_id: String,
    pub endpoint: String,
    #[serde(default)]
    pub authentication_connections: Vec<AuthenticationConnection>,
    #[serde(default)]
    pub actions: Vec<Action>,
}

impl SkillManifest {
    /// Finds an action by exact id.
    pub fn action(&self, action_id: &str) -> Option<&Action> {
        self.actions.iter().find(|a| a.id == action_id)
    }

    /// Every slot declared by any action, first declaration wins on duplicate names.
    pub fn distinct_slots(&self) -> Vec<&Slot> {
        let mut seen = std::collections::HashSet::new();
        self.actions
            .iter()
            .flat_map(|a| a.definition.slots.iter())
            .filter(|slot| seen.insert(slot.name.as_str()))
            .collect()
    }
}

/// An OAuth connection the skill expects the assistant to hold for the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticationConnection {
    pub id: String,
    #[serde(default)]
    pub service_provider_id: String,
    #[serde(default)]
    pub scopes: String,
}

/// One capability of a skill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Action {
    pub id: String,
    #[serde(default)]
    pub definition: ActionDefinition,
}

impl Action {
    /// Returns true when the given recognizer intent selects this action.
    ///
    /// Matches the action id, a full utterance source reference (`model#intent`),
    /// or just the intent half of one.
    pub fn answers_intent(&self, intent: &str) -> bool {
        if self.id == intent {
            return true;
        }
        self.definition
            .triggers
            .utterance_sources
            .iter()
            .flat_map(|s| s.source.iter())
            .any(|source| {
                source == intent
                    || source
                        .split_once('#')
                        .is_some_and(|(_, source_intent)| source_intent == intent)
            })
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionDefinition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub slots: Vec<Slot>,
    #[serde(default)]
    pub triggers: Triggers,
}

/// A named parameter the skill can accept when an action starts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Slot {
    pub name: String,
    #[serde(default)]
    pub types: Vec<String>,
}

/// What starts an action: inline utterances, references to recognizer intents, events.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Triggers {
    #[serde(default)]
    pub utterances: Vec<Utterances>,
    #[serde(default)]
    pub utterance_sources: Vec<UtteranceSources>,
    #[serde(default)]
    pub events: Vec<Event>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Utterances {
    #[serde(default)]
    pub locale: String,
    #[serde(default)]
    pub text: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UtteranceSources {
    #[serde(default)]
    pub locale: String,
    /// `"<model>#<intent>"` references.
    #[serde(default)]
    pub source: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Event {
    pub name: String,
}
