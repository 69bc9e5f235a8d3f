// SPDX-FileCopyrightText: 2026 Skillbridge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The Bot Framework `Activity` envelope exchanged between user, assistant and skills.
//!
//! Only the fields the dispatch layer reads or writes are typed. Everything else is
//! captured in flattened `extra` maps so an activity is forwarded to a skill exactly
//! as it arrived.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// `semanticAction.state` value sent with the first activity of a skill invocation.
pub const SKILL_START: &str = "SkillStart";

/// Event name asking a skill to cancel every dialog it has running for a conversation.
pub const CANCEL_ALL_SKILL_DIALOGS: &str = "CancelAllSkillDialogs";

/// Event a skill sends when it needs the user's OAuth token.
pub const TOKEN_REQUEST: &str = "tokens/request";

/// Event carrying the token back to the skill.
pub const TOKEN_RESPONSE: &str = "tokens/response";

/// Activity `type` discriminator.
///
/// Types this crate does not act on are kept verbatim in [`ActivityType::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ActivityType {
    #[default]
    Message,
    Event,
    EndOfConversation,
    Trace,
    Typing,
    Handoff,
    ConversationUpdate,
    #[serde(untagged)]
    Other(String),
}

impl ActivityType {
    /// Wire name of the type.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Message => "message",
            Self::Event => "event",
            Self::EndOfConversation => "endOfConversation",
            Self::Trace => "trace",
            Self::Typing => "typing",
            Self::Handoff => "handoff",
            Self::ConversationUpdate => "conversationUpdate",
            Self::Other(name) => name,
        }
    }
}

/// A user or bot participating in a conversation.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelAccount {
    #[serde(default)]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ChannelAccount {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }
}

/// The conversation an activity belongs to.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationAccount {
    #[serde(default)]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_group: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ConversationAccount {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }
}

/// Entity attached to a semantic action; slot values travel to skills this way.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Entity {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(flatten)]
    pub properties: Map<String, Value>,
}

impl Entity {
    /// Wraps a slot value. Objects become the entity's properties; scalars and
    /// arrays are stored under `value`.
    pub fn from_value(value: Value) -> Self {
        let properties = match value {
            Value::Object(map) => map,
            other => {
                let mut map = Map::new();
                map.insert("value".to_string(), other);
                map
            }
        };
        Self {
            kind: None,
            properties,
        }
    }
}

/// Programmatic action requested of a skill, used to name the action being invoked
/// and to pass slot values.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SemanticAction {
    #[serde(default)]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default)]
    pub entities: BTreeMap<String, Entity>,
}

/// Addressing information needed to send an activity into an existing conversation.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationReference {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activity_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<ChannelAccount>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bot: Option<ChannelAccount>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conversation: Option<ConversationAccount>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
}

/// The conversational message envelope.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    #[serde(rename = "type", default)]
    pub kind: ActivityType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// ISO 8601 text, kept exactly as the channel sent it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<ChannelAccount>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conversation: Option<ConversationAccount>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient: Option<ChannelAccount>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speak: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply_to_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub semantic_action: Option<SemanticAction>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Activity {
    /// A bare message activity.
    pub fn message(text: impl Into<String>) -> Self {
        Self {
            kind: ActivityType::Message,
            text: Some(text.into()),
            ..Self::default()
        }
    }

    /// A trace activity; shown by the emulator, ignored by end-user channels.
    pub fn trace(text: impl Into<String>) -> Self {
        Self {
            kind: ActivityType::Trace,
            text: Some(text.into()),
            ..Self::default()
        }
    }

    /// A named event activity.
    pub fn event(name: impl Into<String>) -> Self {
        Self {
            kind: ActivityType::Event,
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// An end-of-conversation activity.
    pub fn end_of_conversation() -> Self {
        Self {
            kind: ActivityType::EndOfConversation,
            ..Self::default()
        }
    }

    pub fn is_message(&self) -> bool {
        self.kind == ActivityType::Message
    }

    pub fn is_end_of_conversation(&self) -> bool {
        self.kind == ActivityType::EndOfConversation
    }

    /// True for a skill's `tokens/request` event.
    pub fn is_token_request(&self) -> bool {
        self.kind == ActivityType::Event && self.name.as_deref() == Some(TOKEN_REQUEST)
    }

    /// Trimmed message text, if any.
    pub fn text_trimmed(&self) -> Option<&str> {
        self.text.as_deref().map(str::trim).filter(|t| !t.is_empty())
    }

    /// Extracts the addressing information of an inbound activity.
    pub fn conversation_reference(&self) -> ConversationReference {
        ConversationReference {
            activity_id: self.id.clone(),
            user: self.from.clone(),
            bot: self.recipient.clone(),
            conversation: self.conversation.clone(),
            channel_id: self.channel_id.clone(),
            service_url: self.service_url.clone(),
            locale: self.locale.clone(),
        }
    }

    /// Addresses this activity into the referenced conversation as coming from the user,
    /// which is how the assistant speaks to a skill on the user's behalf.
    pub fn apply_conversation_reference(mut self, reference: &ConversationReference) -> Self {
        self.channel_id = reference.channel_id.clone();
        self.service_url = reference.service_url.clone();
        self.conversation = reference.conversation.clone();
        self.from = reference.user.clone();
        self.recipient = reference.bot.clone();
        if self.locale.is_none() {
            self.locale = reference.locale.clone();
        }
        self.reply_to_id = reference.activity_id.clone();
        self
    }

    /// Storage key of the conversation this activity belongs to.
    pub fn conversation_state_key(&self) -> Option<String> {
        let channel = self.channel_id.as_deref()?;
        let conversation = self.conversation.as_ref()?;
        if conversation.id.is_empty() {
            return None;
        }
        Some(format!("{channel}/conversations/{}", conversation.id))
    }

    /// Storage key of the user who sent this activity.
    pub fn user_state_key(&self) -> Option<String> {
        let channel = self.channel_id.as_deref()?;
        let from = self.from.as_ref()?;
        if from.id.is_empty() {
            return None;
        }
        Some(format!("{channel}/users/{}", from.id))
    }
}
