// SPDX-FileCopyrightText: 2026 Skillbridge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end turn testing.
//!
//! `TestHarness` assembles an [`Assistant`] over mock collaborators and an
//! in-memory state store. `send_text()` drives a full turn as one fixed user in
//! one fixed conversation.

use std::sync::Arc;

use serde_json::Value;
use skillbridge_core::{
    Activity, ChannelAccount, ConversationAccount, SkillBridgeError, SkillManifest, StateStore,
};
use skillbridge_dialog::store;
use skillbridge_dialog::{
    Assistant, AssistantSettings, ConversationState, MemoryStateStore, SkillContext,
};
use skillbridge_registry::SkillRegistry;

use crate::mock_recognizer::MockRecognizer;
use crate::mock_transport::MockTransport;
use crate::mock_user_tokens::MockUserTokens;
use crate::recording_telemetry::RecordingTelemetry;

pub const CHANNEL_ID: &str = "test";
pub const CONVERSATION_ID: &str = "conversation-1";
pub const USER_ID: &str = "user-1";
pub const BOT_ID: &str = "assistant";

/// Builder for creating test environments with configurable options.
pub struct TestHarnessBuilder {
    manifests: Vec<SkillManifest>,
    recognizer: MockRecognizer,
    user_tokens: MockUserTokens,
    settings: AssistantSettings,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            manifests: Vec::new(),
            recognizer: MockRecognizer::new(),
            user_tokens: MockUserTokens::new(),
            settings: AssistantSettings::default(),
        }
    }

    /// Register a skill manifest.
    pub fn with_manifest(mut self, manifest: SkillManifest) -> Self {
        self.manifests.push(manifest);
        self
    }

    /// Use a configured recognizer.
    pub fn with_recognizer(mut self, recognizer: MockRecognizer) -> Self {
        self.recognizer = recognizer;
        self
    }

    /// Tokens the test user holds, answered to skill token requests.
    pub fn with_user_tokens(mut self, user_tokens: MockUserTokens) -> Self {
        self.user_tokens = user_tokens;
        self
    }

    /// Override assistant settings (threshold, messages, prompts).
    pub fn with_settings(mut self, settings: AssistantSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Build the test harness.
    pub fn build(self) -> Result<TestHarness, SkillBridgeError> {
        let registry = Arc::new(SkillRegistry::new(self.manifests)?);
        let transport = Arc::new(MockTransport::new());
        let recognizer = Arc::new(self.recognizer);
        let store = Arc::new(MemoryStateStore::new());
        let telemetry = Arc::new(RecordingTelemetry::new());
        let user_tokens = Arc::new(self.user_tokens);

        let assistant = Assistant::new(
            registry,
            transport.clone(),
            recognizer.clone(),
            store.clone(),
            telemetry.clone(),
            self.settings,
        )
        .with_user_tokens(user_tokens.clone());

        Ok(TestHarness {
            assistant,
            transport,
            recognizer,
            store,
            telemetry,
            user_tokens,
            next_id: std::sync::atomic::AtomicUsize::new(1),
        })
    }
}

/// A full assistant over mocks.
pub struct TestHarness {
    pub assistant: Assistant,
    pub transport: Arc<MockTransport>,
    pub recognizer: Arc<MockRecognizer>,
    pub store: Arc<MemoryStateStore>,
    pub telemetry: Arc<RecordingTelemetry>,
    pub user_tokens: Arc<MockUserTokens>,
    next_id: std::sync::atomic::AtomicUsize,
}

impl TestHarness {
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// Addresses `activity` as coming from the test user in the test conversation.
    pub fn address(&self, mut activity: Activity) -> Activity {
        let id = self
            .next_id
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        activity.id = Some(format!("activity-{id}"));
        activity.channel_id = Some(CHANNEL_ID.to_string());
        activity.service_url = Some("http://localhost:3978".to_string());
        activity.conversation = Some(ConversationAccount::new(CONVERSATION_ID));
        activity.from = Some(ChannelAccount::new(USER_ID));
        activity.recipient = Some(ChannelAccount::new(BOT_ID));
        activity
    }

    /// Runs one turn with an arbitrary activity.
    pub async fn send(&self, activity: Activity) -> Result<Vec<Activity>, SkillBridgeError> {
        let activity = self.address(activity);
        self.assistant.on_turn(activity).await
    }

    /// Runs one turn with a user message.
    pub async fn send_text(&self, text: &str) -> Result<Vec<Activity>, SkillBridgeError> {
        self.send(Activity::message(text)).await
    }

    /// The persisted conversation record.
    pub async fn conversation(&self) -> Result<ConversationState, SkillBridgeError> {
        let key = format!("{CHANNEL_ID}/conversations/{CONVERSATION_ID}");
        store::load(self.store.as_ref(), &key).await
    }

    /// The persisted skill context of the test user.
    pub async fn skill_context(&self) -> Result<SkillContext, SkillBridgeError> {
        let key = format!("{CHANNEL_ID}/users/{USER_ID}");
        store::load(self.store.as_ref(), &key).await
    }

    /// Seeds the test user's skill context.
    pub async fn set_skill_context(&self, name: &str, value: Value) -> Result<(), SkillBridgeError> {
        let key = format!("{CHANNEL_ID}/users/{USER_ID}");
        let mut context = self.skill_context().await?;
        context.insert(name.to_string(), value);
        store::save(self.store.as_ref(), &key, &context).await
    }

    /// Raw store handle for assertions beyond the typed helpers.
    pub fn state_store(&self) -> Arc<dyn StateStore> {
        self.store.clone()
    }
}

/// Texts of the message activities in a turn's replies.
pub fn message_texts(replies: &[Activity]) -> Vec<String> {
    replies
        .iter()
        .filter(|a| a.is_message())
        .filter_map(|a| a.text.clone())
        .collect()
}
