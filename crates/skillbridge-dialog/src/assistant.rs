// SPDX-FileCopyrightText: 2026 Skillbridge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Assistant turn handler.
//!
//! One call to [`Assistant::on_turn`] processes one inbound activity:
//!
//! 1. Load the conversation record and the user's skill context from the store.
//! 2. Recognize the utterance, apply the dispatch threshold, look up the skill.
//! 3. Begin or continue the skill dialog.
//! 4. Turn dialog errors into the configured apology message.
//! 5. Persist state and return the replies collected during the turn.

use std::sync::Arc;

use chrono::Utc;
use serde_json::Map;
use skillbridge_config::BridgeConfig;
use skillbridge_core::{
    Activity, ActivityType, IntentRecognizer, SkillBridgeError, SkillTransport, StateStore,
    TelemetryClient, UserTokenProvider,
};
use skillbridge_registry::SkillRegistry;
use tracing::{debug, error, info};

use crate::context::TurnContext;
use crate::dialog::{DialogTurn, SkillDialog, SwitchPrompts};
use crate::state::{ConversationState, SkillContext, SkillDialogOptions, SkillDialogState};
use crate::store;

/// Event names with this prefix carry a value for the user's skill context,
/// e.g. `VA/Location` sets the `location` slot.
pub const CONTEXT_EVENT_PREFIX: &str = "VA/";

/// Turn handler behaviour that comes from configuration.
#[derive(Debug, Clone)]
pub struct AssistantSettings {
    pub threshold: f64,
    pub error_message: String,
    pub fallback_message: Option<String>,
    pub prompts: SwitchPrompts,
}

impl Default for AssistantSettings {
    fn default() -> Self {
        Self {
            threshold: 0.5,
            error_message: "Sorry, it looks like something went wrong.".to_string(),
            fallback_message: None,
            prompts: SwitchPrompts::default(),
        }
    }
}

impl AssistantSettings {
    pub fn from_config(config: &BridgeConfig) -> Self {
        Self {
            threshold: config.dispatch.threshold,
            error_message: config.assistant.error_message.clone(),
            fallback_message: config.assistant.fallback_message.clone(),
            prompts: SwitchPrompts {
                confirm: config.assistant.switch_prompt.clone(),
                retry: config.assistant.switch_retry_prompt.clone(),
            },
        }
    }
}

/// Routes inbound activities to skills.
pub struct Assistant {
    registry: Arc<SkillRegistry>,
    recognizer: Arc<dyn IntentRecognizer>,
    store: Arc<dyn StateStore>,
    telemetry: Arc<dyn TelemetryClient>,
    dialog: SkillDialog,
    settings: AssistantSettings,
}

impl Assistant {
    pub fn new(
        registry: Arc<SkillRegistry>,
        transport: Arc<dyn SkillTransport>,
        recognizer: Arc<dyn IntentRecognizer>,
        store: Arc<dyn StateStore>,
        telemetry: Arc<dyn TelemetryClient>,
        settings: AssistantSettings,
    ) -> Self {
        let dialog = SkillDialog::new(registry.clone(), transport, telemetry.clone())
            .with_prompts(settings.prompts.clone());
        Self {
            registry,
            recognizer,
            store,
            telemetry,
            dialog,
            settings,
        }
    }

    /// Lets skills obtain the user's OAuth tokens through `tokens/request`.
    pub fn with_user_tokens(mut self, user_tokens: Arc<dyn UserTokenProvider>) -> Self {
        self.dialog = self.dialog.with_user_tokens(user_tokens);
        self
    }

    pub fn registry(&self) -> &SkillRegistry {
        &self.registry
    }

    /// Processes one inbound activity and returns the activities to send back.
    ///
    /// Dialog failures do not fail the turn: they are logged, tracked and answered
    /// with the apology message. Only state store failures and activities without
    /// conversation addressing are returned as errors.
    pub async fn on_turn(&self, activity: Activity) -> Result<Vec<Activity>, SkillBridgeError> {
        let conversation_key = activity.conversation_state_key().ok_or_else(|| {
            SkillBridgeError::Internal("activity has no channelId or conversation id".into())
        })?;
        let user_key = activity.user_state_key();

        let mut conversation: ConversationState =
            store::load(self.store.as_ref(), &conversation_key).await?;
        let mut skill_context: SkillContext = match &user_key {
            Some(key) => store::load(self.store.as_ref(), key).await?,
            None => SkillContext::new(),
        };

        let mut ctx = TurnContext::new(activity);
        let mut context_changed = false;

        if let Some((slot, value)) = context_event(ctx.activity()) {
            debug!(slot = %slot, "skill context updated from event");
            skill_context.insert(slot, value);
            context_changed = true;
        } else {
            match self
                .dispatch(&mut conversation.dialog, &mut ctx, &skill_context)
                .await
            {
                Ok(DialogTurn::Complete { result: Some(result) }) => {
                    debug!(result = %result, "skill returned a result");
                }
                Ok(_) => {}
                Err(e) => {
                    error!(conversation = %conversation_key, error = %e, "turn failed");
                    self.telemetry
                        .track_exception(&e, &[("conversation", conversation_key.as_str())]);
                    ctx.send_text(self.settings.error_message.clone());
                }
            }
        }

        conversation.turn_count += 1;
        conversation.updated_at = Some(Utc::now());
        store::save(self.store.as_ref(), &conversation_key, &conversation).await?;
        if context_changed && let Some(key) = &user_key {
            store::save(self.store.as_ref(), key, &skill_context).await?;
        }

        let responses = ctx.into_responses();
        info!(
            conversation = %conversation_key,
            turn = conversation.turn_count,
            state = conversation.dialog.as_ref(),
            replies = responses.len(),
            "turn complete"
        );
        Ok(responses)
    }

    async fn dispatch(
        &self,
        state: &mut SkillDialogState,
        ctx: &mut TurnContext,
        skill_context: &SkillContext,
    ) -> Result<DialogTurn, SkillBridgeError> {
        if ctx.activity().is_end_of_conversation() {
            self.dialog.cancel(state, ctx).await;
            return Ok(DialogTurn::Complete { result: None });
        }

        // A pending confirmation only needs the yes/no answer.
        let target = if matches!(state, SkillDialogState::ConfirmingSwitch { .. }) {
            None
        } else {
            self.recognize(ctx.activity()).await?
        };

        if !state.is_idle() {
            return self
                .dialog
                .continue_turn(state, ctx, target.as_ref(), skill_context)
                .await;
        }

        match target {
            Some(options) => self.dialog.begin(state, ctx, &options, skill_context).await,
            None => {
                if ctx.activity().is_message()
                    && let Some(fallback) = &self.settings.fallback_message
                {
                    ctx.send_text(fallback.clone());
                }
                Ok(DialogTurn::Complete { result: None })
            }
        }
    }

    /// Maps the activity to a skill invocation when the recognizer is confident.
    async fn recognize(
        &self,
        activity: &Activity,
    ) -> Result<Option<SkillDialogOptions>, SkillBridgeError> {
        if !activity.is_message() {
            return Ok(None);
        }

        let Some(score) = self.recognizer.recognize(activity).await? else {
            debug!("no intent recognized");
            return Ok(None);
        };

        if !score.meets(self.settings.threshold) {
            debug!(
                intent = %score.intent,
                score = score.score,
                threshold = self.settings.threshold,
                "intent below dispatch threshold"
            );
            return Ok(None);
        }

        let Some(found) = self.registry.lookup(&score.intent) else {
            debug!(intent = %score.intent, "no skill claims intent");
            return Ok(None);
        };

        debug!(
            intent = %score.intent,
            score = score.score,
            skill = found.skill_id(),
            "intent dispatched to skill"
        );
        Ok(Some(SkillDialogOptions {
            skill_id: found.skill_id().to_string(),
            action_id: found.action_id().map(str::to_string),
            slots: Map::new(),
        }))
    }
}

/// Extracts `(slot, value)` from a skill context event.
fn context_event(activity: &Activity) -> Option<(String, serde_json::Value)> {
    if activity.kind != ActivityType::Event {
        return None;
    }
    let slot = activity
        .name
        .as_deref()?
        .strip_prefix(CONTEXT_EVENT_PREFIX)?
        .to_lowercase();
    if slot.is_empty() {
        return None;
    }
    Some((slot, activity.value.clone()?))
}
