// SPDX-FileCopyrightText: 2026 Skillbridge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The skill dialog: hands a conversation to a remote skill and relays its replies.
//!
//! States move `Idle -> AwaitingSkillResponse -> Idle`, with an interruption path
//! through `ConfirmingSwitch` when the user asks for a different skill while one
//! is active. The dialog itself is stateless; the caller loads a
//! [`SkillDialogState`] before the turn and persists it afterwards.

use std::sync::Arc;

use serde_json::Value;
use skillbridge_core::activity::TOKEN_RESPONSE;
use skillbridge_core::{
    Activity, ProviderTokenResponse, SkillBridgeError, SkillManifest, SkillTransport,
    TelemetryClient, UserTokenProvider,
};
use skillbridge_registry::SkillRegistry;
use tracing::{debug, info, warn};

use crate::confirm::parse_confirmation;
use crate::context::TurnContext;
use crate::slots::build_semantic_action;
use crate::state::{SkillContext, SkillDialogOptions, SkillDialogState};

/// Outcome of one dialog step.
#[derive(Debug, Clone, PartialEq)]
pub enum DialogTurn {
    /// A skill still owns the conversation (or a confirmation is pending).
    Waiting,
    /// The dialog is idle again. `result` is the value the skill ended with.
    Complete { result: Option<Value> },
}

/// User-facing text of the switch confirmation.
#[derive(Debug, Clone)]
pub struct SwitchPrompts {
    /// Question asked before switching; `{skill}` is replaced by the target skill's name.
    pub confirm: String,
    /// Sent when the answer is neither yes nor no.
    pub retry: String,
}

impl Default for SwitchPrompts {
    fn default() -> Self {
        Self {
            confirm: "Would you like to switch to {skill}?".to_string(),
            retry: "Please answer yes or no.".to_string(),
        }
    }
}

/// Token round trips allowed within one turn before the skill is given up on.
const MAX_TOKEN_EXCHANGES: usize = 3;

/// Drives skill invocations for any number of conversations.
pub struct SkillDialog {
    registry: Arc<SkillRegistry>,
    transport: Arc<dyn SkillTransport>,
    telemetry: Arc<dyn TelemetryClient>,
    user_tokens: Option<Arc<dyn UserTokenProvider>>,
    prompts: SwitchPrompts,
}

impl SkillDialog {
    pub fn new(
        registry: Arc<SkillRegistry>,
        transport: Arc<dyn SkillTransport>,
        telemetry: Arc<dyn TelemetryClient>,
    ) -> Self {
        Self {
            registry,
            transport,
            telemetry,
            user_tokens: None,
            prompts: SwitchPrompts::default(),
        }
    }

    pub fn with_prompts(mut self, prompts: SwitchPrompts) -> Self {
        self.prompts = prompts;
        self
    }

    /// Source of user tokens for skills that send `tokens/request`.
    ///
    /// Without one, a token request ends the skill conversation.
    pub fn with_user_tokens(mut self, user_tokens: Arc<dyn UserTokenProvider>) -> Self {
        self.user_tokens = Some(user_tokens);
        self
    }

    /// Starts the skill named in `options` with the current turn's activity.
    ///
    /// Unless the activity already carries one, a `semanticAction` naming the
    /// action and carrying any matched slots is attached before the single
    /// forward. If another skill is already active this does not replace it;
    /// the user is asked to confirm the switch instead.
    pub async fn begin(
        &self,
        state: &mut SkillDialogState,
        ctx: &mut TurnContext,
        options: &SkillDialogOptions,
        skill_context: &SkillContext,
    ) -> Result<DialogTurn, SkillBridgeError> {
        if !state.is_idle() {
            return self
                .continue_turn(state, ctx, Some(options), skill_context)
                .await;
        }
        self.start(state, ctx, options, skill_context).await
    }

    async fn start(
        &self,
        state: &mut SkillDialogState,
        ctx: &mut TurnContext,
        options: &SkillDialogOptions,
        skill_context: &SkillContext,
    ) -> Result<DialogTurn, SkillBridgeError> {
        let manifest = self.registry.require(&options.skill_id)?;

        if ctx.activity().semantic_action.is_none() {
            let action = build_semantic_action(
                manifest,
                options.action_id.as_deref(),
                skill_context,
                &options.slots,
            )?;
            for slot in action.entities.keys() {
                ctx.trace(format!(
                    "-->Matched the {slot} slot within SkillContext and passing to the Skill."
                ));
            }
            ctx.activity_mut().semantic_action = Some(action);
        } else if let Some(action_id) = options.action_id.as_deref()
            && manifest.action(action_id).is_none()
        {
            return Err(SkillBridgeError::ActionNotFound {
                skill_id: manifest.id.clone(),
                action_id: action_id.to_string(),
            });
        }

        info!(
            skill = %manifest.id,
            action = options.action_id.as_deref(),
            "beginning skill dialog"
        );
        self.telemetry.track_event(
            "SkillDialogBegin",
            &[
                ("skill", manifest.id.as_str()),
                ("action", options.action_id.as_deref().unwrap_or_default()),
            ],
        );
        ctx.trace(format!("-->Handing off to the {} skill.", manifest.name));

        *state = SkillDialogState::AwaitingSkillResponse {
            skill_id: manifest.id.clone(),
            action_id: options.action_id.clone(),
        };
        let activity = ctx.activity().clone();
        self.forward(state, ctx, manifest, &activity).await
    }

    /// Routes the current turn while a skill is active.
    ///
    /// `interruption` is the skill the recognizer picked for this turn, if any.
    /// A pick for a different skill than the active one starts the switch
    /// confirmation; anything else is forwarded to the active skill.
    pub async fn continue_turn(
        &self,
        state: &mut SkillDialogState,
        ctx: &mut TurnContext,
        interruption: Option<&SkillDialogOptions>,
        skill_context: &SkillContext,
    ) -> Result<DialogTurn, SkillBridgeError> {
        match state.clone() {
            SkillDialogState::Idle => match interruption {
                Some(options) => self.start(state, ctx, options, skill_context).await,
                None => Ok(DialogTurn::Complete { result: None }),
            },

            SkillDialogState::AwaitingSkillResponse {
                skill_id,
                action_id,
            } => {
                if let Some(target) = interruption
                    && target.skill_id != skill_id
                    && ctx.activity().is_message()
                {
                    let target_manifest = self.registry.require(&target.skill_id)?;
                    info!(
                        active = %skill_id,
                        target = %target.skill_id,
                        "different skill requested, confirming switch"
                    );
                    let prompt = self.prompts.confirm.replace("{skill}", &target_manifest.name);
                    *state = SkillDialogState::ConfirmingSwitch {
                        skill_id,
                        action_id,
                        target_skill_id: target.skill_id.clone(),
                        target_action_id: target.action_id.clone(),
                        pending_activity: Box::new(ctx.activity().clone()),
                    };
                    ctx.send_text(prompt);
                    return Ok(DialogTurn::Waiting);
                }

                let manifest = self.active_manifest(state, &skill_id)?;
                let activity = ctx.activity().clone();
                self.forward(state, ctx, manifest, &activity).await
            }

            SkillDialogState::ConfirmingSwitch {
                skill_id,
                action_id,
                target_skill_id,
                target_action_id,
                pending_activity,
            } => match parse_confirmation(ctx.activity()) {
                Some(true) => {
                    info!(from = %skill_id, to = %target_skill_id, "skill switch confirmed");
                    self.telemetry.track_event(
                        "SkillSwitchConfirmed",
                        &[("from", skill_id.as_str()), ("to", target_skill_id.as_str())],
                    );
                    self.cancel_remote(&skill_id, ctx).await;
                    *state = SkillDialogState::Idle;

                    let activity = ctx.activity_mut();
                    activity.text = pending_activity.text.clone();
                    activity.speak = pending_activity.speak.clone();
                    activity.value = None;

                    let options = SkillDialogOptions {
                        skill_id: target_skill_id,
                        action_id: target_action_id,
                        ..SkillDialogOptions::default()
                    };
                    self.start(state, ctx, &options, skill_context).await
                }
                Some(false) => {
                    info!(skill = %skill_id, "skill switch declined, resuming");
                    self.telemetry
                        .track_event("SkillSwitchDeclined", &[("skill", skill_id.as_str())]);
                    *state = SkillDialogState::AwaitingSkillResponse {
                        skill_id: skill_id.clone(),
                        action_id,
                    };
                    let manifest = self.active_manifest(state, &skill_id)?;
                    self.forward(state, ctx, manifest, &pending_activity).await
                }
                None => {
                    debug!(skill = %skill_id, "unrecognized confirmation answer");
                    ctx.send_text(self.prompts.retry.clone());
                    Ok(DialogTurn::Waiting)
                }
            },
        }
    }

    /// Ends the active skill, if any, and returns the dialog to `Idle`.
    ///
    /// The remote skill is asked to cancel its dialogs; that request is best
    /// effort and its failure never reaches the caller.
    pub async fn cancel(&self, state: &mut SkillDialogState, ctx: &mut TurnContext) {
        if let Some(skill_id) = state.active_skill().map(str::to_string) {
            info!(skill = %skill_id, "cancelling skill dialog");
            self.cancel_remote(&skill_id, ctx).await;
        }
        *state = SkillDialogState::Idle;
    }

    fn active_manifest(
        &self,
        state: &mut SkillDialogState,
        skill_id: &str,
    ) -> Result<&SkillManifest, SkillBridgeError> {
        self.registry.require(skill_id).inspect_err(|_| {
            warn!(skill = %skill_id, "active skill is no longer registered, resetting");
            *state = SkillDialogState::Idle;
        })
    }

    async fn forward(
        &self,
        state: &mut SkillDialogState,
        ctx: &mut TurnContext,
        manifest: &SkillManifest,
        activity: &Activity,
    ) -> Result<DialogTurn, SkillBridgeError> {
        let mut outbound = activity.clone();
        let mut exchanges = 0;

        loop {
            let replies = match self.transport.forward(manifest, &outbound).await {
                Ok(replies) => replies,
                Err(e) => {
                    warn!(skill = %manifest.id, error = %e, "forwarding to skill failed, ending dialog");
                    *state = SkillDialogState::Idle;
                    return Err(e);
                }
            };

            let mut ended: Option<Option<Value>> = None;
            let mut token_request: Option<Activity> = None;
            for reply in replies {
                if reply.is_end_of_conversation() {
                    ended = Some(reply.value);
                } else if reply.is_token_request() {
                    token_request.get_or_insert(reply);
                } else {
                    ctx.send(reply);
                }
            }

            if let Some(result) = ended {
                info!(skill = %manifest.id, "skill ended the conversation");
                self.telemetry
                    .track_event("SkillDialogEnd", &[("skill", manifest.id.as_str())]);
                ctx.trace(format!(
                    "<--Ending the skill conversation with the {} Skill and handing off to Parent Bot.",
                    manifest.name
                ));
                *state = SkillDialogState::Idle;
                return Ok(DialogTurn::Complete { result });
            }

            let Some(request) = token_request else {
                return Ok(DialogTurn::Waiting);
            };

            ctx.trace("<--Received a Token Request from a skill");
            exchanges += 1;
            let answer = if exchanges > MAX_TOKEN_EXCHANGES {
                warn!(skill = %manifest.id, "skill keeps requesting tokens, giving up");
                None
            } else {
                self.token_response(ctx, manifest, &request).await
            };

            match answer {
                Some(response) => outbound = response,
                None => {
                    self.cancel_remote(&manifest.id, ctx).await;
                    info!(skill = %manifest.id, "no user token for skill, ending dialog");
                    self.telemetry.track_event(
                        "SkillDialogEnd",
                        &[("skill", manifest.id.as_str()), ("reason", "token_unavailable")],
                    );
                    ctx.trace(format!(
                        "<--Ending the skill conversation with the {} Skill and handing off to Parent Bot due to unable to obtain token for user.",
                        manifest.name
                    ));
                    *state = SkillDialogState::Idle;
                    return Ok(DialogTurn::Complete { result: None });
                }
            }
        }
    }

    /// Builds the `tokens/response` event answering `request`, if the user has a
    /// token for any of the skill's authentication connections.
    async fn token_response(
        &self,
        ctx: &TurnContext,
        manifest: &SkillManifest,
        request: &Activity,
    ) -> Option<Activity> {
        let user_tokens = self.user_tokens.as_ref()?;
        let inbound = ctx.activity();
        let channel_id = inbound.channel_id.as_deref()?;
        let user_id = inbound.from.as_ref().map(|from| from.id.as_str())?;

        for connection in &manifest.authentication_connections {
            match user_tokens.user_token(channel_id, user_id, &connection.id).await {
                Ok(Some(token)) => {
                    debug!(skill = %manifest.id, connection = %connection.id, "answering token request");
                    let value = ProviderTokenResponse {
                        authentication_provider: connection.service_provider_id.clone(),
                        token_response: token,
                    };
                    let mut response = Activity::event(TOKEN_RESPONSE)
                        .apply_conversation_reference(&inbound.conversation_reference());
                    response.value = serde_json::to_value(value).ok();
                    response.semantic_action = request.semantic_action.clone();
                    response.reply_to_id = request.id.clone();
                    return Some(response);
                }
                Ok(None) => {}
                Err(e) => {
                    warn!(skill = %manifest.id, connection = %connection.id, error = %e, "user token lookup failed");
                    self.telemetry.track_exception(
                        &e,
                        &[("skill", manifest.id.as_str()), ("operation", "user_token")],
                    );
                }
            }
        }
        None
    }

    async fn cancel_remote(&self, skill_id: &str, ctx: &TurnContext) {
        let Some(manifest) = self.registry.get(skill_id) else {
            warn!(skill = %skill_id, "cannot cancel unregistered skill");
            return;
        };
        let reference = ctx.activity().conversation_reference();
        if let Err(e) = self.transport.cancel(manifest, &reference).await {
            warn!(skill = %skill_id, error = %e, "remote skill cancellation failed");
            self.telemetry
                .track_exception(&e, &[("skill", skill_id), ("operation", "cancel")]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use skillbridge_core::{ActivityType, ChannelAccount, ConversationAccount};
    use skillbridge_core::activity::TOKEN_REQUEST;
    use skillbridge_test_utils::{MockTransport, MockUserTokens, RecordingTelemetry};

    fn registry() -> Arc<SkillRegistry> {
        let manifests = serde_json::from_value(json!([
            {
                "id": "calendarSkill",
                "name": "Calendar Skill",
                "endpoint": "https://calendar.example.com/api/skill/messages",
                "authenticationConnections": [{"id": "Outlook", "serviceProviderId": "Azure Active Directory v2"}],
                "actions": [{
                    "id": "calendarSkill/createEvent",
                    "definition": {"slots": [{"name": "timezone", "types": ["string"]}]}
                }]
            },
            {
                "id": "emailSkill",
                "name": "Email Skill",
                "endpoint": "https://email.example.com/api/skill/messages",
                "actions": [{"id": "emailSkill/send"}]
            }
        ]))
        .unwrap();
        Arc::new(SkillRegistry::new(manifests).unwrap())
    }

    fn turn(text: &str) -> TurnContext {
        let mut activity = Activity::message(text);
        activity.channel_id = Some("test".into());
        activity.conversation = Some(ConversationAccount::new("conv"));
        activity.from = Some(ChannelAccount::new("user"));
        activity.recipient = Some(ChannelAccount::new("bot"));
        TurnContext::new(activity)
    }

    fn dialog(transport: &Arc<MockTransport>, telemetry: &Arc<RecordingTelemetry>) -> SkillDialog {
        SkillDialog::new(registry(), transport.clone(), telemetry.clone())
    }

    fn calendar() -> SkillDialogOptions {
        SkillDialogOptions::new("calendarSkill").with_action("calendarSkill/createEvent")
    }

    #[tokio::test]
    async fn begin_forwards_once_with_semantic_action() {
        let transport = Arc::new(MockTransport::new());
        let telemetry = Arc::new(RecordingTelemetry::new());
        let dialog = dialog(&transport, &telemetry);
        let mut state = SkillDialogState::Idle;
        let mut ctx = turn("add lunch");

        let mut context = SkillContext::new();
        context.insert("timezone".into(), json!("UTC"));

        let outcome = dialog
            .begin(&mut state, &mut ctx, &calendar(), &context)
            .await
            .unwrap();

        assert_eq!(outcome, DialogTurn::Waiting);
        let forwarded = transport.forwarded().await;
        assert_eq!(forwarded.len(), 1);
        let action = forwarded[0].1.semantic_action.as_ref().unwrap();
        assert_eq!(action.id, "calendarSkill/createEvent");
        assert_eq!(action.state.as_deref(), Some("SkillStart"));
        assert!(action.entities.contains_key("timezone"));
        assert_eq!(state.active_skill(), Some("calendarSkill"));

        let traces: Vec<_> = ctx
            .responses()
            .iter()
            .filter(|a| a.kind == ActivityType::Trace)
            .filter_map(|a| a.text.as_deref())
            .collect();
        assert!(traces.contains(&"-->Handing off to the Calendar Skill skill."));
        assert!(traces.iter().any(|t| t.contains("timezone slot")));
        assert_eq!(telemetry.events().len(), 1);
    }

    #[tokio::test]
    async fn existing_semantic_action_is_left_alone() {
        let transport = Arc::new(MockTransport::new());
        let telemetry = Arc::new(RecordingTelemetry::new());
        let dialog = dialog(&transport, &telemetry);
        let mut state = SkillDialogState::Idle;
        let mut ctx = turn("add lunch");
        ctx.activity_mut().semantic_action = Some(skillbridge_core::SemanticAction {
            id: "custom".into(),
            ..Default::default()
        });

        dialog
            .begin(&mut state, &mut ctx, &SkillDialogOptions::new("calendarSkill"), &SkillContext::new())
            .await
            .unwrap();

        let forwarded = transport.forwarded().await;
        assert_eq!(forwarded[0].1.semantic_action.as_ref().unwrap().id, "custom");
    }

    #[tokio::test]
    async fn unknown_action_fails_before_forwarding() {
        let transport = Arc::new(MockTransport::new());
        let telemetry = Arc::new(RecordingTelemetry::new());
        let dialog = dialog(&transport, &telemetry);
        let mut state = SkillDialogState::Idle;

        let err = dialog
            .begin(
                &mut state,
                &mut turn("x"),
                &SkillDialogOptions::new("calendarSkill").with_action("calendarSkill/nope"),
                &SkillContext::new(),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, SkillBridgeError::ActionNotFound { .. }));
        assert!(!transport.check_if_skill_invoked().await);
        assert!(state.is_idle());
    }

    #[tokio::test]
    async fn token_request_without_provider_cancels_skill() {
        let transport = Arc::new(MockTransport::new());
        transport
            .push_replies(vec![Activity::event(TOKEN_REQUEST)])
            .await;
        let telemetry = Arc::new(RecordingTelemetry::new());
        let dialog = dialog(&transport, &telemetry);
        let mut state = SkillDialogState::Idle;
        let mut ctx = turn("add lunch");

        let outcome = dialog
            .begin(&mut state, &mut ctx, &calendar(), &SkillContext::new())
            .await
            .unwrap();

        assert_eq!(outcome, DialogTurn::Complete { result: None });
        assert!(state.is_idle());
        assert_eq!(transport.cancelled().await, vec!["calendarSkill"]);
        assert!(ctx.responses().iter().all(|a| !a.is_token_request()));
        assert!(telemetry.event_names().contains(&"SkillDialogEnd".to_string()));
    }

    #[tokio::test]
    async fn repeated_token_requests_are_capped() {
        let transport = Arc::new(MockTransport::new());
        for _ in 0..=MAX_TOKEN_EXCHANGES {
            transport
                .push_replies(vec![Activity::event(TOKEN_REQUEST)])
                .await;
        }
        let telemetry = Arc::new(RecordingTelemetry::new());
        let dialog = dialog(&transport, &telemetry)
            .with_user_tokens(Arc::new(MockUserTokens::new().with_token("Outlook", "t")));
        let mut state = SkillDialogState::Idle;
        let mut ctx = turn("add lunch");

        let outcome = dialog
            .begin(&mut state, &mut ctx, &calendar(), &SkillContext::new())
            .await
            .unwrap();

        assert_eq!(outcome, DialogTurn::Complete { result: None });
        assert_eq!(
            transport.forwarded_to("calendarSkill").await.len(),
            MAX_TOKEN_EXCHANGES + 1
        );
        assert_eq!(transport.cancel_count().await, 1);
        assert!(state.is_idle());
    }

    #[tokio::test]
    async fn end_of_conversation_returns_to_idle_with_value() {
        let transport = Arc::new(MockTransport::new());
        let mut end = Activity::end_of_conversation();
        end.value = Some(json!({"eventId": "42"}));
        transport
            .push_replies(vec![Activity::message("Done, booked."), end])
            .await;
        let telemetry = Arc::new(RecordingTelemetry::new());
        let dialog = dialog(&transport, &telemetry);
        let mut state = SkillDialogState::Idle;
        let mut ctx = turn("add lunch");

        let outcome = dialog
            .begin(&mut state, &mut ctx, &calendar(), &SkillContext::new())
            .await
            .unwrap();

        assert_eq!(
            outcome,
            DialogTurn::Complete {
                result: Some(json!({"eventId": "42"}))
            }
        );
        assert!(state.is_idle());
        assert!(
            ctx.responses()
                .iter()
                .any(|a| a.text.as_deref() == Some("Done, booked."))
        );
        assert!(
            ctx.responses()
                .iter()
                .all(|a| !a.is_end_of_conversation())
        );
    }

    #[tokio::test]
    async fn transport_failure_resets_state_and_propagates() {
        let transport = Arc::new(MockTransport::new());
        let telemetry = Arc::new(RecordingTelemetry::new());
        let dialog = dialog(&transport, &telemetry);
        let mut state = SkillDialogState::AwaitingSkillResponse {
            skill_id: "calendarSkill".into(),
            action_id: None,
        };
        transport.fail_next_forward(502).await;

        let err = dialog
            .continue_turn(&mut state, &mut turn("tomorrow"), None, &SkillContext::new())
            .await
            .unwrap_err();

        assert!(err.is_transport());
        assert!(state.is_idle());
    }

    #[tokio::test]
    async fn cancel_failure_is_swallowed_and_tracked() {
        let transport = Arc::new(MockTransport::new());
        transport.fail_cancels(true).await;
        let telemetry = Arc::new(RecordingTelemetry::new());
        let dialog = dialog(&transport, &telemetry);
        let mut state = SkillDialogState::AwaitingSkillResponse {
            skill_id: "calendarSkill".into(),
            action_id: None,
        };

        dialog.cancel(&mut state, &mut turn("stop")).await;

        assert!(state.is_idle());
        assert_eq!(transport.cancel_count().await, 1);
        assert_eq!(telemetry.exceptions().len(), 1);
    }

    #[tokio::test]
    async fn begin_while_active_asks_for_confirmation() {
        let transport = Arc::new(MockTransport::new());
        let telemetry = Arc::new(RecordingTelemetry::new());
        let dialog = dialog(&transport, &telemetry);
        let mut state = SkillDialogState::AwaitingSkillResponse {
            skill_id: "calendarSkill".into(),
            action_id: None,
        };
        let mut ctx = turn("send an email");

        let outcome = dialog
            .begin(
                &mut state,
                &mut ctx,
                &SkillDialogOptions::new("emailSkill"),
                &SkillContext::new(),
            )
            .await
            .unwrap();

        assert_eq!(outcome, DialogTurn::Waiting);
        assert!(matches!(state, SkillDialogState::ConfirmingSwitch { .. }));
        assert!(!transport.check_if_skill_invoked().await);
        assert_eq!(
            ctx.responses()[0].text.as_deref(),
            Some("Would you like to switch to Email Skill?")
        );
    }

    #[tokio::test]
    async fn unparseable_answer_reprompts() {
        let transport = Arc::new(MockTransport::new());
        let telemetry = Arc::new(RecordingTelemetry::new());
        let dialog = dialog(&transport, &telemetry).with_prompts(SwitchPrompts {
            confirm: "Switch to {skill}?".into(),
            retry: "Yes or no?".into(),
        });
        let mut state = SkillDialogState::ConfirmingSwitch {
            skill_id: "calendarSkill".into(),
            action_id: None,
            target_skill_id: "emailSkill".into(),
            target_action_id: None,
            pending_activity: Box::new(Activity::message("send an email")),
        };
        let mut ctx = turn("purple");

        let outcome = dialog
            .continue_turn(&mut state, &mut ctx, None, &SkillContext::new())
            .await
            .unwrap();

        assert_eq!(outcome, DialogTurn::Waiting);
        assert!(matches!(state, SkillDialogState::ConfirmingSwitch { .. }));
        assert_eq!(ctx.responses()[0].text.as_deref(), Some("Yes or no?"));
        assert!(!transport.check_if_skill_invoked().await);
    }
}
