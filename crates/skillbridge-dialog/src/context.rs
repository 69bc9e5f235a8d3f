// SPDX-FileCopyrightText: 2026 Skillbridge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-turn context: the inbound activity and the replies collected for it.

use chrono::{SecondsFormat, Utc};
use skillbridge_core::Activity;

/// Everything one turn reads and produces.
///
/// Outbound activities are buffered rather than sent; the host decides how to
/// deliver them (the bundled server returns them in the HTTP response).
#[derive(Debug, Clone)]
pub struct TurnContext {
    activity: Activity,
    responses: Vec<Activity>,
}

impl TurnContext {
    pub fn new(activity: Activity) -> Self {
        Self {
            activity,
            responses: Vec::new(),
        }
    }

    /// The inbound activity for this turn.
    pub fn activity(&self) -> &Activity {
        &self.activity
    }

    pub fn activity_mut(&mut self) -> &mut Activity {
        &mut self.activity
    }

    /// Queues an activity for the user, addressed as a reply to the inbound one.
    pub fn send(&mut self, activity: Activity) {
        let addressed = self.address(activity);
        self.responses.push(addressed);
    }

    /// Queues a plain text message that is also spoken.
    pub fn send_text(&mut self, text: impl Into<String>) {
        let text = text.into();
        let mut message = Activity::message(text.clone());
        message.speak = Some(text);
        self.send(message);
    }

    /// Queues a trace activity.
    pub fn trace(&mut self, text: impl Into<String>) {
        self.send(Activity::trace(text));
    }

    pub fn responses(&self) -> &[Activity] {
        &self.responses
    }

    pub fn into_responses(self) -> Vec<Activity> {
        self.responses
    }

    fn address(&self, mut activity: Activity) -> Activity {
        let inbound = &self.activity;
        activity.channel_id = inbound.channel_id.clone();
        activity.service_url = inbound.service_url.clone();
        activity.conversation = inbound.conversation.clone();
        activity.from = inbound.recipient.clone();
        activity.recipient = inbound.from.clone();
        if activity.reply_to_id.is_none() {
            activity.reply_to_id = inbound.id.clone();
        }
        if activity.locale.is_none() {
            activity.locale = inbound.locale.clone();
        }
        if activity.timestamp.is_none() {
            activity.timestamp = Some(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true));
        }
        activity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skillbridge_core::{ActivityType, ChannelAccount, ConversationAccount};

    fn inbound() -> Activity {
        let mut activity = Activity::message("hi");
        activity.id = Some("in-1".into());
        activity.channel_id = Some("test".into());
        activity.conversation = Some(ConversationAccount::new("conv-1"));
        activity.from = Some(ChannelAccount::new("user-1"));
        activity.recipient = Some(ChannelAccount::new("bot-1"));
        activity
    }

    #[test]
    fn replies_are_addressed_back_to_sender() {
        let mut ctx = TurnContext::new(inbound());
        ctx.send_text("hello");
        ctx.trace("debug");

        let responses = ctx.responses();
        assert_eq!(responses.len(), 2);
        assert_eq!(responses[0].recipient.as_ref().unwrap().id, "user-1");
        assert_eq!(responses[0].from.as_ref().unwrap().id, "bot-1");
        assert_eq!(responses[0].reply_to_id.as_deref(), Some("in-1"));
        assert_eq!(responses[0].speak.as_deref(), Some("hello"));
        assert_eq!(responses[1].kind, ActivityType::Trace);
        assert!(responses[0].timestamp.as_deref().is_some_and(|t| t.ends_with('Z')));
    }

    #[test]
    fn relayed_reply_keeps_its_content() {
        let mut ctx = TurnContext::new(inbound());
        let mut reply = Activity::message("from skill");
        reply.attachments.push(serde_json::json!({"contentType": "card"}));
        reply.reply_to_id = Some("skill-activity".into());
        reply.timestamp = Some("2026-10-17T08:15:30.1234567Z".into());
        ctx.send(reply);

        let sent = &ctx.responses()[0];
        assert_eq!(sent.text.as_deref(), Some("from skill"));
        assert_eq!(sent.attachments.len(), 1);
        assert_eq!(sent.reply_to_id.as_deref(), Some("skill-activity"));
        assert_eq!(sent.conversation.as_ref().unwrap().id, "conv-1");
        assert_eq!(sent.timestamp.as_deref(), Some("2026-10-17T08:15:30.1234567Z"));
    }
}
