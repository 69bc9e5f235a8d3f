// SPDX-FileCopyrightText: 2026 Skillbridge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock skill transport for deterministic testing.
//!
//! `MockTransport` implements `SkillTransport` with scripted replies and captured
//! forwards and cancels for assertion in tests.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use skillbridge_core::{
    Activity, ConversationReference, SkillBridgeError, SkillManifest, SkillTransport,
};

enum Scripted {
    Replies(Vec<Activity>),
    Fail(u16),
}

/// A mock transport that never touches the network.
///
/// - **script**: replies queued via `push_replies()` / `fail_next_forward()` are
///   consumed one per `forward()`; an empty script means "accepted, no replies"
/// - **forwarded**: every `(skill_id, activity)` passed to `forward()`
/// - **cancels**: every `(skill_id, reference)` passed to `cancel()`
pub struct MockTransport {
    script: Arc<Mutex<VecDeque<Scripted>>>,
    forwarded: Arc<Mutex<Vec<(String, Activity)>>>,
    cancels: Arc<Mutex<Vec<(String, ConversationReference)>>>,
    fail_cancels: Arc<Mutex<bool>>,
}

impl MockTransport {
    /// Create a mock transport with an empty script.
    pub fn new() -> Self {
        Self {
            script: Arc::new(Mutex::new(VecDeque::new())),
            forwarded: Arc::new(Mutex::new(Vec::new())),
            cancels: Arc::new(Mutex::new(Vec::new())),
            fail_cancels: Arc::new(Mutex::new(false)),
        }
    }

    /// Queue the replies for the next unscripted forward.
    pub async fn push_replies(&self, replies: Vec<Activity>) {
        self.script.lock().await.push_back(Scripted::Replies(replies));
    }

    /// Make the next unscripted forward fail as if the skill returned `status`.
    pub async fn fail_next_forward(&self, status: u16) {
        self.script.lock().await.push_back(Scripted::Fail(status));
    }

    /// Make every subsequent cancel fail.
    pub async fn fail_cancels(&self, fail: bool) {
        *self.fail_cancels.lock().await = fail;
    }

    /// True once at least one activity has been forwarded to any skill.
    pub async fn check_if_skill_invoked(&self) -> bool {
        !self.forwarded.lock().await.is_empty()
    }

    /// All forwarded `(skill_id, activity)` pairs, in order.
    pub async fn forwarded(&self) -> Vec<(String, Activity)> {
        self.forwarded.lock().await.clone()
    }

    /// Forwarded activities for one skill.
    pub async fn forwarded_to(&self, skill_id: &str) -> Vec<Activity> {
        self.forwarded
            .lock()
            .await
            .iter()
            .filter(|(id, _)| id == skill_id)
            .map(|(_, activity)| activity.clone())
            .collect()
    }

    /// Skill ids that were sent a cancel, in order.
    pub async fn cancelled(&self) -> Vec<String> {
        self.cancels
            .lock()
            .await
            .iter()
            .map(|(id, _)| id.clone())
            .collect()
    }

    pub async fn cancel_count(&self) -> usize {
        self.cancels.lock().await.len()
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SkillTransport for MockTransport {
    async fn forward(
        &self,
        manifest: &SkillManifest,
        activity: &Activity,
    ) -> Result<Vec<Activity>, SkillBridgeError> {
        self.forwarded
            .lock()
            .await
            .push((manifest.id.clone(), activity.clone()));

        match self.script.lock().await.pop_front() {
            None => Ok(Vec::new()),
            Some(Scripted::Replies(replies)) => Ok(replies),
            Some(Scripted::Fail(status)) => Err(SkillBridgeError::transport(
                format!("skill `{}` returned {status}", manifest.id),
                Some(status),
            )),
        }
    }

    async fn cancel(
        &self,
        manifest: &SkillManifest,
        reference: &ConversationReference,
    ) -> Result<(), SkillBridgeError> {
        self.cancels
            .lock()
            .await
            .push((manifest.id.clone(), reference.clone()));

        if *self.fail_cancels.lock().await {
            return Err(SkillBridgeError::transport(
                format!("cancel to skill `{}` failed", manifest.id),
                None,
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manifest() -> SkillManifest {
        serde_json::from_value(serde_json::json!({
            "id": "testSkill",
            "name": "Test Skill",
            "endpoint": "http://localhost/api/skill/messages"
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn script_is_consumed_in_order() {
        let transport = MockTransport::new();
        transport.push_replies(vec![Activity::message("one")]).await;
        transport.fail_next_forward(500).await;

        let first = transport
            .forward(&manifest(), &Activity::message("a"))
            .await
            .unwrap();
        assert_eq!(first[0].text.as_deref(), Some("one"));
        assert!(
            transport
                .forward(&manifest(), &Activity::message("b"))
                .await
                .is_err()
        );
        assert!(
            transport
                .forward(&manifest(), &Activity::message("c"))
                .await
                .unwrap()
                .is_empty()
        );
        assert_eq!(transport.forwarded_to("testSkill").await.len(), 3);
    }

    #[tokio::test]
    async fn cancels_are_recorded_even_when_failing() {
        let transport = MockTransport::new();
        assert!(!transport.check_if_skill_invoked().await);
        transport.fail_cancels(true).await;
        let result = transport
            .cancel(&manifest(), &ConversationReference::default())
            .await;
        assert!(result.is_err());
        assert_eq!(transport.cancelled().await, vec!["testSkill".to_string()]);
    }
}
