// SPDX-FileCopyrightText: 2026 Skillbridge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Skill transport trait.

use async_trait::async_trait;

use crate::activity::{Activity, ConversationReference};
use crate::error::SkillBridgeError;
use crate::manifest::SkillManifest;

/// Delivers activities to a remote skill.
#[async_trait]
pub trait SkillTransport: Send + Sync + 'static {
    /// Sends `activity` to the skill and returns the activities it replied with.
    ///
    /// An empty vector means the skill accepted the activity without replying.
    /// Failures (network, non-success status, malformed body) are returned as-is;
    /// there is no retry.
    async fn forward(
        &self,
        manifest: &SkillManifest,
        activity: &Activity,
    ) -> Result<Vec<Activity>, SkillBridgeError>;

    /// Asks the skill to cancel all of its dialogs for the referenced conversation.
    ///
    /// Best effort: callers log and discard the error. A successful return does not
    /// mean the skill stopped processing.
    async fn cancel(
        &self,
        manifest: &SkillManifest,
        reference: &ConversationReference,
    ) -> Result<(), SkillBridgeError>;
}
