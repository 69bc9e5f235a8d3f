// SPDX-FileCopyrightText: 2026 Skillbridge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bearer token source for skill calls.

use async_trait::async_trait;

use crate::error::SkillBridgeError;

/// Produces bearer tokens for a given audience (a skill's app id).
#[async_trait]
pub trait CredentialProvider: Send + Sync + 'static {
    /// Returns a token for `audience`, or `None` when calls go out unauthenticated.
    async fn token(&self, audience: &str) -> Result<Option<String>, SkillBridgeError>;
}
