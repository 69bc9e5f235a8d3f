// SPDX-FileCopyrightText: 2026 Skillbridge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! User OAuth tokens that skills ask the assistant for.
//!
//! A skill that needs to call a user-scoped API sends a `tokens/request` event.
//! The assistant looks the user's token up for one of the skill's
//! authentication connections and answers with a `tokens/response` event whose
//! value is a [`ProviderTokenResponse`].

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::SkillBridgeError;

/// A stored user token for one OAuth connection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserToken {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel_id: Option<String>,
    pub connection_name: String,
    pub token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration: Option<String>,
}

/// Value of a `tokens/response` event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderTokenResponse {
    /// The connection's service provider id, e.g. `Azure Active Directory v2`.
    pub authentication_provider: String,
    pub token_response: UserToken,
}

/// Looks up tokens a user has already granted.
#[async_trait]
pub trait UserTokenProvider: Send + Sync + 'static {
    /// Returns the token for `connection_name`, or `None` when the user has not signed in.
    async fn user_token(
        &self,
        channel_id: &str,
        user_id: &str,
        connection_name: &str,
    ) -> Result<Option<UserToken>, SkillBridgeError>;
}
