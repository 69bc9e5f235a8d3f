// SPDX-FileCopyrightText: 2026 Skillbridge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! User token provider backed by a fixed connection-to-token table.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use skillbridge_core::{SkillBridgeError, UserToken, UserTokenProvider};

/// Answers for any user by connection name; records every lookup.
#[derive(Debug, Default)]
pub struct MockUserTokens {
    tokens: HashMap<String, String>,
    lookups: Mutex<Vec<(String, String)>>,
}

impl MockUserTokens {
    pub fn new() -> Self {
        Self::default()
    }

    /// The user has signed in to `connection_name` and holds `token`.
    pub fn with_token(mut self, connection_name: &str, token: &str) -> Self {
        self.tokens
            .insert(connection_name.to_string(), token.to_string());
        self
    }

    /// `(user_id, connection_name)` pairs looked up so far.
    pub fn lookups(&self) -> Vec<(String, String)> {
        self.lookups.lock().map(|l| l.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl UserTokenProvider for MockUserTokens {
    async fn user_token(
        &self,
        channel_id: &str,
        user_id: &str,
        connection_name: &str,
    ) -> Result<Option<UserToken>, SkillBridgeError> {
        if let Ok(mut lookups) = self.lookups.lock() {
            lookups.push((user_id.to_string(), connection_name.to_string()));
        }
        Ok(self.tokens.get(connection_name).map(|token| UserToken {
            channel_id: Some(channel_id.to_string()),
            connection_name: connection_name.to_string(),
            token: token.clone(),
            expiration: None,
        }))
    }
}
