// SPDX-FileCopyrightText: 2026 Skillbridge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Credential provider that hands out a fixed token and records audiences.

use std::sync::Mutex;

use async_trait::async_trait;

use skillbridge_core::{CredentialProvider, SkillBridgeError};

/// Returns `token` for every audience, or fails when built with [`MockCredentials::failing`].
#[derive(Debug, Default)]
pub struct MockCredentials {
    token: Option<String>,
    fail: bool,
    audiences: Mutex<Vec<String>>,
}

impl MockCredentials {
    pub fn new(token: &str) -> Self {
        Self {
            token: Some(token.to_string()),
            ..Self::default()
        }
    }

    /// No token at all; calls go out without an `Authorization` header.
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Every token request fails with a credentials error.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    /// Audiences tokens were requested for, in order.
    pub fn audiences(&self) -> Vec<String> {
        self.audiences.lock().map(|a| a.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl CredentialProvider for MockCredentials {
    async fn token(&self, audience: &str) -> Result<Option<String>, SkillBridgeError> {
        if let Ok(mut audiences) = self.audiences.lock() {
            audiences.push(audience.to_string());
        }
        if self.fail {
            return Err(SkillBridgeError::Credentials {
                message: format!("no token available for {audience}"),
                source: None,
            });
        }
        Ok(self.token.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn records_audiences_and_returns_token() {
        let credentials = MockCredentials::new("t0ken");
        assert_eq!(
            credentials.token("skill-app").await.unwrap().as_deref(),
            Some("t0ken")
        );
        assert_eq!(credentials.audiences(), vec!["skill-app"]);
    }

    #[tokio::test]
    async fn failing_returns_credentials_error() {
        let err = MockCredentials::failing().token("skill-app").await.unwrap_err();
        assert!(matches!(err, SkillBridgeError::Credentials { .. }));
    }

    #[tokio::test]
    async fn anonymous_returns_none() {
        assert!(MockCredentials::anonymous().token("x").await.unwrap().is_none());
    }
}
