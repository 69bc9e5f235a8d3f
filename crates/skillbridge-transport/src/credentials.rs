// SPDX-FileCopyrightText: 2026 Skillbridge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bearer token providers for outbound skill calls.
//!
//! - [`AnonymousCredentials`]: no `Authorization` header (local development).
//! - [`StaticCredentials`]: one pre-issued token for every skill.
//! - [`ClientCredentials`]: OAuth2 client-credentials grant per skill app id,
//!   cached until shortly before expiry.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use skillbridge_config::model::{CredentialsConfig, CredentialsMode, TransportConfig};
use skillbridge_core::{CredentialProvider, SkillBridgeError};
use tokio::sync::Mutex;
use tracing::{debug, info};

/// Tokens are refreshed this long before the issuer says they expire.
const REFRESH_MARGIN: Duration = Duration::from_secs(5 * 60);

/// Issues no token.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnonymousCredentials;

#[async_trait]
impl CredentialProvider for AnonymousCredentials {
    async fn token(&self, _audience: &str) -> Result<Option<String>, SkillBridgeError> {
        Ok(None)
    }
}

/// Issues the same configured token for every audience.
#[derive(Debug, Clone)]
pub struct StaticCredentials {
    token: SecretString,
}

impl StaticCredentials {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: SecretString::from(token.into()),
        }
    }
}

#[async_trait]
impl CredentialProvider for StaticCredentials {
    async fn token(&self, _audience: &str) -> Result<Option<String>, SkillBridgeError> {
        Ok(Some(self.token.expose_secret().to_string()))
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: u64,
}

fn default_expires_in() -> u64 {
    3600
}

#[derive(Debug)]
struct CachedToken {
    token: SecretString,
    refresh_at: Instant,
}

/// OAuth2 client-credentials grant against the configured token endpoint.
///
/// The requested scope is `<audience><scope_suffix>`, where the audience is the
/// skill's app id. One token is cached per audience.
#[derive(Debug)]
pub struct ClientCredentials {
    client: reqwest::Client,
    token_endpoint: String,
    app_id: String,
    app_password: SecretString,
    scope_suffix: String,
    cache: Mutex<HashMap<String, CachedToken>>,
}

impl ClientCredentials {
    pub fn new(
        client: reqwest::Client,
        token_endpoint: impl Into<String>,
        app_id: impl Into<String>,
        app_password: SecretString,
        scope_suffix: impl Into<String>,
    ) -> Self {
        Self {
            client,
            token_endpoint: token_endpoint.into(),
            app_id: app_id.into(),
            app_password,
            scope_suffix: scope_suffix.into(),
            cache: Mutex::new(HashMap::new()),
        }
    }

    async fn fetch(&self, audience: &str) -> Result<CachedToken, SkillBridgeError> {
        let scope = format!("{audience}{}", self.scope_suffix);
        let body = url::form_urlencoded::Serializer::new(String::new())
            .append_pair("grant_type", "client_credentials")
            .append_pair("client_id", &self.app_id)
            .append_pair("client_secret", self.app_password.expose_secret())
            .append_pair("scope", &scope)
            .finish();

        let response = self
            .client
            .post(&self.token_endpoint)
            .header(
                CONTENT_TYPE,
                HeaderValue::from_static("application/x-www-form-urlencoded"),
            )
            .body(body)
            .send()
            .await
            .map_err(|e| SkillBridgeError::Credentials {
                message: format!("token request failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        debug!(status = %status, audience, "token response received");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SkillBridgeError::Credentials {
                message: format!("token endpoint returned {status}: {body}"),
                source: None,
            });
        }

        let parsed: TokenResponse =
            response
                .json()
                .await
                .map_err(|e| SkillBridgeError::Credentials {
                    message: format!("failed to parse token response: {e}"),
                    source: Some(Box::new(e)),
                })?;

        let lifetime = Duration::from_secs(parsed.expires_in).saturating_sub(REFRESH_MARGIN);
        Ok(CachedToken {
            token: SecretString::from(parsed.access_token),
            refresh_at: Instant::now() + lifetime,
        })
    }
}

#[async_trait]
impl CredentialProvider for ClientCredentials {
    async fn token(&self, audience: &str) -> Result<Option<String>, SkillBridgeError> {
        if audience.is_empty() {
            return Err(SkillBridgeError::Credentials {
                message: "skill manifest has no msaAppId to request a token for".into(),
                source: None,
            });
        }

        {
            let cache = self.cache.lock().await;
            if let Some(cached) = cache.get(audience)
                && Instant::now() < cached.refresh_at
            {
                return Ok(Some(cached.token.expose_secret().to_string()));
            }
        }

        // The cache lock is released before the fetch.
        let fresh = self.fetch(audience).await?;
        let token = fresh.token.expose_secret().to_string();
        self.cache.lock().await.insert(audience.to_string(), fresh);
        Ok(Some(token))
    }
}

/// Builds the credential provider selected by `[credentials].mode`.
///
/// Validation has already checked that the fields each mode needs are present;
/// they are re-checked here so a hand-built config fails cleanly.
pub fn credentials_from_config(
    config: &CredentialsConfig,
    transport: &TransportConfig,
) -> Result<Arc<dyn CredentialProvider>, SkillBridgeError> {
    info!(mode = %config.mode, "configuring skill credentials");
    match config.mode {
        CredentialsMode::Anonymous => Ok(Arc::new(AnonymousCredentials)),
        CredentialsMode::Static => {
            let token = config.static_token.as_deref().ok_or_else(|| {
                SkillBridgeError::Config("credentials.static_token is required".into())
            })?;
            Ok(Arc::new(StaticCredentials::new(token)))
        }
        CredentialsMode::ClientCredentials => {
            let app_id = config
                .app_id
                .as_deref()
                .ok_or_else(|| SkillBridgeError::Config("credentials.app_id is required".into()))?;
            let password = config.app_password.as_deref().ok_or_else(|| {
                SkillBridgeError::Config("credentials.app_password is required".into())
            })?;

            let mut builder = reqwest::Client::builder().user_agent(transport.user_agent.clone());
            if let Some(secs) = transport.timeout_secs {
                builder = builder.timeout(Duration::from_secs(secs));
            }
            let client = builder.build().map_err(|e| SkillBridgeError::Credentials {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

            Ok(Arc::new(ClientCredentials::new(
                client,
                config.token_endpoint.clone(),
                app_id,
                SecretString::from(password.to_string()),
                config.scope_suffix.clone(),
            )))
        }
    }
}
