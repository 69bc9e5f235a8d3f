// SPDX-FileCopyrightText: 2026 Skillbridge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! User token lookups against a Bot Framework style token service.
//!
//! Skills that need to act on the user's behalf send a `tokens/request` event;
//! the dialog answers it with whatever token this service holds for the user on
//! the named OAuth connection. Nothing here prompts the user to sign in.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use reqwest::header::{AUTHORIZATION, HeaderValue};
use skillbridge_config::model::{CredentialsConfig, TransportConfig};
use skillbridge_core::{CredentialProvider, SkillBridgeError, UserToken, UserTokenProvider};
use tracing::{debug, info, warn};
use url::Url;

const GET_TOKEN_PATH: &str = "api/usertoken/GetToken";

/// [`UserTokenProvider`] calling `GET {endpoint}/api/usertoken/GetToken`.
pub struct HttpUserTokens {
    client: reqwest::Client,
    endpoint: Url,
    audience: String,
    credentials: Arc<dyn CredentialProvider>,
}

impl std::fmt::Debug for HttpUserTokens {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpUserTokens")
            .field("endpoint", &self.endpoint.as_str())
            .field("audience", &self.audience)
            .finish_non_exhaustive()
    }
}

impl HttpUserTokens {
    /// `endpoint` is the token service base URL; `audience` is the app id the
    /// bearer token is minted for.
    pub fn new(
        client: reqwest::Client,
        endpoint: &str,
        audience: impl Into<String>,
        credentials: Arc<dyn CredentialProvider>,
    ) -> Result<Self, SkillBridgeError> {
        let mut endpoint = Url::parse(endpoint).map_err(|e| {
            SkillBridgeError::Config(format!("invalid user token endpoint `{endpoint}`: {e}"))
        })?;
        if !endpoint.path().ends_with('/') {
            let path = format!("{}/", endpoint.path());
            endpoint.set_path(&path);
        }
        let endpoint = endpoint.join(GET_TOKEN_PATH).map_err(|e| {
            SkillBridgeError::Config(format!("invalid user token endpoint: {e}"))
        })?;

        Ok(Self {
            client,
            endpoint,
            audience: audience.into(),
            credentials,
        })
    }

    fn lookup_url(&self, channel_id: &str, user_id: &str, connection_name: &str) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("userId", user_id)
            .append_pair("connectionName", connection_name)
            .append_pair("channelId", channel_id);
        url
    }
}

#[async_trait]
impl UserTokenProvider for HttpUserTokens {
    async fn user_token(
        &self,
        channel_id: &str,
        user_id: &str,
        connection_name: &str,
    ) -> Result<Option<UserToken>, SkillBridgeError> {
        let mut request = self
            .client
            .get(self.lookup_url(channel_id, user_id, connection_name));

        if let Some(token) = self.credentials.token(&self.audience).await? {
            let value = HeaderValue::from_str(&format!("Bearer {token}")).map_err(|e| {
                SkillBridgeError::Credentials {
                    message: format!("token is not a valid header value: {e}"),
                    source: Some(Box::new(e)),
                }
            })?;
            request = request.header(AUTHORIZATION, value);
        }

        let response = request.send().await.map_err(|e| SkillBridgeError::Transport {
            message: format!("user token lookup failed: {e}"),
            status: None,
            source: Some(Box::new(e)),
        })?;

        let status = response.status();
        debug!(status = %status, connection = connection_name, "user token response received");

        match status {
            // The service answers 404 when the user never signed in to the connection.
            StatusCode::NOT_FOUND | StatusCode::NO_CONTENT => Ok(None),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                Err(SkillBridgeError::Credentials {
                    message: format!("user token service rejected the assistant: {status}"),
                    source: None,
                })
            }
            status if status.is_success() => {
                let token: UserToken =
                    response
                        .json()
                        .await
                        .map_err(|e| SkillBridgeError::Transport {
                            message: format!("malformed user token response: {e}"),
                            status: Some(status.as_u16()),
                            source: Some(Box::new(e)),
                        })?;
                if token.token.is_empty() {
                    return Ok(None);
                }
                Ok(Some(token))
            }
            status => {
                let body = response.text().await.unwrap_or_default();
                warn!(status = %status, body = %body, "user token service returned error status");
                Err(SkillBridgeError::transport(
                    format!("user token service returned {status}: {body}"),
                    Some(status.as_u16()),
                ))
            }
        }
    }
}

/// Builds the user token provider when `[credentials].user_token_endpoint` is set.
pub fn user_tokens_from_config(
    config: &CredentialsConfig,
    transport: &TransportConfig,
    credentials: Arc<dyn CredentialProvider>,
) -> Result<Option<Arc<dyn UserTokenProvider>>, SkillBridgeError> {
    let Some(endpoint) = config.user_token_endpoint.as_deref() else {
        return Ok(None);
    };
    info!(endpoint, "configuring user token service");

    let mut builder = reqwest::Client::builder().user_agent(transport.user_agent.clone());
    if let Some(secs) = transport.timeout_secs {
        builder = builder.timeout(Duration::from_secs(secs));
    }
    let client = builder.build().map_err(|e| SkillBridgeError::Transport {
        message: format!("failed to build HTTP client: {e}"),
        status: None,
        source: Some(Box::new(e)),
    })?;

    let provider = HttpUserTokens::new(
        client,
        endpoint,
        config.user_token_audience.clone(),
        credentials,
    )?;
    Ok(Some(Arc::new(provider)))
}
