// SPDX-FileCopyrightText: 2026 Skillbridge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP transport that posts activities to a skill's messaging endpoint.
//!
//! Each call is a single `POST` of the activity as JSON to the manifest's
//! `endpoint`, with a bearer token minted for the manifest's app id when the
//! credential provider issues one. The response body carries the skill's replies:
//! either one activity, an array of activities, or nothing at all.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, HeaderValue};
use serde_json::Value;
use skillbridge_config::model::TransportConfig;
use skillbridge_core::activity::CANCEL_ALL_SKILL_DIALOGS;
use skillbridge_core::{
    Activity, ConversationReference, CredentialProvider, SkillBridgeError, SkillManifest,
    SkillTransport,
};
use tracing::{debug, warn};

/// [`SkillTransport`] over HTTP using a shared `reqwest` connection pool.
#[derive(Clone)]
pub struct HttpSkillTransport {
    client: reqwest::Client,
    credentials: Arc<dyn CredentialProvider>,
}

impl std::fmt::Debug for HttpSkillTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpSkillTransport").finish_non_exhaustive()
    }
}

impl HttpSkillTransport {
    /// Builds a transport with the configured timeout and user agent.
    pub fn new(
        config: &TransportConfig,
        credentials: Arc<dyn CredentialProvider>,
    ) -> Result<Self, SkillBridgeError> {
        let mut builder = reqwest::Client::builder().user_agent(config.user_agent.clone());
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build().map_err(|e| SkillBridgeError::Transport {
            message: format!("failed to build HTTP client: {e}"),
            status: None,
            source: Some(Box::new(e)),
        })?;

        Ok(Self {
            client,
            credentials,
        })
    }

    async fn post(
        &self,
        manifest: &SkillManifest,
        activity: &Activity,
    ) -> Result<Vec<Activity>, SkillBridgeError> {
        let mut request = self.client.post(&manifest.endpoint).json(activity);

        if let Some(token) = self.credentials.token(&manifest.msa_app_id).await? {
            let value = HeaderValue::from_str(&format!("Bearer {token}")).map_err(|e| {
                SkillBridgeError::Credentials {
                    message: format!("token is not a valid header value: {e}"),
                    source: Some(Box::new(e)),
                }
            })?;
            request = request.header(AUTHORIZATION, value);
        }

        let response = request.send().await.map_err(|e| SkillBridgeError::Transport {
            message: format!("request to skill `{}` failed: {e}", manifest.id),
            status: None,
            source: Some(Box::new(e)),
        })?;

        let status = response.status();
        debug!(skill = %manifest.id, status = %status, "skill response received");

        let body = response.text().await.map_err(|e| SkillBridgeError::Transport {
            message: format!("failed to read response body from skill `{}`: {e}", manifest.id),
            status: Some(status.as_u16()),
            source: Some(Box::new(e)),
        })?;

        if !status.is_success() {
            warn!(skill = %manifest.id, status = %status, body = %body, "skill returned error status");
            return Err(SkillBridgeError::transport(
                format!("skill `{}` returned {status}: {body}", manifest.id),
                Some(status.as_u16()),
            ));
        }

        parse_replies(&body).map_err(|e| SkillBridgeError::Transport {
            message: format!("skill `{}` returned a malformed body: {e}", manifest.id),
            status: Some(status.as_u16()),
            source: Some(Box::new(e)),
        })
    }
}

/// Decodes a skill response body into its reply activities.
fn parse_replies(body: &str) -> Result<Vec<Activity>, serde_json::Error> {
    if body.trim().is_empty() {
        return Ok(Vec::new());
    }
    match serde_json::from_str::<Value>(body)? {
        Value::Null => Ok(Vec::new()),
        value @ Value::Array(_) => serde_json::from_value(value),
        // Some skills wrap replies as `{"activities": [...]}`.
        Value::Object(mut map) if map.contains_key("activities") && !map.contains_key("type") => {
            match map.remove("activities") {
                None | Some(Value::Null) => Ok(Vec::new()),
                Some(activities) => serde_json::from_value(activities),
            }
        }
        value => serde_json::from_value(value).map(|a| vec![a]),
    }
}

#[async_trait]
impl SkillTransport for HttpSkillTransport {
    async fn forward(
        &self,
        manifest: &SkillManifest,
        activity: &Activity,
    ) -> Result<Vec<Activity>, SkillBridgeError> {
        debug!(
            skill = %manifest.id,
            activity_type = activity.kind.as_str(),
            action = activity.semantic_action.as_ref().map(|s| s.id.as_str()),
            "forwarding activity to skill"
        );
        self.post(manifest, activity).await
    }

    async fn cancel(
        &self,
        manifest: &SkillManifest,
        reference: &ConversationReference,
    ) -> Result<(), SkillBridgeError> {
        let event = Activity::event(CANCEL_ALL_SKILL_DIALOGS).apply_conversation_reference(reference);
        debug!(skill = %manifest.id, "sending cancel event to skill");
        let replies = self.post(manifest, &event).await?;
        if !replies.is_empty() {
            debug!(skill = %manifest.id, count = replies.len(), "discarding replies to cancel event");
        }
        Ok(())
    }
}
