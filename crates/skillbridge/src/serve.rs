// SPDX-FileCopyrightText: 2026 Skillbridge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `skillbridge serve` implementation.
//!
//! Assembles the assistant from configuration and exposes it over HTTP:
//!
//! - `POST /api/messages` takes one inbound activity and answers with the JSON
//!   array of reply activities produced during that turn.
//! - `GET /health` answers `ok`.
//!
//! Turns for the same conversation are processed one at a time.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError};

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use skillbridge_config::BridgeConfig;
use skillbridge_core::{Activity, SkillBridgeError};
use skillbridge_dialog::{
    Assistant, AssistantSettings, TracingTelemetry, UtteranceRecognizer, state_store_from_config,
};
use skillbridge_registry::SkillRegistry;
use skillbridge_transport::{
    HttpSkillTransport, credentials_from_config, user_tokens_from_config,
};
use tokio::sync::{Mutex, MutexGuard};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// Initialize the tracing subscriber with the configured log level.
fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("skillbridge={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}

/// Runs the HTTP host until SIGINT or SIGTERM.
pub async fn run_serve(config: BridgeConfig) -> Result<(), SkillBridgeError> {
    init_tracing(&config.assistant.log_level);

    let assistant = build_assistant(&config)?;
    info!(
        name = %config.assistant.name,
        skills = assistant.registry().len(),
        "assistant initialized"
    );

    let addr = format!("{}:{}", config.server.bind_address, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| SkillBridgeError::Internal(format!("failed to bind {addr}: {e}")))?;

    info!("skillbridge listening on {addr}");

    axum::serve(listener, router(Arc::new(assistant)))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| SkillBridgeError::Internal(format!("server error: {e}")))?;

    info!("skillbridge stopped");
    Ok(())
}

/// Wires registry, credentials, transport, recognizer, and state store together.
pub fn build_assistant(config: &BridgeConfig) -> Result<Assistant, SkillBridgeError> {
    let registry = SkillRegistry::from_files(&config.skills.manifest_files)?;
    let credentials = credentials_from_config(&config.credentials, &config.transport)?;
    let user_tokens =
        user_tokens_from_config(&config.credentials, &config.transport, credentials.clone())?;
    let transport = HttpSkillTransport::new(&config.transport, credentials)?;
    let recognizer = UtteranceRecognizer::from_manifests(registry.manifests());
    let store = state_store_from_config(&config.state);

    let assistant = Assistant::new(
        Arc::new(registry),
        Arc::new(transport),
        Arc::new(recognizer),
        store,
        Arc::new(TracingTelemetry),
        AssistantSettings::from_config(config),
    );
    Ok(match user_tokens {
        Some(user_tokens) => assistant.with_user_tokens(user_tokens),
        None => assistant,
    })
}

/// Shared state for the HTTP handlers.
#[derive(Clone)]
struct AppState {
    assistant: Arc<Assistant>,
    turns: Arc<ConversationLocks>,
}

/// Per-conversation turn locks. Entries are dropped once no turn holds them.
#[derive(Default)]
struct ConversationLocks {
    locks: std::sync::Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl ConversationLocks {
    fn acquire(&self, key: &str) -> TurnPermit<'_> {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        let lock = locks.entry(key.to_string()).or_default().clone();
        TurnPermit {
            locks: self,
            key: key.to_string(),
            lock,
        }
    }

    fn release(&self, key: &str, lock: &Arc<Mutex<()>>) {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        // The map and `lock` are the only holders: nobody is waiting.
        if Arc::strong_count(lock) == 2 {
            locks.remove(key);
        }
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

/// A claim on one conversation's turn lock.
///
/// Dropping it releases the map entry, also when the request future is
/// abandoned mid-turn.
struct TurnPermit<'a> {
    locks: &'a ConversationLocks,
    key: String,
    lock: Arc<Mutex<()>>,
}

impl TurnPermit<'_> {
    async fn lock(&self) -> MutexGuard<'_, ()> {
        self.lock.lock().await
    }
}

impl Drop for TurnPermit<'_> {
    fn drop(&mut self) {
        self.locks.release(&self.key, &self.lock);
    }
}

/// Error response body.
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
        .into_response()
}

/// Builds the HTTP router around an assistant.
pub fn router(assistant: Arc<Assistant>) -> Router {
    let state = AppState {
        assistant,
        turns: Arc::new(ConversationLocks::default()),
    };

    Router::new()
        .route("/api/messages", post(post_messages))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}

/// POST /api/messages
async fn post_messages(
    State(state): State<AppState>,
    Json(mut activity): Json<Activity>,
) -> Response {
    let Some(key) = activity.conversation_state_key() else {
        return error_response(
            StatusCode::BAD_REQUEST,
            "activity has no channelId or conversation id",
        );
    };
    if activity.id.is_none() {
        activity.id = Some(uuid::Uuid::new_v4().to_string());
    }

    let result = {
        let permit = state.turns.acquire(&key);
        let _turn = permit.lock().await;
        state.assistant.on_turn(activity).await
    };

    match result {
        Ok(replies) => Json(replies).into_response(),
        Err(e) => {
            error!(conversation = %key, error = %e, "turn failed");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();

    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = ctrl_c => info!("received SIGINT (Ctrl+C), shutting down"),
                    _ = sigterm.recv() => info!("received SIGTERM, shutting down"),
                }
            }
            Err(e) => {
                warn!(error = %e, "failed to install SIGTERM handler");
                let _ = ctrl_c.await;
                info!("received SIGINT (Ctrl+C), shutting down");
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = ctrl_c.await;
        info!("received Ctrl+C, shutting down");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use serde_json::{Value, json};
    use skillbridge_core::SkillManifest;
    use skillbridge_dialog::MemoryStateStore;
    use skillbridge_test_utils::{MockRecognizer, MockTransport, RecordingTelemetry};
    use tower::ServiceExt;

    fn assistant(transport: Arc<MockTransport>) -> Arc<Assistant> {
        let manifest: SkillManifest = serde_json::from_value(json!({
            "id": "testSkill",
            "name": "Test Skill",
            "endpoint": "http://localhost:3980/api/skill/messages",
            "actions": [{"id": "testSkill/testAction"}]
        }))
        .unwrap();
        let registry = Arc::new(SkillRegistry::new(vec![manifest]).unwrap());
        let recognizer = MockRecognizer::new().with_intent("hello", "testSkill/testAction", 0.9);

        Arc::new(Assistant::new(
            registry,
            transport,
            Arc::new(recognizer),
            Arc::new(MemoryStateStore::new()),
            Arc::new(RecordingTelemetry::new()),
            AssistantSettings::default(),
        ))
    }

    fn message_request(body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/messages")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn health_returns_ok() {
        let app = router(assistant(Arc::new(MockTransport::new())));
        let response = app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&bytes[..], b"ok");
    }

    #[tokio::test]
    async fn message_is_routed_to_skill_and_replies_returned() {
        let transport = Arc::new(MockTransport::new());
        transport
            .push_replies(vec![Activity::message("Hi from the skill")])
            .await;
        let app = router(assistant(transport.clone()));

        let response = app
            .oneshot(message_request(json!({
                "type": "message",
                "text": "hello",
                "channelId": "emulator",
                "serviceUrl": "http://localhost:3978",
                "conversation": {"id": "c1"},
                "from": {"id": "u1"},
                "recipient": {"id": "bot"}
            })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(transport.check_if_skill_invoked().await);
        let forwarded = transport.forwarded().await;
        assert!(forwarded[0].1.id.is_some());

        let replies = body_json(response).await;
        let texts: Vec<&str> = replies
            .as_array()
            .unwrap()
            .iter()
            .filter(|a| a["type"] == "message")
            .filter_map(|a| a["text"].as_str())
            .collect();
        assert_eq!(texts, vec!["Hi from the skill"]);
    }

    #[tokio::test]
    async fn activity_without_conversation_is_bad_request() {
        let transport = Arc::new(MockTransport::new());
        let app = router(assistant(transport.clone()));

        let response = app
            .oneshot(message_request(json!({"type": "message", "text": "hello"})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert!(body["error"].as_str().unwrap().contains("conversation"));
        assert!(!transport.check_if_skill_invoked().await);
    }

    #[tokio::test]
    async fn malformed_body_is_rejected() {
        let app = router(assistant(Arc::new(MockTransport::new())));
        let response = app
            .oneshot(
                Request::post("/api/messages")
                    .header("content-type", "application/json")
                    .body(Body::from("not json"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert!(response.status().is_client_error());
    }

    #[tokio::test]
    async fn turn_reaches_http_skill_with_bearer_token() {
        use skillbridge_config::model::TransportConfig;
        use skillbridge_test_utils::MockCredentials;
        use wiremock::matchers::{header, method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let skill = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/skill/messages"))
            .and(header("authorization", "Bearer skill-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"type": "message", "text": "Booked."},
                {"type": "endOfConversation"}
            ])))
            .expect(1)
            .mount(&skill)
            .await;

        let manifest: SkillManifest = serde_json::from_value(json!({
            "id": "calendarSkill",
            "name": "Calendar Skill",
            "msaAppId": "calendar-app",
            "endpoint": format!("{}/api/skill/messages", skill.uri()),
            "actions": [{"id": "calendarSkill/createEvent"}]
        }))
        .unwrap();
        let credentials = Arc::new(MockCredentials::new("skill-token"));
        let transport =
            HttpSkillTransport::new(&TransportConfig::default(), credentials.clone()).unwrap();
        let recognizer =
            MockRecognizer::new().with_intent("add lunch", "calendarSkill/createEvent", 0.9);
        let assistant = Arc::new(Assistant::new(
            Arc::new(SkillRegistry::new(vec![manifest]).unwrap()),
            Arc::new(transport),
            Arc::new(recognizer),
            Arc::new(MemoryStateStore::new()),
            Arc::new(RecordingTelemetry::new()),
            AssistantSettings::default(),
        ));

        let response = router(assistant)
            .oneshot(message_request(json!({
                "type": "message",
                "text": "add lunch",
                "channelId": "emulator",
                "conversation": {"id": "c2"},
                "from": {"id": "u1"},
                "recipient": {"id": "bot"}
            })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(credentials.audiences(), vec!["calendar-app"]);
        let replies = body_json(response).await;
        let replies = replies.as_array().unwrap();
        assert!(replies.iter().any(|a| a["text"] == "Booked."));
        assert!(
            replies
                .iter()
                .all(|a| a["type"] != "endOfConversation")
        );
    }

    #[test]
    fn assistant_builds_with_user_token_service() {
        let config = skillbridge_config::load_and_validate_str(
            "[credentials]\nuser_token_endpoint = \"https://token.botframework.com\"\n",
        )
        .unwrap();
        assert!(build_assistant(&config).is_ok());

        let config = skillbridge_config::load_and_validate_str("").unwrap();
        assert!(config.credentials.user_token_endpoint.is_none());
        assert!(build_assistant(&config).is_ok());
    }

    #[tokio::test]
    async fn conversation_locks_are_released() {
        let locks = ConversationLocks::default();
        let first = locks.acquire("emulator/conversations/c1");
        let second = locks.acquire("emulator/conversations/c1");
        assert!(Arc::ptr_eq(&first.lock, &second.lock));

        drop(first);
        assert_eq!(locks.len(), 1);
        drop(second);
        assert_eq!(locks.len(), 0);
    }

    #[tokio::test]
    async fn abandoned_turn_releases_its_entry() {
        let key = "emulator/conversations/c1";
        let locks = ConversationLocks::default();
        let running = locks.acquire(key);
        let held = running.lock().await;

        let waiting = async {
            let permit = locks.acquire(key);
            let _turn = permit.lock().await;
        };
        let timed_out =
            tokio::time::timeout(std::time::Duration::from_millis(50), waiting).await;
        assert!(timed_out.is_err());
        assert_eq!(locks.len(), 1);

        drop(held);
        drop(running);
        assert_eq!(locks.len(), 0);
    }
}
