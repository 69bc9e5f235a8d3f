// SPDX-FileCopyrightText: 2026 Skillbridge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end transport tests: token minting plus forwarding against a mock skill.

use serde_json::json;
use skillbridge_config::model::{CredentialsConfig, CredentialsMode, TransportConfig};
use skillbridge_core::{Activity, SkillManifest, SkillTransport};
use skillbridge_transport::{HttpSkillTransport, credentials_from_config};
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn manifest(endpoint: String) -> SkillManifest {
    serde_json::from_value(json!({
        "id": "emailSkill",
        "name": "Email Skill",
        "msaAppId": "email-app-id",
        "endpoint": endpoint,
        "actions": [{"id": "emailSkill/send"}]
    }))
    .unwrap()
}

#[tokio::test]
async fn client_credentials_token_is_minted_for_skill_app_id_and_reused() {
    let auth = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .and(body_string_contains("scope=email-app-id%2F.default"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token_type": "Bearer",
            "expires_in": 3600,
            "access_token": "email-token"
        })))
        .expect(1)
        .mount(&auth)
        .await;

    let skill = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/skill/messages"))
        .and(header("authorization", "Bearer email-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"type": "message", "text": "Who should I send it to?"}
        ])))
        .expect(2)
        .mount(&skill)
        .await;

    let credentials = CredentialsConfig {
        mode: CredentialsMode::ClientCredentials,
        app_id: Some("assistant-app".into()),
        app_password: Some("pw".into()),
        token_endpoint: format!("{}/token", auth.uri()),
        ..CredentialsConfig::default()
    };
    let transport_config = TransportConfig::default();
    let provider = credentials_from_config(&credentials, &transport_config).unwrap();
    let transport = HttpSkillTransport::new(&transport_config, provider).unwrap();

    let manifest = manifest(format!("{}/api/skill/messages", skill.uri()));
    for _ in 0..2 {
        let replies = transport
            .forward(&manifest, &Activity::message("send an email"))
            .await
            .unwrap();
        assert_eq!(replies[0].text.as_deref(), Some("Who should I send it to?"));
    }
}

#[tokio::test]
async fn token_failure_prevents_forwarding() {
    let auth = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(400).set_body_string("invalid_scope"))
        .mount(&auth)
        .await;

    let skill = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&skill)
        .await;

    let credentials = CredentialsConfig {
        mode: CredentialsMode::ClientCredentials,
        app_id: Some("assistant-app".into()),
        app_password: Some("pw".into()),
        token_endpoint: auth.uri(),
        ..CredentialsConfig::default()
    };
    let transport_config = TransportConfig::default();
    let provider = credentials_from_config(&credentials, &transport_config).unwrap();
    let transport = HttpSkillTransport::new(&transport_config, provider).unwrap();

    let err = transport
        .forward(&manifest(skill.uri()), &Activity::message("hi"))
        .await
        .unwrap_err();
    assert!(!err.is_transport(), "token errors are credential errors: {err:?}");
}
