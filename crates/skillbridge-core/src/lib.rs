// SPDX-FileCopyrightText: 2026 Skillbridge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for skillbridge.
//!
//! This crate provides the activity envelope, skill manifest model, error type and
//! the collaborator traits (transport, credentials, user tokens, state, recognizer,
//! telemetry)
//! shared by every other crate in the workspace.

pub mod activity;
pub mod error;
pub mod manifest;
pub mod traits;

// Re-export key items at crate root for ergonomic imports.
pub use activity::{
    Activity, ActivityType, ChannelAccount, ConversationAccount, ConversationReference, Entity,
    SemanticAction,
};
pub use error::SkillBridgeError;
pub use manifest::{Action, SkillManifest, Slot};

pub use traits::{
    CredentialProvider, IntentRecognizer, IntentScore, ProviderTokenResponse, SkillTransport,
    StateStore, TelemetryClient, UserToken, UserTokenProvider,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_traits_are_object_safe() {
        fn _transport(_: &dyn SkillTransport) {}
        fn _credentials(_: &dyn CredentialProvider) {}
        fn _state(_: &dyn StateStore) {}
        fn _recognizer(_: &dyn IntentRecognizer) {}
        fn _telemetry(_: &dyn TelemetryClient) {}
        fn _user_tokens(_: &dyn UserTokenProvider) {}
    }

    #[test]
    fn intent_score_threshold_is_inclusive() {
        let score = IntentScore::new("calendarSkill/createEvent", 0.5);
        assert!(score.meets(0.5));
        assert!(!score.meets(0.51));
    }

    #[test]
    fn token_response_uses_bot_framework_field_names() {
        let response = ProviderTokenResponse {
            authentication_provider: "Azure Active Directory v2".into(),
            token_response: UserToken {
                channel_id: Some("msteams".into()),
                connection_name: "Outlook".into(),
                token: "user-token".into(),
                expiration: None,
            },
        };
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["authenticationProvider"], "Azure Active Directory v2");
        assert_eq!(value["tokenResponse"]["connectionName"], "Outlook");
        assert_eq!(value["tokenResponse"]["channelId"], "msteams");
        assert!(value["tokenResponse"].get("expiration").is_none());
    }
}
