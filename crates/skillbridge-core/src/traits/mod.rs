// SPDX-FileCopyrightText: 2026 Skillbridge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Collaborator traits consumed by the dialog layer.
//!
//! All traits use `#[async_trait]` so they can sit behind `Arc<dyn _>`.

pub mod credentials;
pub mod recognizer;
pub mod state;
pub mod telemetry;
pub mod transport;
pub mod user_token;

pub use credentials::CredentialProvider;
pub use recognizer::{IntentRecognizer, IntentScore};
pub use state::StateStore;
pub use telemetry::TelemetryClient;
pub use transport::SkillTransport;
pub use user_token::{ProviderTokenResponse, UserToken, UserTokenProvider};
