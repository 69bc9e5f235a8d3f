// SPDX-FileCopyrightText: 2026 Skillbridge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for skillbridge integration tests.
//!
//! Provides mock collaborators and a test harness for fast, deterministic tests
//! without remote skills or NLU services.
//!
//! # Components
//!
//! - [`MockTransport`] - Scripted skill transport that records forwards and cancels
//! - [`MockRecognizer`] - Fixed utterance-to-intent answers
//! - [`MockCredentials`] - Fixed bearer token, records requested audiences
//! - [`MockUserTokens`] - Per-connection user tokens for skill token requests
//! - [`RecordingTelemetry`] - Captures telemetry events and exceptions
//! - [`TestHarness`] - Full assistant over the mocks

pub mod harness;
pub mod mock_credentials;
pub mod mock_recognizer;
pub mod mock_transport;
pub mod mock_user_tokens;
pub mod recording_telemetry;

pub use harness::{TestHarness, message_texts};
pub use mock_credentials::MockCredentials;
pub use mock_recognizer::MockRecognizer;
pub use mock_transport::MockTransport;
pub use mock_user_tokens::MockUserTokens;
pub use recording_telemetry::RecordingTelemetry;
