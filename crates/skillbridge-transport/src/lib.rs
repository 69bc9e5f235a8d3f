// SPDX-FileCopyrightText: 2026 Skillbridge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP skill transport for skillbridge.
//!
//! Implements [`skillbridge_core::SkillTransport`] by posting activities to each
//! skill's messaging endpoint, and [`skillbridge_core::CredentialProvider`] for
//! the supported bearer token modes. [`HttpUserTokens`] answers skills' user
//! token requests from a token service.

pub mod credentials;
pub mod http;
pub mod user_token;

pub use credentials::{
    AnonymousCredentials, ClientCredentials, StaticCredentials, credentials_from_config,
};
pub use http::HttpSkillTransport;
pub use user_token::{HttpUserTokens, user_tokens_from_config};
