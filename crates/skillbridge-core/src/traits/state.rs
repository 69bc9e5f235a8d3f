// SPDX-FileCopyrightText: 2026 Skillbridge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Key-value persistence for conversation and user state.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::SkillBridgeError;

/// Persists JSON records keyed by conversation or user.
///
/// Implementations must be safe to share across conversations; ordering of
/// turns within a single conversation is the host's responsibility.
#[async_trait]
pub trait StateStore: Send + Sync + 'static {
    async fn read(&self, key: &str) -> Result<Option<Value>, SkillBridgeError>;

    async fn write(&self, key: &str, value: Value) -> Result<(), SkillBridgeError>;

    async fn delete(&self, key: &str) -> Result<(), SkillBridgeError>;
}
