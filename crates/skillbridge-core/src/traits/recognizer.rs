// SPDX-FileCopyrightText: 2026 Skillbridge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Intent recognition (dispatch) seam.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::activity::Activity;
use crate::error::SkillBridgeError;

/// Top intent with its confidence in `0.0..=1.0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntentScore {
    pub intent: String,
    pub score: f64,
}

impl IntentScore {
    pub fn new(intent: impl Into<String>, score: f64) -> Self {
        Self {
            intent: intent.into(),
            score,
        }
    }

    /// True when the score reaches the dispatch threshold.
    pub fn meets(&self, threshold: f64) -> bool {
        self.score >= threshold
    }
}

/// Maps an utterance to its most likely intent.
#[async_trait]
pub trait IntentRecognizer: Send + Sync + 'static {
    /// Returns the top intent, or `None` when nothing was recognized.
    async fn recognize(&self, activity: &Activity) -> Result<Option<IntentScore>, SkillBridgeError>;
}
