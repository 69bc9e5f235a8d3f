// SPDX-FileCopyrightText: 2026 Skillbridge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock intent recognizer with fixed utterance-to-intent answers.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use skillbridge_core::{Activity, IntentRecognizer, IntentScore, SkillBridgeError};

/// Answers by exact (trimmed, case-insensitive) utterance text.
#[derive(Debug, Default)]
pub struct MockRecognizer {
    answers: HashMap<String, IntentScore>,
    fallback: Option<IntentScore>,
    calls: AtomicUsize,
}

impl MockRecognizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recognize `utterance` as `intent` with `score`.
    pub fn with_intent(mut self, utterance: &str, intent: &str, score: f64) -> Self {
        self.answers
            .insert(utterance.trim().to_lowercase(), IntentScore::new(intent, score));
        self
    }

    /// Answer for utterances without a specific entry.
    pub fn with_fallback(mut self, intent: &str, score: f64) -> Self {
        self.fallback = Some(IntentScore::new(intent, score));
        self
    }

    /// Number of times `recognize()` was called.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IntentRecognizer for MockRecognizer {
    async fn recognize(&self, activity: &Activity) -> Result<Option<IntentScore>, SkillBridgeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let Some(text) = activity.text_trimmed() else {
            return Ok(None);
        };
        Ok(self
            .answers
            .get(&text.to_lowercase())
            .or(self.fallback.as_ref())
            .cloned())
    }
}
