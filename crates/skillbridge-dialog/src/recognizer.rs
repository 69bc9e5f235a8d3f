// SPDX-FileCopyrightText: 2026 Skillbridge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Local intent recognizer over the trigger utterances declared in manifests.
//!
//! Stands in for a hosted NLU service. Every inline utterance of every action is
//! compared with the incoming text using Jaro-Winkler similarity; the best scoring
//! action id is returned as the intent.

use async_trait::async_trait;
use skillbridge_core::{Activity, IntentRecognizer, IntentScore, SkillBridgeError, SkillManifest};
use tracing::debug;

#[derive(Debug, Clone)]
struct Example {
    intent: String,
    utterance: String,
}

/// Nearest-utterance recognizer.
#[derive(Debug, Clone, Default)]
pub struct UtteranceRecognizer {
    examples: Vec<Example>,
}

fn normalize(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            word.trim_matches(|c: char| c.is_ascii_punctuation())
                .to_lowercase()
        })
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

impl UtteranceRecognizer {
    pub fn from_manifests(manifests: &[SkillManifest]) -> Self {
        let examples = manifests
            .iter()
            .flat_map(|m| m.actions.iter())
            .flat_map(|action| {
                action
                    .definition
                    .triggers
                    .utterances
                    .iter()
                    .flat_map(|u| u.text.iter())
                    .map(|text| Example {
                        intent: action.id.clone(),
                        utterance: normalize(text),
                    })
            })
            .filter(|e| !e.utterance.is_empty())
            .collect();
        Self { examples }
    }

    pub fn len(&self) -> usize {
        self.examples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.examples.is_empty()
    }

    /// Best matching intent for a raw utterance.
    pub fn score(&self, text: &str) -> Option<IntentScore> {
        let text = normalize(text);
        if text.is_empty() {
            return None;
        }
        self.examples
            .iter()
            .map(|e| (e, strsim::jaro_winkler(&text, &e.utterance)))
            .max_by(|(_, a), (_, b)| a.total_cmp(b))
            .map(|(e, score)| IntentScore::new(e.intent.clone(), score))
    }
}

#[async_trait]
impl IntentRecognizer for UtteranceRecognizer {
    async fn recognize(&self, activity: &Activity) -> Result<Option<IntentScore>, SkillBridgeError> {
        if !activity.is_message() {
            return Ok(None);
        }
        let Some(text) = activity.text_trimmed() else {
            return Ok(None);
        };
        let result = self.score(text);
        debug!(
            intent = result.as_ref().map(|r| r.intent.as_str()),
            score = result.as_ref().map(|r| r.score),
            "utterance recognized"
        );
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn manifests() -> Vec<SkillManifest> {
        serde_json::from_value(json!([
            {
                "id": "calendarSkill",
                "name": "Calendar Skill",
                "endpoint": "https://calendar.example.com/api/skill/messages",
                "actions": [{
                    "id": "calendarSkill/createEvent",
                    "definition": {"triggers": {"utterances": [
                        {"locale": "en", "text": ["create a meeting", "schedule an appointment"]}
                    ]}}
                }]
            },
            {
                "id": "weatherSkill",
                "name": "Weather Skill",
                "endpoint": "https://weather.example.com/api/skill/messages",
                "actions": [{
                    "id": "weatherSkill/forecast",
                    "definition": {"triggers": {"utterances": [
                        {"locale": "en", "text": ["what's the weather like", "weather forecast"]}
                    ]}}
                }]
            }
        ]))
        .unwrap()
    }

    #[test]
    fn exact_utterance_scores_one() {
        let recognizer = UtteranceRecognizer::from_manifests(&manifests());
        assert_eq!(recognizer.len(), 4);
        let score = recognizer.score("Schedule an appointment!").unwrap();
        assert_eq!(score.intent, "calendarSkill/createEvent");
        assert!((score.score - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn close_utterance_picks_nearest_action() {
        let recognizer = UtteranceRecognizer::from_manifests(&manifests());
        let score = recognizer.score("what is the weather like").unwrap();
        assert_eq!(score.intent, "weatherSkill/forecast");
        assert!(score.meets(0.8), "{}", score.score);
    }

    #[test]
    fn blank_text_or_no_examples_is_none() {
        assert!(UtteranceRecognizer::default().score("hello").is_none());
        let recognizer = UtteranceRecognizer::from_manifests(&manifests());
        assert!(recognizer.score("  ?! ").is_none());
    }

    #[tokio::test]
    async fn non_message_activities_are_not_recognized() {
        let recognizer = UtteranceRecognizer::from_manifests(&manifests());
        let result = recognizer.recognize(&Activity::event("weather forecast")).await.unwrap();
        assert!(result.is_none());
    }
}
