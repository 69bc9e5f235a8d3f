// SPDX-FileCopyrightText: 2026 Skillbridge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Yes/no answer parsing for the switch confirmation prompt.

use serde_json::Value;
use skillbridge_core::Activity;

const YES: &[&str] = &["yes", "y", "yeah", "yep", "sure", "ok", "okay"];
const NO: &[&str] = &["no", "n", "nope", "nah"];

/// Reads a confirmation answer from an activity.
///
/// A boolean `value` (from a card button) wins over text. Returns `None` when
/// the answer is neither yes nor no.
pub fn parse_confirmation(activity: &Activity) -> Option<bool> {
    if let Some(Value::Bool(answer)) = &activity.value {
        return Some(*answer);
    }

    let text = activity.text_trimmed()?;
    let normalized = text
        .trim_end_matches(|c: char| c.is_ascii_punctuation())
        .trim()
        .to_lowercase();

    if YES.contains(&normalized.as_str()) {
        Some(true)
    } else if NO.contains(&normalized.as_str()) {
        Some(false)
    } else {
        None
    }
}
