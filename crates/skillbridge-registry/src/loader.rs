// SPDX-FileCopyrightText: 2026 Skillbridge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Reads skill manifests from JSON files.

use std::path::Path;

use serde_json::Value;
use skillbridge_core::{SkillBridgeError, SkillManifest};
use tracing::info;

use crate::registry::SkillRegistry;

/// Parses manifests from a JSON document holding one manifest or an array of them.
pub fn parse_manifests(json: &str) -> Result<Vec<SkillManifest>, SkillBridgeError> {
    let value: Value = serde_json::from_str(json)
        .map_err(|e| SkillBridgeError::Manifest(format!("invalid JSON: {e}")))?;
    let manifests = match value {
        Value::Array(_) => serde_json::from_value(value),
        other => serde_json::from_value(other).map(|m| vec![m]),
    };
    manifests.map_err(|e| SkillBridgeError::Manifest(format!("invalid manifest: {e}")))
}

/// Reads every file in order and concatenates the manifests they contain.
pub fn load_manifests<P: AsRef<Path>>(paths: &[P]) -> Result<Vec<SkillManifest>, SkillBridgeError> {
    let mut manifests = Vec::new();
    for path in paths {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            SkillBridgeError::Manifest(format!("failed to read {}: {e}", path.display()))
        })?;
        let parsed = parse_manifests(&content).map_err(|e| match e {
            SkillBridgeError::Manifest(msg) => {
                SkillBridgeError::Manifest(format!("{}: {msg}", path.display()))
            }
            other => other,
        })?;
        info!(path = %path.display(), count = parsed.len(), "loaded skill manifests");
        manifests.extend(parsed);
    }
    Ok(manifests)
}

impl SkillRegistry {
    /// Loads and validates manifests from the given files.
    pub fn from_files<P: AsRef<Path>>(paths: &[P]) -> Result<Self, SkillBridgeError> {
        Self::new(load_manifests(paths)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SINGLE: &str = r#"{
        "id": "weatherSkill",
        "name": "Weather Skill",
        "endpoint": "https://weather.example.com/api/skill/messages",
        "actions": [{"id": "weatherSkill/forecast"}]
    }"#;

    #[test]
    fn single_object_becomes_one_manifest() {
        let manifests = parse_manifests(SINGLE).unwrap();
        assert_eq!(manifests.len(), 1);
        assert_eq!(manifests[0].actions[0].id, "weatherSkill/forecast");
        assert!(manifests[0].actions[0].definition.slots.is_empty());
    }

    #[test]
    fn array_becomes_many_manifests() {
        let json = format!("[{SINGLE}, {}]", SINGLE.replace("weatherSkill", "newsSkill"));
        let manifests = parse_manifests(&json).unwrap();
        let ids: Vec<_> = manifests.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["weatherSkill", "newsSkill"]);
    }

    #[test]
    fn missing_endpoint_is_a_manifest_error() {
        let err = parse_manifests(r#"{"id": "x", "name": "x"}"#).unwrap_err();
        assert!(matches!(err, SkillBridgeError::Manifest(msg) if msg.contains("endpoint")));
    }

    #[test]
    fn files_are_read_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.json");
        let b = dir.path().join("b.json");
        std::fs::write(&a, SINGLE).unwrap();
        std::fs::write(&b, SINGLE.replace("weatherSkill", "newsSkill")).unwrap();

        let registry = SkillRegistry::from_files(&[&a, &b]).unwrap();
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.manifests()[1].id, "newsSkill");
    }

    #[test]
    fn unreadable_file_names_path() {
        let err = load_manifests(&["/nonexistent/skills.json"]).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/skills.json"));
    }
}
