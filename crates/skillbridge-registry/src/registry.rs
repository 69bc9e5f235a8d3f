// SPDX-FileCopyrightText: 2026 Skillbridge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Intent-to-skill resolution over an immutable manifest set.
//!
//! The registry is built once at start-up and shared by reference. Lookups are a
//! single hash probe into a table precomputed from every manifest's action ids,
//! utterance sources and skill ids.

use std::collections::{HashMap, HashSet};

use skillbridge_core::{Action, SkillBridgeError, SkillManifest};
use tracing::{debug, warn};

/// A resolved skill, plus the action that answered the intent when one did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SkillMatch<'a> {
    pub manifest: &'a SkillManifest,
    pub action: Option<&'a Action>,
}

impl SkillMatch<'_> {
    pub fn skill_id(&self) -> &str {
        &self.manifest.id
    }

    pub fn action_id(&self) -> Option<&str> {
        self.action.map(|a| a.id.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Target {
    Action { skill: usize, action: usize },
    Skill(usize),
}

impl Target {
    fn skill(self) -> usize {
        match self {
            Target::Action { skill, .. } | Target::Skill(skill) => skill,
        }
    }
}

/// Registered skills, in registration order.
#[derive(Debug, Default)]
pub struct SkillRegistry {
    manifests: Vec<SkillManifest>,
    by_id: HashMap<String, usize>,
    intents: HashMap<String, Vec<Target>>,
}

impl SkillRegistry {
    /// Validates the manifests and builds the lookup table.
    ///
    /// Rejects empty or duplicate skill ids, missing names, endpoints that are not
    /// absolute http(s) URLs, and duplicate action ids within one skill. All problems
    /// are reported together.
    pub fn new(manifests: Vec<SkillManifest>) -> Result<Self, SkillBridgeError> {
        let problems = validate(&manifests);
        if !problems.is_empty() {
            return Err(SkillBridgeError::Manifest(problems.join("; ")));
        }

        let mut by_id = HashMap::with_capacity(manifests.len());
        let mut intents: HashMap<String, Vec<Target>> = HashMap::new();

        for (skill, manifest) in manifests.iter().enumerate() {
            by_id.insert(manifest.id.clone(), skill);

            for (index, action) in manifest.actions.iter().enumerate() {
                let target = Target::Action {
                    skill,
                    action: index,
                };
                for key in intent_keys(action) {
                    let entry = intents.entry(key).or_default();
                    if !entry.contains(&target) {
                        entry.push(target);
                    }
                }
            }
            intents
                .entry(manifest.id.clone())
                .or_default()
                .push(Target::Skill(skill));
        }

        debug!(
            skills = manifests.len(),
            intents = intents.len(),
            "skill registry built"
        );

        Ok(Self {
            manifests,
            by_id,
            intents,
        })
    }

    /// Resolves a recognizer intent to a skill.
    ///
    /// Returns `None` when no manifest claims the intent. When several manifests
    /// claim it the first registered one wins and the collision is logged; the
    /// tie-break is not a product decision and should not be relied upon.
    pub fn lookup(&self, intent: &str) -> Option<SkillMatch<'_>> {
        let targets = self.intents.get(intent)?;
        let first = *targets.first()?;

        let mut claimants: Vec<&str> = Vec::new();
        let mut seen = HashSet::new();
        for target in targets {
            if seen.insert(target.skill()) {
                claimants.push(&self.manifests[target.skill()].id);
            }
        }
        if claimants.len() > 1 {
            warn!(
                intent,
                claimants = ?claimants,
                selected = claimants[0],
                "intent claimed by more than one skill, using first registered"
            );
        }

        Some(self.resolve(first))
    }

    /// Manifest by skill id.
    pub fn get(&self, skill_id: &str) -> Option<&SkillManifest> {
        self.by_id.get(skill_id).map(|&i| &self.manifests[i])
    }

    /// Manifest by skill id, as an error when absent.
    pub fn require(&self, skill_id: &str) -> Result<&SkillManifest, SkillBridgeError> {
        self.get(skill_id)
            .ok_or_else(|| SkillBridgeError::SkillNotFound {
                skill_id: skill_id.to_string(),
            })
    }

    pub fn manifests(&self) -> &[SkillManifest] {
        &self.manifests
    }

    pub fn len(&self) -> usize {
        self.manifests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.manifests.is_empty()
    }

    fn resolve(&self, target: Target) -> SkillMatch<'_> {
        match target {
            Target::Action { skill, action } => {
                let manifest = &self.manifests[skill];
                SkillMatch {
                    manifest,
                    action: manifest.actions.get(action),
                }
            }
            Target::Skill(skill) => SkillMatch {
                manifest: &self.manifests[skill],
                action: None,
            },
        }
    }
}

/// Every intent string that selects `action`. Mirrors [`Action::answers_intent`].
fn intent_keys(action: &Action) -> Vec<String> {
    let mut keys = vec![action.id.clone()];
    for source in action
        .definition
        .triggers
        .utterance_sources
        .iter()
        .flat_map(|s| s.source.iter())
    {
        keys.push(source.clone());
        if let Some((_, intent)) = source.split_once('#') {
            keys.push(intent.to_string());
        }
    }
    keys.sort();
    keys.dedup();
    keys
}

fn validate(manifests: &[SkillManifest]) -> Vec<String> {
    let mut problems = Vec::new();
    let mut ids = HashSet::new();

    for (i, manifest) in manifests.iter().enumerate() {
        let label = if manifest.id.is_empty() {
            format!("skills[{i}]")
        } else {
            format!("skill `{}`", manifest.id)
        };

        if manifest.id.trim().is_empty() {
            problems.push(format!("{label}: id must not be empty"));
        } else if !ids.insert(manifest.id.as_str()) {
            problems.push(format!("{label}: duplicate skill id"));
        }

        if manifest.name.trim().is_empty() {
            problems.push(format!("{label}: name must not be empty"));
        }

        match url::Url::parse(&manifest.endpoint) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {}
            Ok(url) => problems.push(format!(
                "{label}: endpoint scheme `{}` is not http or https",
                url.scheme()
            )),
            Err(e) => problems.push(format!(
                "{label}: endpoint `{}` is not a valid URL ({e})",
                manifest.endpoint
            )),
        }

        let mut action_ids = HashSet::new();
        for action in &manifest.actions {
            if !action_ids.insert(action.id.as_str()) {
                problems.push(format!("{label}: duplicate action id `{}`", action.id));
            }
        }
    }

    problems
}

#[cfg(test)]
mod tests {
    use super::*;
    use skillbridge_core::manifest::{ActionDefinition, Triggers, UtteranceSources};

    fn manifest(id: &str, actions: &[(&str, &[&str])]) -> SkillManifest {
        SkillManifest {
            id: id.to_string(),
            name: format!("{id} skill"),
            description: None,
            icon_url: None,
            msa_app_id: format!("{id}-app"),
            endpoint: format!("https://{id}.example.com/api/skill/messages"),
            authentication_connections: vec![],
            actions: actions
                .iter()
                .map(|(action_id, sources)| Action {
                    id: action_id.to_string(),
                    definition: ActionDefinition {
                        description: None,
                        slots: vec![],
                        triggers: Triggers {
                            utterances: vec![],
                            utterance_sources: vec![UtteranceSources {
                                locale: "en".into(),
                                source: sources.iter().map(|s| s.to_string()).collect(),
                            }],
                            events: vec![],
                        },
                    },
                })
                .collect(),
        }
    }

    #[test]
    fn lookup_by_action_id() {
        let registry =
            SkillRegistry::new(vec![manifest("testSkill", &[("testSkill/testAction", &[])])])
                .unwrap();
        let found = registry.lookup("testSkill/testAction").unwrap();
        assert_eq!(found.skill_id(), "testSkill");
        assert_eq!(found.action_id(), Some("testSkill/testAction"));
    }

    #[test]
    fn lookup_by_utterance_source_and_fragment() {
        let registry = SkillRegistry::new(vec![manifest(
            "calendarSkill",
            &[("calendarSkill/createEvent", &["Calendar#CreateCalendarEntry"])],
        )])
        .unwrap();
        assert_eq!(
            registry.lookup("Calendar#CreateCalendarEntry").unwrap().action_id(),
            Some("calendarSkill/createEvent")
        );
        assert_eq!(
            registry.lookup("CreateCalendarEntry").unwrap().action_id(),
            Some("calendarSkill/createEvent")
        );
    }

    #[test]
    fn lookup_by_skill_id_selects_no_action() {
        let registry =
            SkillRegistry::new(vec![manifest("emailSkill", &[("emailSkill/send", &[])])]).unwrap();
        let found = registry.lookup("emailSkill").unwrap();
        assert_eq!(found.skill_id(), "emailSkill");
        assert!(found.action.is_none());
    }

    #[test]
    fn unknown_intent_is_none() {
        let registry =
            SkillRegistry::new(vec![manifest("emailSkill", &[("emailSkill/send", &[])])]).unwrap();
        assert!(registry.lookup("l_General").is_none());
        assert!(registry.lookup("").is_none());
    }

    #[test]
    fn ambiguous_intent_resolves_to_first_registered() {
        let registry = SkillRegistry::new(vec![
            manifest("first", &[("first/act", &["Shared#Intent"])]),
            manifest("second", &[("second/act", &["Shared#Intent"])]),
        ])
        .unwrap();
        assert_eq!(registry.lookup("Intent").unwrap().skill_id(), "first");
    }

    #[tracing_test::traced_test]
    #[test]
    fn ambiguous_intent_is_logged() {
        let registry = SkillRegistry::new(vec![
            manifest("first", &[("first/act", &["Shared#Intent"])]),
            manifest("second", &[("second/act", &["Shared#Intent"])]),
        ])
        .unwrap();
        registry.lookup("Shared#Intent");
        assert!(logs_contain("claimed by more than one skill"));
        assert!(logs_contain("second"));
    }

    #[test]
    fn duplicate_ids_and_bad_endpoints_reported_together() {
        let mut bad = manifest("dup", &[("dup/a", &[]), ("dup/a", &[])]);
        bad.endpoint = "ftp://dup.example.com".into();
        let err = SkillRegistry::new(vec![manifest("dup", &[]), bad]).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("duplicate skill id"), "{msg}");
        assert!(msg.contains("duplicate action id"), "{msg}");
        assert!(msg.contains("not http or https"), "{msg}");
    }

    #[test]
    fn require_reports_missing_skill() {
        let registry = SkillRegistry::new(vec![]).unwrap();
        assert!(registry.is_empty());
        assert!(matches!(
            registry.require("nope"),
            Err(SkillBridgeError::SkillNotFound { .. })
        ));
    }
}
