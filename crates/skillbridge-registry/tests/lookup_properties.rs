// SPDX-FileCopyrightText: 2026 Skillbridge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Property tests for intent lookup.

use std::collections::BTreeSet;

use proptest::prelude::*;
use skillbridge_core::manifest::ActionDefinition;
use skillbridge_core::{Action, SkillManifest};
use skillbridge_registry::SkillRegistry;

fn manifest(id: &str, action_ids: &[String]) -> SkillManifest {
    SkillManifest {
        id: id.to_string(),
        name: id.to_string(),
        description: None,
        icon_url: None,
        msa_app_id: String::new(),
        endpoint: format!("https://{id}.example.com/api/skill/messages"),
        authentication_connections: vec![],
        actions: action_ids
            .iter()
            .map(|a| Action {
                id: a.clone(),
                definition: ActionDefinition::default(),
            })
            .collect(),
    }
}

/// Up to five skills, each owning a disjoint set of intents.
fn partitioned_intents() -> impl Strategy<Value = Vec<Vec<String>>> {
    prop::collection::btree_set("[a-z]{3,8}/[a-z]{3,8}", 1..20).prop_flat_map(|set| {
        let intents: Vec<String> = set.into_iter().collect();
        let len = intents.len();
        prop::collection::vec(0usize..5, len).prop_map(move |owners| {
            let mut buckets = vec![Vec::new(); 5];
            for (intent, owner) in intents.iter().zip(owners) {
                buckets[owner].push(intent.clone());
            }
            buckets
        })
    })
}

fn build(buckets: &[Vec<String>]) -> SkillRegistry {
    let manifests = buckets
        .iter()
        .enumerate()
        .map(|(i, intents)| manifest(&format!("skill{i}"), intents))
        .collect();
    SkillRegistry::new(manifests).expect("generated manifests are valid")
}

proptest! {
    #[test]
    fn intent_in_exactly_one_manifest_resolves_to_it(buckets in partitioned_intents()) {
        let registry = build(&buckets);
        for (i, intents) in buckets.iter().enumerate() {
            for intent in intents {
                let found = registry.lookup(intent).expect("claimed intent resolves");
                prop_assert_eq!(found.skill_id(), format!("skill{i}"));
                prop_assert_eq!(found.action_id(), Some(intent.as_str()));
            }
        }
    }

    #[test]
    fn unclaimed_intent_resolves_to_none(
        buckets in partitioned_intents(),
        probe in "[A-Z][a-z]{2,10}",
    ) {
        let registry = build(&buckets);
        let claimed: BTreeSet<&String> = buckets.iter().flatten().collect();
        prop_assume!(!claimed.contains(&probe));
        prop_assume!(!probe.starts_with("skill"));
        prop_assert!(registry.lookup(&probe).is_none());
    }
}
