// SPDX-FileCopyrightText: 2026 Skillbridge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `skillbridge skills` and `skillbridge check`.

use skillbridge_config::BridgeConfig;
use skillbridge_core::{SkillBridgeError, SkillManifest};
use skillbridge_registry::SkillRegistry;

/// Prints every registered skill with its endpoint and actions.
pub fn run_skills(config: &BridgeConfig) -> Result<(), SkillBridgeError> {
    let registry = SkillRegistry::from_files(&config.skills.manifest_files)?;
    if registry.is_empty() {
        println!("no skills registered (set skills.manifest_files)");
        return Ok(());
    }
    for manifest in registry.manifests() {
        print!("{}", describe(manifest));
    }
    Ok(())
}

/// Loads every manifest and builds the registry without starting anything.
pub fn run_check(config: &BridgeConfig) -> Result<(), SkillBridgeError> {
    let registry = SkillRegistry::from_files(&config.skills.manifest_files)?;
    let actions: usize = registry.manifests().iter().map(|m| m.actions.len()).sum();
    println!(
        "skillbridge: configuration ok ({} skills, {actions} actions)",
        registry.len()
    );
    Ok(())
}

fn describe(manifest: &SkillManifest) -> String {
    let mut out = format!("{} ({})\n  endpoint: {}\n", manifest.id, manifest.name, manifest.endpoint);
    for action in &manifest.actions {
        let slots: Vec<&str> = action
            .definition
            .slots
            .iter()
            .map(|slot| slot.name.as_str())
            .collect();
        if slots.is_empty() {
            out.push_str(&format!("  - {}\n", action.id));
        } else {
            out.push_str(&format!("  - {} [{}]\n", action.id, slots.join(", ")));
        }
    }
    out
}
