// SPDX-FileCopyrightText: 2026 Skillbridge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Builds the `semanticAction` that starts a skill, filling declared slots from
//! what the assistant already knows about the user.

use serde_json::{Map, Value};
use skillbridge_core::activity::SKILL_START;
use skillbridge_core::{Entity, SemanticAction, SkillBridgeError, SkillManifest, Slot};

/// Creates the semantic action for invoking `manifest`.
///
/// With an action id, the action must exist and only its slots are considered;
/// the state is set to [`SKILL_START`]. Without one, every distinct slot of the
/// skill is considered. A slot is filled from `seed` first, then `context`;
/// values for undeclared slots are never sent.
pub fn build_semantic_action(
    manifest: &SkillManifest,
    action_id: Option<&str>,
    context: &Map<String, Value>,
    seed: &Map<String, Value>,
) -> Result<SemanticAction, SkillBridgeError> {
    let action_id = action_id.map(str::trim).filter(|id| !id.is_empty());

    let (slots, state): (Vec<&Slot>, _) = match action_id {
        Some(id) => {
            let action = manifest
                .action(id)
                .ok_or_else(|| SkillBridgeError::ActionNotFound {
                    skill_id: manifest.id.clone(),
                    action_id: id.to_string(),
                })?;
            (
                action.definition.slots.iter().collect(),
                Some(SKILL_START.to_string()),
            )
        }
        None => (manifest.distinct_slots(), None),
    };

    let entities = slots
        .into_iter()
        .filter_map(|slot| {
            seed.get(&slot.name)
                .or_else(|| context.get(&slot.name))
                .map(|value| (slot.name.clone(), Entity::from_value(value.clone())))
        })
        .collect();

    Ok(SemanticAction {
        id: action_id.unwrap_or_default().to_string(),
        state,
        entities,
    })
}
