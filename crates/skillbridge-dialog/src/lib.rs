// SPDX-FileCopyrightText: 2026 Skillbridge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Skill dialog and assistant turn handling for skillbridge.
//!
//! # Components
//!
//! - [`SkillDialog`] - begin / continue / cancel a remote skill, with switch confirmation
//! - [`Assistant`] - per-turn orchestration: recognize, dispatch, persist
//! - [`MemoryStateStore`], [`FileStateStore`] - conversation and user state persistence
//! - [`UtteranceRecognizer`] - local intent recognizer over manifest trigger utterances
//! - [`TracingTelemetry`] - telemetry sink backed by `tracing`

pub mod assistant;
pub mod confirm;
pub mod context;
pub mod dialog;
pub mod recognizer;
pub mod slots;
pub mod state;
pub mod store;
pub mod telemetry;

pub use assistant::{Assistant, AssistantSettings};
pub use context::TurnContext;
pub use dialog::{DialogTurn, SkillDialog, SwitchPrompts};
pub use recognizer::UtteranceRecognizer;
pub use state::{ConversationState, SkillContext, SkillDialogOptions, SkillDialogState};
pub use store::{FileStateStore, MemoryStateStore, state_store_from_config};
pub use telemetry::TracingTelemetry;
