// SPDX-FileCopyrightText: 2026 Skillbridge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Skill registry for skillbridge.
//!
//! This crate provides:
//! - [`SkillRegistry`]: immutable manifest set with intent lookup
//! - [`load_manifests`]: JSON manifest file loading
//!
//! The registry is constructed once at process start and passed by `Arc` to the
//! dialog layer; it is never mutated afterwards.

pub mod loader;
pub mod registry;

pub use loader::{load_manifests, parse_manifests};
pub use registry::{SkillMatch, SkillRegistry};
