// SPDX-FileCopyrightText: 2026 Skillbridge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Fire-and-forget telemetry sink.

/// Receives named events and exceptions. Calls never fail and never block on I/O.
pub trait TelemetryClient: Send + Sync + 'static {
    fn track_event(&self, name: &str, properties: &[(&str, &str)]);

    fn track_exception(&self, error: &(dyn std::error::Error + 'static), properties: &[(&str, &str)]);
}
