// SPDX-FileCopyrightText: 2026 Skillbridge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Telemetry sink that emits tracing events.

use skillbridge_core::TelemetryClient;
use tracing::{error, info};

/// Writes telemetry to the `skillbridge::telemetry` tracing target.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingTelemetry;

fn render(properties: &[(&str, &str)]) -> String {
    properties
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join(" ")
}

impl TelemetryClient for TracingTelemetry {
    fn track_event(&self, name: &str, properties: &[(&str, &str)]) {
        info!(
            target: "skillbridge::telemetry",
            event = name,
            properties = %render(properties),
            "telemetry event"
        );
    }

    fn track_exception(
        &self,
        error: &(dyn std::error::Error + 'static),
        properties: &[(&str, &str)],
    ) {
        error!(
            target: "skillbridge::telemetry",
            error = %error,
            properties = %render(properties),
            "telemetry exception"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn properties_render_as_pairs() {
        assert_eq!(render(&[("skill", "a"), ("action", "b")]), "skill=a action=b");
        assert_eq!(render(&[]), "");
    }
}
