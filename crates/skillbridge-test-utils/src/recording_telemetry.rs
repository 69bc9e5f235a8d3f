// SPDX-FileCopyrightText: 2026 Skillbridge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Telemetry client that records calls for assertion.

use std::sync::Mutex;

use skillbridge_core::TelemetryClient;

type Properties = Vec<(String, String)>;

fn owned(properties: &[(&str, &str)]) -> Properties {
    properties
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// Captures every event and exception.
#[derive(Debug, Default)]
pub struct RecordingTelemetry {
    events: Mutex<Vec<(String, Properties)>>,
    exceptions: Mutex<Vec<(String, Properties)>>,
}

impl RecordingTelemetry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded `(name, properties)` events.
    pub fn events(&self) -> Vec<(String, Properties)> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }

    /// Names of recorded events, in order.
    pub fn event_names(&self) -> Vec<String> {
        self.events().into_iter().map(|(name, _)| name).collect()
    }

    /// Recorded `(error message, properties)` exceptions.
    pub fn exceptions(&self) -> Vec<(String, Properties)> {
        self.exceptions.lock().map(|e| e.clone()).unwrap_or_default()
    }
}

impl TelemetryClient for RecordingTelemetry {
    fn track_event(&self, name: &str, properties: &[(&str, &str)]) {
        if let Ok(mut events) = self.events.lock() {
            events.push((name.to_string(), owned(properties)));
        }
    }

    fn track_exception(
        &self,
        error: &(dyn std::error::Error + 'static),
        properties: &[(&str, &str)],
    ) {
        if let Ok(mut exceptions) = self.exceptions.lock() {
            exceptions.push((error.to_string(), owned(properties)));
        }
    }
}
