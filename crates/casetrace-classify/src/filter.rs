//! Optional event filtering ahead of classification.

use casetrace_types::NormalizedEvent;
use chrono::{DateTime, Utc};
use tracing::debug;

/// Conjunctive filter criteria supplied by the invoking layer.
///
/// Absent criteria impose no constraint; all supplied criteria must hold.
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    /// Exact record-type match.
    pub record_type: Option<String>,
    /// Exact operation match.
    pub operation: Option<String>,
    /// Case-insensitive substring over the full serialized event.
    pub text: Option<String>,
    /// Inclusive lower bound on the event timestamp.
    pub from: Option<DateTime<Utc>>,
    /// Inclusive upper bound on the event timestamp.
    pub to: Option<DateTime<Utc>>,
}

impl EventFilter {
    /// Whether no criterion is set.
    pub fn is_empty(&self) -> bool {
        self.record_type.is_none()
            && self.operation.is_none()
            && self.text.is_none()
            && self.from.is_none()
            && self.to.is_none()
    }

    /// Whether one event satisfies every supplied criterion.
    pub fn matches(&self, event: &NormalizedEvent) -> bool {
        if let Some(record_type) = &self.record_type {
            if &event.record_type != record_type {
                return false;
            }
        }
        if let Some(operation) = &self.operation {
            if &event.operation != operation {
                return false;
            }
        }
        if self.from.is_some() || self.to.is_some() {
            // Undated events cannot be placed inside a requested window.
            let Some(timestamp) = event.timestamp else {
                return false;
            };
            if self.from.is_some_and(|from| timestamp < from) {
                return false;
            }
            if self.to.is_some_and(|to| timestamp > to) {
                return false;
            }
        }
        if let Some(text) = &self.text {
            // Serialize the whole event so matches buried in nested payload
            // structures are not missed.
            let serialized = match serde_json::to_string(event) {
                Ok(serialized) => serialized,
                Err(_) => return false,
            };
            if !serialized.to_lowercase().contains(&text.to_lowercase()) {
                return false;
            }
        }
        true
    }

    /// Keep the events satisfying every criterion, preserving order.
    pub fn apply(&self, events: Vec<NormalizedEvent>) -> Vec<NormalizedEvent> {
        if self.is_empty() {
            return events;
        }
        let before = events.len();
        let kept: Vec<NormalizedEvent> = events
            .into_iter()
            .filter(|event| self.matches(event))
            .collect();
        debug!(before, after = kept.len(), "filter applied");
        kept
    }

    /// Human-readable description for the report header.
    pub fn describe(&self) -> String {
        let mut parts = Vec::new();
        if let Some(record_type) = &self.record_type {
            parts.push(format!("record type = {record_type}"));
        }
        if let Some(operation) = &self.operation {
            parts.push(format!("operation = {operation}"));
        }
        if let Some(text) = &self.text {
            parts.push(format!("text contains {text:?}"));
        }
        if let Some(from) = &self.from {
            parts.push(format!("from {}", from.format("%Y-%m-%d %H:%M:%S UTC")));
        }
        if let Some(to) = &self.to {
            parts.push(format!("to {}", to.format("%Y-%m-%d %H:%M:%S UTC")));
        }
        if parts.is_empty() {
            "none".to_string()
        } else {
            parts.join(", ")
        }
    }
}
