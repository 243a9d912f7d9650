//! Normalized and classified event types.

use crate::{Intent, Workload};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

/// Parsed payload: an ordered mapping from property name to a JSON value
/// (scalar, nested mapping, or sequence).
pub type Payload = serde_json::Map<String, Value>;

/// One audit record after normalization.
///
/// Created once by the loader and immutable afterwards. A payload that
/// failed its second parse pass is preserved verbatim in `raw_payload`
/// with `payload` absent; the record itself is never discarded.
#[derive(Debug, Clone, Serialize)]
pub struct NormalizedEvent {
    /// Record identifier from the exporter.
    pub id: String,
    /// Record type name.
    pub record_type: String,
    /// Operation name.
    pub operation: String,
    /// Creation instant, UTC. Absent when the exporter text was unparseable.
    pub timestamp: Option<DateTime<Utc>>,
    /// Actor identifier.
    pub actor: String,
    /// Parsed payload properties in original key order.
    pub payload: Option<Payload>,
    /// Raw payload text, kept whenever structured parsing failed.
    pub raw_payload: Option<String>,
}

impl NormalizedEvent {
    /// Whether the payload arrived but could not be parsed.
    pub fn payload_unparsed(&self) -> bool {
        self.payload.is_none() && self.raw_payload.is_some()
    }
}

/// A normalized event plus its two classification labels.
///
/// The labels are attached exactly once by the classifier; holding them on
/// a separate type keeps unclassified and classified events distinct.
#[derive(Debug, Clone, Serialize)]
pub struct ClassifiedEvent {
    /// The underlying event.
    #[serde(flatten)]
    pub event: NormalizedEvent,
    /// Originating workload surface.
    pub workload: Workload,
    /// Classified operation intent.
    pub intent: Intent,
}

impl ClassifiedEvent {
    /// Creation instant of the underlying event.
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.event.timestamp
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> NormalizedEvent {
        NormalizedEvent {
            id: "e-1".to_string(),
            record_type: "SharePointFileOperation".to_string(),
            operation: "FileAccessed".to_string(),
            timestamp: crate::parse_utc("2024-01-15T10:00:00Z"),
            actor: "alex@contoso.com".to_string(),
            payload: None,
            raw_payload: Some("not json".to_string()),
        }
    }

    #[test]
    fn unparsed_payload_is_detectable() {
        let event = sample();
        assert!(event.payload_unparsed());
    }

    #[test]
    fn serialization_includes_payload_and_labels() {
        let mut event = sample();
        let mut payload = Payload::new();
        payload.insert(
            "SourceFileName".to_string(),
            Value::String("budget.xlsx".to_string()),
        );
        event.payload = Some(payload);
        event.raw_payload = None;

        let classified = ClassifiedEvent {
            event,
            workload: Workload::FileActivity,
            intent: Intent::AccessRead,
        };
        let text = serde_json::to_string(&classified).unwrap();
        assert!(text.contains("budget.xlsx"));
        assert!(text.contains("file_activity"));
        assert!(text.contains("access_read"));
    }
}
