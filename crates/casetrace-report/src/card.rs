//! Per-event display cards.
//!
//! Completeness is the controlling goal: every property present in the
//! payload appears in the rendered body. Nothing is flattened into fixed
//! columns because payload shape varies per operation type.

use casetrace_types::ClassifiedEvent;
use chrono::{DateTime, FixedOffset, Utc};
use serde_json::Value;

use crate::html::{Element, Node};

/// Render a UTC instant in the given local offset, with the offset spelled
/// out so the report is unambiguous wherever it is later viewed.
pub fn format_local(timestamp: DateTime<Utc>, offset: FixedOffset) -> String {
    timestamp
        .with_timezone(&offset)
        .format("%Y-%m-%d %H:%M:%S %:z")
        .to_string()
}

/// Render one event as a display card.
///
/// Header: local time, operation, actor, workload and intent badges.
/// Body: every payload property in original order; nested structures as
/// collapsible JSON blocks; unparsed payload as a single "Raw Data" entry.
pub fn render_card(classified: &ClassifiedEvent, offset: FixedOffset) -> Node {
    let event = &classified.event;
    let time_text = match event.timestamp {
        Some(timestamp) => format_local(timestamp, offset),
        None => "(no timestamp)".to_string(),
    };

    let header = Element::new("header")
        .child(Element::new("span").class("time").text(time_text))
        .child(Element::new("span").class("op").text(op_text(&event.operation)))
        .child(Element::new("span").class("actor").text(actor_text(&event.actor)))
        .child(
            Element::new("span")
                .class("badge workload")
                .text(classified.workload.to_string()),
        )
        .child(
            Element::new("span")
                .class("badge intent")
                .text(classified.intent.to_string()),
        );

    Element::new("article")
        .class("card")
        .child(header)
        .child(render_body(event))
        .into()
}

fn op_text(operation: &str) -> &str {
    if operation.is_empty() {
        "(no operation)"
    } else {
        operation
    }
}

fn actor_text(actor: &str) -> &str {
    if actor.is_empty() {
        "(unknown actor)"
    } else {
        actor
    }
}

fn render_body(event: &casetrace_types::NormalizedEvent) -> Node {
    match (&event.payload, &event.raw_payload) {
        (Some(payload), _) => {
            let mut list = Element::new("dl").class("props");
            for (key, value) in payload {
                list = list
                    .child(Element::new("dt").text(key.clone()))
                    .child(Element::new("dd").child(render_value(key, value)));
            }
            list.into()
        }
        (None, Some(raw)) => Element::new("dl")
            .class("props unparsed")
            .child(Element::new("dt").text("Raw Data"))
            .child(Element::new("dd").child(Element::new("pre").text(raw.clone())))
            .into(),
        (None, None) => Element::new("p")
            .class("empty")
            .text("No payload recorded for this event.")
            .into(),
    }
}

/// Render one payload value by shape: scalars inline, nested mappings and
/// sequences as a collapsible block holding their full JSON serialization.
fn render_value(key: &str, value: &Value) -> Node {
    match value {
        Value::Object(_) | Value::Array(_) => {
            let pretty = serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string());
            Element::new("details")
                .child(Element::new("summary").text(summary_text(key, value)))
                .child(Element::new("pre").text(pretty))
                .into()
        }
        Value::Null => Element::new("span").class("null").text("null").into(),
        Value::String(text) => Node::text(text.clone()),
        scalar => Node::text(scalar.to_string()),
    }
}

fn summary_text(key: &str, value: &Value) -> String {
    match value {
        Value::Object(map) => format!("{key} ({} properties)", map.len()),
        Value::Array(items) => format!("{key} ({} items)", items.len()),
        _ => key.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use casetrace_classify::classify_event;
    use casetrace_types::{parse_utc, NormalizedEvent};

    fn sample(payload_json: Option<&str>, raw: Option<&str>) -> ClassifiedEvent {
        let payload = payload_json.map(|text| {
            match serde_json::from_str::<Value>(text).unwrap() {
                Value::Object(map) => map,
                _ => panic!("payload fixture must be an object"),
            }
        });
        classify_event(NormalizedEvent {
            id: "e-1".to_string(),
            record_type: "SharePointFileOperation".to_string(),
            operation: "FileAccessed".to_string(),
            timestamp: parse_utc("2024-01-15T10:00:00Z"),
            actor: "alex@contoso.com".to_string(),
            payload,
            raw_payload: raw.map(str::to_string),
        })
    }

    #[test]
    fn known_instant_renders_in_fixed_offset() {
        let timestamp = parse_utc("2024-01-15T10:00:00Z").unwrap();
        let plus_one = FixedOffset::east_opt(3600).unwrap();
        assert_eq!(
            format_local(timestamp, plus_one),
            "2024-01-15 11:00:00 +01:00"
        );
        let minus_five = FixedOffset::west_opt(5 * 3600).unwrap();
        assert_eq!(
            format_local(timestamp, minus_five),
            "2024-01-15 05:00:00 -05:00"
        );
    }

    #[test]
    fn header_carries_time_operation_actor_workload() {
        let card = sample(None, None);
        let markup = render_card(&card, FixedOffset::east_opt(0).unwrap()).render();
        assert!(markup.contains("2024-01-15 10:00:00 +00:00"));
        assert!(markup.contains("FileAccessed"));
        assert!(markup.contains("alex@contoso.com"));
        assert!(markup.contains("File Activity"));
        assert!(markup.contains("Access/Read"));
    }

    #[test]
    fn body_is_lossless_for_structured_payloads() {
        let card = sample(
            Some(r#"{"ObjectId": "doc.docx", "ClientIP": "203.0.113.7", "Extra": {"A": 1}, "Tags": [1, 2]}"#),
            None,
        );
        let markup = render_card(&card, FixedOffset::east_opt(0).unwrap()).render();
        for key in ["ObjectId", "ClientIP", "Extra", "Tags"] {
            assert_eq!(
                markup.matches(&format!("<dt>{key}</dt>")).count(),
                1,
                "{key} must appear exactly once"
            );
        }
    }

    #[test]
    fn nested_values_become_collapsible_blocks() {
        let card = sample(Some(r#"{"Extra": {"A": 1, "B": 2}}"#), None);
        let markup = render_card(&card, FixedOffset::east_opt(0).unwrap()).render();
        assert!(markup.contains("<details>"));
        assert!(markup.contains("Extra (2 properties)"));
        assert!(markup.contains("&quot;A&quot;: 1"));
    }

    #[test]
    fn unparsed_payload_falls_back_to_raw_data() {
        let card = sample(None, Some("{broken"));
        let markup = render_card(&card, FixedOffset::east_opt(0).unwrap()).render();
        assert!(markup.contains("<dt>Raw Data</dt>"));
        assert!(markup.contains("{broken"));
    }

    #[test]
    fn missing_payload_renders_explicit_notice() {
        let card = sample(None, None);
        let markup = render_card(&card, FixedOffset::east_opt(0).unwrap()).render();
        assert!(markup.contains("No payload recorded"));
    }

    #[test]
    fn scalar_values_are_escaped() {
        let card = sample(Some(r#"{"Note": "<img src=x onerror=alert(1)>"}"#), None);
        let markup = render_card(&card, FixedOffset::east_opt(0).unwrap()).render();
        assert!(!markup.contains("<img"));
        assert!(markup.contains("&lt;img"));
    }

    #[test]
    fn undated_event_is_marked() {
        let mut card = sample(None, None);
        card.event.timestamp = None;
        let markup = render_card(&card, FixedOffset::east_opt(0).unwrap()).render();
        assert!(markup.contains("(no timestamp)"));
    }
}
