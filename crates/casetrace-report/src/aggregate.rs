//! Summary statistics over the classified event set.

use std::collections::HashMap;
use std::hash::Hash;

use casetrace_types::{ClassifiedEvent, Workload};
use tracing::debug;

/// Bound on the top-operations and top-sources listings.
pub const TOP_N: usize = 10;

/// Payload keys that may carry the source address, in lookup order.
const SOURCE_KEYS: &[&str] = &["ClientIP", "ClientIPAddress", "ActorIpAddress"];

/// Counts derived from one filtered, classified event set.
///
/// Recomputed per run; never persisted independently of the report.
#[derive(Debug, Clone, Default)]
pub struct AggregateSummary {
    /// Total event count.
    pub total: usize,
    /// Count per workload, descending, first-seen tie-break.
    pub by_workload: Vec<(Workload, usize)>,
    /// Most frequent operations, bounded by [`TOP_N`].
    pub top_operations: Vec<(String, usize)>,
    /// Most frequent source addresses, bounded by [`TOP_N`].
    pub top_sources: Vec<(String, usize)>,
}

/// Compute summary statistics. Purely additive; input events are untouched.
pub fn summarize(events: &[ClassifiedEvent]) -> AggregateSummary {
    let by_workload = ranked(events.iter().map(|e| e.workload));

    let mut top_operations = ranked(
        events
            .iter()
            .filter(|e| !e.event.operation.is_empty())
            .map(|e| e.event.operation.clone()),
    );
    top_operations.truncate(TOP_N);

    // Events without a source address stay in every other aggregation.
    let mut top_sources = ranked(events.iter().filter_map(source_address));
    top_sources.truncate(TOP_N);

    debug!(
        total = events.len(),
        workloads = by_workload.len(),
        "summary computed"
    );
    AggregateSummary {
        total: events.len(),
        by_workload,
        top_operations,
        top_sources,
    }
}

/// Source address of one event, if its payload carries a known key.
fn source_address(event: &ClassifiedEvent) -> Option<String> {
    let payload = event.event.payload.as_ref()?;
    SOURCE_KEYS.iter().find_map(|key| {
        payload
            .get(*key)
            .and_then(|value| value.as_str())
            .map(str::trim)
            .filter(|address| !address.is_empty())
            .map(str::to_string)
    })
}

/// Count keys and rank them descending; the stable sort keeps ties in
/// first-seen order.
fn ranked<K: Eq + Hash + Clone>(keys: impl Iterator<Item = K>) -> Vec<(K, usize)> {
    let mut order: Vec<K> = Vec::new();
    let mut counts: HashMap<K, usize> = HashMap::new();
    for key in keys {
        if !counts.contains_key(&key) {
            order.push(key.clone());
        }
        *counts.entry(key).or_insert(0) += 1;
    }
    let mut ranked: Vec<(K, usize)> = order
        .into_iter()
        .map(|key| {
            let count = counts[&key];
            (key, count)
        })
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use casetrace_classify::classify_event;
    use casetrace_types::{parse_utc, NormalizedEvent};
    use serde_json::Value;

    fn event(record_type: &str, operation: &str, client_ip: Option<&str>) -> ClassifiedEvent {
        let payload = client_ip.map(|ip| {
            let mut map = serde_json::Map::new();
            map.insert("ClientIP".to_string(), Value::String(ip.to_string()));
            map
        });
        classify_event(NormalizedEvent {
            id: "e".to_string(),
            record_type: record_type.to_string(),
            operation: operation.to_string(),
            timestamp: parse_utc("2024-01-15T10:00:00Z"),
            actor: "alex@contoso.com".to_string(),
            payload,
            raw_payload: None,
        })
    }

    #[test]
    fn counts_by_workload_descending() {
        let events = vec![
            event("ExchangeItem", "MailItemsAccessed", None),
            event("SharePointFileOperation", "FileAccessed", None),
            event("SharePointFileOperation", "FileModified", None),
        ];
        let summary = summarize(&events);
        assert_eq!(summary.total, 3);
        assert_eq!(summary.by_workload[0], (Workload::FileActivity, 2));
        assert_eq!(summary.by_workload[1], (Workload::Exchange, 1));
    }

    #[test]
    fn ties_break_by_first_seen_order() {
        let events = vec![
            event("ExchangeItem", "MailItemsAccessed", None),
            event("SharePointFileOperation", "FileAccessed", None),
        ];
        let summary = summarize(&events);
        assert_eq!(summary.by_workload[0].0, Workload::Exchange);
        assert_eq!(summary.by_workload[1].0, Workload::FileActivity);
    }

    #[test]
    fn top_operations_are_bounded() {
        let events: Vec<ClassifiedEvent> = (0..15)
            .map(|i| event("ExchangeItem", &format!("Op{i}"), None))
            .collect();
        let summary = summarize(&events);
        assert_eq!(summary.top_operations.len(), TOP_N);
    }

    #[test]
    fn missing_source_address_only_skips_that_aggregation() {
        let events = vec![
            event("ExchangeItem", "MailItemsAccessed", Some("203.0.113.7")),
            event("ExchangeItem", "MailItemsAccessed", None),
        ];
        let summary = summarize(&events);
        assert_eq!(summary.total, 2);
        assert_eq!(summary.top_sources, vec![("203.0.113.7".to_string(), 1)]);
    }

    #[test]
    fn alternate_source_keys_are_recognized() {
        let mut e = event("AzureActiveDirectoryStsLogon", "UserLoggedIn", None);
        let mut map = serde_json::Map::new();
        map.insert(
            "ActorIpAddress".to_string(),
            Value::String("198.51.100.4".to_string()),
        );
        e.event.payload = Some(map);
        let summary = summarize(&[e]);
        assert_eq!(summary.top_sources[0].0, "198.51.100.4");
    }

    #[test]
    fn empty_set_yields_empty_summary() {
        let summary = summarize(&[]);
        assert_eq!(summary.total, 0);
        assert!(summary.by_workload.is_empty());
        assert!(summary.top_operations.is_empty());
        assert!(summary.top_sources.is_empty());
    }
}
