//! Raw audit record wire shape.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// One audit entry as emitted by the exporter.
///
/// Exports are schema-variable: field spellings differ between retrieval
/// paths, strings are sometimes numbers, and the payload arrives either as
/// a nested object or as a JSON-encoded string. Every field tolerates
/// absence so a sparse record still deserializes.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawRecord {
    /// Record identifier.
    #[serde(default, alias = "Identity", deserialize_with = "lenient_string")]
    pub id: String,
    /// Record type name, keyed to the originating workload.
    #[serde(default, deserialize_with = "lenient_string")]
    pub record_type: String,
    /// Operation name.
    #[serde(default, alias = "Operations", deserialize_with = "lenient_string")]
    pub operation: String,
    /// Creation timestamp, UTC, ISO-8601-like text.
    #[serde(default, alias = "CreationDate", deserialize_with = "lenient_string")]
    pub creation_time: String,
    /// Actor identifier.
    #[serde(default, alias = "UserIds", deserialize_with = "lenient_string")]
    pub user_id: String,
    /// Operation-specific detail: object, or JSON-encoded string.
    #[serde(default, alias = "Payload")]
    pub audit_data: Option<Value>,
}

/// Accept strings, numbers and booleans where a string is expected; null
/// and absence degrade to empty.
fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s,
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(other) => other.to_string(),
    })
}
