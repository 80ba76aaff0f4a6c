//! Attribute flattening
//!
//! ClickHouse stores attributes as `Map(LowCardinality(String), String)`, so every
//! attribute bag is reduced to a flat string-to-string map before it reaches a row.

use std::collections::HashMap;

use opentelemetry_proto::tonic::common::v1::{AnyValue, KeyValue, any_value};

/// Flattened attribute map, one entry per source attribute
pub type FlatAttributes = HashMap<String, String>;

/// Flatten an OTLP attribute list into a string map.
///
/// String values are copied verbatim. Every other value type (bool, int, double,
/// array, kvlist, bytes, or no value at all) is stored as the empty string; the key
/// is kept either way.
pub fn flatten_attributes(attrs: &[KeyValue]) -> FlatAttributes {
    attrs
        .iter()
        .map(|kv| (kv.key.clone(), string_or_blank(kv.value.as_ref())))
        .collect()
}

/// String value of an attribute, blank for any non-string type.
///
/// No wildcard arm: a new `any_value::Value` variant must be classified here.
fn string_or_blank(value: Option<&AnyValue>) -> String {
    let Some(value) = value.and_then(|v| v.value.as_ref()) else {
        return String::new();
    };

    match value {
        any_value::Value::StringValue(s) => s.clone(),
        any_value::Value::BoolValue(_)
        | any_value::Value::IntValue(_)
        | any_value::Value::DoubleValue(_)
        | any_value::Value::ArrayValue(_)
        | any_value::Value::KvlistValue(_)
        | any_value::Value::BytesValue(_) => String::new(),
    }
}

/// Sorted `(key, value)` pairs for a ClickHouse `Map` column
pub fn map_entries(attrs: &FlatAttributes) -> Vec<(String, String)> {
    let mut entries: Vec<(String, String)> = attrs
        .iter()
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();
    entries.sort_unstable_by(|a, b| a.0.cmp(&b.0));
    entries
}
