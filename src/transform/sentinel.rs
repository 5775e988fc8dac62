//! Sentinel-field removal.
//!
//! Master-data tables encode "no value" as the string `"0"`. Every consumer
//! strips those fields with the same rule, applied at every depth.

use serde_json::Value;

/// The sentinel string the master-data tables use for "absent".
pub const ZERO_SENTINEL: &str = "0";

/// Remove every object field whose value is exactly the string `sentinel`.
///
/// Arrays and objects are walked recursively. Only object fields are removed;
/// array elements and non-string values (including the number `0`) are kept.
#[must_use]
pub fn strip_sentinel(value: Value, sentinel: &str) -> Value {
    match value {
        Value::Array(items) => Value::Array(
            items
                .into_iter()
                .map(|item| strip_sentinel(item, sentinel))
                .collect(),
        ),
        Value::Object(fields) => Value::Object(
            fields
                .into_iter()
                .filter(|(_, v)| v.as_str() != Some(sentinel))
                .map(|(k, v)| (k, strip_sentinel(v, sentinel)))
                .collect(),
        ),
        other => other,
    }
}

/// [`strip_sentinel`] with [`ZERO_SENTINEL`].
#[must_use]
pub fn strip_zero_props(value: Value) -> Value {
    strip_sentinel(value, ZERO_SENTINEL)
}
