//! Defaulting accessors over an untyped JSON payload.
//!
//! GitHub payloads are large and vary by event and action, and a partial or
//! malformed body must still be acknowledged. Every accessor here takes an
//! explicit default and short-circuits to it on a missing key or a type
//! mismatch at any level of the path.

use serde_json::Value;
use tracing::warn;

/// Decode a raw request body into a JSON tree.
///
/// Empty or unparseable bodies decode to [`Value::Null`], which every
/// accessor below treats as "all fields absent".
pub fn decode_body(body: &[u8]) -> Value {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Value::Null;
    }

    match serde_json::from_slice(body) {
        Ok(value) => value,
        Err(e) => {
            warn!(
                error = %e,
                body_len = body.len(),
                "Webhook body is not valid JSON; using empty payload"
            );
            Value::Null
        }
    }
}

/// Follow `path` through nested objects.
///
/// Returns `None` as soon as a segment is missing or the current node is not
/// an object.
pub fn lookup<'a>(value: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter()
        .try_fold(value, |node, key| node.as_object()?.get(*key))
}

/// String at `path`, or `default` when absent or not a string
pub fn str_or<'a>(value: &'a Value, path: &[&str], default: &'a str) -> &'a str {
    lookup(value, path)
        .and_then(Value::as_str)
        .unwrap_or(default)
}

/// String at `path`, or `None` when absent or not a string
pub fn opt_str(value: &Value, path: &[&str]) -> Option<String> {
    lookup(value, path)
        .and_then(Value::as_str)
        .map(str::to_string)
}

/// Unsigned integer at `path`, or `None` when absent or not an unsigned integer
pub fn opt_u64(value: &Value, path: &[&str]) -> Option<u64> {
    lookup(value, path).and_then(Value::as_u64)
}

/// Array at `path`, or an empty slice when absent or not an array
pub fn array_or_empty<'a>(value: &'a Value, path: &[&str]) -> &'a [Value] {
    lookup(value, path)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

#[cfg(test)]
#[path = "payload_tests.rs"]
mod tests;
