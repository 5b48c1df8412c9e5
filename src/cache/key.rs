//! Cache key derivation
//!
//! A key is a stable serialization of {url, lower-cased method, query params,
//! JSON body}. Two structurally equal requests must always produce the same
//! key regardless of how the caller ordered object properties, so maps are
//! serialized with sorted keys rather than insertion order: params live in a
//! `BTreeMap` and JSON bodies pass through a recursive key-sorting writer.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::client::Method;

/// Unique identifier for a cached response
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub struct CacheKey(String);

impl CacheKey {
    /// Derive the key for a request descriptor.
    ///
    /// Format: `method:url` with `?params` appended when params are present
    /// and `|body` appended when a body is present, both as canonical JSON.
    pub fn derive(
        method: Method,
        url: &str,
        params: &BTreeMap<String, String>,
        body: Option<&Value>,
    ) -> Self {
        let mut key = String::with_capacity(url.len() + 16);
        key.push_str(method.as_str());
        key.push(':');
        key.push_str(url);

        if !params.is_empty() {
            key.push('?');
            // BTreeMap iterates in key order, so this is already canonical
            key.push_str(&serde_json::to_string(params).unwrap_or_default());
        }

        if let Some(body) = body {
            key.push('|');
            key.push_str(&canonical_json(body));
        }

        CacheKey(key)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Serialize a JSON value with object keys sorted at every nesting level.
///
/// Independent of whether `serde_json` was built with `preserve_order`, so
/// key stability cannot be broken by feature unification in a downstream
/// dependency tree.
pub fn canonical_json(value: &Value) -> String {
    let mut out = String::new();
    write_canonical(value, &mut out);
    out
}

fn write_canonical(value: &Value, out: &mut String) {
    match value {
        Value::Object(map) => {
            let sorted: BTreeMap<&String, &Value> = map.iter().collect();
            out.push('{');
            for (i, (key, val)) in sorted.into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push_str(&Value::String(key.clone()).to_string());
                out.push(':');
                write_canonical(val, out);
            }
            out.push('}');
        }
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(item, out);
            }
            out.push(']');
        }
        scalar => out.push_str(&scalar.to_string()),
    }
}
