use serde_json::Value;

use crate::path;

/// Deterministically flattens a nested value into an ordered list of
/// addressable leaf paths and a delimiter-free message string.
///
/// Arrays recurse in element order with an `[index]` suffix; objects recurse
/// in insertion order with a `['key']` suffix; any other leaf appends its
/// path to `fields` and its canonical text to `message`.
///
/// Null leaves and leaves with empty canonical text are silently omitted:
/// they contribute no field path and no message bytes, so two values
/// differing only in such a leaf canonicalize identically. Verifiers rely on
/// the same policy when replaying a stored field list.
pub(crate) fn walk(path: &str, value: &Value, fields: &mut Vec<String>, message: &mut String) {
    match value {
        Value::Null => {}
        Value::Array(elements) => {
            for (index, element) in elements.iter().enumerate() {
                walk(&format!("{path}[{index}]"), element, fields, message);
            }
        }
        Value::Object(entries) => {
            for (key, entry) in entries {
                walk(&format!("{path}['{key}']"), entry, fields, message);
            }
        }
        leaf => {
            if let Some(text) = scalar_text(leaf) {
                if !text.is_empty() {
                    fields.push(path.to_owned());
                    message.push_str(&text);
                }
            }
        }
    }
}

/// Canonical string form of a scalar leaf: strings as-is, booleans as
/// `true`/`false`, numbers in their shortest decimal form. Null and
/// composites have no canonical text.
pub(crate) fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Rebuilds the signable message by resolving each stored field path against
/// a value tree.
///
/// Paths are lower-cased before resolution — the intentional asymmetry of
/// the header format: paths are recorded case-sensitively at signing time
/// but replayed lower-cased, and already-issued signatures depend on it.
/// Unparsable, unresolvable, null or composite resolutions contribute
/// nothing, matching the canonicalizer's omission policy.
pub(crate) fn rebuild_message(fields: &[String], tree: &Value) -> String {
    let mut message = String::new();
    for field in fields {
        let Ok(segments) = path::parse(&field.to_lowercase()) else {
            continue;
        };
        let Some(resolved) = path::resolve(tree, &segments) else {
            continue;
        };
        if let Some(text) = scalar_text(resolved) {
            message.push_str(&text);
        }
    }
    message
}
