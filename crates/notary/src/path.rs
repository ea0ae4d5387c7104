//! Addressable paths in bracket notation, rooted at `$`:
//! `$['headers']['x-correlation-id']`, `$['body']['evses'][0]['id']`.
//!
//! The syntax is the fixed subset that the canonicalizer produces — object
//! keys as `['key']`, array indices as `[n]` — not a general JSONPath
//! implementation. Two paths are equal iff their string forms are equal.

use serde_json::Value;

use crate::error::NotaryError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Segment {
    Key(String),
    Index(usize),
}

/// Parses a bracket-notation path into its segments.
pub(crate) fn parse(path: &str) -> Result<Vec<Segment>, NotaryError> {
    let mut rest = path
        .strip_prefix('$')
        .ok_or_else(|| bad(path, "missing `$` root"))?;
    let mut segments = Vec::new();
    while !rest.is_empty() {
        if let Some(after) = rest.strip_prefix("['") {
            let end = after
                .find("']")
                .ok_or_else(|| bad(path, "unterminated key segment"))?;
            segments.push(Segment::Key(after[..end].to_owned()));
            rest = &after[end + 2..];
        } else if let Some(after) = rest.strip_prefix('[') {
            let end = after
                .find(']')
                .ok_or_else(|| bad(path, "unterminated index segment"))?;
            let index = after[..end]
                .parse()
                .map_err(|_| bad(path, "index segment is not a number"))?;
            segments.push(Segment::Index(index));
            rest = &after[end + 1..];
        } else {
            return Err(bad(path, "expected a `[` segment"));
        }
    }
    Ok(segments)
}

fn bad(path: &str, reason: &str) -> NotaryError {
    NotaryError::Path(format!("{path}: {reason}"))
}

/// Resolves a parsed path against a value tree. Returns `None` as soon as a
/// segment fails to match, which message rebuilding treats as an omitted
/// field rather than an error.
pub(crate) fn resolve<'a>(tree: &'a Value, segments: &[Segment]) -> Option<&'a Value> {
    let mut current = tree;
    for segment in segments {
        current = match segment {
            Segment::Key(key) => current.get(key.as_str())?,
            Segment::Index(index) => current.get(*index)?,
        };
    }
    Some(current)
}

/// Writes `new_value` into the tree at `segments`, creating missing
/// intermediate containers on the way: objects for key segments and
/// null-padded arrays for index segments. Matches the JSONPath `set`
/// semantics the header format was built on.
pub(crate) fn write(tree: &mut Value, segments: &[Segment], new_value: Value) {
    let mut current = tree;
    for segment in segments {
        current = match segment {
            Segment::Key(key) => key_slot(current, key),
            Segment::Index(index) => index_slot(current, *index),
        };
    }
    *current = new_value;
}

fn key_slot<'a>(node: &'a mut Value, key: &str) -> &'a mut Value {
    if !node.is_object() {
        *node = Value::Object(serde_json::Map::new());
    }
    match node {
        Value::Object(entries) => entries.entry(key.to_owned()).or_insert(Value::Null),
        _ => unreachable!("node was coerced to an object"),
    }
}

fn index_slot(node: &mut Value, index: usize) -> &mut Value {
    if !node.is_array() {
        *node = Value::Array(Vec::new());
    }
    match node {
        Value::Array(elements) => {
            if elements.len() <= index {
                elements.resize(index + 1, Value::Null);
            }
            &mut elements[index]
        }
        _ => unreachable!("node was coerced to an array"),
    }
}
