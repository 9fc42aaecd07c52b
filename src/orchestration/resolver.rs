use crate::orchestration::output_store::OutputStore;
use serde_json::{Map, Value};

/// Recursively rewrites a step's declared inputs, replacing placeholder
/// references with values drawn from prior step outputs.
///
/// A placeholder is a string whose entire content is wrapped in double
/// braces, e.g. `"{{search.output.leads}}"`. The interior is trimmed and
/// split on `.` into a path walked from the store root. Braces embedded
/// inside a larger string are literal text, not references.
///
/// Resolution is pure and total: a missing key (or a non-mapping value where
/// a key lookup is required) degrades to an empty mapping rather than an
/// error, and the store is never mutated.
pub fn resolve(value: &Value, outputs: &OutputStore) -> Value {
    match value {
        Value::Object(map) => Value::Object(Map::from_iter(
            map.iter()
                .map(|(key, nested)| (key.clone(), resolve(nested, outputs))),
        )),
        Value::Array(items) => Value::Array(items.iter().map(|item| resolve(item, outputs)).collect()),
        Value::String(text) => match placeholder_path(text) {
            Some(path) => walk_store(path, outputs),
            None => value.clone(),
        },
        _ => value.clone(),
    }
}

fn placeholder_path(text: &str) -> Option<&str> {
    let interior = text.strip_prefix("{{")?.strip_suffix("}}")?;
    Some(interior.trim())
}

fn walk_store(path: &str, outputs: &OutputStore) -> Value {
    let mut segments = path.split('.');
    let mut current = segments.next().and_then(|first| outputs.entry(first));
    for segment in segments {
        current = match current {
            Some(Value::Object(map)) => map.get(segment),
            _ => None,
        };
    }
    match current {
        Some(value) => value.clone(),
        None => Value::Object(Map::new()),
    }
}
