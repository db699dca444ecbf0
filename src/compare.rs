//! Semantic AST comparison over JSON values.
//!
//! Two trees are equal when they have the same structural shape, where
//! `location` sub-objects are compared by key presence only: line/column
//! values vary across correct but differently-implemented parsers, the
//! shape of the metadata does not. The comparator never short-circuits; it
//! always produces the complete difference set and leaves truncation to the
//! caller.

use serde_json::{Map, Value};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Comparison {
    /// Path-qualified differences in deterministic traversal order.
    pub differences: Vec<String>,
}

impl Comparison {
    pub fn is_equal(&self) -> bool {
        self.differences.is_empty()
    }
}

/// Compares an expected AST against the compiler's actual AST.
pub fn compare_ast(expected: &Value, actual: &Value) -> Comparison {
    let differences = match (expected, actual) {
        (Value::Object(expected), Value::Object(actual)) => compare_objects(expected, actual, ""),
        _ => {
            if expected == actual {
                Vec::new()
            } else {
                vec![value_mismatch("", expected, actual)]
            }
        }
    };
    Comparison { differences }
}

fn compare_objects(expected: &Map<String, Value>, actual: &Map<String, Value>, path: &str) -> Vec<String> {
    let mut differences = Vec::new();

    let missing: Vec<&str> = expected
        .keys()
        .filter(|k| !actual.contains_key(*k))
        .map(String::as_str)
        .collect();
    if !missing.is_empty() {
        differences.push(format!("{path}: Missing keys: {}", missing.join(", ")));
    }

    let extra: Vec<&str> = actual
        .keys()
        .filter(|k| !expected.contains_key(*k))
        .map(String::as_str)
        .collect();
    if !extra.is_empty() {
        differences.push(format!("{path}: Extra keys: {}", extra.join(", ")));
    }

    // Shared keys only; missing/extra were already reported above.
    for (key, expected_value) in expected {
        let Some(actual_value) = actual.get(key) else {
            continue;
        };
        let current = if path.is_empty() {
            key.clone()
        } else {
            format!("{path}.{key}")
        };

        if key == "location" {
            differences.extend(compare_locations(expected_value, actual_value, &current));
            continue;
        }

        match (expected_value, actual_value) {
            (Value::Object(e), Value::Object(a)) => {
                differences.extend(compare_objects(e, a, &current));
            }
            (Value::Array(e), Value::Array(a)) => {
                differences.extend(compare_arrays(e, a, &current));
            }
            _ => {
                if expected_value != actual_value {
                    differences.push(value_mismatch(&current, expected_value, actual_value));
                }
            }
        }
    }

    differences
}

/// Location metadata is volatile by design: only the field set is checked,
/// never the values under it.
fn compare_locations(expected: &Value, actual: &Value, path: &str) -> Vec<String> {
    match (expected, actual) {
        (Value::Object(expected), Value::Object(actual)) => {
            let missing: Vec<&str> = expected
                .keys()
                .filter(|k| !actual.contains_key(*k))
                .map(String::as_str)
                .collect();
            if missing.is_empty() {
                Vec::new()
            } else {
                vec![format!("{path}: Missing location fields: {}", missing.join(", "))]
            }
        }
        _ => vec![format!(
            "{path}: Expected location object but got {}",
            json_type_name(actual)
        )],
    }
}

fn compare_arrays(expected: &[Value], actual: &[Value], path: &str) -> Vec<String> {
    if expected.len() != actual.len() {
        // Element-wise comparison of misaligned arrays would only produce noise.
        return vec![format!(
            "{path}: Array length mismatch - expected {}, got {}",
            expected.len(),
            actual.len()
        )];
    }

    let mut differences = Vec::new();
    for (i, (expected_item, actual_item)) in expected.iter().zip(actual).enumerate() {
        let element_path = format!("{path}[{i}]");
        match (expected_item, actual_item) {
            (Value::Object(e), Value::Object(a)) => {
                differences.extend(compare_objects(e, a, &element_path));
            }
            _ => {
                if expected_item != actual_item {
                    differences.push(value_mismatch(&element_path, expected_item, actual_item));
                }
            }
        }
    }
    differences
}

fn value_mismatch(path: &str, expected: &Value, actual: &Value) -> String {
    format!(
        "{path}: Value mismatch - expected {}, got {}",
        render(expected),
        render(actual)
    )
}

// Strings read better unquoted in diagnostics; everything else is compact JSON.
fn render(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
