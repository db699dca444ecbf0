use serde_json::json;
use tinyc_test::compare::compare_ast;

#[test]
fn identical_trees_are_equal() {
    let tree = json!({
        "type": "Program",
        "body": [
            {"type": "Return", "value": {"type": "IntLiteral", "value": 0}}
        ]
    });
    let comparison = compare_ast(&tree, &tree.clone());
    assert!(comparison.is_equal());
    assert!(comparison.differences.is_empty());
}

#[test]
fn location_values_are_ignored_when_fields_are_present() {
    let expected = json!({
        "type": "Program",
        "body": [{"type": "Return", "location": {"line": 1, "col": 1}}]
    });
    let actual = json!({
        "type": "Program",
        "body": [{"type": "Return", "location": {"line": 5, "col": 9}}]
    });
    let comparison = compare_ast(&expected, &actual);
    assert!(comparison.is_equal(), "{:?}", comparison.differences);
}

#[test]
fn missing_location_field_is_reported() {
    let expected = json!({"type": "Return", "location": {"line": 1, "col": 1}});
    let actual = json!({"type": "Return", "location": {"line": 1}});
    let comparison = compare_ast(&expected, &actual);
    assert_eq!(
        comparison.differences,
        vec!["location: Missing location fields: col".to_string()]
    );
}

#[test]
fn extra_location_fields_are_tolerated() {
    let expected = json!({"type": "Return", "location": {"line": 1}});
    let actual = json!({"type": "Return", "location": {"line": 3, "col": 7, "file": "x.tc"}});
    assert!(compare_ast(&expected, &actual).is_equal());
}

#[test]
fn non_object_location_is_a_malformed_location_difference() {
    let expected = json!({"location": {"line": 1}});
    let actual = json!({"location": 42});
    let comparison = compare_ast(&expected, &actual);
    assert_eq!(
        comparison.differences,
        vec!["location: Expected location object but got number".to_string()]
    );
}

#[test]
fn array_length_mismatch_is_a_single_difference() {
    let expected = json!({"a": [1, 2]});
    let actual = json!({"a": [1]});
    let comparison = compare_ast(&expected, &actual);
    assert_eq!(
        comparison.differences,
        vec!["a: Array length mismatch - expected 2, got 1".to_string()]
    );
}

#[test]
fn extra_keys_are_a_single_difference() {
    let expected = json!({"x": 1});
    let actual = json!({"x": 1, "y": 2});
    let comparison = compare_ast(&expected, &actual);
    assert!(!comparison.is_equal());
    assert_eq!(comparison.differences, vec![": Extra keys: y".to_string()]);
}

#[test]
fn missing_keys_are_reported_at_the_current_path() {
    let expected = json!({"node": {"type": "Return", "value": 0}});
    let actual = json!({"node": {"type": "Return"}});
    let comparison = compare_ast(&expected, &actual);
    assert_eq!(
        comparison.differences,
        vec!["node: Missing keys: value".to_string()]
    );
}

#[test]
fn nested_paths_use_dots_and_indices() {
    let expected = json!({"a": {"b": [{"c": 1}]}});
    let actual = json!({"a": {"b": [{"c": 2}]}});
    let comparison = compare_ast(&expected, &actual);
    assert_eq!(
        comparison.differences,
        vec!["a.b[0].c: Value mismatch - expected 1, got 2".to_string()]
    );
}

#[test]
fn scalar_array_elements_are_compared_directly() {
    let expected = json!({"names": ["x", "y"]});
    let actual = json!({"names": ["x", "z"]});
    let comparison = compare_ast(&expected, &actual);
    assert_eq!(
        comparison.differences,
        vec!["names[1]: Value mismatch - expected y, got z".to_string()]
    );
}

#[test]
fn type_mismatched_pair_falls_through_to_value_mismatch() {
    let expected = json!({"a": 1});
    let actual = json!({"a": [1]});
    let comparison = compare_ast(&expected, &actual);
    assert_eq!(
        comparison.differences,
        vec!["a: Value mismatch - expected 1, got [1]".to_string()]
    );
}

#[test]
fn all_differences_are_accumulated_without_short_circuiting() {
    let expected = json!({"type": "Program", "kind": "tu", "count": 2});
    let actual = json!({"type": "Module", "kind": "unit", "count": 2});
    let comparison = compare_ast(&expected, &actual);
    assert_eq!(comparison.differences.len(), 2);
    // Deterministic key order: sorted object keys.
    assert_eq!(
        comparison.differences,
        vec![
            "kind: Value mismatch - expected tu, got unit".to_string(),
            "type: Value mismatch - expected Program, got Module".to_string(),
        ]
    );
}

#[test]
fn missing_and_extra_keys_do_not_stop_shared_key_recursion() {
    let expected = json!({"only_expected": 1, "shared": {"v": 1}});
    let actual = json!({"only_actual": 2, "shared": {"v": 2}});
    let comparison = compare_ast(&expected, &actual);
    assert_eq!(
        comparison.differences,
        vec![
            ": Missing keys: only_expected".to_string(),
            ": Extra keys: only_actual".to_string(),
            "shared.v: Value mismatch - expected 1, got 2".to_string(),
        ]
    );
}
