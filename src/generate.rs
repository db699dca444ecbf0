//! The producer side of the test-file format: renders directives and source
//! into the on-disk layout the directive parser reads back.

use crate::types::{Expectation, TestConfiguration};
use anyhow::{Context, Result};
use serde_json::Value;

/// Renders a complete test file: marker, INFO, one directive block per
/// configuration, a separating blank line, then the program source.
pub fn render_test_file(description: &str, configurations: &[TestConfiguration], source: &str) -> String {
    let mut out = String::new();
    out.push_str("// TINYC TEST\n");
    out.push_str(&format!("// INFO: {description}\n"));
    for config in configurations {
        out.push_str(&format!("// RUN: {}\n", config.run_type));
        out.push_str(&format!("// EXPECT: {}\n", config.expectation.label()));
        if config.expectation == Expectation::Error {
            if let Some(kind) = &config.error_kind {
                out.push_str(&format!("// ERROR_TYPE: {kind}\n"));
            }
        } else if let Some(result) = &config.expected_result {
            out.push_str(&format!("// RESULT: {result}\n"));
        }
    }
    out.push('\n');
    out.push_str(source);
    out
}

/// RESULT directives are read verbatim as one line, so expected JSON must be
/// compacted before it is rendered. This is the load-bearing end of that
/// format constraint.
pub fn compact_json(text: &str) -> Result<String> {
    let value: Value = serde_json::from_str(text).context("expected output is not valid JSON")?;
    Ok(value.to_string())
}
