//! Test-file format parser.
//!
//! A test file is an optional run of blank lines, a `// TINYC TEST` marker
//! line, a directive region, and the program source. The parser is a single
//! forward scan: once the first non-blank, non-directive line is seen, that
//! line and everything after it is source code verbatim — a line that merely
//! looks like a directive inside the program body stays code.

use crate::classify;
use crate::types::{Expectation, TestCase, TestConfiguration};
use anyhow::{bail, Result};
use tracing::warn;

pub const TEST_FILE_MARKER: &str = "// TINYC TEST";

/// True when the content begins (after leading whitespace) with the marker.
pub fn is_test_file(content: &str) -> bool {
    content.trim_start().starts_with(TEST_FILE_MARKER)
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Directive {
    Info(String),
    Run(String),
    Expect(String),
    ExpectedResult(String),
    ErrorType(String),
}

/// Recognizes `// <TAG>: <value>` for the known tags. The value is read
/// verbatim as a single line (ends trimmed), so RESULT payloads must be
/// pre-compacted by the producer.
fn parse_directive(line: &str) -> Option<Directive> {
    let rest = line.strip_prefix("// ")?;
    let (tag, value) = rest.split_once(':')?;
    let value = value.trim().to_string();
    match tag {
        "INFO" => Some(Directive::Info(value)),
        "RUN" => Some(Directive::Run(value)),
        "EXPECT" => Some(Directive::Expect(value)),
        "RESULT" => Some(Directive::ExpectedResult(value)),
        "ERROR_TYPE" => Some(Directive::ErrorType(value)),
        _ => None,
    }
}

/// Parses a test file into its ordered configurations and residual source.
///
/// Fails when the marker is absent or when no configuration is recoverable
/// at all; malformed individual blocks are skipped with a warning instead.
pub fn parse_test_file(name: &str, content: &str) -> Result<TestCase> {
    let lines: Vec<&str> = content.lines().collect();
    let mut directives = Vec::new();
    let mut source_code = String::new();

    let mut idx = 0;
    // Leading whitespace before the marker is tolerated.
    while idx < lines.len() && lines[idx].trim().is_empty() {
        idx += 1;
    }
    if idx >= lines.len() || !lines[idx].trim_start().starts_with(TEST_FILE_MARKER) {
        bail!("missing `{TEST_FILE_MARKER}` header");
    }
    idx += 1;

    while idx < lines.len() {
        let line = lines[idx];
        if line.trim().is_empty() {
            // Blank lines between directives and before the code are dropped.
            idx += 1;
            continue;
        }
        match parse_directive(line) {
            Some(directive) => {
                directives.push(directive);
                idx += 1;
            }
            None => {
                // Code starts here and runs to EOF.
                source_code = lines[idx..].join("\n");
                break;
            }
        }
    }

    let description = directives
        .iter()
        .find_map(|d| match d {
            Directive::Info(value) => Some(value.clone()),
            _ => None,
        })
        .unwrap_or_default();

    let has_run = directives.iter().any(|d| matches!(d, Directive::Run(_)));
    let configurations = if has_run {
        collect_run_blocks(name, &directives)
    } else {
        legacy_configuration(name, &directives)?
    };

    Ok(TestCase {
        name: name.to_string(),
        description,
        source_code,
        configurations,
    })
}

#[derive(Debug, Default)]
struct Block {
    run_type: String,
    expect: Option<String>,
    result: Option<String>,
    error_type: Option<String>,
}

/// Each RUN directive opens a block extending to the next RUN or the end of
/// the directive region.
fn collect_run_blocks(name: &str, directives: &[Directive]) -> Vec<TestConfiguration> {
    let mut configurations = Vec::new();
    let mut block: Option<Block> = None;

    for directive in directives {
        match directive {
            Directive::Run(run_type) => {
                if let Some(finished) = block.take() {
                    finish_block(name, finished, &mut configurations);
                }
                block = Some(Block {
                    run_type: run_type.clone(),
                    ..Block::default()
                });
            }
            Directive::Expect(value) => {
                if let Some(block) = &mut block {
                    if block.expect.is_none() {
                        block.expect = Some(value.clone());
                    } else {
                        warn!(test = name, "duplicate EXPECT in configuration block, keeping the first");
                    }
                }
            }
            Directive::ExpectedResult(value) => {
                if let Some(block) = &mut block {
                    block.result = Some(value.clone());
                }
            }
            Directive::ErrorType(value) => {
                if let Some(block) = &mut block {
                    block.error_type = Some(value.clone());
                }
            }
            Directive::Info(_) => {}
        }
    }
    if let Some(finished) = block.take() {
        finish_block(name, finished, &mut configurations);
    }

    configurations
}

fn finish_block(name: &str, block: Block, out: &mut Vec<TestConfiguration>) {
    let Some(expect) = block.expect else {
        warn!(
            test = name,
            run_type = %block.run_type,
            "configuration block has no EXPECT directive, skipping"
        );
        return;
    };
    let expectation = Expectation::parse(&expect);
    let error_kind = if expectation == Expectation::Error {
        block.error_type
    } else {
        None
    };
    out.push(TestConfiguration {
        run_type: block.run_type,
        expectation,
        expected_result: block.result,
        error_kind,
    });
}

/// Backward-compatible single-configuration format: a top-level EXPECT whose
/// value is either a known error kind or an expected-success marker.
fn legacy_configuration(name: &str, directives: &[Directive]) -> Result<Vec<TestConfiguration>> {
    let Some(expect) = directives.iter().find_map(|d| match d {
        Directive::Expect(value) => Some(value.as_str()),
        _ => None,
    }) else {
        bail!("no RUN or EXPECT directives found");
    };

    if classify::is_known_kind(expect) {
        return Ok(vec![TestConfiguration {
            run_type: "parser".to_string(),
            expectation: Expectation::Error,
            expected_result: None,
            error_kind: Some(expect.to_string()),
        }]);
    }

    if expect != "SUCCESS" {
        warn!(test = name, expect, "unrecognized EXPECT value, treating as a success expectation");
    }
    let result = directives.iter().find_map(|d| match d {
        Directive::ExpectedResult(value) => Some(value.clone()),
        _ => None,
    });
    Ok(vec![TestConfiguration {
        run_type: "parser".to_string(),
        expectation: Expectation::Success,
        expected_result: result,
        error_kind: None,
    }])
}
