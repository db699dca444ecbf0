//! Orchestration: dispatches each test configuration through the run-type
//! registry, invokes the compiler, and applies the matching check. Strictly
//! sequential; per-test isolation matters more than throughput here.

use crate::classify;
use crate::compare;
use crate::compiler::{Compiler, PhaseOutput};
use crate::schema::SchemaValidator;
use crate::types::{ConfigResult, Expectation, Summary, TestCase, TestConfiguration};
use indexmap::IndexMap;
use serde_json::Value;
use tracing::debug;

/// Result of one check, before it is tied back to its test case.
#[derive(Debug, Clone)]
pub struct Check {
    pub passed: bool,
    pub detail: Option<String>,
    pub differences: Vec<String>,
    pub schema_errors: Vec<String>,
}

impl Check {
    fn pass() -> Self {
        Self {
            passed: true,
            detail: None,
            differences: Vec::new(),
            schema_errors: Vec::new(),
        }
    }

    fn fail(detail: impl Into<String>) -> Self {
        Self {
            passed: false,
            detail: Some(detail.into()),
            differences: Vec::new(),
            schema_errors: Vec::new(),
        }
    }

    fn fail_with(detail: impl Into<String>, differences: Vec<String>) -> Self {
        Self {
            passed: false,
            detail: Some(detail.into()),
            differences,
            schema_errors: Vec::new(),
        }
    }

    fn fail_schema(errors: Vec<String>) -> Self {
        Self {
            passed: false,
            detail: Some("Schema validation failed".to_string()),
            differences: Vec::new(),
            schema_errors: errors,
        }
    }
}

pub type CheckFn = fn(&TestConfiguration, &PhaseOutput, &SchemaValidator) -> Check;

pub struct RunTypeEntry {
    pub phase_flag: String,
    pub check: CheckFn,
}

/// Open-ended run-type vocabulary: adding a run type is one `register` call,
/// nothing in the parser or comparator changes.
pub struct Registry {
    entries: IndexMap<String, RunTypeEntry>,
}

impl Registry {
    pub fn empty() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }

    pub fn register(&mut self, run_type: &str, phase_flag: &str, check: CheckFn) {
        self.entries.insert(
            run_type.to_string(),
            RunTypeEntry {
                phase_flag: phase_flag.to_string(),
                check,
            },
        );
    }

    pub fn get(&self, run_type: &str) -> Option<&RunTypeEntry> {
        self.entries.get(run_type)
    }

    pub fn run_types(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

impl Default for Registry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register("parser", "--parse", check_structural);
        registry.register("lexer", "--lex", check_structural);
        registry.register("exec", "--run", check_execution);
        registry
    }
}

/// Structural run types: SUCCESS compares the decoded AST, ERROR classifies
/// the diagnostic text.
fn check_structural(config: &TestConfiguration, out: &PhaseOutput, schema: &SchemaValidator) -> Check {
    match &config.expectation {
        Expectation::Error => check_error(config, out),
        Expectation::Literal(value) => check_literal(value, out),
        Expectation::Success => {
            let Some(expected) = config.expected_result.as_deref().filter(|s| !s.is_empty()) else {
                // A data error in the test file, not a harness bug.
                return Check::fail("Missing expected output for SUCCESS test");
            };

            // Non-JSON output is a distinct failure mode from a
            // wrong-but-parseable AST.
            let actual: Value = match serde_json::from_str(&out.output) {
                Ok(value) => value,
                Err(e) => return Check::fail(format!("Invalid JSON output: {e}")),
            };

            let (valid, errors) = schema.validate(&actual);
            if !valid {
                return Check::fail_schema(errors);
            }

            let expected: Value = match serde_json::from_str(expected) {
                Ok(value) => value,
                Err(e) => return Check::fail(format!("Expected RESULT is not valid JSON: {e}")),
            };

            let comparison = compare::compare_ast(&expected, &actual);
            if comparison.is_equal() {
                Check::pass()
            } else {
                Check::fail_with("Structural comparison failed", comparison.differences)
            }
        }
    }
}

/// Execution run types: a literal expectation (or a SUCCESS with a RESULT)
/// names an exact output or a numeric exit code; a bare SUCCESS requires
/// exit code 0.
fn check_execution(config: &TestConfiguration, out: &PhaseOutput, _schema: &SchemaValidator) -> Check {
    match &config.expectation {
        Expectation::Error => check_error(config, out),
        Expectation::Literal(value) => check_literal(value, out),
        Expectation::Success => match config.expected_result.as_deref().filter(|s| !s.is_empty()) {
            Some(expected) => check_literal(expected, out),
            None => {
                if out.exit_code == 0 {
                    Check::pass()
                } else {
                    Check::fail(format!("Expected exit code 0, got {}", out.exit_code))
                }
            }
        },
    }
}

fn check_error(config: &TestConfiguration, out: &PhaseOutput) -> Check {
    let Some(kind) = &config.error_kind else {
        return Check::fail("ERROR expectation without an ERROR_TYPE directive");
    };
    match classify::validate_error_output(kind, &out.output) {
        Ok(()) => Check::pass(),
        Err(message) => Check::fail(message),
    }
}

fn check_literal(expected: &str, out: &PhaseOutput) -> Check {
    if let Ok(code) = expected.parse::<i32>() {
        return if out.exit_code == code {
            Check::pass()
        } else {
            Check::fail(format!("Expected exit code {code}, got {}", out.exit_code))
        };
    }
    if out.output == expected {
        Check::pass()
    } else {
        Check::fail(format!("Expected output {expected:?}, got {:?}", out.output))
    }
}

fn result_for(case: &TestCase, config: &TestConfiguration, check: Check, actual: String) -> ConfigResult {
    ConfigResult {
        test_name: case.name.clone(),
        run_type: config.run_type.clone(),
        expecting: config.expectation.label(),
        passed: check.passed,
        detail: check.detail,
        differences: check.differences,
        schema_errors: check.schema_errors,
        expected: config.expected_result.clone(),
        actual,
    }
}

fn run_configuration<C: Compiler>(
    compiler: &C,
    registry: &Registry,
    schema: &SchemaValidator,
    case: &TestCase,
    config: &TestConfiguration,
) -> ConfigResult {
    let Some(entry) = registry.get(&config.run_type) else {
        return result_for(
            case,
            config,
            Check::fail(format!("Unknown run type '{}'", config.run_type)),
            String::new(),
        );
    };

    let out = match compiler.run_phase(&entry.phase_flag, &case.source_code) {
        Ok(out) => out,
        Err(e) => {
            return result_for(
                case,
                config,
                Check::fail(format!("Compiler invocation failed: {e:#}")),
                String::new(),
            );
        }
    };

    // A SUCCESS-expecting run that produced nothing and exited non-zero is a
    // tooling failure; further validation would only mislead.
    if out.output.is_empty() && out.exit_code != 0 && config.expectation == Expectation::Success {
        return result_for(
            case,
            config,
            Check::fail(format!("Compiler failed with exit code {}", out.exit_code)),
            out.output,
        );
    }

    let check = (entry.check)(config, &out, schema);
    result_for(case, config, check, out.output)
}

/// Runs every configuration of one test case, in file-declaration order.
pub fn run_case<C: Compiler>(
    compiler: &C,
    registry: &Registry,
    schema: &SchemaValidator,
    case: &TestCase,
) -> Vec<ConfigResult> {
    debug!(test = %case.name, configurations = case.configurations.len(), "running test case");
    case.configurations
        .iter()
        .map(|config| run_configuration(compiler, registry, schema, case, config))
        .collect()
}

/// Runs all test cases sequentially and aggregates pass/fail totals.
pub fn run_cases<C: Compiler>(
    compiler: &C,
    registry: &Registry,
    schema: &SchemaValidator,
    cases: &[TestCase],
) -> Summary {
    let mut summary = Summary::default();
    for case in cases {
        for result in run_case(compiler, registry, schema, case) {
            summary.record(result);
        }
    }
    summary
}
