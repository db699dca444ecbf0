use serde::Serialize;

/// What a configuration expects from the compiler invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Expectation {
    Success,
    Error,
    /// Anything else: an exact output or a numeric exit code, interpreted
    /// by the run type's check.
    Literal(String),
}

impl Expectation {
    pub fn parse(value: &str) -> Self {
        match value {
            "SUCCESS" => Self::Success,
            "ERROR" => Self::Error,
            other => Self::Literal(other.to_string()),
        }
    }

    pub fn label(&self) -> String {
        match self {
            Self::Success => "SUCCESS".to_string(),
            Self::Error => "ERROR".to_string(),
            Self::Literal(value) => value.clone(),
        }
    }
}

/// One (run type, expectation, result, error kind) tuple describing a single
/// check against the test file's source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TestConfiguration {
    pub run_type: String,
    pub expectation: Expectation,
    pub expected_result: Option<String>,
    pub error_kind: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TestCase {
    pub name: String,
    pub description: String,
    pub source_code: String,
    /// Insertion order from the file, preserved for deterministic reporting.
    pub configurations: Vec<TestConfiguration>,
}

/// Outcome of checking one configuration.
#[derive(Debug, Clone, Serialize)]
pub struct ConfigResult {
    pub test_name: String,
    pub run_type: String,
    pub expecting: String,
    pub passed: bool,
    /// Headline failure explanation, when there is one.
    pub detail: Option<String>,
    /// Complete structural difference list; display is bounded, this is not.
    pub differences: Vec<String>,
    /// Schema violations found before comparison, when a schema is loaded.
    pub schema_errors: Vec<String>,
    pub expected: Option<String>,
    pub actual: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Summary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub results: Vec<ConfigResult>,
}

impl Summary {
    pub fn record(&mut self, result: ConfigResult) {
        self.total += 1;
        if result.passed {
            self.passed += 1;
        } else {
            self.failed += 1;
        }
        self.results.push(result);
    }
}
