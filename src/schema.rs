//! Structural pre-validation of the compiler's AST output against an
//! optional JSON Schema. A schema that cannot be loaded disables validation
//! with a warning; the harness never fails because the schema is absent.

use serde_json::Value;
use std::fs;
use std::path::Path;
use tracing::warn;

pub struct SchemaValidator {
    validator: Option<jsonschema::Validator>,
}

impl SchemaValidator {
    pub fn disabled() -> Self {
        Self { validator: None }
    }

    pub fn load(path: &Path) -> Self {
        let schema: Value = match fs::read_to_string(path) {
            Ok(text) => match serde_json::from_str(&text) {
                Ok(value) => value,
                Err(e) => {
                    warn!(schema = %path.display(), error = %e, "schema is not valid JSON, schema validation disabled");
                    return Self::disabled();
                }
            },
            Err(e) => {
                warn!(schema = %path.display(), error = %e, "could not read schema, schema validation disabled");
                return Self::disabled();
            }
        };
        match jsonschema::validator_for(&schema) {
            Ok(validator) => Self {
                validator: Some(validator),
            },
            Err(e) => {
                warn!(schema = %path.display(), error = %e, "could not compile schema, schema validation disabled");
                Self::disabled()
            }
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.validator.is_some()
    }

    /// Returns `(is_valid, errors)`. A disabled validator accepts everything.
    pub fn validate(&self, instance: &Value) -> (bool, Vec<String>) {
        let Some(validator) = &self.validator else {
            return (true, Vec::new());
        };
        let errors: Vec<String> = validator
            .iter_errors(instance)
            .map(|error| {
                let path = dotted_path(&error.instance_path.to_string());
                if path.is_empty() {
                    error.to_string()
                } else {
                    format!("At {path}: {error}")
                }
            })
            .collect();
        (errors.is_empty(), errors)
    }
}

// "/body/0/type" -> "body.0.type"
fn dotted_path(pointer: &str) -> String {
    pointer.trim_start_matches('/').replace('/', ".")
}
