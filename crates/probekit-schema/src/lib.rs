//! The fixed schema every input definition must satisfy before typed decode.
//!
//! The document lives in `assets/input.schema.json` and is embedded into the
//! binary. [`Schema::compile`] is called once at startup; the resulting handle
//! is immutable and shared by reference across arbitrarily many concurrent
//! readers.

#![forbid(unsafe_code)]

use serde_json::Value;
use std::fmt;

/// The embedded draft-07 schema document, verbatim.
pub const INPUT_SCHEMA: &str = include_str!("../assets/input.schema.json");

#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error("embedded schema document is not valid JSON")]
    Parse(#[source] serde_json::Error),

    #[error("embedded schema document does not compile: {0}")]
    Compile(String),
}

/// A single structural violation reported against the document's actual shape.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Violation {
    /// JSON-pointer into the offending document ("" for the root).
    pub instance_path: String,
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.instance_path.is_empty() {
            f.write_str(&self.message)
        } else {
            write!(f, "{}: {}", self.instance_path, self.message)
        }
    }
}

/// The compiled input-definition schema.
pub struct Schema {
    validator: jsonschema::Validator,
}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Schema(probekit.input.v1)")
    }
}

impl Schema {
    /// Parse and compile the embedded schema document.
    pub fn compile() -> Result<Self, SchemaError> {
        let value: Value = serde_json::from_str(INPUT_SCHEMA).map_err(SchemaError::Parse)?;
        let validator =
            jsonschema::draft7::new(&value).map_err(|e| SchemaError::Compile(e.to_string()))?;
        Ok(Self { validator })
    }

    /// Validate `instance`, returning every violation in the order the
    /// validator discovers them (depth-first over the document). Empty means
    /// the instance is structurally valid.
    pub fn validate(&self, instance: &Value) -> Vec<Violation> {
        self.validator
            .iter_errors(instance)
            .map(|err| Violation {
                instance_path: err.instance_path().to_string(),
                message: err.to_string(),
            })
            .collect()
    }

    pub fn is_valid(&self, instance: &Value) -> bool {
        self.validator.is_valid(instance)
    }
}
