//! Two-phase input reading: the raw document is parsed generically and checked
//! against the shared schema first, so structural errors are reported against
//! the document's actual shape. Typed decode runs only on documents the schema
//! already accepted.

use crate::input::Input;
use camino::Utf8Path;
use probekit_schema::{Schema, Violation};
use std::fs;

#[derive(Debug, thiserror::Error)]
pub enum ReadError {
    /// File open/read failure, surfaced verbatim.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// The document is not parseable at all; reported before any schema check.
    #[error("malformed document")]
    Malformed(#[source] serde_yaml::Error),

    /// The document parsed but cannot be represented for schema validation
    /// (e.g. non-string mapping keys).
    #[error("document cannot be represented for validation")]
    Unrepresentable(#[source] serde_json::Error),

    /// Structural violations against the input schema, in discovery order.
    #[error("{count} schema violations in input: {first}")]
    Schema {
        count: usize,
        /// The first violation, rendered verbatim.
        first: String,
        violations: Vec<Violation>,
    },

    /// Typed decode failed after the schema accepted the document. The schema
    /// and the type model disagree; never silently defaulted.
    #[error("document passed schema validation but failed to decode")]
    Decode(#[source] serde_yaml::Error),
}

impl ReadError {
    fn schema(violations: Vec<Violation>) -> Self {
        let first = violations
            .first()
            .map(Violation::to_string)
            .unwrap_or_default();
        ReadError::Schema {
            count: violations.len(),
            first,
            violations,
        }
    }
}

/// Read a definition from disk, returning a schema-validated, typed input.
pub fn read_input(path: &Utf8Path, schema: &Schema) -> Result<Input, ReadError> {
    let data = fs::read_to_string(path)?;
    parse_input(&data, schema)
}

/// IO-free variant of [`read_input`] working on in-memory bytes.
pub fn parse_input(data: &str, schema: &Schema) -> Result<Input, ReadError> {
    let raw: serde_yaml::Value = serde_yaml::from_str(data).map_err(ReadError::Malformed)?;
    let generic = serde_json::to_value(&raw).map_err(ReadError::Unrepresentable)?;

    let violations = schema.validate(&generic);
    if !violations.is_empty() {
        return Err(ReadError::schema(violations));
    }

    serde_yaml::from_str(data).map_err(ReadError::Decode)
}
