//! Field-level validation errors surfaced to API callers.
//!
//! Every rejected record produces an ordered list of `(field, message)`
//! pairs. The caller owns the translation into a protocol-level response.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Placeholder field name for violations of the record as a whole,
/// e.g. a raw value that is not a JSON object.
pub const ROOT_FIELD: &str = "__root__";

/// The closed set of rule violations a field can produce.
///
/// Message text is fixed per violation so callers can match on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Violation {
    /// A required field is absent or null.
    MissingRequiredField,
    /// A string field holds a non-string value.
    NotAString,
    /// An email field fails the address grammar.
    InvalidEmailFormat,
    /// A string field is shorter than its minimum character count.
    TooShort { min: usize },
    /// An enum field holds a value outside the declared member set.
    InvalidEnumMember {
        permitted: &'static [&'static str],
    },
    /// A supplied update field is null or empty.
    EmptyUpdateField,
    /// An integer field holds a value that cannot be read as an integer.
    NotAnInteger,
    /// A UUID field holds an unparseable value.
    InvalidUuid,
    /// A timestamp field holds an unparseable value.
    InvalidTimestamp,
    /// A list field holds a non-array value.
    NotAList,
    /// The record itself is not a JSON object.
    NotAnObject,
}

impl Violation {
    /// Renders the human-readable message for this violation on `field`.
    pub fn message(&self, field: &str) -> String {
        match self {
            Violation::MissingRequiredField => "field required".to_string(),
            Violation::NotAString => "str type expected".to_string(),
            Violation::InvalidEmailFormat => {
                "value is not a valid email address".to_string()
            }
            Violation::TooShort { min } => {
                format!("ensure this value has at least {min} characters")
            }
            Violation::InvalidEnumMember { permitted } => {
                let members = permitted
                    .iter()
                    .map(|member| format!("'{member}'"))
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("value is not a valid enumeration member; permitted: {members}")
            }
            Violation::EmptyUpdateField => format!("{field} cannot be None."),
            Violation::NotAnInteger => "value is not a valid integer".to_string(),
            Violation::InvalidUuid => "value is not a valid uuid".to_string(),
            Violation::InvalidTimestamp => "invalid datetime format".to_string(),
            Violation::NotAList => "value is not a valid list".to_string(),
            Violation::NotAnObject => "value is not a valid dict".to_string(),
        }
    }
}

/// One violated rule: the offending field and a human-readable reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// An ordered collection of field-level errors for one record.
///
/// Errors accumulate in schema declaration order; validation never stops at
/// the first violation. Serializes as a JSON array of `{field, message}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a violation against `field`.
    pub fn push(&mut self, field: &str, violation: Violation) {
        self.0.push(FieldError {
            message: violation.message(field),
            field: field.to_string(),
        });
    }

    /// Absorbs errors from a nested record, dotted under `prefix`.
    ///
    /// A nested record-level error keeps just the prefix as its field name.
    pub fn extend_prefixed(&mut self, prefix: &str, nested: ValidationErrors) {
        for error in nested.0 {
            let field = if error.field == ROOT_FIELD {
                prefix.to_string()
            } else {
                format!("{prefix}.{}", error.field)
            };
            self.0.push(FieldError {
                field,
                message: error.message,
            });
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FieldError> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[FieldError] {
        &self.0
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for error in &self.0 {
            if !first {
                write!(f, "; ")?;
            }
            write!(f, "{}: {}", error.field, error.message)?;
            first = false;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

impl IntoIterator for ValidationErrors {
    type Item = FieldError;
    type IntoIter = std::vec::IntoIter<FieldError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// The custom error type for the crate.
#[derive(Debug, Error)]
pub enum Error {
    /// A record was rejected; carries every violated field in order.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    /// A checked record failed to bind to its typed form.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// The field-level error list, if this is a validation failure.
    pub fn validation_errors(&self) -> Option<&ValidationErrors> {
        match self {
            Error::Validation(errors) => Some(errors),
            Error::Serialization(_) => None,
        }
    }
}

/// A type alias for `Result<T, Error>` to simplify function signatures.
pub type Result<T> = std::result::Result<T, Error>;
