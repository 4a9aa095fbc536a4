//! Error types for form building and input validation

/// Raw input rejected by a cell
///
/// Always recoverable: the form reports it and asks for the field again.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    /// Not parseable as the cell's number kind
    #[error("'{input}' is not a valid {kind}")]
    NotANumber {
        /// Raw input
        input: String,
        /// Expected number kind
        kind: &'static str,
    },

    /// NaN or infinite decimal
    #[error("'{input}' is not a finite number")]
    NotFinite {
        /// Raw input
        input: String,
    },

    /// Below the declared minimum
    #[error("'{input}' is below the minimum {min}")]
    BelowMin {
        /// Raw input
        input: String,
        /// Declared minimum
        min: String,
    },

    /// Above the declared maximum
    #[error("'{input}' is above the maximum {max}")]
    AboveMax {
        /// Raw input
        input: String,
        /// Declared maximum
        max: String,
    },

    /// Does not match the declared pattern
    #[error("'{input}' does not match pattern '{pattern}'")]
    PatternMismatch {
        /// Raw input
        input: String,
        /// Declared pattern
        pattern: String,
    },

    /// Not a calendar date in the expected format
    #[error("'{input}' is not a date of the form {expected}")]
    NotADate {
        /// Raw input
        input: String,
        /// Expected format
        expected: &'static str,
    },
}

impl ValidationError {
    /// The raw input that was rejected
    #[must_use]
    pub fn input(&self) -> &str {
        match self {
            Self::NotANumber { input, .. }
            | Self::NotFinite { input }
            | Self::BelowMin { input, .. }
            | Self::AboveMax { input, .. }
            | Self::PatternMismatch { input, .. }
            | Self::NotADate { input, .. } => input,
        }
    }
}

/// Errors building a form or checking stored values against it
#[derive(Debug, thiserror::Error)]
pub enum FormError {
    /// No cell factory for the type tag
    #[error("field '{field}' has unsupported type '{tag}'")]
    UnsupportedType {
        /// Field name
        field: String,
        /// Declared type tag
        tag: String,
    },

    /// Constraint options that the cell kind cannot use
    #[error("field '{field}' has an invalid constraint: {message}")]
    InvalidConstraint {
        /// Field name
        field: String,
        /// Description of the problem
        message: String,
    },

    /// Stored values disagree with the schema
    #[error("stored value of '{field}' violates the schema: {message}")]
    SchemaViolation {
        /// Field name
        field: String,
        /// Description of the problem
        message: String,
    },
}

impl FormError {
    /// Create invalid constraint error
    pub fn invalid_constraint(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConstraint {
            field: field.into(),
            message: message.into(),
        }
    }
}
