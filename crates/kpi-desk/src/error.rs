//! Error types for the KPI desk
//!
//! [`DeskError`] aggregates the per-crate errors. Only validation failures
//! are recoverable; the interactive flow reports them and asks again.

use kpi_access::AccessError;
use kpi_form::{FormError, ValidationError};
use kpi_literal::ParseError;
use kpi_store::{SchemaError, StoreError};

/// Main desk error type
#[derive(Debug, thiserror::Error)]
pub enum DeskError {
    /// Table IO, format or write-back failure
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Lookup or allow-list failure
    #[error("access error: {0}")]
    Access(#[from] AccessError),

    /// Form building or schema check failure
    #[error("form error: {0}")]
    Form(#[from] FormError),

    /// Stored values of a record are not a literal mapping
    #[error("values of {key} are malformed: {source}")]
    Values {
        /// Record key
        key: String,
        /// Underlying error
        #[source]
        source: ParseError,
    },

    /// Rejected user input
    #[error("invalid input: {0}")]
    Validation(#[from] ValidationError),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),
}

/// Broad class of a [`DeskError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Unknown user, role, KPI, date or schema
    NotFound,
    /// Undecodable literal, table or field
    Parse,
    /// Rejected input; recoverable
    Validation,
    /// Unknown type tag
    UnsupportedType,
    /// Unusable field constraint
    InvalidConstraint,
    /// Stored values disagree with the schema
    SchemaViolation,
    /// Row changed underneath the writer
    VersionConflict,
    /// File system failure
    Io,
    /// Bad configuration
    Config,
}

impl DeskError {
    /// Classify the error
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Store(StoreError::Read { .. } | StoreError::Write { .. }) => ErrorCategory::Io,
            Self::Store(StoreError::VersionConflict { .. }) => ErrorCategory::VersionConflict,
            Self::Store(
                StoreError::Format { .. }
                | StoreError::MissingColumn { .. }
                | StoreError::InvalidField { .. },
            )
            | Self::Values { .. }
            | Self::Access(
                AccessError::AllowList { .. }
                | AccessError::AllowListItem { .. }
                | AccessError::Schema(_),
            ) => ErrorCategory::Parse,
            Self::Access(_) => ErrorCategory::NotFound,
            Self::Form(FormError::UnsupportedType { .. }) => ErrorCategory::UnsupportedType,
            Self::Form(FormError::InvalidConstraint { .. }) => ErrorCategory::InvalidConstraint,
            Self::Form(FormError::SchemaViolation { .. }) => ErrorCategory::SchemaViolation,
            Self::Validation(_) => ErrorCategory::Validation,
            Self::Config(_) => ErrorCategory::Config,
        }
    }

    /// Check if the error ends the current action
    #[inline]
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        self.category() != ErrorCategory::Validation
    }

    /// Check if the error is a lost optimistic-concurrency race
    #[inline]
    #[must_use]
    pub fn is_conflict(&self) -> bool {
        self.category() == ErrorCategory::VersionConflict
    }
}

impl From<SchemaError> for DeskError {
    fn from(err: SchemaError) -> Self {
        Self::Access(AccessError::Schema(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_is_the_only_recoverable_kind() {
        let invalid = DeskError::from(ValidationError::NotANumber {
            input: "abc".into(),
            kind: "integer",
        });
        assert!(!invalid.is_fatal());

        let missing = DeskError::from(AccessError::RoleNotFound { role_id: 3 });
        assert!(missing.is_fatal());
        assert_eq!(missing.category(), ErrorCategory::NotFound);
    }

    #[test]
    fn conflict_is_classified() {
        let err = DeskError::from(StoreError::VersionConflict {
            key: "K1@2024-01-01".into(),
            expected: "abc".into(),
            actual: "def".into(),
        });
        assert!(err.is_conflict());
        assert!(err.is_fatal());
    }

    #[test]
    fn schema_metadata_errors_are_parse_errors() {
        let err = DeskError::from(SchemaError::MissingType { field: "x".into() });
        assert_eq!(err.category(), ErrorCategory::Parse);

        let violation = DeskError::from(FormError::SchemaViolation {
            field: "x".into(),
            message: "expected int, found string".into(),
        });
        assert_eq!(violation.category(), ErrorCategory::SchemaViolation);
    }
}
