//! Error types for the record store
//!
//! Covers reading tables, decoding typed fields and schema metadata, and
//! writing a row back.

use kpi_literal::ParseError;
use std::path::PathBuf;

/// Errors raised by table and store operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// IO error reading a table
    #[error("io error reading {path}: {source}")]
    Read {
        /// Table file
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// IO error writing a table
    #[error("io error writing {path}: {source}")]
    Write {
        /// Table file
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Malformed delimited text
    #[error("format error in table '{table}' line {line}: {message}")]
    Format {
        /// Table name
        table: String,
        /// Line number, 1-based
        line: usize,
        /// Description of the problem
        message: String,
    },

    /// Required column absent from the header
    #[error("table '{table}' has no column '{column}'")]
    MissingColumn {
        /// Table name
        table: String,
        /// Column header
        column: String,
    },

    /// A typed field could not be decoded
    #[error("invalid {column} in table '{table}' row {row}: {message}")]
    InvalidField {
        /// Table name
        table: String,
        /// Data row index, 0-based
        row: usize,
        /// Column header
        column: String,
        /// Description of the problem
        message: String,
    },

    /// Row changed on disk since it was read
    #[error("version conflict for {key}: expected {expected}, found {actual}")]
    VersionConflict {
        /// Record key
        key: String,
        /// Version the writer read
        expected: String,
        /// Version found on disk
        actual: String,
    },
}

impl StoreError {
    /// Create read error for path
    pub fn read_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Read {
            path: path.into(),
            source,
        }
    }

    /// Create write error for path
    pub fn write_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Write {
            path: path.into(),
            source,
        }
    }

    /// Create missing column error
    pub fn missing_column(table: impl Into<String>, column: impl Into<String>) -> Self {
        Self::MissingColumn {
            table: table.into(),
            column: column.into(),
        }
    }
}

/// Errors in schema metadata or in values checked against it
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    /// Metadata text is not a literal mapping
    #[error("metadata for '{kpi}' is malformed: {source}")]
    Malformed {
        /// KPI display name
        kpi: String,
        /// Underlying error
        #[source]
        source: ParseError,
    },

    /// Field declared with something other than a tag or option mapping
    #[error("field '{field}' must be a type tag or an option mapping, found a {found}")]
    FieldShape {
        /// Field name
        field: String,
        /// Kind of value found
        found: &'static str,
    },

    /// Option mapping without a `type` entry
    #[error("field '{field}' has no 'type' option")]
    MissingType {
        /// Field name
        field: String,
    },

    /// Option the field spec does not know
    #[error("field '{field}' has unknown option '{option}'")]
    UnknownOption {
        /// Field name
        field: String,
        /// Option name
        option: String,
    },

    /// Option with a value of the wrong kind
    #[error("option '{option}' of field '{field}' must be {expected}")]
    InvalidOption {
        /// Field name
        field: String,
        /// Option name
        option: String,
        /// Accepted kinds
        expected: &'static str,
    },
}
