//! Error types for literal decoding
//!
//! Every failure carries the byte offset into the source text so that a
//! corrupt table cell can be located by an operator.

/// Errors raised while decoding literal text
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// Input ended in the middle of a value
    #[error("unexpected end of input: expected {expected}")]
    UnexpectedEnd {
        /// What the parser was looking for
        expected: &'static str,
    },

    /// A character that cannot start or continue the current construct
    #[error("unexpected character '{found}' at offset {offset}: expected {expected}")]
    UnexpectedChar {
        /// Character found
        found: char,
        /// Byte offset into the source text
        offset: usize,
        /// What the parser was looking for
        expected: &'static str,
    },

    /// Malformed or out-of-range number
    #[error("invalid number '{text}' at offset {offset}")]
    InvalidNumber {
        /// Offending number text
        text: String,
        /// Byte offset into the source text
        offset: usize,
    },

    /// Unknown or truncated backslash escape inside a string
    #[error("invalid escape sequence at offset {offset}")]
    InvalidEscape {
        /// Byte offset into the source text
        offset: usize,
    },

    /// A bare word that is not one of the accepted constants
    #[error("unsupported syntax '{word}' at offset {offset}")]
    UnsupportedSyntax {
        /// Offending word
        word: String,
        /// Byte offset into the source text
        offset: usize,
    },

    /// Mapping key that is not a string
    #[error("mapping keys must be strings (offset {offset})")]
    NonStringKey {
        /// Byte offset into the source text
        offset: usize,
    },

    /// The same key appears twice in one mapping
    #[error("duplicate mapping key '{key}' at offset {offset}")]
    DuplicateKey {
        /// Repeated key
        key: String,
        /// Byte offset into the source text
        offset: usize,
    },

    /// Extra text after a complete value
    #[error("trailing input at offset {offset}")]
    TrailingInput {
        /// Byte offset into the source text
        offset: usize,
    },

    /// Containers nested beyond the supported depth
    #[error("nesting deeper than {limit} levels at offset {offset}")]
    TooDeep {
        /// Maximum nesting depth
        limit: usize,
        /// Byte offset into the source text
        offset: usize,
    },

    /// Well-formed literal of the wrong top-level shape
    #[error("expected a {expected}, found a {found}")]
    WrongShape {
        /// Shape required
        expected: &'static str,
        /// Shape found
        found: &'static str,
    },
}

impl ParseError {
    /// Byte offset of the failure, when one is known
    #[must_use]
    pub fn offset(&self) -> Option<usize> {
        match self {
            Self::UnexpectedChar { offset, .. }
            | Self::InvalidNumber { offset, .. }
            | Self::InvalidEscape { offset }
            | Self::UnsupportedSyntax { offset, .. }
            | Self::NonStringKey { offset }
            | Self::DuplicateKey { offset, .. }
            | Self::TrailingInput { offset }
            | Self::TooDeep { offset, .. } => Some(*offset),
            Self::UnexpectedEnd { .. } | Self::WrongShape { .. } => None,
        }
    }
}
