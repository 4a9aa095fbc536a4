//! Row version tokens
//!
//! A [`RowVersion`] is the SHA-256 of a row's stored value text. Two reads of
//! the same bytes always agree, so it works as an optimistic-concurrency token
//! without a version column in the table.

use sha2::{Digest, Sha256};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Content hash of a stored value cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RowVersion([u8; 32]);

impl RowVersion {
    /// Compute version of the given cell text
    #[inline]
    #[must_use]
    pub fn of(text: &str) -> Self {
        let digest = Sha256::digest(text.as_bytes());
        Self(digest.into())
    }

    /// Get reference to the underlying bytes
    #[inline]
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Short string representation (first 12 hex chars)
    #[inline]
    #[must_use]
    pub fn short(&self) -> String {
        hex::encode(&self.0[..6])
    }
}

impl Display for RowVersion {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

impl FromStr for RowVersion {
    type Err = hex::FromHexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut bytes = [0u8; 32];
        hex::decode_to_slice(s, &mut bytes)?;
        Ok(Self(bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_is_deterministic() {
        assert_eq!(RowVersion::of("{'target':100}"), RowVersion::of("{'target':100}"));
        assert_ne!(RowVersion::of("{'target':100}"), RowVersion::of("{'target':150}"));
    }

    #[test]
    fn version_hex_roundtrip() {
        let version = RowVersion::of("abc");
        let parsed: RowVersion = version.to_string().parse().unwrap();
        assert_eq!(parsed, version);
        assert_eq!(version.short().len(), 12);
    }

    #[test]
    fn version_rejects_bad_hex() {
        assert!("zz".parse::<RowVersion>().is_err());
        assert!("abcd".parse::<RowVersion>().is_err());
    }
}
