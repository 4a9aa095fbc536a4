//! Credential gate

use kpi_form::{Notice, Surface};
use kpi_store::UserRecord;
use std::collections::HashSet;

/// Accepts identifiers present in the user table
///
/// Matching is exact; callers trim or fold case before asking if they want
/// to.
#[derive(Debug, Clone, Default)]
pub struct CredentialGate {
    known: HashSet<String>,
}

impl CredentialGate {
    /// Create gate over a set of identifiers
    pub fn new<I, S>(known: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            known: known.into_iter().map(Into::into).collect(),
        }
    }

    /// Create gate over the user table
    #[must_use]
    pub fn from_users(users: &[UserRecord]) -> Self {
        Self::new(users.iter().map(|u| u.identifier.as_str()))
    }

    /// Check membership without side effects
    #[inline]
    #[must_use]
    pub fn is_known(&self, candidate: &str) -> bool {
        self.known.contains(candidate)
    }

    /// Check a candidate and tell the user the outcome
    ///
    /// A refusal is a normal result, not an error.
    pub fn admit(&self, candidate: &str, surface: &mut dyn Surface) -> bool {
        if self.is_known(candidate) {
            tracing::info!(user = candidate, "access granted");
            surface.notify(Notice::success(format!("Welcome {candidate}!")));
            true
        } else {
            tracing::warn!(user = candidate, "access denied");
            surface.notify(Notice::error("You don't have access to this application"));
            false
        }
    }
}
