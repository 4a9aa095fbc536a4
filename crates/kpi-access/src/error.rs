//! Error types for access resolution

use kpi_literal::ParseError;
use kpi_store::SchemaError;

/// Errors resolving who may see what
#[derive(Debug, thiserror::Error)]
pub enum AccessError {
    /// Identifier passed the gate but has no user row
    #[error("no user record for '{identifier}'")]
    UserNotFound {
        /// Login identifier
        identifier: String,
    },

    /// Role id missing from the role table
    #[error("role {role_id} not found")]
    RoleNotFound {
        /// Role id
        role_id: i64,
    },

    /// KPI name not among the accessible records
    #[error("KPI '{kpi_name}' not found")]
    KpiNotFound {
        /// KPI display name
        kpi_name: String,
    },

    /// No accessible record for the KPI on that date
    #[error("no value of '{kpi_name}' dated {value_date}")]
    DateNotFound {
        /// KPI display name
        kpi_name: String,
        /// Requested value date
        value_date: String,
    },

    /// No schema row for the KPI
    #[error("no schema for KPI '{kpi_name}'")]
    SchemaNotFound {
        /// KPI display name
        kpi_name: String,
    },

    /// Allow list text is not a literal list
    #[error("allow list of role {role_id} is malformed: {source}")]
    AllowList {
        /// Role id
        role_id: i64,
        /// Underlying error
        #[source]
        source: ParseError,
    },

    /// Allow list item is neither a string nor an integer
    #[error("allow list of role {role_id} contains a {found}")]
    AllowListItem {
        /// Role id
        role_id: i64,
        /// Kind of value found
        found: &'static str,
    },

    /// Schema metadata could not be decoded
    #[error(transparent)]
    Schema(#[from] SchemaError),
}

impl AccessError {
    /// Check if error is a failed lookup
    #[inline]
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::UserNotFound { .. }
                | Self::RoleNotFound { .. }
                | Self::KpiNotFound { .. }
                | Self::DateNotFound { .. }
                | Self::SchemaNotFound { .. }
        )
    }
}
