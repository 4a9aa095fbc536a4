//! Typed records decoded from table rows
//!
//! Reference data (users, roles, schema rows) is decoded eagerly. Literal
//! cells (allow lists, values, metadata) stay as text here; the access layer
//! and the form layer decode them when a request needs them, so one corrupt
//! row only fails the request that touches it.

use crate::error::StoreError;
use crate::table::Table;
use crate::version::RowVersion;
use kpi_literal::{parse_map, LiteralMap, ParseError};
use std::fmt::{self, Display, Formatter};

/// Column names of the four tables
pub mod columns {
    /// User table: identifier
    pub const USER_NAME: &str = "UserName";
    /// User and role tables: role id
    pub const ROLE_ID: &str = "RoleID";
    /// Role table: display name
    pub const ROLE_NAME: &str = "Role";
    /// Role table: allow list literal
    pub const ROLE_KPIS: &str = "KPIs";
    /// KPI table: identifier
    pub const KPI_ID: &str = "KPI_Id";
    /// KPI table: display name
    pub const KPI_NAME: &str = "KPI";
    /// KPI table: value date
    pub const VALUE_DATE: &str = "KPI_Value_Date";
    /// KPI table: values literal
    pub const VALUES: &str = "KPI_Values";
    /// Info table: KPI display name
    pub const INFO_NAME: &str = "KPI_Name";
    /// Info table: metadata literal
    pub const META_DATA: &str = "Meta_Data";
}

/// A row of the user table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    /// Login identifier (unique)
    pub identifier: String,
    /// Assigned role
    pub role_id: i64,
}

/// A row of the role table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleRecord {
    /// Role id (unique)
    pub role_id: i64,
    /// Display name
    pub role_name: String,
    /// Allow list as stored, e.g. `['K1','K2']`
    pub allowed_kpis_text: String,
}

/// Identity of a KPI row: one row per (KPI, date)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RecordKey {
    /// KPI display name
    pub kpi_name: String,
    /// Value date as stored
    pub value_date: String,
}

impl RecordKey {
    /// Create record key
    #[inline]
    #[must_use]
    pub fn new(kpi_name: impl Into<String>, value_date: impl Into<String>) -> Self {
        Self {
            kpi_name: kpi_name.into(),
            value_date: value_date.into(),
        }
    }
}

impl Display for RecordKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.kpi_name, self.value_date)
    }
}

/// A row of the KPI table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KpiRecord {
    /// KPI identifier, matched against role allow lists
    pub kpi_id: String,
    /// KPI display name, matched against schema rows
    pub kpi_name: String,
    /// Value date
    pub value_date: String,
    /// Values literal as stored
    pub values_text: String,
}

impl KpiRecord {
    /// Key of this record
    #[must_use]
    pub fn key(&self) -> RecordKey {
        RecordKey::new(&self.kpi_name, &self.value_date)
    }

    /// Decode the stored values mapping
    ///
    /// # Errors
    /// Returns [`ParseError`] if the stored text is not a literal mapping.
    pub fn values(&self) -> Result<LiteralMap, ParseError> {
        parse_map(&self.values_text)
    }

    /// Version token of the stored values
    #[inline]
    #[must_use]
    pub fn version(&self) -> RowVersion {
        RowVersion::of(&self.values_text)
    }
}

/// A row of the KPI info table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaRecord {
    /// KPI display name
    pub kpi_name: String,
    /// Metadata literal as stored
    pub meta_text: String,
}

pub(crate) fn decode_users(table: &Table) -> Result<Vec<UserRecord>, StoreError> {
    let name = table.column(columns::USER_NAME)?;
    let role = table.column(columns::ROLE_ID)?;
    table
        .rows()
        .iter()
        .enumerate()
        .map(|(i, row)| {
            Ok(UserRecord {
                identifier: row[name].clone(),
                role_id: parse_role_id(table, i, &row[role])?,
            })
        })
        .collect()
}

pub(crate) fn decode_roles(table: &Table) -> Result<Vec<RoleRecord>, StoreError> {
    let id = table.column(columns::ROLE_ID)?;
    let name = table.column(columns::ROLE_NAME)?;
    let kpis = table.column(columns::ROLE_KPIS)?;
    table
        .rows()
        .iter()
        .enumerate()
        .map(|(i, row)| {
            Ok(RoleRecord {
                role_id: parse_role_id(table, i, &row[id])?,
                role_name: row[name].clone(),
                allowed_kpis_text: row[kpis].clone(),
            })
        })
        .collect()
}

pub(crate) fn decode_kpis(table: &Table) -> Result<Vec<KpiRecord>, StoreError> {
    let id = table.column(columns::KPI_ID)?;
    let name = table.column(columns::KPI_NAME)?;
    let date = table.column(columns::VALUE_DATE)?;
    let values = table.column(columns::VALUES)?;
    Ok(table
        .rows()
        .iter()
        .map(|row| KpiRecord {
            kpi_id: row[id].clone(),
            kpi_name: row[name].clone(),
            value_date: row[date].clone(),
            values_text: row[values].clone(),
        })
        .collect())
}

pub(crate) fn decode_schemas(table: &Table) -> Result<Vec<SchemaRecord>, StoreError> {
    let name = table.column(columns::INFO_NAME)?;
    let meta = table.column(columns::META_DATA)?;
    Ok(table
        .rows()
        .iter()
        .map(|row| SchemaRecord {
            kpi_name: row[name].clone(),
            meta_text: row[meta].clone(),
        })
        .collect())
}

// Role ids written by spreadsheet tools sometimes carry a `.0` suffix
fn parse_role_id(table: &Table, row: usize, text: &str) -> Result<i64, StoreError> {
    let trimmed = text.trim();
    let digits = trimmed.strip_suffix(".0").unwrap_or(trimmed);
    digits.parse::<i64>().map_err(|e| StoreError::InvalidField {
        table: table.name().to_string(),
        row: row + 1,
        column: columns::ROLE_ID.to_string(),
        message: format!("'{text}': {e}"),
    })
}
