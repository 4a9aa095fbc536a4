//! KPI Record Store
//!
//! Flat-file persistence for the KPI desk. Four pipe-delimited tables live in
//! one data directory:
//!
//! | Table      | Columns                                      |
//! |------------|----------------------------------------------|
//! | users      | `UserName`, `RoleID`                         |
//! | roles      | `RoleID`, `Role`, `KPIs`                     |
//! | KPI data   | `KPI_Id`, `KPI`, `KPI_Value_Date`, `KPI_Values` |
//! | KPI info   | `KPI_Name`, `Meta_Data`                      |
//!
//! Extra columns are carried through untouched.
//!
//! # Write-back
//!
//! [`KpiStore::upsert`] replaces or appends exactly one row, keyed by
//! (KPI, date). The caller passes the [`RowVersion`] it read; if the file
//! changed in between, the write fails with [`StoreError::VersionConflict`]
//! instead of overwriting someone else's edit.

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod error;
pub mod records;
pub mod schema;
pub mod store;
pub mod table;
pub mod version;

pub use error::{SchemaError, StoreError};
pub use records::{columns, KpiRecord, RecordKey, RoleRecord, SchemaRecord, UserRecord};
pub use schema::{FieldSpec, KpiSchema};
pub use store::{KpiStore, TableFiles};
pub use table::{Table, DEFAULT_DELIMITER};
pub use version::RowVersion;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
