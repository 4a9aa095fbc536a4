//! KPI store
//!
//! [`KpiStore`] owns the four tables of one data directory. Reads come from
//! the in-memory copy; [`KpiStore::upsert`] goes back to disk so a write is
//! always checked against the current file, not the copy loaded at startup.

use crate::error::StoreError;
use crate::records::{
    columns, decode_kpis, decode_roles, decode_schemas, decode_users, KpiRecord, RecordKey,
    RoleRecord, SchemaRecord, UserRecord,
};
use crate::table::Table;
use crate::version::RowVersion;
use kpi_literal::{encode_map, LiteralMap};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File names of the four tables inside the data directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableFiles {
    /// Users and their role ids
    pub users: String,
    /// Roles and their allow lists
    pub roles: String,
    /// KPI values
    pub kpi_data: String,
    /// KPI schemas
    pub kpi_info: String,
}

impl Default for TableFiles {
    fn default() -> Self {
        Self {
            users: "User_Security.csv".to_string(),
            roles: "Role_Security.csv".to_string(),
            kpi_data: "KPI_Data.csv".to_string(),
            kpi_info: "KPI_Info.csv".to_string(),
        }
    }
}

/// In-memory view of the KPI tables with write-back to disk
#[derive(Debug)]
pub struct KpiStore {
    data_dir: PathBuf,
    files: TableFiles,
    delimiter: char,
    users: Table,
    roles: Table,
    kpi_data: Table,
    kpi_info: Table,
}

impl KpiStore {
    /// Load all four tables from `data_dir`
    ///
    /// # Errors
    /// Returns [`StoreError`] if a table is unreadable, malformed, or lacks a
    /// required column.
    pub fn open(
        data_dir: impl Into<PathBuf>,
        files: &TableFiles,
        delimiter: char,
    ) -> Result<Self, StoreError> {
        let data_dir = data_dir.into();
        let load = |file: &str| Table::read(&data_dir.join(file), delimiter);

        let store = Self {
            users: load(&files.users)?,
            roles: load(&files.roles)?,
            kpi_data: load(&files.kpi_data)?,
            kpi_info: load(&files.kpi_info)?,
            data_dir: data_dir.clone(),
            files: files.clone(),
            delimiter,
        };
        store.check_columns()?;

        tracing::debug!(
            data_dir = %store.data_dir.display(),
            users = store.users.len(),
            roles = store.roles.len(),
            kpi_rows = store.kpi_data.len(),
            schemas = store.kpi_info.len(),
            "opened KPI store"
        );
        Ok(store)
    }

    /// Reload every table from disk
    ///
    /// # Errors
    /// Same as [`KpiStore::open`].
    pub fn reload(&mut self) -> Result<(), StoreError> {
        *self = Self::open(self.data_dir.clone(), &self.files, self.delimiter)?;
        Ok(())
    }

    fn check_columns(&self) -> Result<(), StoreError> {
        for (table, required) in [
            (&self.users, &[columns::USER_NAME, columns::ROLE_ID][..]),
            (
                &self.roles,
                &[columns::ROLE_ID, columns::ROLE_NAME, columns::ROLE_KPIS][..],
            ),
            (
                &self.kpi_data,
                &[
                    columns::KPI_ID,
                    columns::KPI_NAME,
                    columns::VALUE_DATE,
                    columns::VALUES,
                ][..],
            ),
            (&self.kpi_info, &[columns::INFO_NAME, columns::META_DATA][..]),
        ] {
            for column in required {
                table.column(column)?;
            }
        }
        Ok(())
    }

    /// Data directory
    #[inline]
    #[must_use]
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Raw KPI value table
    #[inline]
    #[must_use]
    pub fn kpi_table(&self) -> &Table {
        &self.kpi_data
    }

    /// All user rows
    ///
    /// # Errors
    /// Returns [`StoreError::InvalidField`] for a row with a bad role id.
    pub fn users(&self) -> Result<Vec<UserRecord>, StoreError> {
        decode_users(&self.users)
    }

    /// All role rows
    ///
    /// # Errors
    /// Returns [`StoreError::InvalidField`] for a row with a bad role id.
    pub fn roles(&self) -> Result<Vec<RoleRecord>, StoreError> {
        decode_roles(&self.roles)
    }

    /// All KPI rows in file order
    ///
    /// # Errors
    /// Returns [`StoreError::MissingColumn`] if the table lost a column.
    pub fn kpi_records(&self) -> Result<Vec<KpiRecord>, StoreError> {
        decode_kpis(&self.kpi_data)
    }

    /// All schema rows in file order
    ///
    /// # Errors
    /// Returns [`StoreError::MissingColumn`] if the table lost a column.
    pub fn schemas(&self) -> Result<Vec<SchemaRecord>, StoreError> {
        decode_schemas(&self.kpi_info)
    }

    /// Look up one KPI row
    ///
    /// # Errors
    /// Returns [`StoreError::MissingColumn`] if the table lost a column.
    pub fn find(&self, key: &RecordKey) -> Result<Option<KpiRecord>, StoreError> {
        Ok(self
            .kpi_records()?
            .into_iter()
            .find(|record| record.kpi_name == key.kpi_name && record.value_date == key.value_date))
    }

    /// Write one KPI row back to disk
    ///
    /// With `expected = Some(v)` the row must exist and its on-disk version
    /// must equal `v`; it is then replaced. With `expected = None` the row
    /// must not exist; it is appended with `kpi_id`. Every other row is
    /// written back unchanged. Returns the version of the new row.
    ///
    /// # Errors
    /// Returns [`StoreError::VersionConflict`] if the file changed since the
    /// caller read it, and IO or format errors from the re-read and write.
    pub fn upsert(
        &mut self,
        key: &RecordKey,
        kpi_id: &str,
        values: &LiteralMap,
        expected: Option<RowVersion>,
    ) -> Result<RowVersion, StoreError> {
        let path = self.data_dir.join(&self.files.kpi_data);
        let mut table = Table::read(&path, self.delimiter)?;

        let name_col = table.column(columns::KPI_NAME)?;
        let date_col = table.column(columns::VALUE_DATE)?;
        let values_col = table.column(columns::VALUES)?;
        let id_col = table.column(columns::KPI_ID)?;

        let existing = table
            .rows()
            .iter()
            .position(|row| row[name_col] == key.kpi_name && row[date_col] == key.value_date);
        let text = encode_map(values);

        match (existing, expected) {
            (Some(row), Some(version)) => {
                let actual = RowVersion::of(&table.rows()[row][values_col]);
                if actual != version {
                    return Err(conflict(key, &version.short(), &actual.short()));
                }
                table.set(row, values_col, text.clone());
            }
            (Some(row), None) => {
                let actual = RowVersion::of(&table.rows()[row][values_col]);
                return Err(conflict(key, "no row", &actual.short()));
            }
            (None, Some(version)) => {
                return Err(conflict(key, &version.short(), "no row"));
            }
            (None, None) => {
                let mut row = vec![String::new(); table.headers().len()];
                row[id_col] = kpi_id.to_string();
                row[name_col].clone_from(&key.kpi_name);
                row[date_col].clone_from(&key.value_date);
                row[values_col].clone_from(&text);
                table.push_row(row)?;
            }
        }

        table.write_atomic(&path)?;
        let version = RowVersion::of(&text);
        tracing::info!(
            key = %key,
            inserted = existing.is_none(),
            version = %version.short(),
            "wrote KPI row"
        );
        self.kpi_data = table;
        Ok(version)
    }
}

fn conflict(key: &RecordKey, expected: &str, actual: &str) -> StoreError {
    tracing::warn!(key = %key, expected, actual, "row version conflict");
    StoreError::VersionConflict {
        key: key.to_string(),
        expected: expected.to_string(),
        actual: actual.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_table_files() {
        let files = TableFiles::default();
        assert_eq!(files.kpi_data, "KPI_Data.csv");
        assert_eq!(files.users, "User_Security.csv");
    }

    #[test]
    fn table_files_deserialize_with_defaults() {
        let files: TableFiles = serde_json::from_str(r#"{"users":"People.csv"}"#).unwrap();
        assert_eq!(files.users, "People.csv");
        assert_eq!(files.roles, "Role_Security.csv");
    }
}
