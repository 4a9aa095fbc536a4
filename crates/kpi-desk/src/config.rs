//! Desk configuration
//!
//! Loaded from TOML; every key is optional:
//!
//! ```toml
//! data_dir = "/srv/kpi"
//! delimiter = "|"
//!
//! [tables]
//! users = "User_Security.csv"
//! roles = "Role_Security.csv"
//! kpi_data = "KPI_Data.csv"
//! kpi_info = "KPI_Info.csv"
//! ```

use crate::error::DeskError;
use kpi_store::{TableFiles, DEFAULT_DELIMITER};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Desk configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeskConfig {
    /// Directory holding the four tables
    pub data_dir: PathBuf,
    /// Table file names
    pub tables: TableFiles,
    /// Field delimiter
    pub delimiter: char,
}

impl DeskConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse TOML text
    ///
    /// # Errors
    /// Returns [`DeskError::Config`] for invalid TOML or values.
    pub fn from_toml_str(text: &str) -> Result<Self, DeskError> {
        let config: Self = toml::from_str(text).map_err(|e| DeskError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a TOML file
    ///
    /// # Errors
    /// Returns [`DeskError::Config`] if the file is unreadable or invalid.
    pub fn load(path: &Path) -> Result<Self, DeskError> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| DeskError::Config(format!("cannot read {}: {e}", path.display())))?;
        Self::from_toml_str(&text)
    }

    /// With data directory
    #[inline]
    #[must_use]
    pub fn with_data_dir(mut self, data_dir: impl Into<PathBuf>) -> Self {
        self.data_dir = data_dir.into();
        self
    }

    /// With table file names
    #[inline]
    #[must_use]
    pub fn with_tables(mut self, tables: TableFiles) -> Self {
        self.tables = tables;
        self
    }

    /// With field delimiter
    #[inline]
    #[must_use]
    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Check values that deserialization cannot
    ///
    /// # Errors
    /// Returns [`DeskError::Config`] for an unusable delimiter or an empty
    /// table name.
    pub fn validate(&self) -> Result<(), DeskError> {
        if matches!(self.delimiter, '"' | '\n' | '\r') {
            return Err(DeskError::Config(format!(
                "delimiter {:?} cannot be used",
                self.delimiter
            )));
        }
        let tables = &self.tables;
        for (key, name) in [
            ("users", &tables.users),
            ("roles", &tables.roles),
            ("kpi_data", &tables.kpi_data),
            ("kpi_info", &tables.kpi_info),
        ] {
            if name.trim().is_empty() {
                return Err(DeskError::Config(format!("table name '{key}' is empty")));
            }
        }
        Ok(())
    }
}

impl Default for DeskConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            tables: TableFiles::default(),
            delimiter: DEFAULT_DELIMITER,
        }
    }
}
