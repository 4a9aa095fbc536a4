//! Schema lookup per KPI

use crate::error::AccessError;
use kpi_store::{KpiSchema, SchemaRecord};

/// Finds and decodes the schema of a KPI
#[derive(Debug, Clone, Copy)]
pub struct TemplateResolver<'a> {
    schemas: &'a [SchemaRecord],
}

impl<'a> TemplateResolver<'a> {
    /// Create resolver over the info table
    #[inline]
    #[must_use]
    pub fn new(schemas: &'a [SchemaRecord]) -> Self {
        Self { schemas }
    }

    /// Schema of the first info row named `kpi_name`
    ///
    /// # Errors
    /// Returns [`AccessError::SchemaNotFound`] if no row matches, and
    /// [`AccessError::Schema`] if its metadata cannot be decoded.
    pub fn resolve(&self, kpi_name: &str) -> Result<KpiSchema, AccessError> {
        let record = self
            .schemas
            .iter()
            .find(|s| s.kpi_name == kpi_name)
            .ok_or_else(|| AccessError::SchemaNotFound {
                kpi_name: kpi_name.to_string(),
            })?;
        Ok(KpiSchema::decode(kpi_name, &record.meta_text)?)
    }
}
