//! Form generation from KPI schemas

use crate::cell::InputCell;
use crate::error::FormError;
use crate::registry::CellRegistry;
use kpi_literal::LiteralMap;
use kpi_store::KpiSchema;

/// Cells of one KPI, in schema order
#[derive(Debug)]
pub struct Form {
    kpi_name: String,
    cells: Vec<Box<dyn InputCell>>,
}

impl Form {
    /// KPI this form edits
    #[inline]
    #[must_use]
    pub fn kpi_name(&self) -> &str {
        &self.kpi_name
    }

    /// Cells in schema order
    #[inline]
    #[must_use]
    pub fn cells(&self) -> &[Box<dyn InputCell>] {
        &self.cells
    }

    /// Mutable cells in schema order
    #[inline]
    pub fn cells_mut(&mut self) -> &mut [Box<dyn InputCell>] {
        &mut self.cells
    }

    /// Field labels in schema order
    #[must_use]
    pub fn labels(&self) -> Vec<&str> {
        self.cells.iter().map(|c| c.label()).collect()
    }

    /// Number of cells
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether the schema declared no fields
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Check stored values against the form
    ///
    /// Every key must have a cell and every value must have the cell's kind.
    ///
    /// # Errors
    /// Returns [`FormError::SchemaViolation`] for the first offending field.
    pub fn check_values(&self, values: &LiteralMap) -> Result<(), FormError> {
        for (field, value) in values {
            let Some(cell) = self.cells.iter().find(|c| c.label() == field) else {
                return Err(FormError::SchemaViolation {
                    field: field.clone(),
                    message: format!("not declared for '{}'", self.kpi_name),
                });
            };
            if !cell.conforms(value) {
                return Err(FormError::SchemaViolation {
                    field: field.clone(),
                    message: format!("expected {}, found {}", cell.kind(), value.kind_name()),
                });
            }
        }
        Ok(())
    }
}

/// Builds forms through a [`CellRegistry`]
#[derive(Debug, Clone, Copy)]
pub struct FormGenerator<'a> {
    registry: &'a CellRegistry,
}

impl<'a> FormGenerator<'a> {
    /// Create generator over a registry
    #[inline]
    #[must_use]
    pub fn new(registry: &'a CellRegistry) -> Self {
        Self { registry }
    }

    /// Build one cell per schema field, in order
    ///
    /// All tags are checked before any cell is built, so an unsupported tag
    /// anywhere in the schema yields no cells at all.
    ///
    /// # Errors
    /// Returns [`FormError::UnsupportedType`] for an unknown tag and
    /// [`FormError::InvalidConstraint`] for unusable options.
    pub fn generate(&self, schema: &KpiSchema) -> Result<Form, FormError> {
        if let Some((field, spec)) = schema
            .fields
            .iter()
            .find(|(_, spec)| !self.registry.contains(&spec.kind))
        {
            return Err(FormError::UnsupportedType {
                field: field.clone(),
                tag: spec.kind.clone(),
            });
        }

        let cells = schema
            .fields
            .iter()
            .map(|(field, spec)| self.registry.build(field, spec))
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!(kpi = %schema.kpi_name, cells = cells.len(), "generated form");
        Ok(Form {
            kpi_name: schema.kpi_name.clone(),
            cells,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kpi_literal::parse_map;

    fn generate(meta: &str) -> Result<Form, FormError> {
        let registry = CellRegistry::with_defaults();
        let schema = KpiSchema::decode("K1", meta).unwrap();
        FormGenerator::new(&registry).generate(&schema)
    }

    #[test]
    fn cells_follow_schema_order() {
        let form = generate("{'x': 'int', 'y': 'str'}").unwrap();
        let kinds: Vec<&str> = form.cells().iter().map(|c| c.kind()).collect();
        assert_eq!(kinds, vec!["int", "str"]);
        assert_eq!(form.labels(), vec!["x", "y"]);
        assert!(form.cells().iter().all(|c| !c.is_filled()));
    }

    #[test]
    fn unsupported_tag_yields_no_form() {
        assert!(matches!(
            generate("{'x': 'bogus'}"),
            Err(FormError::UnsupportedType { .. })
        ));
        // Detected even after a valid field
        assert!(matches!(
            generate("{'a': 'int', 'x': 'bogus'}"),
            Err(FormError::UnsupportedType { field, .. }) if field == "x"
        ));
    }

    #[test]
    fn empty_schema_gives_empty_form() {
        assert!(generate("{}").unwrap().is_empty());
    }

    #[test]
    fn check_values_enforces_schema() {
        let form = generate("{'target': 'int', 'rate': 'decimal'}").unwrap();
        assert!(form
            .check_values(&parse_map("{'target': 100, 'rate': 1}").unwrap())
            .is_ok());
        assert!(form
            .check_values(&parse_map("{'target': None}").unwrap())
            .is_ok());
        assert!(matches!(
            form.check_values(&parse_map("{'target': 'high'}").unwrap()),
            Err(FormError::SchemaViolation { .. })
        ));
        assert!(matches!(
            form.check_values(&parse_map("{'owner': 'ops'}").unwrap()),
            Err(FormError::SchemaViolation { field, .. }) if field == "owner"
        ));
    }
}
