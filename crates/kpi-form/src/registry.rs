//! Cell registry
//!
//! Maps type tags to cell factories. New kinds are added with
//! [`CellRegistry::register`]; the form generator never matches on tags.

use crate::cell::{DecimalCell, InputCell, IntCell, StringCell};
use crate::error::FormError;
use kpi_store::FieldSpec;
use std::collections::HashMap;

/// Builds one cell for a field
pub type CellFactory = fn(&str, &FieldSpec) -> Result<Box<dyn InputCell>, FormError>;

fn int_cell(label: &str, spec: &FieldSpec) -> Result<Box<dyn InputCell>, FormError> {
    Ok(Box::new(IntCell::from_spec(label, spec)?))
}

fn decimal_cell(label: &str, spec: &FieldSpec) -> Result<Box<dyn InputCell>, FormError> {
    Ok(Box::new(DecimalCell::from_spec(label, spec)?))
}

fn string_cell(label: &str, spec: &FieldSpec) -> Result<Box<dyn InputCell>, FormError> {
    Ok(Box::new(StringCell::from_spec(label, spec)?))
}

/// Registry of cell factories keyed by type tag
#[derive(Debug, Clone)]
pub struct CellRegistry {
    factories: HashMap<String, CellFactory>,
}

impl Default for CellRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl CellRegistry {
    /// Create new empty registry
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Create registry with the built-in kinds
    ///
    /// | Tags                  | Cell            |
    /// |-----------------------|-----------------|
    /// | `int`, `integer`      | [`IntCell`]     |
    /// | `decimal`, `float`    | [`DecimalCell`] |
    /// | `str`, `string`       | [`StringCell`]  |
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register("int", int_cell);
        registry.register("integer", int_cell);
        registry.register("decimal", decimal_cell);
        registry.register("float", decimal_cell);
        registry.register("str", string_cell);
        registry.register("string", string_cell);
        registry
    }

    /// Register a factory, replacing any previous one for `tag`
    pub fn register(&mut self, tag: &str, factory: CellFactory) {
        self.factories.insert(tag.to_string(), factory);
    }

    /// Check if a tag is registered
    #[inline]
    #[must_use]
    pub fn contains(&self, tag: &str) -> bool {
        self.factories.contains_key(tag)
    }

    /// Registered tags, sorted
    #[must_use]
    pub fn tags(&self) -> Vec<&str> {
        let mut tags: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        tags.sort_unstable();
        tags
    }

    /// Build the cell for one field
    ///
    /// # Errors
    /// Returns [`FormError::UnsupportedType`] for an unknown tag, or the
    /// factory's own error.
    pub fn build(&self, label: &str, spec: &FieldSpec) -> Result<Box<dyn InputCell>, FormError> {
        let factory = self
            .factories
            .get(&spec.kind)
            .ok_or_else(|| FormError::UnsupportedType {
                field: label.to_string(),
                tag: spec.kind.clone(),
            })?;
        factory(label, spec)
    }
}
