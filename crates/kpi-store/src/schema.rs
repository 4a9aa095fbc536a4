//! KPI schemas
//!
//! A schema maps each field name to a [`FieldSpec`]. In the info table a
//! field is written either as a bare type tag or as an option mapping:
//!
//! ```text
//! {'target': 'int', 'rate': {'type': 'decimal', 'min': 0, 'max': 1}}
//! ```

use crate::error::SchemaError;
use indexmap::IndexMap;
use kpi_literal::{encode_map, parse_map, Literal, LiteralMap};

/// Declaration of a single form field
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    /// Type tag, resolved by the cell registry
    pub kind: String,
    /// Inclusive lower bound for numeric kinds
    pub min: Option<Literal>,
    /// Inclusive upper bound for numeric kinds
    pub max: Option<Literal>,
    /// Validation pattern for text kinds
    pub pattern: Option<String>,
}

impl FieldSpec {
    /// Field with a type tag and no constraints
    #[must_use]
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            min: None,
            max: None,
            pattern: None,
        }
    }

    /// With numeric bounds
    #[must_use]
    pub fn with_bounds(mut self, min: Option<Literal>, max: Option<Literal>) -> Self {
        self.min = min;
        self.max = max;
        self
    }

    /// With validation pattern
    #[must_use]
    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    /// Whether any constraint is declared
    #[must_use]
    pub fn has_constraints(&self) -> bool {
        self.min.is_some() || self.max.is_some() || self.pattern.is_some()
    }

    /// Decode a field declaration
    ///
    /// # Errors
    /// Returns [`SchemaError`] if the literal is neither a tag nor a valid
    /// option mapping.
    pub fn from_literal(field: &str, literal: &Literal) -> Result<Self, SchemaError> {
        match literal {
            Literal::Str(tag) => Ok(Self::new(tag.clone())),
            Literal::Map(options) => Self::from_options(field, options),
            other => Err(SchemaError::FieldShape {
                field: field.to_string(),
                found: other.kind_name(),
            }),
        }
    }

    fn from_options(field: &str, options: &LiteralMap) -> Result<Self, SchemaError> {
        let invalid = |option: &str, expected: &'static str| SchemaError::InvalidOption {
            field: field.to_string(),
            option: option.to_string(),
            expected,
        };

        let mut spec = match options.get("type") {
            Some(Literal::Str(tag)) => Self::new(tag.clone()),
            Some(_) => return Err(invalid("type", "a string")),
            None => {
                return Err(SchemaError::MissingType {
                    field: field.to_string(),
                })
            }
        };

        for (option, value) in options {
            match option.as_str() {
                "type" => {}
                "min" | "max" => {
                    if value.as_f64().is_none() {
                        return Err(invalid(option, "a number"));
                    }
                    if option == "min" {
                        spec.min = Some(value.clone());
                    } else {
                        spec.max = Some(value.clone());
                    }
                }
                "pattern" => match value {
                    Literal::Str(p) => spec.pattern = Some(p.clone()),
                    _ => return Err(invalid(option, "a string")),
                },
                _ => {
                    return Err(SchemaError::UnknownOption {
                        field: field.to_string(),
                        option: option.clone(),
                    })
                }
            }
        }
        Ok(spec)
    }

    /// Encode back to the stored form
    #[must_use]
    pub fn to_literal(&self) -> Literal {
        if !self.has_constraints() {
            return Literal::Str(self.kind.clone());
        }
        let mut options = LiteralMap::new();
        options.insert("type".to_string(), Literal::Str(self.kind.clone()));
        if let Some(min) = &self.min {
            options.insert("min".to_string(), min.clone());
        }
        if let Some(max) = &self.max {
            options.insert("max".to_string(), max.clone());
        }
        if let Some(pattern) = &self.pattern {
            options.insert("pattern".to_string(), Literal::Str(pattern.clone()));
        }
        Literal::Map(options)
    }
}

/// Field layout of one KPI
#[derive(Debug, Clone, PartialEq)]
pub struct KpiSchema {
    /// KPI display name
    pub kpi_name: String,
    /// Fields in declaration order
    pub fields: IndexMap<String, FieldSpec>,
}

impl KpiSchema {
    /// Create schema from ordered fields
    #[must_use]
    pub fn new(kpi_name: impl Into<String>, fields: IndexMap<String, FieldSpec>) -> Self {
        Self {
            kpi_name: kpi_name.into(),
            fields,
        }
    }

    /// Decode the metadata text of an info row
    ///
    /// # Errors
    /// Returns [`SchemaError::Malformed`] for text that is not a literal
    /// mapping, and the field-level variants for bad declarations.
    pub fn decode(kpi_name: &str, meta_text: &str) -> Result<Self, SchemaError> {
        let raw = parse_map(meta_text).map_err(|source| SchemaError::Malformed {
            kpi: kpi_name.to_string(),
            source,
        })?;
        let fields = raw
            .iter()
            .map(|(name, decl)| Ok((name.clone(), FieldSpec::from_literal(name, decl)?)))
            .collect::<Result<IndexMap<_, _>, SchemaError>>()?;
        Ok(Self::new(kpi_name, fields))
    }

    /// Encode the metadata text
    #[must_use]
    pub fn encode(&self) -> String {
        let raw: LiteralMap = self
            .fields
            .iter()
            .map(|(name, spec)| (name.clone(), spec.to_literal()))
            .collect();
        encode_map(&raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn decode_bare_tags_in_order() {
        let schema = KpiSchema::decode("K1", "{'x': 'int', 'y': 'str'}").unwrap();
        let names: Vec<&str> = schema.fields.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["x", "y"]);
        assert_eq!(schema.fields["x"], FieldSpec::new("int"));
    }

    #[test]
    fn decode_option_mapping() {
        let schema = KpiSchema::decode(
            "K1",
            "{'score': {'type': 'int', 'min': 0, 'max': 10}, 'code': {'type': 'str', 'pattern': '^[A-Z]+$'}}",
        )
        .unwrap();
        let score = &schema.fields["score"];
        assert_eq!(score.kind, "int");
        assert_eq!(score.min, Some(Literal::Int(0)));
        assert_eq!(score.max, Some(Literal::Int(10)));
        assert_eq!(schema.fields["code"].pattern.as_deref(), Some("^[A-Z]+$"));
    }

    #[test]
    fn decode_rejects_malformed_text() {
        assert!(matches!(
            KpiSchema::decode("K1", "{'x': 'int'"),
            Err(SchemaError::Malformed { .. })
        ));
    }

    #[test]
    fn decode_rejects_bad_declarations() {
        assert!(matches!(
            KpiSchema::decode("K1", "{'x': 3}"),
            Err(SchemaError::FieldShape { .. })
        ));
        assert!(matches!(
            KpiSchema::decode("K1", "{'x': {'min': 0}}"),
            Err(SchemaError::MissingType { .. })
        ));
        assert!(matches!(
            KpiSchema::decode("K1", "{'x': {'type': 'int', 'step': 2}}"),
            Err(SchemaError::UnknownOption { .. })
        ));
        assert!(matches!(
            KpiSchema::decode("K1", "{'x': {'type': 'int', 'min': 'low'}}"),
            Err(SchemaError::InvalidOption { .. })
        ));
    }

    #[test]
    fn encode_roundtrip() {
        let text = "{'x':'int','y':{'type':'decimal','min':0,'max':1.5}}";
        let schema = KpiSchema::decode("K1", text).unwrap();
        assert_eq!(schema.encode(), text);
    }
}
