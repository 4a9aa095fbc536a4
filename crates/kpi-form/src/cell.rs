//! Typed input cells
//!
//! A cell turns one raw line of user input into a [`Literal`], or explains
//! why it cannot. A cell remembers its last accepted value; `is_filled` is
//! true only after a successful capture.

use crate::error::{FormError, ValidationError};
use kpi_literal::Literal;
use kpi_store::FieldSpec;
use regex::Regex;
use std::fmt::Debug;

/// Result of offering raw input to a cell
#[derive(Debug, Clone, PartialEq)]
pub enum Capture {
    /// Accepted value
    Filled(Literal),
    /// Nothing entered
    Empty,
    /// Rejected input
    Invalid(ValidationError),
}

/// One typed field of a form
pub trait InputCell: Debug {
    /// Field label
    fn label(&self) -> &str;

    /// Kind name, e.g. `int`
    fn kind(&self) -> &'static str;

    /// Offer raw input
    fn capture(&mut self, raw: &str) -> Capture;

    /// Last accepted value
    fn value(&self) -> Option<&Literal>;

    /// Whether a value has been accepted
    fn is_filled(&self) -> bool {
        self.value().is_some()
    }

    /// Whether a stored value has the right kind for this cell
    ///
    /// `None` is accepted as "not yet recorded".
    fn conforms(&self, value: &Literal) -> bool;
}

fn int_bound(field: &str, bound: Option<&Literal>) -> Result<Option<i64>, FormError> {
    match bound {
        None => Ok(None),
        Some(Literal::Int(i)) => Ok(Some(*i)),
        Some(other) => Err(FormError::invalid_constraint(
            field,
            format!("integer bound must be an integer, found {other}"),
        )),
    }
}

fn decimal_bound(field: &str, bound: Option<&Literal>) -> Result<Option<f64>, FormError> {
    match bound {
        None => Ok(None),
        Some(b) => b
            .as_f64()
            .map(Some)
            .ok_or_else(|| FormError::invalid_constraint(field, format!("bound {b} is not a number"))),
    }
}

fn check_order<T: PartialOrd + std::fmt::Display>(
    field: &str,
    min: Option<T>,
    max: Option<T>,
) -> Result<(), FormError> {
    match (min, max) {
        (Some(lo), Some(hi)) if lo > hi => Err(FormError::invalid_constraint(
            field,
            format!("min {lo} is greater than max {hi}"),
        )),
        _ => Ok(()),
    }
}

fn reject_pattern(field: &str, spec: &FieldSpec) -> Result<(), FormError> {
    if spec.pattern.is_some() {
        return Err(FormError::invalid_constraint(
            field,
            format!("'pattern' does not apply to {} fields", spec.kind),
        ));
    }
    Ok(())
}

/// Whole-number cell with optional inclusive bounds
#[derive(Debug, Clone)]
pub struct IntCell {
    label: String,
    min: Option<i64>,
    max: Option<i64>,
    value: Option<Literal>,
}

impl IntCell {
    /// Cell without bounds
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            min: None,
            max: None,
            value: None,
        }
    }

    /// Build from a field declaration
    ///
    /// # Errors
    /// Returns [`FormError::InvalidConstraint`] for non-integer bounds,
    /// inverted bounds, or a pattern.
    pub fn from_spec(label: &str, spec: &FieldSpec) -> Result<Self, FormError> {
        reject_pattern(label, spec)?;
        let min = int_bound(label, spec.min.as_ref())?;
        let max = int_bound(label, spec.max.as_ref())?;
        check_order(label, min, max)?;
        Ok(Self {
            min,
            max,
            ..Self::new(label)
        })
    }
}

impl InputCell for IntCell {
    fn label(&self) -> &str {
        &self.label
    }

    fn kind(&self) -> &'static str {
        "int"
    }

    fn capture(&mut self, raw: &str) -> Capture {
        let input = raw.trim();
        if input.is_empty() {
            return Capture::Empty;
        }
        let Ok(n) = input.parse::<i64>() else {
            return Capture::Invalid(ValidationError::NotANumber {
                input: input.to_string(),
                kind: "integer",
            });
        };
        if let Some(min) = self.min.filter(|min| n < *min) {
            return Capture::Invalid(ValidationError::BelowMin {
                input: input.to_string(),
                min: min.to_string(),
            });
        }
        if let Some(max) = self.max.filter(|max| n > *max) {
            return Capture::Invalid(ValidationError::AboveMax {
                input: input.to_string(),
                max: max.to_string(),
            });
        }
        self.value = Some(Literal::Int(n));
        Capture::Filled(Literal::Int(n))
    }

    fn value(&self) -> Option<&Literal> {
        self.value.as_ref()
    }

    fn conforms(&self, value: &Literal) -> bool {
        matches!(value, Literal::Int(_) | Literal::None)
    }
}

/// Decimal cell with optional inclusive bounds
#[derive(Debug, Clone)]
pub struct DecimalCell {
    label: String,
    min: Option<f64>,
    max: Option<f64>,
    value: Option<Literal>,
}

impl DecimalCell {
    /// Cell without bounds
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            min: None,
            max: None,
            value: None,
        }
    }

    /// Build from a field declaration
    ///
    /// # Errors
    /// Returns [`FormError::InvalidConstraint`] for non-numeric bounds,
    /// inverted bounds, or a pattern.
    pub fn from_spec(label: &str, spec: &FieldSpec) -> Result<Self, FormError> {
        reject_pattern(label, spec)?;
        let min = decimal_bound(label, spec.min.as_ref())?;
        let max = decimal_bound(label, spec.max.as_ref())?;
        check_order(label, min, max)?;
        Ok(Self {
            min,
            max,
            ..Self::new(label)
        })
    }
}

impl InputCell for DecimalCell {
    fn label(&self) -> &str {
        &self.label
    }

    fn kind(&self) -> &'static str {
        "decimal"
    }

    fn capture(&mut self, raw: &str) -> Capture {
        let input = raw.trim();
        if input.is_empty() {
            return Capture::Empty;
        }
        let Ok(d) = input.parse::<f64>() else {
            return Capture::Invalid(ValidationError::NotANumber {
                input: input.to_string(),
                kind: "decimal",
            });
        };
        if !d.is_finite() {
            return Capture::Invalid(ValidationError::NotFinite {
                input: input.to_string(),
            });
        }
        if let Some(min) = self.min.filter(|min| d < *min) {
            return Capture::Invalid(ValidationError::BelowMin {
                input: input.to_string(),
                min: min.to_string(),
            });
        }
        if let Some(max) = self.max.filter(|max| d > *max) {
            return Capture::Invalid(ValidationError::AboveMax {
                input: input.to_string(),
                max: max.to_string(),
            });
        }
        self.value = Some(Literal::Decimal(d));
        Capture::Filled(Literal::Decimal(d))
    }

    fn value(&self) -> Option<&Literal> {
        self.value.as_ref()
    }

    fn conforms(&self, value: &Literal) -> bool {
        matches!(value, Literal::Decimal(_) | Literal::Int(_) | Literal::None)
    }
}

/// Text cell with an optional pattern
///
/// The pattern must match at the start of the input; it need not consume
/// the whole input unless it ends with `$`.
#[derive(Debug, Clone)]
pub struct StringCell {
    label: String,
    pattern: Option<Pattern>,
    value: Option<Literal>,
}

/// Declared pattern and its start-anchored form
#[derive(Debug, Clone)]
struct Pattern {
    source: String,
    anchored: Regex,
}

impl Pattern {
    fn compile(source: &str) -> Result<Self, regex::Error> {
        // Checked alone first: wrapping can make an unbalanced pattern valid
        Regex::new(source)?;
        let anchored = Regex::new(&format!("^(?:{source})"))?;
        Ok(Self {
            source: source.to_string(),
            anchored,
        })
    }
}

impl StringCell {
    /// Cell without pattern
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            pattern: None,
            value: None,
        }
    }

    /// Build from a field declaration
    ///
    /// # Errors
    /// Returns [`FormError::InvalidConstraint`] for bounds or a pattern that
    /// does not compile.
    pub fn from_spec(label: &str, spec: &FieldSpec) -> Result<Self, FormError> {
        if spec.min.is_some() || spec.max.is_some() {
            return Err(FormError::invalid_constraint(
                label,
                "'min' and 'max' do not apply to text fields",
            ));
        }
        let pattern = spec
            .pattern
            .as_deref()
            .map(Pattern::compile)
            .transpose()
            .map_err(|e| FormError::invalid_constraint(label, e.to_string()))?;
        Ok(Self {
            pattern,
            ..Self::new(label)
        })
    }

    fn matches(&self, input: &str) -> bool {
        self.pattern
            .as_ref()
            .map_or(true, |p| p.anchored.is_match(input))
    }
}

impl InputCell for StringCell {
    fn label(&self) -> &str {
        &self.label
    }

    fn kind(&self) -> &'static str {
        "str"
    }

    fn capture(&mut self, raw: &str) -> Capture {
        if raw.is_empty() {
            return Capture::Empty;
        }
        if !self.matches(raw) {
            return Capture::Invalid(ValidationError::PatternMismatch {
                input: raw.to_string(),
                pattern: self
                    .pattern
                    .as_ref()
                    .map(|p| p.source.clone())
                    .unwrap_or_default(),
            });
        }
        self.value = Some(Literal::Str(raw.to_string()));
        Capture::Filled(Literal::Str(raw.to_string()))
    }

    fn value(&self) -> Option<&Literal> {
        self.value.as_ref()
    }

    fn conforms(&self, value: &Literal) -> bool {
        matches!(value, Literal::Str(_) | Literal::None)
    }
}
