//! Reconciling entered values with the stored original
//!
//! The original mapping is never modified. Entries are folded into a fresh
//! copy, so fields the user skipped keep their stored value and the caller
//! can still show the untouched original next to the result.

use crate::cell::Capture;
use crate::generator::Form;
use crate::surface::{Notice, Prompt, Surface};
use kpi_literal::{Literal, LiteralMap};

/// Fold entries over a copy of `original`
///
/// Later entries for the same field win. Fields absent from `original` are
/// appended in entry order.
#[must_use]
pub fn reconcile<I>(original: &LiteralMap, entries: I) -> LiteralMap
where
    I: IntoIterator<Item = (String, Literal)>,
{
    entries
        .into_iter()
        .fold(original.clone(), |mut acc, (field, value)| {
            acc.insert(field, value);
            acc
        })
}

/// One interactive pass over a form
#[derive(Debug)]
pub struct FormSession<'a> {
    form: Form,
    original: &'a LiteralMap,
    confirm_label: String,
}

impl<'a> FormSession<'a> {
    /// Create session editing `original`
    #[must_use]
    pub fn new(form: Form, original: &'a LiteralMap) -> Self {
        Self {
            form,
            original,
            confirm_label: "Submit".to_string(),
        }
    }

    /// With a different confirmation question
    #[must_use]
    pub fn with_confirm_label(mut self, label: impl Into<String>) -> Self {
        self.confirm_label = label.into();
        self
    }

    /// Prompt for every field, show the result and ask for confirmation
    ///
    /// Empty input keeps the stored value and shows a warning. Invalid input
    /// shows an error and asks for the same field again. Returns the
    /// reconciled mapping only if the user confirms; `None` means nothing
    /// should be written.
    pub fn run(mut self, surface: &mut dyn Surface) -> Option<LiteralMap> {
        let mut entries = Vec::new();

        for cell in self.form.cells_mut() {
            let mut prompt = Prompt::new(cell.label());
            if let Some(value) = self.original.get(cell.label()).filter(|v| !v.is_none()) {
                prompt = prompt.with_placeholder(format!("Example: {value}"));
            }

            loop {
                let raw = surface.prompt(&prompt)?;
                match cell.capture(&raw) {
                    Capture::Filled(value) => {
                        surface.notify(Notice::info(format!("the new value is: {value}")));
                        entries.push((cell.label().to_string(), value));
                        break;
                    }
                    Capture::Empty => {
                        surface.notify(Notice::warning("Please fill the cell"));
                        break;
                    }
                    Capture::Invalid(err) => {
                        tracing::debug!(field = cell.label(), error = %err, "rejected input");
                        surface.notify(Notice::error(format!(
                            "The input value '{}' is not valid.",
                            err.input()
                        )));
                    }
                }
            }
        }

        let updated = reconcile(self.original, entries);
        surface.compare(self.original, &updated);
        if surface.confirm(&self.confirm_label) {
            Some(updated)
        } else {
            tracing::debug!(kpi = self.form.kpi_name(), "form discarded");
            None
        }
    }
}
