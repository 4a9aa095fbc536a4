//! KPI Forms
//!
//! Builds typed input forms from KPI schemas and runs them against an
//! interactive [`Surface`].
//!
//! # Pipeline
//!
//! 1. [`FormGenerator`] resolves each schema field's type tag through a
//!    [`CellRegistry`] and builds one [`InputCell`] per field.
//! 2. [`FormSession`] prompts for every cell, folds accepted values over the
//!    stored original with [`reconcile`], shows both side by side and asks
//!    for confirmation.
//!
//! Validation failures ([`ValidationError`]) never abort a form; the field
//! is asked again.

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod cell;
pub mod error;
pub mod generator;
pub mod reconciler;
pub mod registry;
pub mod surface;

pub use cell::{Capture, DecimalCell, InputCell, IntCell, StringCell};
pub use error::{FormError, ValidationError};
pub use generator::{Form, FormGenerator};
pub use reconciler::{reconcile, FormSession};
pub use registry::{CellFactory, CellRegistry};
pub use surface::{Notice, NoticeLevel, Prompt, Surface};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
