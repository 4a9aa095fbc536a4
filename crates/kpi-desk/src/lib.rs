//! KPI Desk
//!
//! Role-gated data entry for KPI records kept in pipe-delimited tables.
//!
//! # Flow
//!
//! 1. [`KpiDesk::login`]: the credential gate admits or refuses the user
//!    and the role is resolved.
//! 2. [`KpiDesk::run`]: the user picks an action.
//! 3. [`KpiDesk::update_kpi`] / [`KpiDesk::enter_new`]: the role's
//!    accessible records are filtered, the user picks a KPI and date, a form
//!    is generated from the KPI's schema, and the confirmed values are
//!    written back with a version check.
//!
//! All interaction goes through a [`kpi_form::Surface`].
//!
//! # Example
//!
//! ```no_run
//! use kpi_desk::{DeskConfig, KpiDesk};
//!
//! # fn main() -> Result<(), kpi_desk::DeskError> {
//! let desk = KpiDesk::open(DeskConfig::new().with_data_dir("/srv/kpi"))?;
//! println!("{} KPI rows", desk.store().kpi_table().len());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod config;
pub mod desk;
pub mod error;

pub use config::DeskConfig;
pub use desk::{parse_value_date, Action, KpiDesk, Outcome, Session, DATE_FORMAT};
pub use error::{DeskError, ErrorCategory};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
