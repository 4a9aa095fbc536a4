//! KPI Access
//!
//! Decides who may see which KPI records:
//!
//! - [`CredentialGate`]: identifier → admitted or refused
//! - [`RoleResolver`]: identifier → role id
//! - [`AccessFilter`]: role id → allow list → accessible records
//! - [`TemplateResolver`]: KPI name → schema
//!
//! Every lookup is an exact match, and a missing row is an error rather
//! than a default.

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod error;
pub mod filter;
pub mod gate;
pub mod role;
pub mod template;

pub use error::AccessError;
pub use filter::{allowed_ids, filter_records, AccessFilter, AccessView};
pub use gate::CredentialGate;
pub use role::RoleResolver;
pub use template::TemplateResolver;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
