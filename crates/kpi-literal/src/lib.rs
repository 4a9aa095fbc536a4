//! KPI Literal Codec
//!
//! Strict encoding for the list and mapping values kept inside KPI table
//! cells, such as role allow lists (`['K1','K2']`), KPI values
//! (`{'target':100}`) and schema metadata (`{'target':'int'}`).
//!
//! # Core Operations
//!
//! - **Decode**: [`parse_literal`], [`parse_list`], [`parse_map`]
//! - **Encode**: [`Literal::encode`], [`encode_map`], [`encode_list`]
//!
//! Decoding never evaluates anything; input outside literal syntax is a
//! [`ParseError`].
//!
//! # Example
//!
//! ```
//! use kpi_literal::{encode_map, parse_map, Literal};
//!
//! let mut values = parse_map("{'target': 100}").unwrap();
//! values.insert("target".to_string(), Literal::Int(150));
//! assert_eq!(encode_map(&values), "{'target':150}");
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod error;
pub mod literal;
pub mod parser;

pub use error::ParseError;
pub use literal::{encode_list, encode_map, Literal, LiteralMap};
pub use parser::{parse_list, parse_literal, parse_map, MAX_DEPTH};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
