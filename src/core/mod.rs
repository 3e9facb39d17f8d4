//! Ledger record types, value normalization, configuration and the
//! double-entry consistency checks.
//!
//! Nothing in this module touches XML; the parser fills a [`Ledger`] and
//! everything here works on that.

mod config;
mod error;
pub mod normalize;
mod sink;
mod types;
mod validation;

pub use config::*;
pub use error::*;
pub use normalize::{normalize_decimal, parse_date};
pub use sink::*;
pub use types::*;
pub use validation::*;
