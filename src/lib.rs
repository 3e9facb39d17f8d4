//! # saft-ledger
//!
//! Streaming reader for SAF-T (Standard Audit File for Tax) general ledger
//! exports, with double-entry consistency checks before anything is handed
//! to an export sink.
//!
//! All monetary values use [`rust_decimal::Decimal`]. Locale-formatted
//! amounts (`1 234,56`, `1234.56`) are normalized on the way in; fields
//! that cannot be read become `None` and are counted, never fatal.
//!
//! ## Quick Start
//!
//! ```rust
//! # #[cfg(feature = "parser")] {
//! use saft_ledger::{LoadConfig, validate};
//! use saft_ledger::parser::parse_bytes;
//!
//! let xml = br#"<AuditFile xmlns="urn:StandardAuditFile-Taxation-Financial:NO">
//!   <MasterFiles><GeneralLedgerAccounts>
//!     <Account><AccountID>1920</AccountID><AccountDescription>Bank</AccountDescription></Account>
//!     <Account><AccountID>3000</AccountID><AccountDescription>Sales</AccountDescription></Account>
//!   </GeneralLedgerAccounts></MasterFiles>
//!   <GeneralLedgerEntries><Journal><JournalID>GL</JournalID>
//!     <Transaction><VoucherNo>1</VoucherNo>
//!       <Line><AccountID>1920</AccountID><DebitAmount><Amount>1 250,00</Amount></DebitAmount></Line>
//!       <Line><AccountID>3000</AccountID><CreditAmount><Amount>1 250,00</Amount></CreditAmount></Line>
//!     </Transaction>
//!   </Journal></GeneralLedgerEntries>
//! </AuditFile>"#;
//!
//! let config = LoadConfig::default();
//! let ledger = parse_bytes(xml, &config).unwrap();
//! let validated = validate(ledger, &config).unwrap();
//! assert!(validated.balance().is_balanced());
//! assert!(validated.references().missing_accounts.is_empty());
//! # }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `core` (default) | Record types, normalizer, configuration, consistency checks |
//! | `parser` (default) | ZIP guard, namespace detection, streaming parser, load pipeline |
//! | `export` | Semicolon CSV export sink |
//! | `all` | Everything |

#[cfg(feature = "core")]
pub mod core;

#[cfg(feature = "parser")]
pub mod parser;

#[cfg(feature = "export")]
pub mod export;

#[cfg(feature = "core")]
pub use crate::core::*;
