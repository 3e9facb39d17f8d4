//! Streaming SAF-T reader.
//!
//! Loading is three passes over the same source, none of which builds a
//! document tree:
//!
//! 1. optional schema pre-validation through a caller-supplied [`SchemaValidator`],
//! 2. namespace detection on the root element,
//! 3. a single event-driven pass that tracks the enclosing journal and
//!    voucher and emits one record per record element.
//!
//! Input may be a `.xml` file or a ZIP archive holding exactly one `.xml`
//! member. Archives are checked against the configured decompression ratio
//! before anything is inflated.
//!
//! # Example
//!
//! ```no_run
//! use saft_ledger::parser::Loader;
//! use saft_ledger::LoadConfig;
//!
//! let loader = Loader::new(LoadConfig::default());
//! let validated = loader.load("SAF-T_2024.zip")?;
//! println!("{}", validated.balance());
//! # Ok::<(), saft_ledger::SaftError>(())
//! ```

mod builders;
mod context;
mod element;
mod fields;
mod namespace;
mod source;
mod stream;

use std::io::BufRead;
use std::path::Path;

use log::{debug, info};

use crate::core::*;

pub use context::{ContextState, LedgerContext, VoucherSource};
pub use namespace::{SAFT_NAMESPACE, detect_namespace};
pub use source::{SaftSource, compression_ratio, is_zip};

/// XSD validation backend.
///
/// The crate ships no schema engine; callers that set
/// [`LoadConfig::xsd_path`] plug one in here. The error string is reported
/// as [`SaftError::SchemaValidation`].
pub trait SchemaValidator {
    fn validate(&self, xsd: &Path, document: &mut dyn BufRead) -> Result<(), String>;
}

/// Runs the load pipeline for one configuration.
pub struct Loader<'v> {
    config: LoadConfig,
    schema: Option<&'v dyn SchemaValidator>,
}

impl<'v> Loader<'v> {
    pub fn new(config: LoadConfig) -> Self {
        Self {
            config,
            schema: None,
        }
    }

    pub fn with_schema_validator(mut self, validator: &'v dyn SchemaValidator) -> Self {
        self.schema = Some(validator);
        self
    }

    pub fn config(&self) -> &LoadConfig {
        &self.config
    }

    /// Parse without balance checks.
    pub fn parse(&self, path: impl AsRef<Path>) -> Result<Ledger, SaftError> {
        let path = path.as_ref();
        let mut source = SaftSource::open(path, self.config.max_zip_ratio)?;

        if let Some(xsd) = &self.config.xsd_path {
            let Some(schema) = self.schema else {
                return Err(SaftError::SchemaValidation(format!(
                    "schema {} configured but no validator available",
                    xsd.display()
                )));
            };
            let mut reader = source.reader()?;
            schema
                .validate(xsd, &mut reader)
                .map_err(SaftError::SchemaValidation)?;
            debug!("{}: valid against {}", path.display(), xsd.display());
        }

        let namespace = detect_namespace(source.reader()?)?;
        debug!("{}: namespace {:?}", path.display(), namespace);
        stream::parse_stream(source.reader()?, namespace, &self.config)
    }

    /// Parse and run the consistency checks.
    pub fn load(&self, path: impl AsRef<Path>) -> Result<ValidatedLedger, SaftError> {
        let ledger = self.parse(path)?;
        validate(ledger, &self.config)
    }

    /// Load, then hand the validated ledger to `sink` unless `validate_only` is set.
    pub fn run(
        &self,
        path: impl AsRef<Path>,
        sink: &mut dyn ExportSink,
    ) -> Result<ValidatedLedger, SaftError> {
        let validated = self.load(path)?;
        if self.config.validate_only {
            info!("validate-only run, export skipped");
        } else {
            sink.export(&validated)?;
        }
        Ok(validated)
    }
}

/// Parse a file with `config` and no schema validator.
pub fn parse_path(path: impl AsRef<Path>, config: &LoadConfig) -> Result<Ledger, SaftError> {
    Loader::new(config.clone()).parse(path)
}

/// Parse and validate a file with `config` and no schema validator.
pub fn load(path: impl AsRef<Path>, config: &LoadConfig) -> Result<ValidatedLedger, SaftError> {
    Loader::new(config.clone()).load(path)
}

/// Parse an in-memory XML document. ZIP payloads are not accepted here.
///
/// ```
/// use saft_ledger::{LoadConfig, parser::parse_bytes};
///
/// let xml = br#"<AuditFile xmlns="urn:StandardAuditFile-Taxation-Financial:NO">
///   <GeneralLedgerEntries><Journal><JournalID>GL</JournalID>
///     <Transaction><VoucherNo>1</VoucherNo>
///       <Line><AccountID>1920</AccountID><DebitAmount><Amount>100,00</Amount></DebitAmount></Line>
///       <Line><AccountID>3000</AccountID><CreditAmount><Amount>100,00</Amount></CreditAmount></Line>
///     </Transaction>
///   </Journal></GeneralLedgerEntries>
/// </AuditFile>"#;
/// let ledger = parse_bytes(xml, &LoadConfig::default()).unwrap();
/// assert_eq!(ledger.lines.len(), 2);
/// assert_eq!(ledger.lines[0].voucher_no.as_deref(), Some("1"));
/// ```
pub fn parse_bytes(xml: &[u8], config: &LoadConfig) -> Result<Ledger, SaftError> {
    let namespace = detect_namespace(xml)?;
    stream::parse_stream(xml, namespace, config)
}
