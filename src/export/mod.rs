//! CSV export of a validated ledger.
//!
//! Produces one UTF-8 file per collection with a header row: `header.csv`,
//! `bank_accounts.csv`, `accounts.csv`, `customers.csv`, `suppliers.csv`,
//! `party_accounts.csv`, `journals.csv`, `vouchers.csv`, `transactions.csv`,
//! `analysis_lines.csv`, `tax_codes.csv`, `invoices.csv`,
//! `party_balances.csv` and `missing_accounts.csv`.
//!
//! # Example
//!
//! ```ignore
//! use saft_ledger::export::*;
//!
//! let export = to_csv(&validated, &CsvConfig::default());
//! // export.files: vec of (filename, csv_content) pairs
//!
//! let mut sink = CsvDirSink::new("out/");
//! loader.run("SAF-T.xml", &mut sink)?;
//! ```

mod csv_export;

use std::fs;
use std::path::{Path, PathBuf};

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::core::{ExportSink, SaftError, ValidatedLedger};

/// Formatting of the CSV files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CsvConfig {
    /// Field separator.
    pub delimiter: char,
    /// Write `1234,56` instead of `1234.56`.
    pub decimal_comma: bool,
}

impl Default for CsvConfig {
    fn default() -> Self {
        Self {
            delimiter: ';',
            decimal_comma: true,
        }
    }
}

/// Result of a CSV export.
#[derive(Debug, Clone)]
pub struct CsvExport {
    /// Data files: Vec of (filename, content) pairs.
    pub files: Vec<(String, String)>,
}

impl CsvExport {
    pub fn file(&self, name: &str) -> Option<&str> {
        self.files
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, c)| c.as_str())
    }
}

/// Render every collection of `validated` as CSV.
pub fn to_csv(validated: &ValidatedLedger, config: &CsvConfig) -> CsvExport {
    let ledger = validated.ledger();
    CsvExport {
        files: vec![
            ("header.csv".into(), csv_export::headers(ledger, config)),
            (
                "bank_accounts.csv".into(),
                csv_export::bank_accounts(ledger, config),
            ),
            ("accounts.csv".into(), csv_export::accounts(ledger, config)),
            (
                "customers.csv".into(),
                csv_export::parties(&ledger.customers, "customer_id", config),
            ),
            (
                "suppliers.csv".into(),
                csv_export::parties(&ledger.suppliers, "supplier_id", config),
            ),
            (
                "party_accounts.csv".into(),
                csv_export::party_accounts(ledger, config),
            ),
            ("journals.csv".into(), csv_export::journals(ledger, config)),
            ("vouchers.csv".into(), csv_export::vouchers(ledger, config)),
            (
                "transactions.csv".into(),
                csv_export::transactions(ledger, config),
            ),
            (
                "analysis_lines.csv".into(),
                csv_export::analysis_lines(ledger, config),
            ),
            ("tax_codes.csv".into(), csv_export::tax_codes(ledger, config)),
            ("invoices.csv".into(), csv_export::invoices(ledger, config)),
            (
                "party_balances.csv".into(),
                csv_export::party_balances(validated, config),
            ),
            (
                "missing_accounts.csv".into(),
                csv_export::missing_accounts(validated, config),
            ),
        ],
    }
}

/// [`ExportSink`] writing [`to_csv`] output into a directory.
///
/// Every file is rendered before the first one is written; files already
/// written are removed again if a later write fails.
#[derive(Debug, Clone)]
pub struct CsvDirSink {
    dir: PathBuf,
    config: CsvConfig,
}

impl CsvDirSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            config: CsvConfig::default(),
        }
    }

    pub fn with_config(mut self, config: CsvConfig) -> Self {
        self.config = config;
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl ExportSink for CsvDirSink {
    fn export(&mut self, ledger: &ValidatedLedger) -> Result<(), SaftError> {
        let export = to_csv(ledger, &self.config);
        fs::create_dir_all(&self.dir).map_err(|e| {
            SaftError::Export(format!("cannot create {}: {e}", self.dir.display()))
        })?;

        let mut written: Vec<PathBuf> = Vec::new();
        for (name, content) in &export.files {
            let path = self.dir.join(name);
            if let Err(e) = fs::write(&path, content) {
                for done in &written {
                    if let Err(rm) = fs::remove_file(done) {
                        warn!("cannot remove partial export {}: {rm}", done.display());
                    }
                }
                return Err(SaftError::Export(format!(
                    "cannot write {}: {e}",
                    path.display()
                )));
            }
            written.push(path);
        }
        info!(
            "exported {} files to {}",
            written.len(),
            self.dir.display()
        );
        Ok(())
    }
}
