use thiserror::Error;

use super::validation::BalanceReport;

/// Fatal conditions that abort loading a SAF-T document.
///
/// Field-level misses and unparsable numbers are not errors: they surface as
/// `None` on the record and as counters in [`ParseStats`](super::ParseStats).
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SaftError {
    /// Malformed XML, missing root, an archive without exactly one `.xml` member,
    /// or voucher totals beyond the decimal range.
    #[error("structural error: {0}")]
    Structural(String),

    /// The archive's uncompressed/compressed ratio exceeds the configured threshold.
    #[error("zip bomb suspected: decompression ratio {ratio:.1} exceeds threshold {threshold:.1}")]
    ZipBombSuspected { ratio: f64, threshold: f64 },

    /// The document failed the externally supplied XSD check.
    #[error("schema validation failed: {0}")]
    SchemaValidation(String),

    /// Global, per-journal or per-VAT-code debit/credit imbalance beyond tolerance.
    #[error("balance violation: {0}")]
    BalanceViolation(Box<BalanceReport>),

    /// The caller cancelled the parse.
    #[error("parse cancelled")]
    Cancelled,

    /// The export sink failed to write its output.
    #[error("export error: {0}")]
    Export(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl SaftError {
    /// Shorthand for [`SaftError::Structural`].
    pub fn structural(msg: impl Into<String>) -> Self {
        SaftError::Structural(msg.into())
    }

    /// The balance report behind a [`SaftError::BalanceViolation`], if any.
    pub fn balance_report(&self) -> Option<&BalanceReport> {
        match self {
            SaftError::BalanceViolation(report) => Some(report),
            _ => None,
        }
    }
}
