use super::error::SaftError;
use super::validation::ValidatedLedger;

/// Consumer of a validated ledger, e.g. a CSV or spreadsheet writer.
///
/// A sink is only ever handed a ledger that passed every balance check.
/// Implementations own formatting (delimiters, decimal separators,
/// encoding) and must not leave partial output behind when they fail.
pub trait ExportSink {
    fn export(&mut self, ledger: &ValidatedLedger) -> Result<(), SaftError>;
}

/// Sink that keeps the last exported ledger in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    pub exported: Option<ValidatedLedger>,
}

impl ExportSink for MemorySink {
    fn export(&mut self, ledger: &ValidatedLedger) -> Result<(), SaftError> {
        self.exported = Some(ledger.clone());
        Ok(())
    }
}
