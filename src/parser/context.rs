//! Ambient journal/voucher identity for line-level records.

use rust_decimal::Decimal;

use crate::core::SaftError;

/// Where the parser currently is relative to the ledger structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContextState {
    #[default]
    Idle,
    InJournal,
    InTransaction,
}

/// Which element supplied the current voucher number. Higher wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum VoucherSource {
    VoucherId,
    VoucherNo,
}

/// Journal and voucher identifiers inherited by descendant lines.
///
/// Owned by a single parse; lines read the values active at their
/// end-event, whatever the nesting depth in between.
#[derive(Debug, Default)]
pub struct LedgerContext {
    state: ContextState,
    journal_open: bool,
    journal_id: Option<String>,
    voucher: Option<(VoucherSource, String)>,
    voucher_debit: Decimal,
    voucher_credit: Decimal,
}

impl LedgerContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> ContextState {
        self.state
    }

    /// `start(Journal)`: new journal scope, voucher cleared.
    pub fn start_journal(&mut self, journal_id: Option<String>) {
        self.journal_id = journal_id;
        self.journal_open = true;
        self.voucher = None;
        self.state = ContextState::InJournal;
    }

    /// The journal's `JournalID` became known.
    pub fn set_journal_id(&mut self, journal_id: String) {
        if self.journal_open {
            self.journal_id = Some(journal_id);
        }
    }

    /// `start(Transaction)`: new voucher scope with zeroed totals.
    pub fn start_transaction(&mut self) {
        self.voucher = None;
        self.voucher_debit = Decimal::ZERO;
        self.voucher_credit = Decimal::ZERO;
        self.state = ContextState::InTransaction;
    }

    /// Offer a voucher number; `VoucherNo` beats `VoucherID` whatever the
    /// order they appear in.
    pub fn offer_voucher(&mut self, source: VoucherSource, value: String) {
        if self.state != ContextState::InTransaction {
            return;
        }
        match &self.voucher {
            Some((current, _)) if *current > source => {}
            _ => self.voucher = Some((source, value)),
        }
    }

    /// Accumulate a line's amounts into the open voucher's totals.
    ///
    /// Totals beyond the decimal range are a structural error.
    pub fn add_line(
        &mut self,
        debit: Option<Decimal>,
        credit: Option<Decimal>,
    ) -> Result<(), SaftError> {
        if self.state != ContextState::InTransaction {
            return Ok(());
        }
        let debit = self.voucher_debit.checked_add(debit.unwrap_or_default());
        let credit = self.voucher_credit.checked_add(credit.unwrap_or_default());
        match (debit, credit) {
            (Some(debit), Some(credit)) => {
                self.voucher_debit = debit;
                self.voucher_credit = credit;
                Ok(())
            }
            _ => Err(SaftError::structural(format!(
                "totals of voucher {} overflow",
                self.voucher_no().unwrap_or("<none>")
            ))),
        }
    }

    /// Debit and credit totals of the open voucher.
    pub fn voucher_totals(&self) -> (Decimal, Decimal) {
        (self.voucher_debit, self.voucher_credit)
    }

    /// `end(Transaction)`: back to the journal scope.
    pub fn end_transaction(&mut self) {
        self.voucher = None;
        self.state = if self.journal_open {
            ContextState::InJournal
        } else {
            ContextState::Idle
        };
    }

    /// `end(Journal)`: everything cleared.
    pub fn end_journal(&mut self) {
        self.journal_id = None;
        self.journal_open = false;
        self.voucher = None;
        self.state = ContextState::Idle;
    }

    pub fn journal_id(&self) -> Option<&str> {
        self.journal_id.as_deref()
    }

    /// `VoucherNo`, else `VoucherID`, else the journal id.
    pub fn voucher_no(&self) -> Option<&str> {
        self.voucher
            .as_ref()
            .map(|(_, v)| v.as_str())
            .or(self.journal_id.as_deref())
    }
}
