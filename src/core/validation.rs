use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fmt;

use log::{info, warn};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::config::LoadConfig;
use super::error::SaftError;
use super::types::*;

/// Debit and credit sums for one group of lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Imbalance {
    /// Group key (journal id, VAT code, voucher or party); `None` for lines without one.
    pub key: Option<String>,
    pub debit: Decimal,
    pub credit: Decimal,
    /// A sum left the decimal range; `debit`/`credit` hold the last in-range values.
    pub overflowed: bool,
}

impl Imbalance {
    /// Debit minus credit.
    pub fn difference(&self) -> Decimal {
        self.debit.saturating_sub(self.credit)
    }

    fn exceeds(&self, tolerance: Decimal) -> bool {
        self.overflowed || self.difference().abs() > tolerance
    }
}

/// Running debit/credit sums. Overflow is recorded, never panics.
#[derive(Debug, Clone, Copy, Default)]
struct Sums {
    debit: Decimal,
    credit: Decimal,
    overflowed: bool,
}

impl Sums {
    fn add(&mut self, debit: Option<Decimal>, credit: Option<Decimal>) {
        if self.overflowed {
            return;
        }
        let debit = self.debit.checked_add(debit.unwrap_or_default());
        let credit = self.credit.checked_add(credit.unwrap_or_default());
        match (debit, credit) {
            (Some(debit), Some(credit)) => {
                self.debit = debit;
                self.credit = credit;
            }
            _ => self.overflowed = true,
        }
    }

    fn of_lines<'a>(lines: impl IntoIterator<Item = &'a TransactionLine>) -> Self {
        let mut sums = Sums::default();
        for l in lines {
            sums.add(l.debit, l.credit);
        }
        sums
    }

    fn into_imbalance(self, key: Option<String>) -> Imbalance {
        Imbalance {
            key,
            debit: self.debit,
            credit: self.credit,
            overflowed: self.overflowed,
        }
    }
}

impl fmt::Display for Imbalance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: debit {} credit {} (difference {})",
            self.key.as_deref().unwrap_or("<none>"),
            self.debit,
            self.credit,
            self.difference()
        )?;
        if self.overflowed {
            f.write_str(" [sum overflow]")?;
        }
        Ok(())
    }
}

/// Outcome of the double-entry checks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceReport {
    pub tolerance: Decimal,
    pub total_debit: Decimal,
    pub total_credit: Decimal,
    /// Every journal, worst absolute imbalance first.
    pub journals: Vec<Imbalance>,
    /// Every VAT code (`vat_debit` vs `vat_credit`), worst first.
    pub vat_codes: Vec<Imbalance>,
    /// Number of offenders listed in diagnostics.
    pub max_offenders: usize,
    /// The global sums left the decimal range.
    pub overflowed: bool,
}

impl BalanceReport {
    /// Σdebit − Σcredit over all lines.
    pub fn global_difference(&self) -> Decimal {
        self.total_debit.saturating_sub(self.total_credit)
    }

    pub fn is_globally_balanced(&self) -> bool {
        !self.overflowed && self.global_difference().abs() <= self.tolerance
    }

    /// Journals beyond tolerance, worst first, capped at `max_offenders`.
    pub fn journal_offenders(&self) -> impl Iterator<Item = &Imbalance> {
        let tolerance = self.tolerance;
        self.journals
            .iter()
            .filter(move |j| j.exceeds(tolerance))
            .take(self.max_offenders)
    }

    /// VAT codes beyond tolerance, worst first, capped at `max_offenders`.
    pub fn vat_offenders(&self) -> impl Iterator<Item = &Imbalance> {
        let tolerance = self.tolerance;
        self.vat_codes
            .iter()
            .filter(move |v| v.exceeds(tolerance))
            .take(self.max_offenders)
    }

    /// The balance entry of a single journal.
    pub fn journal(&self, journal_id: &str) -> Option<&Imbalance> {
        self.journals
            .iter()
            .find(|j| j.key.as_deref() == Some(journal_id))
    }

    /// True when the global, per-journal and per-VAT checks all pass.
    pub fn is_balanced(&self) -> bool {
        self.is_globally_balanced()
            && !self.journals.iter().any(|j| j.exceeds(self.tolerance))
            && !self.vat_codes.iter().any(|v| v.exceeds(self.tolerance))
    }
}

impl fmt::Display for BalanceReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "total debit {} total credit {} (difference {})",
            self.total_debit,
            self.total_credit,
            self.global_difference()
        )?;
        if self.overflowed {
            f.write_str(" [sum overflow]")?;
        }
        let journals: Vec<String> = self.journal_offenders().map(|j| j.to_string()).collect();
        if !journals.is_empty() {
            write!(f, "; unbalanced journals: {}", journals.join(", "))?;
        }
        let vat: Vec<String> = self.vat_offenders().map(|v| v.to_string()).collect();
        if !vat.is_empty() {
            write!(f, "; unbalanced VAT codes: {}", vat.join(", "))?;
        }
        Ok(())
    }
}

/// Debit/credit sums per key, in key order.
fn sums_by<'a>(
    lines: impl IntoIterator<Item = &'a TransactionLine>,
    key: impl Fn(&'a TransactionLine) -> Option<&'a String>,
    debit: impl Fn(&TransactionLine) -> Option<Decimal>,
    credit: impl Fn(&TransactionLine) -> Option<Decimal>,
) -> Vec<Imbalance> {
    let mut groups: BTreeMap<Option<&String>, Sums> = BTreeMap::new();
    for line in lines {
        groups
            .entry(key(line))
            .or_default()
            .add(debit(line), credit(line));
    }
    groups
        .into_iter()
        .map(|(k, sums)| sums.into_imbalance(k.cloned()))
        .collect()
}

/// [`sums_by`], worst first: overflows, then by absolute difference.
fn grouped<'a>(
    lines: &'a [TransactionLine],
    key: impl Fn(&'a TransactionLine) -> Option<&'a String>,
    debit: impl Fn(&TransactionLine) -> Option<Decimal>,
    credit: impl Fn(&TransactionLine) -> Option<Decimal>,
) -> Vec<Imbalance> {
    let mut out = sums_by(lines, key, debit, credit);
    // Stable sort keeps key order among equal imbalances.
    out.sort_by(|a, b| {
        (b.overflowed, b.difference().abs()).cmp(&(a.overflowed, a.difference().abs()))
    });
    out
}

/// Compute global, per-journal and per-VAT-code debit/credit sums.
///
/// Missing amounts count as zero here; this is the aggregation step.
pub fn check_balances(ledger: &Ledger, tolerance: Decimal, max_offenders: usize) -> BalanceReport {
    let totals = Sums::of_lines(&ledger.lines);

    let journals = grouped(
        &ledger.lines,
        |l| l.journal_id.as_ref(),
        |l| l.debit,
        |l| l.credit,
    );
    let vat_codes = grouped(
        &ledger.lines,
        |l| l.vat_code.as_ref(),
        |l| l.vat_debit,
        |l| l.vat_credit,
    );

    BalanceReport {
        tolerance,
        total_debit: totals.debit,
        total_credit: totals.credit,
        journals,
        vat_codes,
        max_offenders,
        overflowed: totals.overflowed,
    }
}

/// An account whose lines do not carry its opening balance to its closing balance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountBalanceMismatch {
    pub account_id: String,
    pub opening_balance: Option<Decimal>,
    /// Σdebit − Σcredit of the account's lines; `None` if out of range.
    pub movement: Option<Decimal>,
    pub closing_balance: Decimal,
}

impl AccountBalanceMismatch {
    /// Opening balance (zero if absent) plus movement; `None` if out of range.
    pub fn expected_closing(&self) -> Option<Decimal> {
        self.opening_balance
            .unwrap_or_default()
            .checked_add(self.movement?)
    }
}

impl fmt::Display for AccountBalanceMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.expected_closing() {
            Some(expected) => write!(
                f,
                "{}: lines lead to {expected}, closing balance {}",
                self.account_id, self.closing_balance
            ),
            None => write!(f, "{}: movement out of range", self.account_id),
        }
    }
}

/// Non-fatal referential and control-total findings, plus the per-party
/// balance listings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceReport {
    /// Account ids used by lines but absent from the account master, sorted.
    pub missing_accounts: Vec<String>,
    pub unknown_customers: Vec<String>,
    pub unknown_suppliers: Vec<String>,
    pub lines_without_account: usize,
    pub lines_without_journal: usize,
    /// Analysis lines whose record id matches no transaction line.
    pub orphan_analysis_lines: usize,
    /// Vouchers whose own lines do not balance.
    pub unbalanced_vouchers: Vec<Imbalance>,
    /// Declared `GeneralLedgerEntries` totals that disagree with the lines.
    pub declared_total_mismatches: Vec<String>,
    /// Trial balance: master accounts whose closing balance is not the
    /// opening balance plus the movement of their lines, by account id.
    pub account_balance_mismatches: Vec<AccountBalanceMismatch>,
    /// Debit/credit of the lines carrying each customer id, by id.
    pub customer_balances: Vec<Imbalance>,
    /// Debit/credit of the lines carrying each supplier id, by id.
    pub supplier_balances: Vec<Imbalance>,
}

impl ReferenceReport {
    /// No findings. The customer and supplier balances are listings, not findings.
    pub fn is_clean(&self) -> bool {
        self.missing_accounts.is_empty()
            && self.unknown_customers.is_empty()
            && self.unknown_suppliers.is_empty()
            && self.lines_without_account == 0
            && self.lines_without_journal == 0
            && self.orphan_analysis_lines == 0
            && self.unbalanced_vouchers.is_empty()
            && self.declared_total_mismatches.is_empty()
            && self.account_balance_mismatches.is_empty()
    }
}

/// Compare each master account's closing balance with its opening balance
/// plus the net movement of its lines. Accounts without a closing balance
/// are skipped.
fn trial_balance(ledger: &Ledger, tolerance: Decimal) -> Vec<AccountBalanceMismatch> {
    let mut movements: BTreeMap<&String, Sums> = BTreeMap::new();
    for l in &ledger.lines {
        if let Some(id) = &l.account_id {
            movements.entry(id).or_default().add(l.debit, l.credit);
        }
    }

    let mut mismatches: Vec<AccountBalanceMismatch> = ledger
        .accounts
        .iter()
        .filter_map(|a| {
            let account_id = a.account_id.as_ref()?;
            let closing_balance = a.closing_balance?;
            let sums = movements.get(account_id).copied().unwrap_or_default();
            let movement = if sums.overflowed {
                None
            } else {
                sums.debit.checked_sub(sums.credit)
            };
            let mismatch = AccountBalanceMismatch {
                account_id: account_id.clone(),
                opening_balance: a.opening_balance,
                movement,
                closing_balance,
            };
            let off = match mismatch.expected_closing() {
                Some(expected) => expected.saturating_sub(closing_balance).abs() > tolerance,
                None => true,
            };
            off.then_some(mismatch)
        })
        .collect();
    mismatches.sort_by(|a, b| a.account_id.cmp(&b.account_id));
    mismatches
}

fn unknown_ids<'a>(
    used: impl Iterator<Item = &'a String>,
    known: impl Iterator<Item = &'a String>,
) -> Vec<String> {
    let known: HashSet<&String> = known.collect();
    used.filter(|id| !known.contains(id))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .cloned()
        .collect()
}

/// Cross-check lines against master data, vouchers and declared totals.
pub fn check_references(ledger: &Ledger, tolerance: Decimal) -> ReferenceReport {
    let lines = &ledger.lines;

    let missing_accounts = unknown_ids(
        lines.iter().filter_map(|l| l.account_id.as_ref()),
        ledger.accounts.iter().filter_map(|a| a.account_id.as_ref()),
    );
    let unknown_customers = unknown_ids(
        lines.iter().filter_map(|l| l.customer_id.as_ref()),
        ledger.customers.iter().filter_map(|c| c.id.as_ref()),
    );
    let unknown_suppliers = unknown_ids(
        lines.iter().filter_map(|l| l.supplier_id.as_ref()),
        ledger.suppliers.iter().filter_map(|s| s.id.as_ref()),
    );

    let record_ids: HashSet<(Option<&String>, &String)> = lines
        .iter()
        .filter_map(|l| l.record_id.as_ref().map(|r| (l.journal_id.as_ref(), r)))
        .collect();
    let orphan_analysis_lines = ledger
        .analysis_lines
        .iter()
        .filter(|a| match &a.record_id {
            Some(r) => !record_ids.contains(&(a.journal_id.as_ref(), r)),
            None => true,
        })
        .count();

    let unbalanced_vouchers = ledger
        .vouchers
        .iter()
        .filter(|v| v.imbalance().abs() > tolerance)
        .map(|v| Imbalance {
            key: v.voucher_no.clone(),
            debit: v.debit_total,
            credit: v.credit_total,
            overflowed: false,
        })
        .collect();

    let mut declared_total_mismatches = Vec::new();
    let declared = &ledger.declared_totals;
    let computed = Sums::of_lines(lines);
    let sums = [
        ("TotalDebit", declared.total_debit, computed.debit),
        ("TotalCredit", declared.total_credit, computed.credit),
    ];
    for (name, declared, computed_sum) in sums {
        let Some(declared) = declared else {
            continue;
        };
        if computed.overflowed {
            declared_total_mismatches
                .push(format!("{name}: declared {declared}, computed sum out of range"));
        } else if declared.saturating_sub(computed_sum).abs() > tolerance {
            declared_total_mismatches
                .push(format!("{name}: declared {declared}, computed {computed_sum}"));
        }
    }
    if let Some(n) = declared.number_of_entries {
        let vouchers = ledger.vouchers.len() as u64;
        if n != vouchers {
            declared_total_mismatches
                .push(format!("NumberOfEntries: declared {n}, found {vouchers}"));
        }
    }

    ReferenceReport {
        missing_accounts,
        unknown_customers,
        unknown_suppliers,
        lines_without_account: lines.iter().filter(|l| l.account_id.is_none()).count(),
        lines_without_journal: lines.iter().filter(|l| l.journal_id.is_none()).count(),
        orphan_analysis_lines,
        unbalanced_vouchers,
        declared_total_mismatches,
        account_balance_mismatches: trial_balance(ledger, tolerance),
        customer_balances: sums_by(
            lines.iter().filter(|l| l.customer_id.is_some()),
            |l| l.customer_id.as_ref(),
            |l| l.debit,
            |l| l.credit,
        ),
        supplier_balances: sums_by(
            lines.iter().filter(|l| l.supplier_id.is_some()),
            |l| l.supplier_id.as_ref(),
            |l| l.debit,
            |l| l.credit,
        ),
    }
}

/// A ledger that passed every balance check.
///
/// Only [`validate`] constructs this type, so an export sink taking it can
/// never see an inconsistent ledger.
#[derive(Debug, Clone)]
pub struct ValidatedLedger {
    ledger: Ledger,
    balance: BalanceReport,
    references: ReferenceReport,
}

impl ValidatedLedger {
    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn balance(&self) -> &BalanceReport {
        &self.balance
    }

    pub fn references(&self) -> &ReferenceReport {
        &self.references
    }

    pub fn into_ledger(self) -> Ledger {
        self.ledger
    }
}

/// Run the balance checks and the reference report.
///
/// Fails with [`SaftError::BalanceViolation`] when the ledger is unbalanced
/// globally, per journal or per VAT code. Reference findings are logged but
/// never fail.
pub fn validate(ledger: Ledger, config: &LoadConfig) -> Result<ValidatedLedger, SaftError> {
    let balance = check_balances(&ledger, config.tolerance, config.max_offenders);
    if !balance.is_balanced() {
        warn!("ledger rejected: {balance}");
        return Err(SaftError::BalanceViolation(Box::new(balance)));
    }

    let references = check_references(&ledger, config.tolerance);
    if !references.missing_accounts.is_empty() {
        warn!("accounts missing from master data: {:?}", references.missing_accounts);
    }
    if references.lines_without_journal > 0 {
        warn!("{} lines outside any journal", references.lines_without_journal);
    }
    for mismatch in &references.declared_total_mismatches {
        warn!("control total mismatch: {mismatch}");
    }
    for mismatch in &references.account_balance_mismatches {
        warn!("trial balance mismatch: {mismatch}");
    }
    info!(
        "ledger balanced: {} lines in {} journals",
        ledger.lines.len(),
        balance.journals.len()
    );

    Ok(ValidatedLedger {
        ledger,
        balance,
        references,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn line(journal: &str, debit: Option<Decimal>, credit: Option<Decimal>) -> TransactionLine {
        TransactionLine {
            journal_id: Some(journal.into()),
            debit,
            credit,
            ..Default::default()
        }
    }

    #[test]
    fn offenders_sorted_worst_first() {
        let ledger = Ledger {
            lines: vec![
                line("A", Some(dec!(5)), None),
                line("B", Some(dec!(50)), None),
                line("C", Some(dec!(1)), Some(dec!(1))),
                line("D", None, Some(dec!(55))),
            ],
            ..Default::default()
        };
        let report = check_balances(&ledger, dec!(0.01), 2);
        assert!(report.is_globally_balanced());
        assert!(!report.is_balanced());
        let keys: Vec<_> = report
            .journal_offenders()
            .map(|j| j.key.clone().unwrap())
            .collect();
        assert_eq!(keys, vec!["D", "B"]);
        assert_eq!(report.journal("C").unwrap().difference(), dec!(0));
    }

    #[test]
    fn tolerance_is_inclusive() {
        let ledger = Ledger {
            lines: vec![line("A", Some(dec!(10.01)), Some(dec!(10.00)))],
            ..Default::default()
        };
        assert!(check_balances(&ledger, dec!(0.01), 10).is_balanced());
        assert!(!check_balances(&ledger, dec!(0.001), 10).is_balanced());
    }

    #[test]
    fn missing_amounts_count_as_zero() {
        let ledger = Ledger {
            lines: vec![line("A", None, None)],
            ..Default::default()
        };
        let report = check_balances(&ledger, dec!(0.01), 10);
        assert_eq!(report.total_debit, dec!(0));
        assert!(report.is_balanced());
    }

    #[test]
    fn overflowing_sums_are_unbalanced() {
        let ledger = Ledger {
            lines: vec![
                line("A", Some(Decimal::MAX), None),
                line("A", Some(Decimal::MAX), None),
                line("B", None, Some(dec!(1))),
            ],
            ..Default::default()
        };
        let report = check_balances(&ledger, dec!(0.01), 10);
        assert!(report.overflowed);
        assert!(!report.is_globally_balanced());
        assert!(!report.is_balanced());
        let worst = report.journal_offenders().next().unwrap();
        assert_eq!(worst.key.as_deref(), Some("A"));
        assert!(worst.overflowed);
        assert!(report.to_string().contains("overflow"));
    }

    #[test]
    fn opening_balance_counts_in_trial_balance() {
        let ledger = Ledger {
            accounts: vec![Account {
                account_id: Some("1920".into()),
                opening_balance: Some(dec!(500)),
                closing_balance: Some(dec!(600)),
                ..Default::default()
            }],
            lines: vec![TransactionLine {
                account_id: Some("1920".into()),
                debit: Some(dec!(100)),
                ..Default::default()
            }],
            ..Default::default()
        };
        assert!(trial_balance(&ledger, dec!(0.01)).is_empty());

        let mut off = ledger.clone();
        off.accounts[0].closing_balance = Some(dec!(100));
        let mismatches = trial_balance(&off, dec!(0.01));
        assert_eq!(mismatches.len(), 1);
        assert_eq!(mismatches[0].expected_closing(), Some(dec!(600)));
    }
}
