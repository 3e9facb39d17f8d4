//! One builder per record type, each turning a harvested element into a
//! record through the alias tables.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::context::LedgerContext;
use super::element::Element;
use super::fields;
use crate::core::normalize::{normalize_decimal, parse_date};
use crate::core::*;

/// Field lookups for one element, counting numeric failures.
pub(crate) struct Harvest<'a> {
    el: &'a Element,
    stats: &'a mut ParseStats,
}

impl<'a> Harvest<'a> {
    pub fn new(el: &'a Element, stats: &'a mut ParseStats) -> Self {
        Self { el, stats }
    }

    fn text(&self, aliases: &[&str]) -> Option<String> {
        self.el.resolve(aliases).map(str::to_owned)
    }

    fn decimal(&mut self, aliases: &[&str]) -> Option<Decimal> {
        let raw = self.el.resolve(aliases)?;
        self.stats.numeric_fields += 1;
        let value = normalize_decimal(raw);
        if value.is_none() {
            self.stats.numeric_failures += 1;
            log::debug!("<{}>: {aliases:?} is not a number: {raw:?}", self.el.name);
        }
        value
    }

    fn date(&self, aliases: &[&str]) -> Option<NaiveDate> {
        self.el.resolve(aliases).and_then(parse_date)
    }

    /// `debit - credit`, a missing side counting as zero. `None` when both
    /// sides are missing or the difference is out of range.
    fn difference(&mut self, debit: Option<Decimal>, credit: Option<Decimal>) -> Option<Decimal> {
        if debit.is_none() && credit.is_none() {
            return None;
        }
        let net = debit
            .unwrap_or_default()
            .checked_sub(credit.unwrap_or_default());
        if net.is_none() {
            self.stats.numeric_failures += 1;
            log::debug!("<{}>: debit/credit difference out of range", self.el.name);
        }
        net
    }

    /// A net balance: the explicit value, else debit minus credit.
    fn net(&mut self, net: &[&str], debit: &[&str], credit: &[&str]) -> Option<Decimal> {
        if let Some(v) = self.decimal(net) {
            return Some(v);
        }
        let (debit, credit) = (self.decimal(debit), self.decimal(credit));
        self.difference(debit, credit)
    }
}

/// Sum of the present values; `None` if there are none or the sum overflows.
fn total(values: impl IntoIterator<Item = Option<Decimal>>) -> Option<Decimal> {
    let mut sum: Option<Decimal> = None;
    for v in values.into_iter().flatten() {
        sum = Some(match sum {
            Some(s) => s.checked_add(v)?,
            None => v,
        });
    }
    sum
}

pub(crate) fn header(h: &mut Harvest<'_>) -> Header {
    use fields::header::*;
    Header {
        file_version: h.text(FILE_VERSION),
        software: h.text(SOFTWARE),
        software_version: h.text(SOFTWARE_VERSION),
        created: h.date(CREATED),
        selection_start: h.date(SELECTION_START),
        selection_end: h.date(SELECTION_END),
        company_name: h.text(COMPANY_NAME),
        company_id: h.text(COMPANY_ID),
        default_currency: h.text(DEFAULT_CURRENCY),
    }
}

pub(crate) fn bank_account(h: &mut Harvest<'_>, holder: BankAccountHolder) -> BankAccount {
    use fields::bank_account::*;
    BankAccount {
        number: h.text(NUMBER),
        name: h.text(NAME),
        currency: h.text(CURRENCY),
        bic: h.text(BIC),
        holder,
    }
}

pub(crate) fn account(h: &mut Harvest<'_>) -> Account {
    use fields::account::*;
    use fields::balance;
    Account {
        account_id: h.text(ID),
        description: h.text(DESCRIPTION),
        account_type: h.text(TYPE),
        opening_balance: h.net(
            balance::OPENING,
            balance::OPENING_DEBIT,
            balance::OPENING_CREDIT,
        ),
        closing_balance: h.net(
            balance::CLOSING,
            balance::CLOSING_DEBIT,
            balance::CLOSING_CREDIT,
        ),
        vat_code: h.text(VAT_CODE),
        grouping_category: h.text(GROUPING_CATEGORY),
        grouping_code: h.text(GROUPING_CODE),
    }
}

fn control_account(h: &mut Harvest<'_>, kind: PartyKind, party_id: Option<String>) -> PartyAccount {
    use fields::balance;
    PartyAccount {
        party_kind: kind,
        party_id,
        account_id: h.text(fields::party::ACCOUNT_ID),
        opening_balance: h.net(
            balance::OPENING,
            balance::OPENING_DEBIT,
            balance::OPENING_CREDIT,
        ),
        closing_balance: h.net(
            balance::CLOSING,
            balance::CLOSING_DEBIT,
            balance::CLOSING_CREDIT,
        ),
    }
}

/// A customer or supplier with its control accounts.
///
/// Every `BalanceAccountStructure` is one control account. Without any, the
/// party's own `AccountID` and balances form the only one.
pub(crate) fn party(h: &mut Harvest<'_>, kind: PartyKind) -> (Party, Vec<PartyAccount>) {
    use fields::party::*;
    let id = h.text(match kind {
        PartyKind::Customer => CUSTOMER_ID,
        PartyKind::Supplier => SUPPLIER_ID,
    });

    let el = h.el;
    let structures = el.descendants(BALANCE_STRUCTURE);
    let accounts = if structures.is_empty() {
        vec![control_account(h, kind, id.clone())]
    } else {
        let mut accounts = Vec::with_capacity(structures.len());
        for s in structures {
            let mut sh = Harvest::new(s, &mut *h.stats);
            accounts.push(control_account(&mut sh, kind, id.clone()));
        }
        accounts
    };

    let party = Party {
        id,
        name: h.text(NAME),
        vat_number: h.text(VAT_NUMBER),
        country: h.text(COUNTRY),
        city: h.text(CITY),
        postal_code: h.text(POSTAL_CODE),
        account_id: accounts.iter().find_map(|a| a.account_id.clone()),
        opening_balance: total(accounts.iter().map(|a| a.opening_balance)),
        closing_balance: total(accounts.iter().map(|a| a.closing_balance)),
    };
    let accounts = accounts
        .into_iter()
        .filter(|a| a.account_id.is_some())
        .collect();
    (party, accounts)
}

pub(crate) fn journal(h: &mut Harvest<'_>, ctx: &LedgerContext) -> Journal {
    use fields::journal::*;
    Journal {
        journal_id: h.text(ID).or_else(|| ctx.journal_id().map(str::to_owned)),
        description: h.text(DESCRIPTION),
        journal_type: h.text(TYPE),
        posting_date: h.date(POSTING_DATE),
        batch_id: h.text(BATCH_ID),
        system_id: h.text(SYSTEM_ID),
    }
}

pub(crate) fn voucher(h: &mut Harvest<'_>, ctx: &LedgerContext) -> Voucher {
    use fields::transaction::*;
    let (debit_total, credit_total) = ctx.voucher_totals();
    Voucher {
        journal_id: ctx.journal_id().map(str::to_owned),
        voucher_no: ctx.voucher_no().map(str::to_owned),
        transaction_id: h.text(TRANSACTION_ID),
        transaction_date: h.date(DATE),
        period: h.text(PERIOD),
        period_year: h.text(PERIOD_YEAR),
        description: h.text(DESCRIPTION),
        voucher_type: h.text(VOUCHER_TYPE),
        debit_total,
        credit_total,
    }
}

pub(crate) fn transaction_line(h: &mut Harvest<'_>, ctx: &LedgerContext) -> TransactionLine {
    use fields::line::*;
    let vat_debit = h.decimal(VAT_DEBIT);
    let vat_credit = h.decimal(VAT_CREDIT);
    // Split-side exporters leave out `TaxAmount`.
    let vat_amount = match h.decimal(VAT_AMOUNT) {
        Some(v) => Some(v),
        None => h.difference(vat_debit, vat_credit),
    };
    TransactionLine {
        journal_id: ctx.journal_id().map(str::to_owned),
        record_id: h.text(RECORD_ID),
        voucher_no: ctx.voucher_no().map(str::to_owned),
        account_id: h.text(ACCOUNT_ID),
        description: h.text(DESCRIPTION),
        posting_date: h.date(POSTING_DATE),
        supplier_id: h.text(SUPPLIER_ID),
        customer_id: h.text(CUSTOMER_ID),
        currency: h.text(CURRENCY),
        amount_currency: h.decimal(AMOUNT_CURRENCY),
        exchange_rate: h.decimal(EXCHANGE_RATE),
        document_no: h.text(DOCUMENT_NO),
        debit: h.decimal(DEBIT),
        credit: h.decimal(CREDIT),
        vat_code: h.text(VAT_CODE),
        vat_rate: h.decimal(VAT_RATE),
        vat_base: h.decimal(VAT_BASE),
        vat_debit,
        vat_credit,
        vat_amount,
    }
}

/// `line` is the enclosing line element, as far as it has been read.
pub(crate) fn analysis_line(
    h: &mut Harvest<'_>,
    line: Option<&Element>,
    ctx: &LedgerContext,
) -> AnalysisLine {
    use fields::analysis::*;
    AnalysisLine {
        journal_id: ctx.journal_id().map(str::to_owned),
        record_id: line
            .and_then(|l| l.resolve(fields::line::RECORD_ID))
            .map(str::to_owned),
        analysis_type: h.text(TYPE),
        analysis_id: h.text(ID),
        debit_amount: h.decimal(DEBIT),
        credit_amount: h.decimal(CREDIT),
        amount: h.decimal(AMOUNT),
    }
}

pub(crate) fn tax_code(h: &mut Harvest<'_>) -> TaxCode {
    use fields::tax_code::*;
    TaxCode {
        tax_code: h.text(CODE),
        standard_code: h.text(STANDARD_CODE),
        description: h.text(DESCRIPTION),
        percentage: h.decimal(PERCENTAGE),
        country: h.text(COUNTRY),
    }
}

pub(crate) fn source_invoice(h: &mut Harvest<'_>, kind: InvoiceKind) -> SourceInvoice {
    use fields::invoice::*;
    let (party_id, party_name) = match kind {
        InvoiceKind::Sales => (CUSTOMER_ID, CUSTOMER_NAME),
        InvoiceKind::Purchase => (SUPPLIER_ID, SUPPLIER_NAME),
    };
    SourceInvoice {
        kind,
        invoice_no: h.text(NUMBER),
        invoice_date: h.date(DATE),
        tax_point_date: h.date(TAX_POINT_DATE),
        gl_posting_date: h.date(GL_POSTING_DATE),
        party_id: h.text(party_id),
        party_name: h.text(party_name),
        currency: h.text(CURRENCY),
        net_total: h.decimal(NET_TOTAL),
        tax_payable: h.decimal(TAX_PAYABLE),
        gross_total: h.decimal(GROSS_TOTAL),
        source_id: h.text(SOURCE_ID),
        document_number: h.text(DOCUMENT_NUMBER),
        due_date: h.date(DUE_DATE),
    }
}
