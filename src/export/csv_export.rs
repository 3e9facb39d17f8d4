//! Table generation for the CSV export.
//!
//! One file per collection, header row first, `\n` line endings. Text is
//! always quoted, numbers and dates never; a null is an empty cell.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::CsvConfig;
use crate::core::*;

/// Rows of one CSV file under construction.
struct Table<'c> {
    out: String,
    config: &'c CsvConfig,
    at_row_start: bool,
}

impl<'c> Table<'c> {
    fn new(config: &'c CsvConfig, columns: &[&str]) -> Self {
        let mut table = Self {
            out: String::new(),
            config,
            at_row_start: true,
        };
        for column in columns {
            table.text(Some(*column));
        }
        table.end_row();
        table
    }

    fn separate(&mut self) {
        if !self.at_row_start {
            self.out.push(self.config.delimiter);
        }
        self.at_row_start = false;
    }

    fn text(&mut self, value: Option<&str>) {
        self.separate();
        if let Some(v) = value {
            csv_field_str(&mut self.out, v);
        }
    }

    fn decimal(&mut self, value: Option<Decimal>) {
        self.separate();
        if let Some(d) = value {
            csv_field_decimal(&mut self.out, d, self.config.decimal_comma);
        }
    }

    fn date(&mut self, value: Option<NaiveDate>) {
        self.separate();
        if let Some(d) = value {
            self.out.push_str(&d.format("%Y-%m-%d").to_string());
        }
    }

    fn count(&mut self, value: usize) {
        self.separate();
        self.out.push_str(&value.to_string());
    }

    fn end_row(&mut self) {
        self.out.push('\n');
        self.at_row_start = true;
    }

    fn finish(self) -> String {
        self.out
    }
}

fn holder_name(holder: BankAccountHolder) -> &'static str {
    match holder {
        BankAccountHolder::Company => "Company",
        BankAccountHolder::Customer => "Customer",
        BankAccountHolder::Supplier => "Supplier",
    }
}

fn party_kind_name(kind: PartyKind) -> &'static str {
    match kind {
        PartyKind::Customer => "Customer",
        PartyKind::Supplier => "Supplier",
    }
}

pub(super) fn headers(ledger: &Ledger, config: &CsvConfig) -> String {
    let mut t = Table::new(
        config,
        &[
            "file_version",
            "software",
            "software_version",
            "created",
            "selection_start",
            "selection_end",
            "company_name",
            "company_id",
            "default_currency",
        ],
    );
    for h in &ledger.headers {
        t.text(h.file_version.as_deref());
        t.text(h.software.as_deref());
        t.text(h.software_version.as_deref());
        t.date(h.created);
        t.date(h.selection_start);
        t.date(h.selection_end);
        t.text(h.company_name.as_deref());
        t.text(h.company_id.as_deref());
        t.text(h.default_currency.as_deref());
        t.end_row();
    }
    t.finish()
}

pub(super) fn bank_accounts(ledger: &Ledger, config: &CsvConfig) -> String {
    let mut t = Table::new(config, &["holder", "number", "name", "currency", "bic"]);
    for b in &ledger.bank_accounts {
        t.text(Some(holder_name(b.holder)));
        t.text(b.number.as_deref());
        t.text(b.name.as_deref());
        t.text(b.currency.as_deref());
        t.text(b.bic.as_deref());
        t.end_row();
    }
    t.finish()
}

pub(super) fn accounts(ledger: &Ledger, config: &CsvConfig) -> String {
    let mut t = Table::new(
        config,
        &[
            "account_id",
            "description",
            "account_type",
            "opening_balance",
            "closing_balance",
            "vat_code",
            "grouping_category",
            "grouping_code",
        ],
    );
    for a in &ledger.accounts {
        t.text(a.account_id.as_deref());
        t.text(a.description.as_deref());
        t.text(a.account_type.as_deref());
        t.decimal(a.opening_balance);
        t.decimal(a.closing_balance);
        t.text(a.vat_code.as_deref());
        t.text(a.grouping_category.as_deref());
        t.text(a.grouping_code.as_deref());
        t.end_row();
    }
    t.finish()
}

pub(super) fn parties(parties: &[Party], id_column: &str, config: &CsvConfig) -> String {
    let mut t = Table::new(
        config,
        &[
            id_column,
            "name",
            "vat_number",
            "country",
            "city",
            "postal_code",
            "account_id",
            "opening_balance",
            "closing_balance",
        ],
    );
    for p in parties {
        t.text(p.id.as_deref());
        t.text(p.name.as_deref());
        t.text(p.vat_number.as_deref());
        t.text(p.country.as_deref());
        t.text(p.city.as_deref());
        t.text(p.postal_code.as_deref());
        t.text(p.account_id.as_deref());
        t.decimal(p.opening_balance);
        t.decimal(p.closing_balance);
        t.end_row();
    }
    t.finish()
}

/// One row per control account of a customer or supplier.
pub(super) fn party_accounts(ledger: &Ledger, config: &CsvConfig) -> String {
    let mut t = Table::new(
        config,
        &[
            "party_type",
            "party_id",
            "account_id",
            "opening_balance",
            "closing_balance",
        ],
    );
    for a in &ledger.party_accounts {
        t.text(Some(party_kind_name(a.party_kind)));
        t.text(a.party_id.as_deref());
        t.text(a.account_id.as_deref());
        t.decimal(a.opening_balance);
        t.decimal(a.closing_balance);
        t.end_row();
    }
    t.finish()
}

pub(super) fn journals(ledger: &Ledger, config: &CsvConfig) -> String {
    let mut t = Table::new(
        config,
        &[
            "journal_id",
            "description",
            "journal_type",
            "posting_date",
            "batch_id",
            "system_id",
        ],
    );
    for j in &ledger.journals {
        t.text(j.journal_id.as_deref());
        t.text(j.description.as_deref());
        t.text(j.journal_type.as_deref());
        t.date(j.posting_date);
        t.text(j.batch_id.as_deref());
        t.text(j.system_id.as_deref());
        t.end_row();
    }
    t.finish()
}

pub(super) fn vouchers(ledger: &Ledger, config: &CsvConfig) -> String {
    let mut t = Table::new(
        config,
        &[
            "journal_id",
            "voucher_no",
            "transaction_id",
            "transaction_date",
            "period",
            "period_year",
            "description",
            "voucher_type",
            "debit_total",
            "credit_total",
        ],
    );
    for v in &ledger.vouchers {
        t.text(v.journal_id.as_deref());
        t.text(v.voucher_no.as_deref());
        t.text(v.transaction_id.as_deref());
        t.date(v.transaction_date);
        t.text(v.period.as_deref());
        t.text(v.period_year.as_deref());
        t.text(v.description.as_deref());
        t.text(v.voucher_type.as_deref());
        t.decimal(Some(v.debit_total));
        t.decimal(Some(v.credit_total));
        t.end_row();
    }
    t.finish()
}

pub(super) fn transactions(ledger: &Ledger, config: &CsvConfig) -> String {
    let mut t = Table::new(
        config,
        &[
            "journal_id",
            "record_id",
            "voucher_no",
            "account_id",
            "description",
            "posting_date",
            "supplier_id",
            "customer_id",
            "currency",
            "amount_currency",
            "exchange_rate",
            "document_no",
            "debit",
            "credit",
            "vat_code",
            "vat_rate",
            "vat_base",
            "vat_debit",
            "vat_credit",
            "vat_amount",
        ],
    );
    for l in &ledger.lines {
        t.text(l.journal_id.as_deref());
        t.text(l.record_id.as_deref());
        t.text(l.voucher_no.as_deref());
        t.text(l.account_id.as_deref());
        t.text(l.description.as_deref());
        t.date(l.posting_date);
        t.text(l.supplier_id.as_deref());
        t.text(l.customer_id.as_deref());
        t.text(l.currency.as_deref());
        t.decimal(l.amount_currency);
        t.decimal(l.exchange_rate);
        t.text(l.document_no.as_deref());
        t.decimal(l.debit);
        t.decimal(l.credit);
        t.text(l.vat_code.as_deref());
        t.decimal(l.vat_rate);
        t.decimal(l.vat_base);
        t.decimal(l.vat_debit);
        t.decimal(l.vat_credit);
        t.decimal(l.vat_amount);
        t.end_row();
    }
    t.finish()
}

pub(super) fn analysis_lines(ledger: &Ledger, config: &CsvConfig) -> String {
    let mut t = Table::new(
        config,
        &[
            "journal_id",
            "record_id",
            "analysis_type",
            "analysis_id",
            "debit_amount",
            "credit_amount",
            "amount",
        ],
    );
    for a in &ledger.analysis_lines {
        t.text(a.journal_id.as_deref());
        t.text(a.record_id.as_deref());
        t.text(a.analysis_type.as_deref());
        t.text(a.analysis_id.as_deref());
        t.decimal(a.debit_amount);
        t.decimal(a.credit_amount);
        t.decimal(a.amount);
        t.end_row();
    }
    t.finish()
}

pub(super) fn tax_codes(ledger: &Ledger, config: &CsvConfig) -> String {
    let mut t = Table::new(
        config,
        &["tax_code", "standard_code", "description", "percentage", "country"],
    );
    for c in &ledger.tax_codes {
        t.text(c.tax_code.as_deref());
        t.text(c.standard_code.as_deref());
        t.text(c.description.as_deref());
        t.decimal(c.percentage);
        t.text(c.country.as_deref());
        t.end_row();
    }
    t.finish()
}

pub(super) fn invoices(ledger: &Ledger, config: &CsvConfig) -> String {
    let mut t = Table::new(
        config,
        &[
            "kind",
            "invoice_no",
            "invoice_date",
            "tax_point_date",
            "gl_posting_date",
            "party_id",
            "party_name",
            "currency",
            "net_total",
            "tax_payable",
            "gross_total",
            "source_id",
            "document_number",
            "due_date",
        ],
    );
    for i in &ledger.invoices {
        t.text(Some(match i.kind {
            InvoiceKind::Sales => "Sales",
            InvoiceKind::Purchase => "Purchase",
        }));
        t.text(i.invoice_no.as_deref());
        t.date(i.invoice_date);
        t.date(i.tax_point_date);
        t.date(i.gl_posting_date);
        t.text(i.party_id.as_deref());
        t.text(i.party_name.as_deref());
        t.text(i.currency.as_deref());
        t.decimal(i.net_total);
        t.decimal(i.tax_payable);
        t.decimal(i.gross_total);
        t.text(i.source_id.as_deref());
        t.text(i.document_number.as_deref());
        t.date(i.due_date);
        t.end_row();
    }
    t.finish()
}

/// Debit, credit and balance of the lines carrying each customer and
/// supplier id. Customers first.
pub(super) fn party_balances(validated: &ValidatedLedger, config: &CsvConfig) -> String {
    let refs = validated.references();
    let mut t = Table::new(
        config,
        &["party_type", "party_id", "debit", "credit", "balance"],
    );
    let listed = [
        (PartyKind::Customer, &refs.customer_balances),
        (PartyKind::Supplier, &refs.supplier_balances),
    ];
    for (kind, balances) in listed {
        for b in balances {
            t.text(Some(party_kind_name(kind)));
            t.text(b.key.as_deref());
            t.decimal(Some(b.debit));
            t.decimal(Some(b.credit));
            t.decimal((!b.overflowed).then(|| b.difference()));
            t.end_row();
        }
    }
    t.finish()
}

/// Account ids referenced by lines with the number of lines using each.
pub(super) fn missing_accounts(validated: &ValidatedLedger, config: &CsvConfig) -> String {
    let ledger = validated.ledger();
    let mut t = Table::new(config, &["account_id", "lines"]);
    for id in &validated.references().missing_accounts {
        let used = ledger
            .lines
            .iter()
            .filter(|l| l.account_id.as_ref() == Some(id))
            .count();
        t.text(Some(id.as_str()));
        t.count(used);
        t.end_row();
    }
    t.finish()
}

fn csv_field_str(out: &mut String, value: &str) {
    out.push('"');
    for ch in value.chars() {
        if ch == '"' {
            out.push_str("\"\"");
        } else {
            out.push(ch);
        }
    }
    out.push('"');
}

/// Written at the scale it was read with; never rounded.
fn csv_field_decimal(out: &mut String, d: Decimal, decimal_comma: bool) {
    let s = d.to_string();
    if decimal_comma {
        out.push_str(&s.replace('.', ","));
    } else {
        out.push_str(&s);
    }
}
