use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// `Header`: audit file metadata. One per document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Header {
    /// `AuditFileVersion`, e.g. "1.30".
    pub file_version: Option<String>,
    /// Producing software (`SoftwareID` / `SoftwareCompanyName`).
    pub software: Option<String>,
    pub software_version: Option<String>,
    /// `AuditFileDateCreated`.
    pub created: Option<NaiveDate>,
    pub selection_start: Option<NaiveDate>,
    pub selection_end: Option<NaiveDate>,
    pub company_name: Option<String>,
    /// Organisation number of the reporting company.
    pub company_id: Option<String>,
    /// `DefaultCurrencyCode` (ISO 4217).
    pub default_currency: Option<String>,
}

/// Who a bank account belongs to, taken from the enclosing master-data element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BankAccountHolder {
    /// Declared under `Header/Company`.
    #[default]
    Company,
    Customer,
    Supplier,
}

/// `BankAccount`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BankAccount {
    /// IBAN or domestic account number.
    pub number: Option<String>,
    pub name: Option<String>,
    pub currency: Option<String>,
    pub bic: Option<String>,
    pub holder: BankAccountHolder,
}

/// `GeneralLedgerAccounts/Account`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub account_id: Option<String>,
    pub description: Option<String>,
    /// `AccountType` (e.g. "GL").
    pub account_type: Option<String>,
    /// Net opening balance (debit minus credit).
    pub opening_balance: Option<Decimal>,
    /// Net closing balance (debit minus credit).
    pub closing_balance: Option<Decimal>,
    pub vat_code: Option<String>,
    pub grouping_category: Option<String>,
    pub grouping_code: Option<String>,
}

/// Customer or supplier master data. Both share the same shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Party {
    pub id: Option<String>,
    pub name: Option<String>,
    /// VAT / tax registration number.
    pub vat_number: Option<String>,
    pub country: Option<String>,
    pub city: Option<String>,
    pub postal_code: Option<String>,
    /// First control account in the general ledger; all of them are in
    /// [`Ledger::party_accounts`].
    pub account_id: Option<String>,
    /// Summed over every control account.
    pub opening_balance: Option<Decimal>,
    /// Summed over every control account.
    pub closing_balance: Option<Decimal>,
}

pub type Customer = Party;
pub type Supplier = Party;

/// Which master-data list a party comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PartyKind {
    #[default]
    Customer,
    Supplier,
}

/// One control account of a customer or supplier (`BalanceAccountStructure`,
/// or the party's own `AccountID` when it has no such structure).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PartyAccount {
    pub party_kind: PartyKind,
    pub party_id: Option<String>,
    pub account_id: Option<String>,
    /// Net opening balance (debit minus credit).
    pub opening_balance: Option<Decimal>,
    /// Net closing balance (debit minus credit).
    pub closing_balance: Option<Decimal>,
}

/// `GeneralLedgerEntries/Journal`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Journal {
    pub journal_id: Option<String>,
    pub description: Option<String>,
    /// Journal type (`Type`), e.g. "GL", "SALES".
    pub journal_type: Option<String>,
    pub posting_date: Option<NaiveDate>,
    pub batch_id: Option<String>,
    pub system_id: Option<String>,
}

/// One posting event (`Transaction`) with the totals of its lines.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Voucher {
    pub journal_id: Option<String>,
    pub voucher_no: Option<String>,
    pub transaction_id: Option<String>,
    pub transaction_date: Option<NaiveDate>,
    pub period: Option<String>,
    pub period_year: Option<String>,
    pub description: Option<String>,
    pub voucher_type: Option<String>,
    /// Sum of line debits; lines without a debit count as zero.
    pub debit_total: Decimal,
    /// Sum of line credits; lines without a credit count as zero.
    pub credit_total: Decimal,
}

impl Voucher {
    /// Debit minus credit.
    pub fn imbalance(&self) -> Decimal {
        self.debit_total.saturating_sub(self.credit_total)
    }
}

/// A debit/credit line of a voucher (`Line`, `TransactionLine` or `JournalLine`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransactionLine {
    /// Inherited from the enclosing journal; `None` for lines outside any journal.
    pub journal_id: Option<String>,
    pub record_id: Option<String>,
    /// Inherited from the enclosing transaction, else the journal id.
    pub voucher_no: Option<String>,
    pub account_id: Option<String>,
    pub description: Option<String>,
    pub posting_date: Option<NaiveDate>,
    pub supplier_id: Option<String>,
    pub customer_id: Option<String>,
    pub currency: Option<String>,
    pub amount_currency: Option<Decimal>,
    pub exchange_rate: Option<Decimal>,
    pub document_no: Option<String>,
    pub debit: Option<Decimal>,
    pub credit: Option<Decimal>,
    pub vat_code: Option<String>,
    pub vat_rate: Option<Decimal>,
    pub vat_base: Option<Decimal>,
    pub vat_debit: Option<Decimal>,
    pub vat_credit: Option<Decimal>,
    /// Undivided `TaxAmount` for exporters that do not split by side.
    pub vat_amount: Option<Decimal>,
}

impl TransactionLine {
    /// Debit minus credit, counting a missing side as zero.
    pub fn net_amount(&self) -> Decimal {
        self.debit
            .unwrap_or_default()
            .saturating_sub(self.credit.unwrap_or_default())
    }
}

/// `Analysis` breakdown attached to a transaction line.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisLine {
    pub journal_id: Option<String>,
    /// `RecordID` of the enclosing line.
    pub record_id: Option<String>,
    /// `AnalysisType`, e.g. "A" (department), "P" (project).
    pub analysis_type: Option<String>,
    pub analysis_id: Option<String>,
    pub debit_amount: Option<Decimal>,
    pub credit_amount: Option<Decimal>,
    /// Unsigned `AnalysisAmount` for exporters without a debit/credit split.
    pub amount: Option<Decimal>,
}

/// `TaxTable` entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaxCode {
    pub tax_code: Option<String>,
    pub standard_code: Option<String>,
    pub description: Option<String>,
    pub percentage: Option<Decimal>,
    pub country: Option<String>,
}

/// `SalesInvoices` or `PurchaseInvoices`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum InvoiceKind {
    #[default]
    Sales,
    Purchase,
}

/// `SourceDocuments/*Invoices/Invoice`: document-level data, lines excluded.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceInvoice {
    pub kind: InvoiceKind,
    pub invoice_no: Option<String>,
    pub invoice_date: Option<NaiveDate>,
    pub tax_point_date: Option<NaiveDate>,
    pub gl_posting_date: Option<NaiveDate>,
    /// Customer id for sales invoices, supplier id for purchase invoices.
    pub party_id: Option<String>,
    pub party_name: Option<String>,
    pub currency: Option<String>,
    pub net_total: Option<Decimal>,
    pub tax_payable: Option<Decimal>,
    pub gross_total: Option<Decimal>,
    pub source_id: Option<String>,
    pub document_number: Option<String>,
    pub due_date: Option<NaiveDate>,
}

/// Control totals declared under `GeneralLedgerEntries`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeclaredTotals {
    pub number_of_entries: Option<u64>,
    pub total_debit: Option<Decimal>,
    pub total_credit: Option<Decimal>,
}

/// Counters collected during the streaming pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseStats {
    /// Elements closed (end-events) in the document.
    pub elements: u64,
    /// Numeric fields whose text could not be normalized to a decimal.
    pub numeric_failures: u64,
    /// Numeric fields that resolved to text, parsed or not.
    pub numeric_fields: u64,
    /// Transaction lines with no enclosing journal.
    pub lines_without_journal: u64,
    /// `Line` elements under `SourceDocuments`, not treated as ledger lines.
    pub skipped_document_lines: u64,
}

impl ParseStats {
    /// Share of numeric lookups that found text but failed to parse it.
    pub fn numeric_failure_rate(&self) -> f64 {
        if self.numeric_fields == 0 {
            0.0
        } else {
            self.numeric_failures as f64 / self.numeric_fields as f64
        }
    }
}

/// Everything harvested from one SAF-T document, in document order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Ledger {
    /// Namespace URI declared by the root element (`None` if unqualified).
    pub namespace: Option<String>,
    pub headers: Vec<Header>,
    pub bank_accounts: Vec<BankAccount>,
    pub accounts: Vec<Account>,
    pub customers: Vec<Customer>,
    pub suppliers: Vec<Supplier>,
    pub party_accounts: Vec<PartyAccount>,
    pub journals: Vec<Journal>,
    pub lines: Vec<TransactionLine>,
    pub analysis_lines: Vec<AnalysisLine>,
    pub vouchers: Vec<Voucher>,
    pub tax_codes: Vec<TaxCode>,
    pub invoices: Vec<SourceInvoice>,
    pub declared_totals: DeclaredTotals,
    pub stats: ParseStats,
}

impl Ledger {
    /// The document header, if one was present.
    pub fn header(&self) -> Option<&Header> {
        self.headers.first()
    }

    /// Lines that belong to the given journal.
    pub fn lines_for_journal<'a>(
        &'a self,
        journal_id: &'a str,
    ) -> impl Iterator<Item = &'a TransactionLine> + 'a {
        self.lines
            .iter()
            .filter(move |l| l.journal_id.as_deref() == Some(journal_id))
    }
}
