//! Ordered alias tables, one per record field.
//!
//! SAF-T exporters name the same concept differently between schema
//! versions and vendors. The first alias that resolves wins, so the most
//! specific name goes first.

pub mod header {
    pub const FILE_VERSION: &[&str] = &["AuditFileVersion"];
    pub const SOFTWARE: &[&str] = &["SoftwareID", "SoftwareCompanyName", "ProductID"];
    pub const SOFTWARE_VERSION: &[&str] = &["SoftwareVersion", "ProductVersion"];
    pub const CREATED: &[&str] = &[
        "AuditFileDateCreated",
        "FileCreationDateTime",
        "FileCreationDate",
    ];
    pub const SELECTION_START: &[&str] = &["SelectionStartDate", "SelectionStart", "StartDate"];
    pub const SELECTION_END: &[&str] = &["SelectionEndDate", "SelectionEnd", "EndDate"];
    pub const COMPANY_NAME: &[&str] = &["CompanyName", "Name"];
    pub const COMPANY_ID: &[&str] = &["CompanyID", "RegistrationNumber"];
    pub const DEFAULT_CURRENCY: &[&str] = &["DefaultCurrencyCode", "FunctionalCurrency"];
}

pub mod bank_account {
    pub const NUMBER: &[&str] = &["IBANNumber", "BankAccountNumber", "AccountNumber"];
    pub const NAME: &[&str] = &["BankAccountName", "BankName", "Name"];
    pub const CURRENCY: &[&str] = &["CurrencyCode", "Currency"];
    pub const BIC: &[&str] = &["BIC", "SortCode"];
}

pub mod account {
    pub const ID: &[&str] = &["AccountID"];
    pub const DESCRIPTION: &[&str] = &["AccountDescription", "Description", "Name", "Text"];
    pub const TYPE: &[&str] = &["AccountType"];
    pub const VAT_CODE: &[&str] = &["VatCode", "VATCode", "TaxCode", "StandardTaxCode"];
    pub const GROUPING_CATEGORY: &[&str] = &["GroupingCategory"];
    pub const GROUPING_CODE: &[&str] = &["GroupingCode", "GroupingCategoryCode"];
}

/// Opening/closing balances shared by accounts, customers and suppliers.
pub mod balance {
    pub const OPENING: &[&str] = &["OpeningBalance"];
    pub const OPENING_DEBIT: &[&str] = &["OpeningDebitBalance"];
    pub const OPENING_CREDIT: &[&str] = &["OpeningCreditBalance"];
    pub const CLOSING: &[&str] = &["ClosingBalance"];
    pub const CLOSING_DEBIT: &[&str] = &["ClosingDebitBalance"];
    pub const CLOSING_CREDIT: &[&str] = &["ClosingCreditBalance"];
}

pub mod party {
    pub const CUSTOMER_ID: &[&str] = &["CustomerID"];
    pub const SUPPLIER_ID: &[&str] = &["SupplierID"];
    pub const NAME: &[&str] = &["Name", "CompanyName", "CustomerName", "SupplierName"];
    pub const VAT_NUMBER: &[&str] = &["TaxRegistrationNumber", "VATNumber", "VatNumber"];
    pub const COUNTRY: &[&str] = &["Country"];
    pub const CITY: &[&str] = &["City"];
    pub const POSTAL_CODE: &[&str] = &["PostalCode"];
    pub const ACCOUNT_ID: &[&str] = &["AccountID"];
    /// One per control account in SAF-T 1.3.
    pub const BALANCE_STRUCTURE: &str = "BalanceAccountStructure";
}

pub mod journal {
    pub const ID: &[&str] = &["JournalID"];
    pub const DESCRIPTION: &[&str] = &["Description", "Name"];
    pub const TYPE: &[&str] = &["Type", "JournalType"];
    pub const POSTING_DATE: &[&str] = &["PostingDate", "GLPostingDate"];
    pub const BATCH_ID: &[&str] = &["BatchID"];
    pub const SYSTEM_ID: &[&str] = &["SystemID"];
}

pub mod transaction {
    pub const VOUCHER_NO: &[&str] = &["VoucherNo"];
    pub const VOUCHER_ID: &[&str] = &["VoucherID"];
    pub const TRANSACTION_ID: &[&str] = &["TransactionID", "TransactionNo"];
    pub const DATE: &[&str] = &["TransactionDate", "EntryDate"];
    pub const PERIOD: &[&str] = &["Period"];
    pub const PERIOD_YEAR: &[&str] = &["PeriodYear", "FiscalYear", "Year"];
    pub const DESCRIPTION: &[&str] = &["Description"];
    pub const VOUCHER_TYPE: &[&str] = &["VoucherType", "TransactionType"];
}

pub mod line {
    pub const RECORD_ID: &[&str] = &["RecordID", "LineID"];
    pub const ACCOUNT_ID: &[&str] = &["AccountID"];
    pub const DESCRIPTION: &[&str] = &["Description", "Narrative", "LineDescription", "Text"];
    pub const POSTING_DATE: &[&str] = &["PostingDate", "ValueDate"];
    pub const SUPPLIER_ID: &[&str] = &["SupplierID"];
    pub const CUSTOMER_ID: &[&str] = &["CustomerID"];
    pub const CURRENCY: &[&str] = &["CurrencyCode", "Currency"];
    pub const AMOUNT_CURRENCY: &[&str] = &["CurrencyAmount", "AmountCurrency", "ForeignAmount"];
    pub const EXCHANGE_RATE: &[&str] = &["ExchangeRate"];
    pub const DOCUMENT_NO: &[&str] = &["DocumentNumber", "SourceDocumentID", "ReferenceNumber"];
    pub const DEBIT: &[&str] = &["DebitAmount", "Debit"];
    pub const CREDIT: &[&str] = &["CreditAmount", "Credit"];
    pub const VAT_CODE: &[&str] = &["VatCode", "VATCode", "TaxCode"];
    pub const VAT_RATE: &[&str] = &["TaxPercentage", "VatRate", "VATRate"];
    pub const VAT_BASE: &[&str] = &["TaxBase", "VatBase", "VATBase"];
    pub const VAT_DEBIT: &[&str] = &["DebitTaxAmount", "DebitVatAmount"];
    pub const VAT_CREDIT: &[&str] = &["CreditTaxAmount", "CreditVatAmount"];
    pub const VAT_AMOUNT: &[&str] = &["TaxAmount", "VatAmount"];
}

pub mod analysis {
    pub const TYPE: &[&str] = &["AnalysisType"];
    pub const ID: &[&str] = &["AnalysisID"];
    pub const DEBIT: &[&str] = &["DebitAnalysisAmount", "DebitAmount"];
    pub const CREDIT: &[&str] = &["CreditAnalysisAmount", "CreditAmount"];
    pub const AMOUNT: &[&str] = &["AnalysisAmount", "Amount"];
}

pub mod tax_code {
    pub const CODE: &[&str] = &["TaxCode"];
    pub const STANDARD_CODE: &[&str] = &["StandardTaxCode", "StandardCode"];
    pub const DESCRIPTION: &[&str] = &["Description"];
    pub const PERCENTAGE: &[&str] = &["TaxPercentage"];
    pub const COUNTRY: &[&str] = &["Country", "TaxCountryRegion"];
}

pub mod invoice {
    pub const NUMBER: &[&str] = &["InvoiceNo", "InvoiceNumber"];
    pub const DATE: &[&str] = &["InvoiceDate"];
    pub const TAX_POINT_DATE: &[&str] = &["TaxPointDate"];
    pub const GL_POSTING_DATE: &[&str] = &["GLPostingDate"];
    pub const CUSTOMER_ID: &[&str] = &["CustomerID"];
    pub const CUSTOMER_NAME: &[&str] = &["CustomerName"];
    pub const SUPPLIER_ID: &[&str] = &["SupplierID"];
    pub const SUPPLIER_NAME: &[&str] = &["SupplierName"];
    pub const CURRENCY: &[&str] = &["CurrencyCode", "TransactionCurrency"];
    pub const NET_TOTAL: &[&str] = &["NetTotal", "DocumentNetTotal"];
    pub const TAX_PAYABLE: &[&str] = &["TaxPayable", "DocumentTaxPayable"];
    pub const GROSS_TOTAL: &[&str] = &["GrossTotal", "DocumentGrossTotal"];
    pub const SOURCE_ID: &[&str] = &["SourceID"];
    pub const DOCUMENT_NUMBER: &[&str] = &["DocumentNumber"];
    pub const DUE_DATE: &[&str] = &["DueDate"];
    pub const SALES_CONTAINER: &str = "SalesInvoices";
    pub const PURCHASE_CONTAINER: &str = "PurchaseInvoices";
}

/// Children of `GeneralLedgerEntries` carrying declared control totals.
pub mod totals {
    pub const CONTAINER: &str = "GeneralLedgerEntries";
    pub const NUMBER_OF_ENTRIES: &str = "NumberOfEntries";
    pub const TOTAL_DEBIT: &str = "TotalDebit";
    pub const TOTAL_CREDIT: &str = "TotalCredit";
}
