#![cfg(all(feature = "parser", feature = "export"))]

use saft_ledger::export::*;
use saft_ledger::parser::parse_bytes;
use saft_ledger::*;

const DOCUMENT: &str = r#"<AuditFile xmlns="urn:StandardAuditFile-Tax">
  <MasterFiles>
    <GeneralLedgerAccounts>
      <Account><AccountID>1920</AccountID><AccountDescription>Bank "DNB"</AccountDescription><ClosingDebitBalance>1250.50</ClosingDebitBalance></Account>
      <Account><AccountID>3000</AccountID><AccountDescription>Salg</AccountDescription></Account>
    </GeneralLedgerAccounts>
  </MasterFiles>
  <GeneralLedgerEntries>
    <Journal>
      <JournalID>GL</JournalID>
      <Description>Hovedbok</Description>
      <Transaction>
        <TransactionDate>2025-01-10</TransactionDate>
        <VoucherNo>1</VoucherNo>
        <Line><RecordID>1</RecordID><AccountID>1920</AccountID><DebitAmount><Amount>1 250,50</Amount></DebitAmount></Line>
        <Line><RecordID>2</RecordID><AccountID>3000</AccountID><Description>Salg; kontant</Description><CreditAmount><Amount>1250.50</Amount></CreditAmount></Line>
      </Transaction>
    </Journal>
  </GeneralLedgerEntries>
</AuditFile>"#;

fn validated() -> ValidatedLedger {
    let config = LoadConfig::default();
    validate(parse_bytes(DOCUMENT.as_bytes(), &config).unwrap(), &config).unwrap()
}

#[test]
fn one_file_per_collection() {
    let export = to_csv(&validated(), &CsvConfig::default());
    let names: Vec<&str> = export.files.iter().map(|(n, _)| n.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "header.csv",
            "bank_accounts.csv",
            "accounts.csv",
            "customers.csv",
            "suppliers.csv",
            "party_accounts.csv",
            "journals.csv",
            "vouchers.csv",
            "transactions.csv",
            "analysis_lines.csv",
            "tax_codes.csv",
            "invoices.csv",
            "party_balances.csv",
            "missing_accounts.csv",
        ]
    );
}

#[test]
fn accounts_csv() {
    let export = to_csv(&validated(), &CsvConfig::default());
    insta::assert_snapshot!(export.file("accounts.csv").unwrap(), @r#"
    "account_id";"description";"account_type";"opening_balance";"closing_balance";"vat_code";"grouping_category";"grouping_code"
    "1920";"Bank ""DNB""";;;1250,50;;;
    "3000";"Salg";;;;;;
    "#);
}

#[test]
fn vouchers_csv() {
    let export = to_csv(&validated(), &CsvConfig::default());
    insta::assert_snapshot!(export.file("vouchers.csv").unwrap(), @r#"
    "journal_id";"voucher_no";"transaction_id";"transaction_date";"period";"period_year";"description";"voucher_type";"debit_total";"credit_total"
    "GL";"1";;2025-01-10;;;;;1250,50;1250,50
    "#);
}

#[test]
fn transaction_rows() {
    let export = to_csv(&validated(), &CsvConfig::default());
    let csv = export.file("transactions.csv").unwrap();
    let rows: Vec<&str> = csv.lines().collect();
    assert_eq!(rows.len(), 3);

    let header: Vec<&str> = rows[0].split(';').collect();
    assert_eq!(header.len(), 20);
    let debit = header.iter().position(|c| *c == "\"debit\"").unwrap();
    let credit = header.iter().position(|c| *c == "\"credit\"").unwrap();

    let first: Vec<&str> = rows[1].split(';').collect();
    assert_eq!(first.len(), 20);
    assert_eq!(first[0], "\"GL\"");
    assert_eq!(first[debit], "1250,50");
    assert_eq!(first[credit], "");

    // The quoted description holds the delimiter.
    assert!(rows[2].contains("\"Salg; kontant\""));
    assert!(rows[2].ends_with("1250,50;;;;;;"));
}

#[test]
fn point_decimals_and_comma_delimiter() {
    let config = CsvConfig {
        delimiter: ',',
        decimal_comma: false,
    };
    let export = to_csv(&validated(), &config);
    let journals = export.file("journals.csv").unwrap();
    assert_eq!(
        journals,
        "\"journal_id\",\"description\",\"journal_type\",\"posting_date\",\"batch_id\",\"system_id\"\n\"GL\",\"Hovedbok\",,,,\n"
    );
    let vouchers = export.file("vouchers.csv").unwrap();
    assert!(vouchers.ends_with(",1250.50,1250.50\n"), "{vouchers}");
}

#[test]
fn empty_collections_keep_header_row() {
    let export = to_csv(&validated(), &CsvConfig::default());
    assert_eq!(export.file("missing_accounts.csv"), Some("\"account_id\";\"lines\"\n"));
    assert_eq!(export.file("customers.csv").unwrap().lines().count(), 1);
}

const PARTY_DOCUMENT: &str = r#"<AuditFile>
  <MasterFiles>
    <Customers><Customer><CustomerID>C1</CustomerID><Name>Kunde AS</Name><AccountID>1500</AccountID><ClosingDebitBalance>125.00</ClosingDebitBalance></Customer></Customers>
    <Suppliers><Supplier><SupplierID>S1</SupplierID>
      <BalanceAccountStructure><AccountID>2400</AccountID><OpeningCreditBalance>10.00</OpeningCreditBalance></BalanceAccountStructure>
      <BalanceAccountStructure><AccountID>2410</AccountID></BalanceAccountStructure>
    </Supplier></Suppliers>
  </MasterFiles>
  <GeneralLedgerEntries><Journal><JournalID>S</JournalID><Transaction><VoucherNo>7</VoucherNo>
    <Line><AccountID>1500</AccountID><CustomerID>C1</CustomerID><DebitAmount>125.00</DebitAmount></Line>
    <Line><AccountID>3000</AccountID><CreditAmount>125.00</CreditAmount></Line>
  </Transaction></Journal></GeneralLedgerEntries>
  <SourceDocuments><SalesInvoices><Invoice>
    <InvoiceNo>10001</InvoiceNo><CustomerInfo><CustomerID>C1</CustomerID></CustomerInfo>
    <InvoiceDate>2025-02-01</InvoiceDate>
    <DocumentTotals><TaxPayable>25.00</TaxPayable><NetTotal>100.00</NetTotal><GrossTotal>125.00</GrossTotal></DocumentTotals>
  </Invoice></SalesInvoices></SourceDocuments>
</AuditFile>"#;

fn validated_parties() -> ValidatedLedger {
    let config = LoadConfig::default();
    validate(parse_bytes(PARTY_DOCUMENT.as_bytes(), &config).unwrap(), &config).unwrap()
}

#[test]
fn party_accounts_csv() {
    let export = to_csv(&validated_parties(), &CsvConfig::default());
    insta::assert_snapshot!(export.file("party_accounts.csv").unwrap(), @r#"
    "party_type";"party_id";"account_id";"opening_balance";"closing_balance"
    "Customer";"C1";"1500";;125,00
    "Supplier";"S1";"2400";-10,00;
    "Supplier";"S1";"2410";;
    "#);
}

#[test]
fn invoices_csv() {
    let export = to_csv(&validated_parties(), &CsvConfig::default());
    insta::assert_snapshot!(export.file("invoices.csv").unwrap(), @r#"
    "kind";"invoice_no";"invoice_date";"tax_point_date";"gl_posting_date";"party_id";"party_name";"currency";"net_total";"tax_payable";"gross_total";"source_id";"document_number";"due_date"
    "Sales";"10001";2025-02-01;;;"C1";;;100,00;25,00;125,00;;;
    "#);
}

#[test]
fn party_balances_csv() {
    let export = to_csv(&validated_parties(), &CsvConfig::default());
    insta::assert_snapshot!(export.file("party_balances.csv").unwrap(), @r#"
    "party_type";"party_id";"debit";"credit";"balance"
    "Customer";"C1";125,00;0;125,00
    "#);
}

#[test]
fn dir_sink_writes_every_file() {
    let tmp = tempfile::TempDir::new().unwrap();
    let out = tmp.path().join("out");
    let validated = validated();

    let mut sink = CsvDirSink::new(&out);
    sink.export(&validated).unwrap();

    let export = to_csv(&validated, &CsvConfig::default());
    for (name, content) in &export.files {
        let written = std::fs::read_to_string(out.join(name)).unwrap();
        assert_eq!(&written, content, "{name}");
    }
}

#[test]
fn dir_sink_reports_unwritable_target() {
    let tmp = tempfile::TempDir::new().unwrap();
    let blocker = tmp.path().join("out");
    std::fs::write(&blocker, "not a directory").unwrap();

    let mut sink = CsvDirSink::new(&blocker);
    let err = sink.export(&validated()).unwrap_err();
    assert!(matches!(err, SaftError::Export(_)), "{err:?}");
}
