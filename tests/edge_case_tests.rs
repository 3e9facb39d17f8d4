//! Malformed input, cancellation and unusual nesting.

#![cfg(feature = "parser")]

use rust_decimal_macros::dec;
use saft_ledger::parser::*;
use saft_ledger::*;

fn structural(xml: &[u8]) -> String {
    match parse_bytes(xml, &LoadConfig::default()) {
        Err(SaftError::Structural(msg)) => msg,
        other => panic!("expected Structural error, got {other:?}"),
    }
}

// ---------------------------------------------------------------------------
// Structural errors
// ---------------------------------------------------------------------------

#[test]
fn empty_input() {
    structural(b"");
    structural(b"   \n");
}

#[test]
fn not_xml() {
    structural("Konto;Beløp\n1920;100,00\n".as_bytes());
}

#[test]
fn unclosed_elements() {
    structural(b"<AuditFile><GeneralLedgerEntries><Journal><JournalID>J</JournalID>");
}

#[test]
fn mismatched_end_tag() {
    structural(b"<AuditFile><Journal></Transaction></AuditFile>");
}

#[test]
fn second_root_element() {
    structural(b"<AuditFile/><AuditFile/>");
}

#[test]
fn undeclared_root_prefix() {
    structural(b"<n1:AuditFile><n1:Header/></n1:AuditFile>");
}

#[test]
fn error_names_the_open_path() {
    let msg = structural(b"<AuditFile><MasterFiles><Account attr=\"x></Account></MasterFiles></AuditFile>");
    assert!(msg.contains("/AuditFile/MasterFiles"), "{msg}");
}

// ---------------------------------------------------------------------------
// Cancellation
// ---------------------------------------------------------------------------

#[test]
fn cancelled_before_start() {
    let cancel = Cancellation::new();
    cancel.cancel();
    let config = LoadConfigBuilder::new().cancellation(cancel).build();
    let err = parse_bytes(b"<AuditFile><Header/></AuditFile>", &config).unwrap_err();
    assert!(matches!(err, SaftError::Cancelled), "{err:?}");
}

#[test]
fn uncancelled_token_is_inert() {
    let cancel = Cancellation::new();
    let config = LoadConfigBuilder::new().cancellation(cancel.clone()).build();
    assert!(parse_bytes(b"<AuditFile><Header/></AuditFile>", &config).is_ok());
    assert!(!cancel.is_cancelled());
}

// ---------------------------------------------------------------------------
// Unusual but valid shapes
// ---------------------------------------------------------------------------

#[test]
fn context_survives_arbitrary_wrappers() {
    let xml = br#"<AuditFile><GeneralLedgerEntries>
  <Journal><JournalID>DEEP</JournalID>
    <Batch><Group><Transaction><VoucherNo>9</VoucherNo>
      <Lines><Entry><Line><AccountID>1</AccountID><DebitAmount>3</DebitAmount></Line></Entry></Lines>
    </Transaction></Group></Batch>
  </Journal>
</GeneralLedgerEntries></AuditFile>"#;
    let ledger = parse_bytes(xml, &LoadConfig::default()).unwrap();
    assert_eq!(ledger.lines.len(), 1);
    assert_eq!(ledger.lines[0].journal_id.as_deref(), Some("DEEP"));
    assert_eq!(ledger.lines[0].voucher_no.as_deref(), Some("9"));
    assert_eq!(ledger.vouchers[0].debit_total, dec!(3));
}

#[test]
fn line_and_journal_line_names() {
    let xml = br#"<AuditFile><GeneralLedgerEntries><Journal><JournalID>J</JournalID>
  <TransactionLine><AccountID>1</AccountID></TransactionLine>
  <JournalLine><AccountID>2</AccountID></JournalLine>
</Journal></GeneralLedgerEntries></AuditFile>"#;
    let ledger = parse_bytes(xml, &LoadConfig::default()).unwrap();
    let accounts: Vec<Option<&str>> = ledger.lines.iter().map(|l| l.account_id.as_deref()).collect();
    assert_eq!(accounts, vec![Some("1"), Some("2")]);
}

#[test]
fn general_ledger_account_alias() {
    let xml = br#"<AuditFile><MasterFiles>
  <GeneralLedgerAccount><AccountID>1920</AccountID><Description>Bank</Description></GeneralLedgerAccount>
</MasterFiles></AuditFile>"#;
    let ledger = parse_bytes(xml, &LoadConfig::default()).unwrap();
    assert_eq!(ledger.accounts.len(), 1);
    assert_eq!(ledger.accounts[0].description.as_deref(), Some("Bank"));
}

#[test]
fn dates_in_either_format_or_none() {
    let xml = br#"<AuditFile><GeneralLedgerEntries><Journal><JournalID>J</JournalID>
  <Line><PostingDate>2025-03-01T00:00:00</PostingDate></Line>
  <Line><PostingDate>01.03.2025</PostingDate></Line>
  <Line><PostingDate>March 1st</PostingDate></Line>
</Journal></GeneralLedgerEntries></AuditFile>"#;
    let ledger = parse_bytes(xml, &LoadConfig::default()).unwrap();
    let expected = chrono::NaiveDate::from_ymd_opt(2025, 3, 1);
    assert_eq!(ledger.lines[0].posting_date, expected);
    assert_eq!(ledger.lines[1].posting_date, expected);
    assert_eq!(ledger.lines[2].posting_date, None);
}

#[test]
fn element_count_is_recorded() {
    let ledger = parse_bytes(b"<AuditFile><Header><AuditFileVersion>1</AuditFileVersion></Header></AuditFile>", &LoadConfig::default()).unwrap();
    assert_eq!(ledger.stats.elements, 3);
    assert_eq!(ledger.headers.len(), 1);
}

// ---------------------------------------------------------------------------
// Amounts at the edge of the decimal range
// ---------------------------------------------------------------------------

const MAX: &str = "79228162514264337593543950335";

fn max_debit_lines(wrap_in_transaction: bool) -> Vec<u8> {
    let line = format!("<Line><AccountID>1920</AccountID><DebitAmount><Amount>{MAX}</Amount></DebitAmount></Line>");
    let lines = if wrap_in_transaction {
        format!("<Transaction><VoucherNo>V9</VoucherNo>{line}{line}</Transaction>")
    } else {
        format!("{line}{line}")
    };
    format!("<AuditFile><GeneralLedgerEntries><Journal><JournalID>J</JournalID>{lines}</Journal></GeneralLedgerEntries></AuditFile>")
        .into_bytes()
}

#[test]
fn voucher_total_overflow_is_structural() {
    let msg = structural(&max_debit_lines(true));
    assert!(msg.contains("overflow"), "{msg}");
    assert!(msg.contains("V9"), "{msg}");
}

#[test]
fn overflowing_ledger_sums_fail_the_balance_check() {
    let ledger = parse_bytes(&max_debit_lines(false), &LoadConfig::default()).unwrap();
    assert_eq!(ledger.lines.len(), 2);
    assert_eq!(ledger.lines[0].debit, Some(rust_decimal::Decimal::MAX));

    let references = check_references(&ledger, dec!(0.01));
    assert_eq!(references.missing_accounts.len(), 1);

    let err = validate(ledger, &LoadConfig::default()).unwrap_err();
    let report = err.balance_report().expect("balance violation");
    assert!(report.overflowed);
    assert!(!report.is_globally_balanced());
    assert!(report.journals[0].overflowed);
}
