use criterion::{Criterion, black_box, criterion_group, criterion_main};

use saft_ledger::parser::parse_bytes;
use saft_ledger::*;

/// A balanced document with `journals` journals of `vouchers` two-line vouchers each.
fn synthetic_document(journals: usize, vouchers: usize) -> String {
    let mut xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<AuditFile xmlns="urn:StandardAuditFile-Taxation-Financial:NO">
  <Header><AuditFileVersion>1.30</AuditFileVersion><DefaultCurrencyCode>NOK</DefaultCurrencyCode></Header>
  <MasterFiles><GeneralLedgerAccounts>
    <Account><AccountID>1920</AccountID><AccountDescription>Bank</AccountDescription></Account>
    <Account><AccountID>3000</AccountID><AccountDescription>Salg</AccountDescription></Account>
  </GeneralLedgerAccounts></MasterFiles>
  <GeneralLedgerEntries>
"#,
    );
    for j in 0..journals {
        xml.push_str(&format!(
            "<Journal><JournalID>J{j}</JournalID><Description>Journal {j}</Description>\n"
        ));
        for v in 0..vouchers {
            let amount = format!("{} {:03},{:02}", 1 + v % 9, v % 1000, v % 100);
            xml.push_str(&format!(
                "<Transaction><TransactionID>{j}-{v}</TransactionID><TransactionDate>2025-01-10</TransactionDate><VoucherNo>{v}</VoucherNo>\
<Line><RecordID>1</RecordID><AccountID>1920</AccountID><DebitAmount><Amount>{amount}</Amount></DebitAmount>\
<TaxInformation><TaxCode>3</TaxCode><TaxPercentage>25</TaxPercentage></TaxInformation></Line>\
<Line><RecordID>2</RecordID><AccountID>3000</AccountID><CreditAmount><Amount>{amount}</Amount></CreditAmount>\
<Analysis><AnalysisType>AVD</AnalysisType><AnalysisID>10</AnalysisID></Analysis></Line></Transaction>\n"
            ));
        }
        xml.push_str("</Journal>\n");
    }
    xml.push_str("</GeneralLedgerEntries>\n</AuditFile>\n");
    xml
}

fn bench_parse_small(c: &mut Criterion) {
    let xml = synthetic_document(2, 50);
    let config = LoadConfig::default();
    c.bench_function("parse_2x50_vouchers", |b| {
        b.iter(|| black_box(parse_bytes(black_box(xml.as_bytes()), &config)));
    });
}

fn bench_parse_large(c: &mut Criterion) {
    let xml = synthetic_document(10, 2_000);
    let config = LoadConfig::default();
    c.bench_function("parse_10x2000_vouchers", |b| {
        b.iter(|| black_box(parse_bytes(black_box(xml.as_bytes()), &config)));
    });
}

fn bench_validate(c: &mut Criterion) {
    let config = LoadConfig::default();
    let ledger = parse_bytes(synthetic_document(10, 2_000).as_bytes(), &config).unwrap();
    c.bench_function("validate_40000_lines", |b| {
        b.iter(|| black_box(validate(black_box(ledger.clone()), &config)));
    });
}

fn bench_normalize(c: &mut Criterion) {
    let inputs = ["1 234 567,89", "-1234.50", "12\u{a0}000,00", "n/a"];
    c.bench_function("normalize_decimal", |b| {
        b.iter(|| {
            for s in &inputs {
                black_box(normalize_decimal(black_box(s)));
            }
        });
    });
}

criterion_group!(
    benches,
    bench_parse_small,
    bench_parse_large,
    bench_validate,
    bench_normalize,
);
criterion_main!(benches);
