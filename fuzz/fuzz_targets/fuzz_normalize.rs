#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        if let Some(d) = saft_ledger::normalize_decimal(s) {
            assert_eq!(saft_ledger::normalize_decimal(&d.to_string()), Some(d));
        }
        let _ = saft_ledger::parse_date(s);
    }
});
