#![no_main]

use libfuzzer_sys::fuzz_target;
use saft_ledger::LoadConfig;

fuzz_target!(|data: &[u8]| {
    // Errors are fine, panics are bugs.
    let config = LoadConfig::default();
    if let Ok(ledger) = saft_ledger::parser::parse_bytes(data, &config) {
        let _ = saft_ledger::validate(ledger, &config);
    }
});
