//! Validate a SAF-T file and write one CSV per collection.
//!
//! ```text
//! cargo run --example csv_export --features export -- SAF-T.xml out/
//! ```

use saft_ledger::export::{CsvConfig, CsvDirSink};
use saft_ledger::parser::Loader;
use saft_ledger::*;

fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let (Some(input), Some(out_dir)) = (args.next(), args.next()) else {
        eprintln!("usage: csv_export <file.xml|file.zip> <out-dir>");
        std::process::exit(2);
    };

    let config = LoadConfigBuilder::new()
        .max_zip_ratio(100.0)
        .max_offenders(5)
        .build();
    let mut sink = CsvDirSink::new(&out_dir).with_config(CsvConfig::default());

    match Loader::new(config).run(&input, &mut sink) {
        Ok(validated) => {
            let ledger = validated.ledger();
            println!(
                "wrote {} lines in {} journals to {}",
                ledger.lines.len(),
                ledger.journals.len(),
                sink.dir().display()
            );
        }
        Err(SaftError::BalanceViolation(report)) => {
            eprintln!("not exported, ledger does not balance:\n  {report}");
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("not exported: {e}");
            std::process::exit(1);
        }
    }
}
