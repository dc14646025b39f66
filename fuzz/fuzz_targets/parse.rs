#![no_main]

use libfuzzer_sys::fuzz_target;
use libplainbook::{parse, Settings, Writer};

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        if let Ok(ledger) = parse(input) {
            let journal = ledger.journal();
            let _ = journal.balance("");
            let _ = journal.transaction_report(journal.transactions());
            let _ = Writer::new(Settings::default()).write(journal);
        }
    }
});
