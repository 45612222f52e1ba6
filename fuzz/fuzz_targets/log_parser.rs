#![no_main]

use libfuzzer_sys::fuzz_target;
use std::io::Cursor;
use stridemerge::aggregate::merge_records;
use stridemerge::parser::parse_reader;

fuzz_target!(|data: &[u8]| {
    // Arbitrary bytes must never panic the parser or the aggregator
    if let Ok(outcome) = parse_reader(Cursor::new(data), 64) {
        assert!(outcome.records.iter().all(|r| r.accesses > 0));
        let _ = merge_records(&outcome.records);
    }
});
