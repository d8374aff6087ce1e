#![no_main]
use libfuzzer_sys::fuzz_target;
use oximap::{RawSourceMap, decode, decode_reverse};

fuzz_target!(|data: &[u8]| {
    // Arbitrary bytes through the whole ingestion path.
    // Parsing and decoding must never panic -- only return errors.
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(raw) = RawSourceMap::from_json(text) else {
        return;
    };
    let _ = decode(&raw);
    let _ = decode_reverse(&raw);
});
