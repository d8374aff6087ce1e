#![no_main]
use libfuzzer_sys::fuzz_target;
use oximap::{RawSourceMap, decode};

fuzz_target!(|data: &[u8]| {
    // Fuzz the mappings walker directly with arbitrary text and small
    // side tables, skipping the JSON layer.
    let Ok(mappings) = std::str::from_utf8(data) else {
        return;
    };
    let raw = RawSourceMap {
        version: 3,
        file: None,
        source_root: None,
        sources: vec!["a".into(), "b".into()],
        sources_content: None,
        names: vec!["n".into()],
        mappings: mappings.to_string(),
        line_count: None,
    };
    let _ = decode(&raw);
});
