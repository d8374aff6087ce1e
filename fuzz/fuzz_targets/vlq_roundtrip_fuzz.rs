#![no_main]
use libfuzzer_sys::fuzz_target;
use oximap::vlq;

fuzz_target!(|data: &[u8]| {
    // Interpret input as i32 values; encode then decode must be identity.
    let values: Vec<i64> = data
        .chunks_exact(4)
        .map(|c| i64::from(i32::from_le_bytes([c[0], c[1], c[2], c[3]])))
        .collect();
    if values.is_empty() {
        return;
    }

    let encoded = vlq::encode(&values);
    let decoded = vlq::decode(&encoded).expect("encoder output must decode");
    assert_eq!(decoded, values);

    // Decoding arbitrary alphabet text must not panic either.
    if let Ok(text) = std::str::from_utf8(data) {
        let _ = vlq::decode(text);
    }
});
