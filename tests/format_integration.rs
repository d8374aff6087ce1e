// End-to-end behaviors across the wire boundary: duality of decoding
// orientations, stage merging on real maps, and encoder options that
// show up in the serialized object.

use pretty_assertions::assert_eq;

use oximap::{
    EncodeOptions, RawSourceMap, decode, decode_reverse, encode, encode_to_string, invert, merge,
};

fn stage_a() -> RawSourceMap {
    // a.cljs -> intermediate.js, one segment per line.
    RawSourceMap::from_json(
        r#"{
            "version": 3,
            "file": "intermediate.js",
            "sources": ["a.cljs"],
            "names": [],
            "mappings": "AAAA;AACA;AACA"
        }"#,
    )
    .unwrap()
}

fn stage_b() -> RawSourceMap {
    // intermediate.js -> min.js: everything folded onto line 0, and
    // intermediate line 1 dropped entirely.
    RawSourceMap::from_json(
        r#"{
            "version": 3,
            "file": "min.js",
            "sources": ["intermediate.js"],
            "names": [],
            "mappings": "AAAA,KAEA"
        }"#,
    )
    .unwrap()
}

#[test]
fn invert_of_reverse_decode_equals_forward_decode() {
    for json in [
        r#"{"version":3,"sources":["a.cljs"],"names":[],"mappings":"AAAA,CACA;;AACA"}"#,
        r#"{"version":3,"sources":["a.cljs","b.cljs"],"names":["x","y"],"mappings":"AAAAA,CAAAC;ACAAA"}"#,
    ] {
        let raw = RawSourceMap::from_json(json).unwrap();
        let transposed = invert(&decode_reverse(&raw).unwrap());
        assert_eq!(transposed, decode(&raw).unwrap());
    }
}

#[test]
fn merge_reproduces_manual_composition() {
    let a = decode_reverse(&stage_a()).unwrap();
    let b = decode_reverse(&stage_b()).unwrap();
    let merged = merge(&a, &b);

    // Manual position-by-position composition: b's original coordinates
    // are a's generated ones, so index b by them and chain.
    let mut table: std::collections::BTreeMap<(u32, u32), Vec<(u32, u32)>> =
        std::collections::BTreeMap::new();
    for x in b.associations() {
        table
            .entry((x.original_line, x.original_col))
            .or_default()
            .push((x.generated_line, x.generated_col));
    }
    let mut manual = Vec::new();
    for assoc in a.associations() {
        if let Some(hits) = table.get(&(assoc.generated_line, assoc.generated_col)) {
            for &(gline, gcol) in hits {
                manual.push((assoc.original_line, assoc.original_col, gline, gcol));
            }
        }
    }

    let composed: Vec<_> = merged
        .associations()
        .iter()
        .map(|x| {
            (
                x.original_line,
                x.original_col,
                x.generated_line,
                x.generated_col,
            )
        })
        .collect();

    assert_eq!(composed, manual);
    assert_eq!(composed, vec![(0, 0, 0, 0), (2, 0, 0, 5)]);
}

#[test]
fn merge_drops_positions_the_downstream_stage_lost() {
    let a = decode_reverse(&stage_a()).unwrap();
    let b = decode_reverse(&stage_b()).unwrap();
    assert_eq!(a.len(), 3);

    let merged = merge(&a, &b);
    // intermediate.js line 1 has no entry in stage B.
    assert_eq!(merged.len(), 2);
    assert!(
        !merged
            .associations()
            .iter()
            .any(|x| x.original_line == 1)
    );
}

#[test]
fn merged_map_reencodes_in_original_coordinates() {
    let a = decode_reverse(&stage_a()).unwrap();
    let b = decode_reverse(&stage_b()).unwrap();
    let raw = encode(
        &merge(&a, &b),
        &EncodeOptions {
            file: Some("min.js".to_string()),
            ..Default::default()
        },
    );
    assert_eq!(raw.sources, vec!["a.cljs"]);
    assert_eq!(raw.mappings, "AAAA,KAEA");
}

#[test]
fn preamble_shifts_decoded_generated_lines() {
    let raw = RawSourceMap::from_json(
        r#"{"version":3,"sources":["a.cljs"],"names":[],"mappings":"AAAA"}"#,
    )
    .unwrap();
    let idx = decode_reverse(&raw).unwrap();
    let shifted = encode(
        &idx,
        &EncodeOptions {
            preamble_line_count: 3,
            ..Default::default()
        },
    );
    let decoded = decode(&shifted).unwrap();
    assert!(decoded.lookup(0, 0).is_empty());
    assert_eq!(decoded.lookup(3, 0).len(), 1);
}

#[test]
fn pretty_and_compact_serializations_parse_identically() {
    let idx = decode_reverse(&stage_a()).unwrap();
    let compact = encode_to_string(
        &idx,
        &EncodeOptions {
            file: Some("intermediate.js".to_string()),
            ..Default::default()
        },
    )
    .unwrap();
    let pretty = encode_to_string(
        &idx,
        &EncodeOptions {
            file: Some("intermediate.js".to_string()),
            pretty_print: true,
            ..Default::default()
        },
    )
    .unwrap();
    assert_ne!(compact, pretty);
    assert_eq!(
        RawSourceMap::from_json(&compact).unwrap(),
        RawSourceMap::from_json(&pretty).unwrap()
    );
}
