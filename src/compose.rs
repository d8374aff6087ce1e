// Map algebra: merge of successive-stage maps and structural inversion.
//
// `merge` composes two maps from a chained toolchain (original ->
// intermediate, intermediate -> final) into one end-to-end map. A
// position the downstream stage dropped simply vanishes from the result;
// that is policy, not failure.
//
// `invert` transposes an original-keyed index into a generated-keyed one
// without touching wire text, for callers that only hold a reverse map
// but need forward lookups (stack trace reconstruction).

use std::collections::BTreeMap;

use log::debug;

use crate::types::{ForwardIndex, GeneratedPos, OriginalPos, ReverseIndex};

/// Compose `a: original -> generatedA` with `b: generatedA -> generatedB`
/// into `original -> generatedB`.
///
/// Every leaf association of `a` is resolved through `b`'s original
/// coordinates; hits splice all of `b`'s associations for that position
/// (possibly several), misses drop the origin silently.
pub fn merge(a: &ReverseIndex, b: &ReverseIndex) -> ReverseIndex {
    // b flattened to (line, col), sources in declared order.
    let mut downstream: BTreeMap<(u32, u32), Vec<GeneratedPos>> = BTreeMap::new();
    for by_line in b.map.values() {
        for (&line, by_col) in by_line {
            for (&col, entries) in by_col {
                downstream
                    .entry((line, col))
                    .or_default()
                    .extend(entries.iter().copied());
            }
        }
    }

    let mut out = ReverseIndex::new();
    for source in a.sources() {
        out.add_source(source);
    }

    let mut dropped = 0usize;
    for (&src, by_line) in &a.map {
        for (&line, by_col) in by_line {
            for (&col, entries) in by_col {
                for pos in entries {
                    match downstream.get(&(pos.gline, pos.gcol)) {
                        Some(hits) => {
                            for hit in hits {
                                let name = hit
                                    .name
                                    .and_then(|id| b.name(id))
                                    .map(|n| out.add_name(n));
                                out.insert(
                                    src,
                                    line,
                                    col,
                                    GeneratedPos {
                                        gline: hit.gline,
                                        gcol: hit.gcol,
                                        name,
                                    },
                                );
                            }
                        }
                        None => dropped += 1,
                    }
                }
            }
        }
    }

    debug!(
        "merged {} associations, dropped {} positions absent downstream",
        out.len(),
        dropped
    );
    out
}

/// Transpose an original-keyed index into a generated-keyed one.
///
/// Side tables carry over unchanged (ids stay valid); leaf entries
/// append in source-major traversal order, so several origins sharing a
/// generated position keep that order.
pub fn invert(rev: &ReverseIndex) -> ForwardIndex {
    let mut fwd = ForwardIndex::new();
    for source in rev.sources() {
        fwd.add_source(source);
    }
    for name in rev.names() {
        fwd.add_name(name);
    }

    for (&src, by_line) in &rev.map {
        for (&line, by_col) in by_line {
            for (&col, entries) in by_col {
                for pos in entries {
                    fwd.insert(
                        pos.gline,
                        pos.gcol,
                        OriginalPos {
                            src,
                            line,
                            col,
                            name: pos.name,
                        },
                    );
                }
            }
        }
    }
    fwd
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
