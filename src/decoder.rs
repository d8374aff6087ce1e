// Decoder: wire mappings string + side tables -> position index.
//
// One walker drives both orientations. Generated lines are delimited by
// `;`, segments within a line by `,`. The running accumulator is
// threaded through as a value; only its generated-column slot resets at
// a line break. Errors surface immediately: a malformed map cannot be
// partially trusted.

use log::debug;

use crate::errors::{Error, Result};
use crate::segment::{Segment, SegmentState};
use crate::types::{ForwardIndex, GeneratedPos, OriginalPos, RawSourceMap, ReverseIndex};
use crate::vlq;

/// Walk every segment of `raw.mappings`, feeding absolute segments to
/// `sink` along with their generated line.
fn walk<F>(raw: &RawSourceMap, mut sink: F) -> Result<()>
where
    F: FnMut(u32, Segment) -> Result<()>,
{
    if raw.version != 3 {
        return Err(Error::UnsupportedVersion(raw.version));
    }

    let mut state = SegmentState::new();
    for (gline, line) in raw.mappings.split(';').enumerate() {
        state = state.next_line();
        // A blank line advances the generated line counter only.
        if line.is_empty() {
            continue;
        }
        for chunk in line.split(',') {
            let fields = vlq::decode(chunk)?;
            let (next, seg) = state.apply(&fields)?;
            state = next;
            sink(gline as u32, seg)?;
        }
    }
    Ok(())
}

/// Split a resolved segment into its source association parts, bounds-
/// checking the side-table references.
fn resolve(seg: &Segment, sources: usize, names: usize) -> Result<(u32, u32, u32, Option<u32>)> {
    let (src, line, col, name) = match *seg {
        // `walk` never yields this: arity 1 is rejected by the
        // accumulator. Kept for exhaustiveness.
        Segment::GenOnly { .. } => return Err(Error::UnsupportedSegmentArity(1)),
        Segment::WithSource {
            src, line, col, ..
        } => (src, line, col, None),
        Segment::WithSourceAndName {
            src,
            line,
            col,
            name,
            ..
        } => (src, line, col, Some(name)),
    };
    if src as usize >= sources {
        return Err(Error::SourceIndexOutOfRange {
            index: i64::from(src),
            len: sources,
        });
    }
    if let Some(name) = name
        && name as usize >= names
    {
        return Err(Error::NameIndexOutOfRange {
            index: i64::from(name),
            len: names,
        });
    }
    Ok((src, line, col, name))
}

/// Decode a v3 map into a forward index (generated -> original).
pub fn decode(raw: &RawSourceMap) -> Result<ForwardIndex> {
    let mut idx = ForwardIndex::new();
    // Wire index -> interned id, so duplicate table entries keep their
    // wire positions addressable.
    let src_ids: Vec<u32> = raw.sources.iter().map(|s| idx.add_source(s.clone())).collect();
    let name_ids: Vec<u32> = raw.names.iter().map(|n| idx.add_name(n.clone())).collect();

    walk(raw, |gline, seg| {
        let (src, line, col, name) = resolve(&seg, src_ids.len(), name_ids.len())?;
        idx.insert(
            gline,
            seg.gcol(),
            OriginalPos {
                src: src_ids[src as usize],
                line,
                col,
                name: name.map(|n| name_ids[n as usize]),
            },
        );
        Ok(())
    })?;

    debug!("decoded {} associations (forward)", idx.len());
    Ok(idx)
}

/// Decode a v3 map into a reverse index (original -> generated).
pub fn decode_reverse(raw: &RawSourceMap) -> Result<ReverseIndex> {
    let mut idx = ReverseIndex::new();
    let src_ids: Vec<u32> = raw.sources.iter().map(|s| idx.add_source(s.clone())).collect();
    let name_ids: Vec<u32> = raw.names.iter().map(|n| idx.add_name(n.clone())).collect();

    walk(raw, |gline, seg| {
        let (src, line, col, name) = resolve(&seg, src_ids.len(), name_ids.len())?;
        idx.insert(
            src_ids[src as usize],
            line,
            col,
            GeneratedPos {
                gline,
                gcol: seg.gcol(),
                name: name.map(|n| name_ids[n as usize]),
            },
        );
        Ok(())
    })?;

    debug!("decoded {} associations (reverse)", idx.len());
    Ok(idx)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
