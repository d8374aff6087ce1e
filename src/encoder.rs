// Encoder: position index -> v3 wire object.
//
// Consumes the source-keyed index (original -> generated): sources are
// traversed in the table's declared order, each association becomes an
// absolute segment bucketed by its generated line (skipped lines pad
// with empty segment lists), names intern in first-seen order, and the
// per-line delta emission mirrors the decoder's accumulator semantics
// so re-decoding the output is faithful.

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use indexmap::IndexSet;
use log::debug;

use crate::errors::Result;
use crate::paths::PathRelativizer;
use crate::segment::{Segment, SegmentState};
use crate::types::{RawSourceMap, ReverseIndex};
use crate::vlq;

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Encoder configuration.
#[derive(Debug, Clone, Default)]
pub struct EncodeOptions {
    /// Generated file the map describes (`file` field).
    pub file: Option<String>,
    /// Directory the generated file lives in; relativization fallback.
    pub output_dir: Option<PathBuf>,
    /// Explicit base for `sources` relativization. Wins over the
    /// `source_map` / `output_dir` fallbacks.
    pub source_map_path: Option<String>,
    /// Path the map itself is written to; plain sources relativize
    /// against its parent directory.
    pub source_map: Option<PathBuf>,
    /// Explicit source -> relative-path overrides.
    pub relpaths: HashMap<String, String>,
    /// Unmapped header lines in the generated file; the mappings string
    /// starts with this many empty lines.
    pub preamble_line_count: u32,
    /// Append a `?rel=<millis>` cache-busting suffix to each source.
    pub source_map_timestamp: bool,
    /// Pretty-print the serialized JSON.
    pub pretty_print: bool,
    /// `sourcesContent` payload, parallel to the sources table.
    pub sources_content: Option<Vec<String>>,
    /// Declared generated line count (`lineCount` field).
    pub lines: Option<u32>,
}

// ---------------------------------------------------------------------------
// Encoding
// ---------------------------------------------------------------------------

/// Flatten a source-keyed index into a v3 wire object.
pub fn encode(index: &ReverseIndex, opts: &EncodeOptions) -> RawSourceMap {
    let mut names: IndexSet<String> = IndexSet::new();
    let mut lines: Vec<Vec<Segment>> = Vec::new();

    // Source-major traversal; bucket every association by generated line.
    for (&src, by_line) in &index.map {
        for (&line, by_col) in by_line {
            for (&col, entries) in by_col {
                for pos in entries {
                    let name = pos
                        .name
                        .and_then(|id| index.name(id))
                        .map(|n| names.insert_full(n.to_string()).0 as u32);
                    let seg = match name {
                        Some(name) => Segment::WithSourceAndName {
                            gcol: pos.gcol,
                            src,
                            line,
                            col,
                            name,
                        },
                        None => Segment::WithSource {
                            gcol: pos.gcol,
                            src,
                            line,
                            col,
                        },
                    };
                    let gline = pos.gline as usize;
                    if lines.len() <= gline {
                        lines.resize_with(gline + 1, Vec::new);
                    }
                    lines[gline].push(seg);
                }
            }
        }
    }

    // Delta emission. The accumulator carries across lines except for the
    // generated-column slot, exactly like the decode side.
    let mut state = SegmentState::new();
    let mut encoded_lines = Vec::with_capacity(lines.len());
    for segs in &lines {
        state = state.next_line();
        let mut parts = Vec::with_capacity(segs.len());
        for seg in segs {
            let (next, deltas) = state.emit(seg);
            state = next;
            parts.push(vlq::encode(&deltas));
        }
        encoded_lines.push(parts.join(","));
    }
    let mappings = format!(
        "{}{}",
        ";".repeat(opts.preamble_line_count as usize),
        encoded_lines.join(";")
    );

    let relativizer = PathRelativizer {
        relpaths: opts.relpaths.clone(),
        base: resolve_base(opts),
    };
    let timestamp = opts.source_map_timestamp.then(unix_millis);
    let sources: Vec<String> = index
        .sources()
        .map(|s| {
            let mut rewritten = relativizer.rewrite(s);
            if let Some(ms) = timestamp {
                rewritten.push_str(&format!("?rel={ms}"));
            }
            rewritten
        })
        .collect();

    debug!(
        "encoded {} generated lines, {} sources, {} names",
        lines.len(),
        sources.len(),
        names.len()
    );

    RawSourceMap {
        version: 3,
        file: opts.file.clone(),
        source_root: None,
        sources,
        sources_content: opts
            .sources_content
            .clone()
            .map(|v| v.into_iter().map(Some).collect()),
        names: names.into_iter().collect(),
        mappings,
        line_count: opts.lines,
    }
}

/// Encode straight to JSON text, honoring `pretty_print`.
pub fn encode_to_string(index: &ReverseIndex, opts: &EncodeOptions) -> Result<String> {
    encode(index, opts).to_json(opts.pretty_print)
}

fn resolve_base(opts: &EncodeOptions) -> Option<String> {
    if let Some(path) = &opts.source_map_path {
        return Some(path.clone());
    }
    if let Some(map_path) = &opts.source_map
        && let Some(parent) = map_path.parent()
    {
        return Some(parent.to_string_lossy().into_owned());
    }
    opts.output_dir
        .as_ref()
        .map(|p| p.to_string_lossy().into_owned())
}

fn unix_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
