// Data model: the v3 wire object and the in-memory position indexes.
//
// The wire object (`RawSourceMap`) is an immutable external artifact
// mapped 1:1 onto the v3 JSON shape. The indexes are transient values,
// rebuilt per conversion, with every level ordered by key: wire
// re-encoding iterates lines and columns in ascending order, so the
// nesting is BTreeMaps, never insertion-ordered hash maps.

use std::collections::BTreeMap;

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use crate::errors::Result;

// ---------------------------------------------------------------------------
// Wire object
// ---------------------------------------------------------------------------

/// The source map v3 JSON object.
///
/// `sources` and `names` are append-only, index-stable side tables; the
/// `mappings` string refers into them by index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSourceMap {
    pub version: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_root: Option<String>,
    pub sources: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sources_content: Option<Vec<Option<String>>>,
    pub names: Vec<String>,
    pub mappings: String,
    /// Declared generated line count (emitted by some toolchains).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_count: Option<u32>,
}

impl RawSourceMap {
    /// Parse a v3 map from JSON text.
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Serialize back to JSON text, compact or pretty-printed.
    pub fn to_json(&self, pretty: bool) -> Result<String> {
        let text = if pretty {
            serde_json::to_string_pretty(self)?
        } else {
            serde_json::to_string(self)?
        };
        Ok(text)
    }
}

// ---------------------------------------------------------------------------
// Index leaves
// ---------------------------------------------------------------------------

/// One original-side association: leaf of a forward index.
///
/// `src` and `name` are ids into the owning index's side tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct OriginalPos {
    pub src: u32,
    pub line: u32,
    pub col: u32,
    pub name: Option<u32>,
}

/// One generated-side association: leaf of a reverse index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct GeneratedPos {
    pub gline: u32,
    pub gcol: u32,
    pub name: Option<u32>,
}

/// A fully resolved association, independent of either index orientation.
/// Used for lookups and set-equality comparisons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Association<'a> {
    pub source: &'a str,
    pub original_line: u32,
    pub original_col: u32,
    pub generated_line: u32,
    pub generated_col: u32,
    pub name: Option<&'a str>,
}

// ---------------------------------------------------------------------------
// Forward index: generated line/column -> original positions
// ---------------------------------------------------------------------------

/// Position index keyed by generated line, then generated column.
///
/// A generated position can map to several origins (fan-out from inlining
/// or duplication), so the leaf is a list in append order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ForwardIndex {
    sources: IndexSet<String>,
    names: IndexSet<String>,
    pub(crate) map: BTreeMap<u32, BTreeMap<u32, Vec<OriginalPos>>>,
}

impl ForwardIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern a source path, returning its stable id.
    pub fn add_source(&mut self, source: impl Into<String>) -> u32 {
        self.sources.insert_full(source.into()).0 as u32
    }

    /// Intern a name, returning its stable id.
    pub fn add_name(&mut self, name: impl Into<String>) -> u32 {
        self.names.insert_full(name.into()).0 as u32
    }

    /// Append an association under a generated position.
    pub fn insert(&mut self, gline: u32, gcol: u32, pos: OriginalPos) {
        self.map
            .entry(gline)
            .or_default()
            .entry(gcol)
            .or_default()
            .push(pos);
    }

    pub fn source(&self, id: u32) -> Option<&str> {
        self.sources.get_index(id as usize).map(String::as_str)
    }

    pub fn name(&self, id: u32) -> Option<&str> {
        self.names.get_index(id as usize).map(String::as_str)
    }

    pub fn sources(&self) -> impl Iterator<Item = &str> {
        self.sources.iter().map(String::as_str)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// All origins recorded for a generated position, in append order.
    pub fn lookup(&self, gline: u32, gcol: u32) -> &[OriginalPos] {
        self.map
            .get(&gline)
            .and_then(|cols| cols.get(&gcol))
            .map_or(&[], Vec::as_slice)
    }

    /// Total number of stored associations.
    pub fn len(&self) -> usize {
        self.map
            .values()
            .flat_map(BTreeMap::values)
            .map(Vec::len)
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Every association, resolved against the side tables, in index order.
    pub fn associations(&self) -> Vec<Association<'_>> {
        let mut out = Vec::with_capacity(self.len());
        for (&gline, cols) in &self.map {
            for (&gcol, entries) in cols {
                for pos in entries {
                    out.push(Association {
                        source: self.source(pos.src).unwrap_or(""),
                        original_line: pos.line,
                        original_col: pos.col,
                        generated_line: gline,
                        generated_col: gcol,
                        name: pos.name.and_then(|id| self.name(id)),
                    });
                }
            }
        }
        out
    }
}

// ---------------------------------------------------------------------------
// Reverse index: source file -> original line/column -> generated positions
// ---------------------------------------------------------------------------

/// Position index keyed by source, then original line, then original
/// column.
///
/// The outer level is keyed by source id, so iteration follows the
/// `sources` table's declared order rather than the lexical order of the
/// paths.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReverseIndex {
    sources: IndexSet<String>,
    names: IndexSet<String>,
    pub(crate) map: BTreeMap<u32, BTreeMap<u32, BTreeMap<u32, Vec<GeneratedPos>>>>,
}

impl ReverseIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern a source path, returning its stable id.
    pub fn add_source(&mut self, source: impl Into<String>) -> u32 {
        self.sources.insert_full(source.into()).0 as u32
    }

    /// Intern a name, returning its stable id.
    pub fn add_name(&mut self, name: impl Into<String>) -> u32 {
        self.names.insert_full(name.into()).0 as u32
    }

    /// Append an association under an original position.
    pub fn insert(&mut self, src: u32, line: u32, col: u32, pos: GeneratedPos) {
        self.map
            .entry(src)
            .or_default()
            .entry(line)
            .or_default()
            .entry(col)
            .or_default()
            .push(pos);
    }

    pub fn source(&self, id: u32) -> Option<&str> {
        self.sources.get_index(id as usize).map(String::as_str)
    }

    pub fn name(&self, id: u32) -> Option<&str> {
        self.names.get_index(id as usize).map(String::as_str)
    }

    pub fn sources(&self) -> impl Iterator<Item = &str> {
        self.sources.iter().map(String::as_str)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// Total number of stored associations.
    pub fn len(&self) -> usize {
        self.map
            .values()
            .flat_map(BTreeMap::values)
            .flat_map(BTreeMap::values)
            .map(Vec::len)
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Every association, resolved against the side tables, in index order.
    pub fn associations(&self) -> Vec<Association<'_>> {
        let mut out = Vec::with_capacity(self.len());
        for (&src, lines) in &self.map {
            let source = self.source(src).unwrap_or("");
            for (&line, cols) in lines {
                for (&col, entries) in cols {
                    for pos in entries {
                        out.push(Association {
                            source,
                            original_line: line,
                            original_col: col,
                            generated_line: pos.gline,
                            generated_col: pos.gcol,
                            name: pos.name.and_then(|id| self.name(id)),
                        });
                    }
                }
            }
        }
        out
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_map_json_roundtrip() {
        let text = r#"{
            "version": 3,
            "file": "out.js",
            "sources": ["a.cljs"],
            "names": ["x"],
            "mappings": "AAAA"
        }"#;
        let raw = RawSourceMap::from_json(text).unwrap();
        assert_eq!(raw.version, 3);
        assert_eq!(raw.file.as_deref(), Some("out.js"));
        assert_eq!(raw.sources, vec!["a.cljs"]);
        assert!(raw.source_root.is_none());

        let compact = raw.to_json(false).unwrap();
        assert_eq!(RawSourceMap::from_json(&compact).unwrap(), raw);
        // Absent optional fields stay absent on the wire.
        assert!(!compact.contains("sourceRoot"));
        assert!(!compact.contains("lineCount"));
    }

    #[test]
    fn raw_map_tolerates_unknown_fields() {
        let text = r#"{"version":3,"sources":[],"names":[],"mappings":"","x_extra":[0]}"#;
        assert!(RawSourceMap::from_json(text).is_ok());
    }

    #[test]
    fn interning_is_append_only_and_stable() {
        let mut idx = ReverseIndex::new();
        assert_eq!(idx.add_source("a.cljs"), 0);
        assert_eq!(idx.add_source("b.cljs"), 1);
        assert_eq!(idx.add_source("a.cljs"), 0);
        assert_eq!(idx.source(1), Some("b.cljs"));
    }

    #[test]
    fn forward_lookup_preserves_fan_out_order() {
        let mut idx = ForwardIndex::new();
        let src = idx.add_source("a.cljs");
        idx.insert(
            2,
            5,
            OriginalPos {
                src,
                line: 1,
                col: 0,
                name: None,
            },
        );
        idx.insert(
            2,
            5,
            OriginalPos {
                src,
                line: 9,
                col: 3,
                name: None,
            },
        );
        let hits = idx.lookup(2, 5);
        assert_eq!(hits.len(), 2);
        assert_eq!((hits[0].line, hits[1].line), (1, 9));
        assert!(idx.lookup(2, 6).is_empty());
    }

    #[test]
    fn reverse_associations_follow_declared_source_order() {
        let mut idx = ReverseIndex::new();
        // Declared order "z" before "a": iteration must not re-sort lexically.
        let z = idx.add_source("z.cljs");
        let a = idx.add_source("a.cljs");
        idx.insert(
            z,
            0,
            0,
            GeneratedPos {
                gline: 0,
                gcol: 0,
                name: None,
            },
        );
        idx.insert(
            a,
            0,
            0,
            GeneratedPos {
                gline: 1,
                gcol: 0,
                name: None,
            },
        );
        let assocs = idx.associations();
        assert_eq!(assocs[0].source, "z.cljs");
        assert_eq!(assocs[1].source, "a.cljs");
    }
}
