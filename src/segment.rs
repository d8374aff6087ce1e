// Segment model: one mapped-position record of a mappings string.
//
// On the wire a segment is 1, 4 or 5 VLQ deltas relative to a running
// accumulator. In memory it is a tagged variant holding absolute values;
// the optional trailing fields are variants, not holes in a tuple.
//
// Accumulator semantics (shared by decode and encode so re-decoding an
// encoded map is faithful): only the generated-column slot resets at a
// new generated line; source, original line/column and name persist
// across the whole map.

use crate::errors::{Error, Result};

/// A segment with its deltas resolved to absolute values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment {
    /// Generated column only; no source association. Valid on the wire but
    /// unresolvable, so the decoder rejects it (see `SegmentState::apply`).
    GenOnly { gcol: u32 },
    /// Generated column mapped to a source position.
    WithSource {
        gcol: u32,
        src: u32,
        line: u32,
        col: u32,
    },
    /// Generated column mapped to a source position and a name.
    WithSourceAndName {
        gcol: u32,
        src: u32,
        line: u32,
        col: u32,
        name: u32,
    },
}

impl Segment {
    /// Generated column of the segment.
    pub fn gcol(&self) -> u32 {
        match *self {
            Segment::GenOnly { gcol }
            | Segment::WithSource { gcol, .. }
            | Segment::WithSourceAndName { gcol, .. } => gcol,
        }
    }
}

/// The running accumulator: one slot per wire field.
///
/// Threaded by value through the decode and encode folds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SegmentState {
    gcol: i64,
    src: i64,
    line: i64,
    col: i64,
    name: i64,
}

impl SegmentState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new generated line: only the generated-column slot resets.
    #[must_use]
    pub fn next_line(mut self) -> Self {
        self.gcol = 0;
        self
    }

    /// Apply one decoded delta tuple, yielding the advanced state and the
    /// absolute segment.
    ///
    /// Arity 4 and 5 resolve; arity 1 carries no source association and is
    /// rejected rather than silently fabricating one; anything else is
    /// malformed.
    pub fn apply(mut self, deltas: &[i64]) -> Result<(Self, Segment)> {
        match deltas.len() {
            4 => {
                self.gcol += deltas[0];
                self.src += deltas[1];
                self.line += deltas[2];
                self.col += deltas[3];
                let seg = Segment::WithSource {
                    gcol: checked_field(self.gcol, "generated column")?,
                    src: checked_field(self.src, "source index")?,
                    line: checked_field(self.line, "original line")?,
                    col: checked_field(self.col, "original column")?,
                };
                Ok((self, seg))
            }
            5 => {
                self.gcol += deltas[0];
                self.src += deltas[1];
                self.line += deltas[2];
                self.col += deltas[3];
                self.name += deltas[4];
                let seg = Segment::WithSourceAndName {
                    gcol: checked_field(self.gcol, "generated column")?,
                    src: checked_field(self.src, "source index")?,
                    line: checked_field(self.line, "original line")?,
                    col: checked_field(self.col, "original column")?,
                    name: checked_field(self.name, "name index")?,
                };
                Ok((self, seg))
            }
            n => Err(Error::UnsupportedSegmentArity(n)),
        }
    }

    /// Compute the delta tuple that encodes `seg` relative to this state,
    /// yielding the advanced state alongside.
    #[must_use]
    pub fn emit(mut self, seg: &Segment) -> (Self, Vec<i64>) {
        let deltas = match *seg {
            Segment::GenOnly { gcol } => {
                let d = vec![i64::from(gcol) - self.gcol];
                self.gcol = i64::from(gcol);
                d
            }
            Segment::WithSource {
                gcol,
                src,
                line,
                col,
            } => {
                let d = vec![
                    i64::from(gcol) - self.gcol,
                    i64::from(src) - self.src,
                    i64::from(line) - self.line,
                    i64::from(col) - self.col,
                ];
                self.gcol = i64::from(gcol);
                self.src = i64::from(src);
                self.line = i64::from(line);
                self.col = i64::from(col);
                d
            }
            Segment::WithSourceAndName {
                gcol,
                src,
                line,
                col,
                name,
            } => {
                let d = vec![
                    i64::from(gcol) - self.gcol,
                    i64::from(src) - self.src,
                    i64::from(line) - self.line,
                    i64::from(col) - self.col,
                    i64::from(name) - self.name,
                ];
                self.gcol = i64::from(gcol);
                self.src = i64::from(src);
                self.line = i64::from(line);
                self.col = i64::from(col);
                self.name = i64::from(name);
                d
            }
        };
        (self, deltas)
    }
}

fn checked_field(value: i64, field: &'static str) -> Result<u32> {
    u32::try_from(value).map_err(|_| Error::PositionOutOfRange { field, value })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apply_accumulates_across_segments() {
        let state = SegmentState::new();
        let (state, seg) = state.apply(&[0, 0, 0, 0]).unwrap();
        assert_eq!(
            seg,
            Segment::WithSource {
                gcol: 0,
                src: 0,
                line: 0,
                col: 0
            }
        );
        let (_, seg) = state.apply(&[1, 0, 1, 0]).unwrap();
        assert_eq!(
            seg,
            Segment::WithSource {
                gcol: 1,
                src: 0,
                line: 1,
                col: 0
            }
        );
    }

    #[test]
    fn only_gcol_resets_at_line_break() {
        let state = SegmentState::new();
        let (state, _) = state.apply(&[7, 1, 3, 4]).unwrap();
        let state = state.next_line();
        // All deltas zero: gcol restarts at 0, the rest carries over.
        let (_, seg) = state.apply(&[0, 0, 0, 0]).unwrap();
        assert_eq!(
            seg,
            Segment::WithSource {
                gcol: 0,
                src: 1,
                line: 3,
                col: 4
            }
        );
    }

    #[test]
    fn name_slot_persists_without_name_fields() {
        let state = SegmentState::new();
        let (state, _) = state.apply(&[0, 0, 0, 0, 2]).unwrap();
        let (state, _) = state.apply(&[1, 0, 0, 0]).unwrap();
        // The 4-field segment in between must not disturb the name slot.
        let (_, seg) = state.apply(&[1, 0, 0, 0, 0]).unwrap();
        assert_eq!(
            seg,
            Segment::WithSourceAndName {
                gcol: 2,
                src: 0,
                line: 0,
                col: 0,
                name: 2
            }
        );
    }

    #[test]
    fn rejects_unusable_arities() {
        for fields in [vec![1], vec![1, 2], vec![1, 2, 3], vec![1, 2, 3, 4, 5, 6]] {
            let err = SegmentState::new().apply(&fields).unwrap_err();
            assert!(matches!(err, Error::UnsupportedSegmentArity(n) if n == fields.len()));
        }
    }

    #[test]
    fn rejects_negative_accumulation() {
        let err = SegmentState::new().apply(&[0, -1, 0, 0]).unwrap_err();
        assert!(matches!(
            err,
            Error::PositionOutOfRange {
                field: "source index",
                value: -1
            }
        ));
    }

    #[test]
    fn emit_is_inverse_of_apply() {
        let segs = [
            Segment::WithSource {
                gcol: 3,
                src: 0,
                line: 10,
                col: 2,
            },
            Segment::WithSourceAndName {
                gcol: 8,
                src: 1,
                line: 4,
                col: 0,
                name: 0,
            },
        ];
        let mut enc = SegmentState::new();
        let mut dec = SegmentState::new();
        for seg in &segs {
            let (next_enc, deltas) = enc.emit(seg);
            enc = next_enc;
            let (next_dec, decoded) = dec.apply(&deltas).unwrap();
            dec = next_dec;
            assert_eq!(decoded, *seg);
        }
    }
}
