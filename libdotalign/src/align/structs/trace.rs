use serde::Serialize;

pub const UTF8_DASH: u8 = b'-';

/// A position in the transformed matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
pub struct Cursor {
    pub row_idx: usize,
    pub col_idx: usize,
}

impl Cursor {
    pub fn new(row_idx: usize, col_idx: usize) -> Self {
        Self { row_idx, col_idx }
    }

    pub fn is_on_edge(&self) -> bool {
        self.row_idx == 0 || self.col_idx == 0
    }

    pub fn is_origin(&self) -> bool {
        self.row_idx == 0 && self.col_idx == 0
    }
}

impl std::fmt::Display for Cursor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row_idx, self.col_idx)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraceStep {
    /// Consume one symbol of both sequences.
    Diagonal,
    /// Consume a row sequence symbol against a gap.
    Up,
    /// Consume a column sequence symbol against a gap.
    Left,
}

impl TraceStep {
    /// The cursor that precedes `cursor` along this step.
    pub fn predecessor(&self, cursor: Cursor) -> Cursor {
        match self {
            TraceStep::Diagonal => Cursor::new(cursor.row_idx - 1, cursor.col_idx - 1),
            TraceStep::Up => Cursor::new(cursor.row_idx - 1, cursor.col_idx),
            TraceStep::Left => Cursor::new(cursor.row_idx, cursor.col_idx - 1),
        }
    }
}

/// One aligned column: the row symbol over the column symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlignedPair {
    pub row_byte: u8,
    pub col_byte: u8,
}

/// The result of advancing a traceback by one cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    /// Where the traceback continues from.
    pub next: Cursor,
    /// The step taken and the column it produced, if any.
    pub emitted: Option<(TraceStep, AlignedPair)>,
    /// Set once the traceback has nothing left to emit.
    pub done: bool,
}

impl Step {
    pub fn finished(at: Cursor) -> Self {
        Self {
            next: at,
            emitted: None,
            done: true,
        }
    }
}
