use anyhow::Result;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::structs::{InvalidInputError, ScoreMatrix, Sequence};

use super::structs::{
    AlignedPair, Alignment, AlignmentBuilder, Cursor, Step, TraceStep, TransformedMatrix,
    UTF8_DASH,
};

/// Which cells a traceback starts from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MaximaSelection {
    /// The first cell in row-major order holding the matrix maximum.
    #[default]
    First,
    /// Every cell holding the matrix maximum, in row-major order.
    All,
}

impl MaximaSelection {
    pub fn start_cells(&self, matrix: &TransformedMatrix) -> Vec<Cursor> {
        match self {
            MaximaSelection::First => vec![matrix.first_maximum()],
            // with a zero maximum every cell ties, and
            // none of them starts a real alignment
            MaximaSelection::All if matrix.max_value() == 0 => vec![matrix.first_maximum()],
            MaximaSelection::All => matrix.maxima(),
        }
    }
}

/// When a traceback stops walking.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum StopRule {
    /// Stop on the first zero-valued cell; the step into that cell is
    /// still emitted.
    #[default]
    AtZero,
    /// Ignore zero-valued cells and walk to the matrix edge, then pair
    /// whatever is left of the sequences with gaps until the origin.
    AtEdge,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TracebackParams {
    pub maxima: MaximaSelection,
    pub stop: StopRule,
}

/// Reconstructs alignments from a filled transformed matrix.
///
/// The matrix is only ever read, so one `Traceback` can be shared
/// across threads and run from many start cells at once.
#[derive(Debug)]
pub struct Traceback<'a> {
    matrix: &'a TransformedMatrix,
    row_seq: &'a Sequence,
    col_seq: &'a Sequence,
    score_matrix: Option<&'a ScoreMatrix>,
    stop: StopRule,
}

impl<'a> Traceback<'a> {
    /// Fails if the matrix was not filled for this pair of sequences.
    pub fn new(
        matrix: &'a TransformedMatrix,
        row_seq: &'a Sequence,
        col_seq: &'a Sequence,
    ) -> Result<Self> {
        if matrix.row_length != row_seq.length || matrix.col_length != col_seq.length {
            return Err(InvalidInputError::DimensionMismatch {
                rows: matrix.row_length,
                cols: matrix.col_length,
                row_length: row_seq.length,
                col_length: col_seq.length,
            }
            .into());
        }

        Ok(Self {
            matrix,
            row_seq,
            col_seq,
            score_matrix: None,
            stop: StopRule::default(),
        })
    }

    pub fn with_stop_rule(mut self, stop: StopRule) -> Self {
        self.stop = stop;
        self
    }

    /// Scores are only used to draw the middle line of the alignments.
    pub fn with_score_matrix(mut self, score_matrix: &'a ScoreMatrix) -> Self {
        self.score_matrix = Some(score_matrix);
        self
    }

    /// Advance the traceback by one cell.
    ///
    /// Among the diagonal, upper and left neighbors, the largest value
    /// wins; the diagonal wins every tie and the upper neighbor wins a
    /// tie with the left one.
    pub fn step(&self, cursor: Cursor) -> Step {
        if cursor.is_origin() {
            return Step::finished(cursor);
        }

        if cursor.is_on_edge() {
            return match self.stop {
                StopRule::AtZero => Step::finished(cursor),
                StopRule::AtEdge if cursor.row_idx > 0 => self.emit(cursor, TraceStep::Up),
                StopRule::AtEdge => self.emit(cursor, TraceStep::Left),
            };
        }

        if self.stop == StopRule::AtZero && self.matrix.at(cursor) == 0 {
            return Step::finished(cursor);
        }

        let diagonal = self.matrix.at(TraceStep::Diagonal.predecessor(cursor));
        let up = self.matrix.at(TraceStep::Up.predecessor(cursor));
        let left = self.matrix.at(TraceStep::Left.predecessor(cursor));

        let trace_step = if diagonal >= up && diagonal >= left {
            TraceStep::Diagonal
        } else if up >= left {
            TraceStep::Up
        } else {
            TraceStep::Left
        };

        self.emit(cursor, trace_step)
    }

    fn emit(&self, cursor: Cursor, trace_step: TraceStep) -> Step {
        let pair = match trace_step {
            TraceStep::Diagonal => AlignedPair {
                row_byte: self.row_seq.residue(cursor.row_idx),
                col_byte: self.col_seq.residue(cursor.col_idx),
            },
            TraceStep::Up => AlignedPair {
                row_byte: self.row_seq.residue(cursor.row_idx),
                col_byte: UTF8_DASH,
            },
            TraceStep::Left => AlignedPair {
                row_byte: UTF8_DASH,
                col_byte: self.col_seq.residue(cursor.col_idx),
            },
        };

        Step {
            next: trace_step.predecessor(cursor),
            emitted: Some((trace_step, pair)),
            done: false,
        }
    }

    /// Run a complete traceback from `start`.
    pub fn from_cell(&self, start: Cursor) -> Result<Alignment> {
        let mut builder = AlignmentBuilder::new(start, self.matrix.at(start));

        if let Some(score_matrix) = self.score_matrix {
            builder = builder.with_score_matrix(score_matrix);
        }

        if !self.row_seq.name.is_empty() {
            builder = builder.with_row_name(self.row_seq.name.clone());
        }

        if !self.col_seq.name.is_empty() {
            builder = builder.with_col_name(self.col_seq.name.clone());
        }

        let mut cursor = start;
        loop {
            let step = self.step(cursor);
            if let Some((trace_step, pair)) = step.emitted {
                builder.push(cursor, trace_step, pair);
            }
            if step.done {
                break;
            }
            cursor = step.next;
        }

        Ok(builder.build())
    }

    /// Run one traceback per start cell chosen by `maxima`.
    pub fn run(&self, maxima: MaximaSelection) -> Result<Vec<Alignment>> {
        let start_cells = maxima.start_cells(self.matrix);

        debug!(
            "tracing back from {} cell(s) with score {}",
            start_cells.len(),
            self.matrix.max_value()
        );

        start_cells
            .into_iter()
            .map(|start| self.from_cell(start))
            .collect()
    }
}

/// Reconstruct the alignments of a filled matrix.
pub fn traceback(
    matrix: &TransformedMatrix,
    row_seq: &Sequence,
    col_seq: &Sequence,
    params: &TracebackParams,
) -> Result<Vec<Alignment>> {
    Traceback::new(matrix, row_seq, col_seq)?
        .with_stop_rule(params.stop)
        .run(params.maxima)
}
