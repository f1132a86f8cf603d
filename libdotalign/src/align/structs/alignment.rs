use serde::Serialize;
use std::cmp::{max, min};

use crate::structs::ScoreMatrix;

use super::trace::{AlignedPair, TraceStep};
use super::Cursor;

const UTF8_PLUS: u8 = b'+';
const UTF8_SPACE: u8 = b' ';
const BLOCK_WIDTH: usize = 80;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Alignment {
    /// The length of the alignment, gaps included
    pub length: usize,
    /// The transformed matrix value of the cell the traceback started from
    pub score: i64,
    /// The 1-based start coordinate on the row sequence (0 if no row symbol is aligned)
    pub row_start: usize,
    /// The 1-based inclusive end coordinate on the row sequence
    pub row_end: usize,
    /// The 1-based start coordinate on the column sequence (0 if no column symbol is aligned)
    pub col_start: usize,
    /// The 1-based inclusive end coordinate on the column sequence
    pub col_end: usize,
    /// The cell the traceback started from
    pub end_cell: Cursor,
    /// The step that produced each column, in alignment order.
    ///
    /// Gaps are told apart from symbols by these steps, so an input
    /// symbol that happens to be a dash is still a symbol.
    #[serde(skip)]
    pub steps: Vec<TraceStep>,

    // optional fields
    /// The name of the row sequence
    pub row_name: Option<String>,
    /// The name of the column sequence
    pub col_name: Option<String>,

    // display strings: one char per column, each symbol byte
    // is mapped to the char with the same code point
    /// The aligned row sequence
    pub row_string: String,
    /// The display in between the two aligned sequences
    pub middle_string: String,
    /// The aligned column sequence
    pub col_string: String,
}

/// This selects the proper character for the middle line of the alignment reporting.
fn select_middle_character(row_byte: u8, col_byte: u8, score: Option<f64>) -> u8 {
    if row_byte == col_byte {
        // if we have an exact match, we just place the matched character
        row_byte
    } else if score.is_some_and(|s| s > 0.0) {
        // a positive similarity that isn't an identity gets a plus
        UTF8_PLUS
    } else {
        UTF8_SPACE
    }
}

/// Collects the columns emitted by a traceback, which arrive
/// back-to-front, and turns them into an [`Alignment`].
#[derive(Default)]
pub struct AlignmentBuilder<'a> {
    end_cell: Cursor,
    score: i64,
    steps: Vec<(Cursor, TraceStep, AlignedPair)>,
    score_matrix: Option<&'a ScoreMatrix>,
    row_name: Option<String>,
    col_name: Option<String>,
}

impl<'a> AlignmentBuilder<'a> {
    pub fn new(end_cell: Cursor, score: i64) -> Self {
        Self {
            end_cell,
            score,
            ..Default::default()
        }
    }

    pub fn with_score_matrix(mut self, score_matrix: &'a ScoreMatrix) -> Self {
        self.score_matrix = Some(score_matrix);
        self
    }

    pub fn with_row_name(mut self, name: impl Into<String>) -> Self {
        self.row_name = Some(name.into());
        self
    }

    pub fn with_col_name(mut self, name: impl Into<String>) -> Self {
        self.col_name = Some(name.into());
        self
    }

    /// Record a column taken from cell `from`. Columns must be pushed
    /// in the order the traceback emits them, i.e. last column first.
    pub fn push(&mut self, from: Cursor, step: TraceStep, pair: AlignedPair) {
        self.steps.push((from, step, pair));
    }

    pub fn build(mut self) -> Alignment {
        // the steps were emitted from the end of the alignment backwards
        self.steps.reverse();

        let mut row_string = String::with_capacity(self.steps.len());
        let mut col_string = String::with_capacity(self.steps.len());
        let mut middle_string = String::with_capacity(self.steps.len());

        let mut row_start = 0usize;
        let mut row_end = 0usize;
        let mut col_start = 0usize;
        let mut col_end = 0usize;

        for &(from, step, pair) in self.steps.iter() {
            row_string.push(char::from(pair.row_byte));
            col_string.push(char::from(pair.col_byte));

            let middle_byte = match step {
                TraceStep::Diagonal => {
                    let score = self
                        .score_matrix
                        .map(|m| m.get(from.row_idx - 1, from.col_idx - 1));
                    select_middle_character(pair.row_byte, pair.col_byte, score)
                }
                TraceStep::Up | TraceStep::Left => UTF8_SPACE,
            };
            middle_string.push(char::from(middle_byte));

            if step != TraceStep::Left {
                if row_start == 0 {
                    row_start = from.row_idx;
                }
                row_end = from.row_idx;
            }

            if step != TraceStep::Up {
                if col_start == 0 {
                    col_start = from.col_idx;
                }
                col_end = from.col_idx;
            }
        }

        Alignment {
            length: self.steps.len(),
            score: self.score,
            row_start,
            row_end,
            col_start,
            col_end,
            end_cell: self.end_cell,
            steps: self.steps.iter().map(|&(_, step, _)| step).collect(),
            row_name: self.row_name,
            col_name: self.col_name,
            row_string,
            middle_string,
            col_string,
        }
    }
}

impl Alignment {
    pub fn empty(end_cell: Cursor) -> Self {
        Alignment {
            length: 0,
            score: 0,
            row_start: 0,
            row_end: 0,
            col_start: 0,
            col_end: 0,
            end_cell,
            steps: vec![],
            row_name: None,
            col_name: None,
            row_string: String::new(),
            middle_string: String::new(),
            col_string: String::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    fn columns(&self) -> impl Iterator<Item = (TraceStep, char, char)> + '_ {
        self.steps
            .iter()
            .zip(self.row_string.chars())
            .zip(self.col_string.chars())
            .map(|((&step, row_char), col_char)| (step, row_char, col_char))
    }

    /// The aligned row sequence with its gaps removed.
    pub fn row_residues(&self) -> String {
        self.columns()
            .filter(|&(step, _, _)| step != TraceStep::Left)
            .map(|(_, row_char, _)| row_char)
            .collect()
    }

    /// The aligned column sequence with its gaps removed.
    pub fn col_residues(&self) -> String {
        self.columns()
            .filter(|&(step, _, _)| step != TraceStep::Up)
            .map(|(_, _, col_char)| col_char)
            .collect()
    }

    /// The number of aligned columns that hold identical symbols.
    pub fn identities(&self) -> usize {
        self.columns()
            .filter(|&(step, row_char, col_char)| step == TraceStep::Diagonal && row_char == col_char)
            .count()
    }

    /// The number of aligned columns that hold a gap on either side.
    pub fn gaps(&self) -> usize {
        self.steps
            .iter()
            .filter(|&&step| step != TraceStep::Diagonal)
            .count()
    }

    pub fn ali_string(&self) -> String {
        let row_name = self.row_name.as_deref().unwrap_or("row");
        let col_name = self.col_name.as_deref().unwrap_or("col");
        let name_width = max(row_name.len(), col_name.len());

        let mut ali_string = String::new();

        // score line
        ali_string.push_str(&format!(
            "==  score: {}  length: {}  identities: {}  gaps: {}\n",
            self.score,
            self.length,
            self.identities(),
            self.gaps(),
        ));

        // blocks are cut by column, not by byte
        let row_chars: Vec<char> = self.row_string.chars().collect();
        let middle_chars: Vec<char> = self.middle_string.chars().collect();
        let col_chars: Vec<char> = self.col_string.chars().collect();
        let num_columns = min(self.steps.len(), row_chars.len());

        // the next sequence coordinate to be printed on each side
        let mut row_position = self.row_start;
        let mut col_position = self.col_start;

        let mut start_offset: usize = 0;

        while start_offset < num_columns {
            let end_offset = min(start_offset + BLOCK_WIDTH, num_columns);
            let block_steps = &self.steps[start_offset..end_offset];

            let row_consumed = block_steps
                .iter()
                .filter(|&&step| step != TraceStep::Left)
                .count();
            let col_consumed = block_steps
                .iter()
                .filter(|&&step| step != TraceStep::Up)
                .count();

            let row_last = (row_position + row_consumed).saturating_sub(1);
            let col_last = (col_position + col_consumed).saturating_sub(1);

            let row_block: String = row_chars[start_offset..end_offset].iter().collect();
            let middle_block: String = middle_chars[start_offset..end_offset].iter().collect();
            let col_block: String = col_chars[start_offset..end_offset].iter().collect();

            ali_string.push_str(&format!(
                "{:>W$} {:5} {} {:<5}\n",
                row_name,
                row_position,
                row_block,
                row_last,
                W = name_width
            ));

            ali_string.push_str(&format!(
                "{:W$} {:5} {}\n",
                "",
                "",
                middle_block,
                W = name_width
            ));

            ali_string.push_str(&format!(
                "{:>W$} {:5} {} {:<5}\n\n",
                col_name,
                col_position,
                col_block,
                col_last,
                W = name_width
            ));

            row_position += row_consumed;
            col_position += col_consumed;
            start_offset = end_offset;
        }

        ali_string
    }
}
