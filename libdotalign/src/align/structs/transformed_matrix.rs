use std::io::Write;

use anyhow::Result;
use serde::Serialize;

use crate::structs::Sequence;

use super::Cursor;

/// The Smith-Waterman dynamic programming matrix.
///
/// Shape is `(row_length + 1) x (col_length + 1)`, where row 0 and
/// column 0 are the all-zero base case. Every cell is non-negative.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TransformedMatrix {
    pub row_length: usize,
    pub col_length: usize,
    /// The matrix cells as a flat vector.
    ///
    /// It's stored in row-major order:
    /// ```text
    /// [
    ///
    ///     t_(0, 0), t_(0, 1), ..., t_(0, C),
    ///     t_(1, 0), t_(1, 1), ..., t_(1, C),
    ///     ...
    ///     t_(R, 0), t_(R, 1), ..., t_(R, C),
    ///
    /// ]
    /// ```
    ///
    /// where:
    ///
    /// ```text
    /// R:        <row_length>
    /// C:        <col_length>
    /// t_(i, j): the score of the best local alignment ending at row i, column j
    /// ```
    ///
    data: Vec<i64>,
}

impl TransformedMatrix {
    pub fn new(row_length: usize, col_length: usize) -> Self {
        TransformedMatrix {
            row_length,
            col_length,
            data: vec![0; (row_length + 1) * (col_length + 1)],
        }
    }

    #[inline]
    fn stride(&self) -> usize {
        self.col_length + 1
    }

    #[inline]
    pub fn get(&self, row_idx: usize, col_idx: usize) -> i64 {
        debug_assert!(row_idx <= self.row_length);
        debug_assert!(col_idx <= self.col_length);
        self.data[row_idx * self.stride() + col_idx]
    }

    #[inline]
    pub(crate) fn set(&mut self, row_idx: usize, col_idx: usize, value: i64) {
        debug_assert!(row_idx <= self.row_length);
        debug_assert!(col_idx <= self.col_length);
        debug_assert!(value >= 0);
        let stride = self.stride();
        self.data[row_idx * stride + col_idx] = value;
    }

    #[inline]
    pub fn at(&self, cursor: Cursor) -> i64 {
        self.get(cursor.row_idx, cursor.col_idx)
    }

    pub fn rows(&self) -> impl Iterator<Item = &[i64]> {
        self.data.chunks(self.stride())
    }

    pub fn max_value(&self) -> i64 {
        // the base case cell guarantees at least one element
        self.data.iter().copied().max().unwrap_or(0)
    }

    /// The first cell in row-major order that holds the maximum value.
    pub fn first_maximum(&self) -> Cursor {
        let mut max = self.data[0];
        let mut argmax: usize = 0;

        for (idx, &value) in self.data.iter().enumerate().skip(1) {
            if value > max {
                max = value;
                argmax = idx;
            }
        }

        self.cursor_from_flat(argmax)
    }

    /// Every cell that holds the maximum value, in row-major order.
    pub fn maxima(&self) -> Vec<Cursor> {
        let max = self.max_value();

        self.data
            .iter()
            .enumerate()
            .filter(|&(_, &value)| value == max)
            .map(|(idx, _)| self.cursor_from_flat(idx))
            .collect()
    }

    fn cursor_from_flat(&self, idx: usize) -> Cursor {
        Cursor::new(idx / self.stride(), idx % self.stride())
    }

    /// Write the matrix as a grid labelled with the sequence symbols.
    pub fn dump(
        &self,
        out: &mut impl Write,
        row_seq: &Sequence,
        col_seq: &Sequence,
    ) -> Result<()> {
        let column_width = self.max_value().to_string().len().max(1) + 1;

        write!(out, "{:>w$}", "", w = 2)?;
        write!(out, "{:>w$}", "-", w = column_width)?;
        for col_idx in 1..=self.col_length {
            write!(
                out,
                "{:>w$}",
                char::from(col_seq.residue(col_idx)),
                w = column_width
            )?;
        }
        writeln!(out)?;

        for (row_idx, row) in self.rows().enumerate() {
            let label = match row_idx {
                0 => '-',
                _ => char::from(row_seq.residue(row_idx)),
            };
            write!(out, "{:>w$}", label, w = 2)?;

            for value in row {
                write!(out, "{:>w$}", value, w = column_width)?;
            }
            writeln!(out)?;
        }

        Ok(())
    }
}
