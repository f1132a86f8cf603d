use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use thiserror::Error;

use super::Sequence;

/// Raised for any input that the matrix builder refuses to work with.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InvalidInputError {
    #[error(
        "score matrix is {rows}x{cols}, but the sequences have lengths {row_length} (rows) and {col_length} (columns)"
    )]
    DimensionMismatch {
        rows: usize,
        cols: usize,
        row_length: usize,
        col_length: usize,
    },
    #[error("score matrix holds a non-finite value ({value}) at row {row_idx}, column {col_idx}")]
    NonFiniteScore {
        row_idx: usize,
        col_idx: usize,
        value: f64,
    },
    #[error("score matrix row {row_idx} has {found} columns, expected {expected}")]
    RaggedRows {
        row_idx: usize,
        expected: usize,
        found: usize,
    },
    #[error("score matrix data has {found} values, expected {rows}x{cols}")]
    DataLength {
        rows: usize,
        cols: usize,
        found: usize,
    },
    #[error("gap penalties must not be positive: open {gap_open}, extend {gap_extend}")]
    PositiveGapPenalty { gap_open: i64, gap_extend: i64 },
}

/// The precomputed pairwise similarity scores between two sequences.
///
/// Rows always correspond to the row sequence and columns to the
/// column sequence. Indices are 0-based: `get(0, 0)` scores the first
/// symbol of the row sequence against the first symbol of the column
/// sequence. Every value is finite once a `ScoreMatrix` exists.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ScoreMatrix {
    pub rows: usize,
    pub cols: usize,
    data: Vec<f64>,
}

impl ScoreMatrix {
    pub fn new(rows: usize, cols: usize, data: Vec<f64>) -> Result<Self> {
        if data.len() != rows * cols {
            return Err(InvalidInputError::DataLength {
                rows,
                cols,
                found: data.len(),
            }
            .into());
        }

        if let Some(idx) = data.iter().position(|v| !v.is_finite()) {
            return Err(InvalidInputError::NonFiniteScore {
                row_idx: idx / cols,
                col_idx: idx % cols,
                value: data[idx],
            }
            .into());
        }

        Ok(Self { rows, cols, data })
    }

    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self> {
        let num_rows = rows.len();
        let num_cols = rows.first().map_or(0, |r| r.len());
        let mut data = Vec::with_capacity(num_rows * num_cols);

        for (row_idx, row) in rows.iter().enumerate() {
            if row.len() != num_cols {
                return Err(InvalidInputError::RaggedRows {
                    row_idx,
                    expected: num_cols,
                    found: row.len(),
                }
                .into());
            }
            data.extend_from_slice(row);
        }

        Self::new(num_rows, num_cols, data)
    }

    pub fn from_fn(rows: usize, cols: usize, f: impl Fn(usize, usize) -> f64) -> Result<Self> {
        let data = (0..rows)
            .flat_map(|row_idx| (0..cols).map(move |col_idx| (row_idx, col_idx)))
            .map(|(row_idx, col_idx)| f(row_idx, col_idx))
            .collect();

        Self::new(rows, cols, data)
    }

    /// Build a matrix that scores identical symbols with `match_score`
    /// and everything else with `mismatch_score`.
    pub fn from_match_mismatch(
        row_seq: &Sequence,
        col_seq: &Sequence,
        match_score: f64,
        mismatch_score: f64,
    ) -> Result<Self> {
        Self::from_fn(row_seq.length, col_seq.length, |row_idx, col_idx| {
            if row_seq.residue(row_idx + 1) == col_seq.residue(col_idx + 1) {
                match_score
            } else {
                mismatch_score
            }
        })
    }

    /// Parse a matrix written as one row per line. Values may be
    /// separated by whitespace or commas; blank lines and lines
    /// starting with `#` are skipped.
    pub fn from_text(reader: impl BufRead) -> Result<Self> {
        let mut rows: Vec<Vec<f64>> = vec![];

        for (line_idx, line) in reader.lines().enumerate() {
            let line = line.with_context(|| format!("failed to read line {}", line_idx + 1))?;
            let line = line.trim();

            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let row = line
                .split(|c: char| c.is_whitespace() || c == ',')
                .filter(|token| !token.is_empty())
                .map(|token| {
                    token.parse::<f64>().with_context(|| {
                        format!("failed to parse score \"{token}\" on line {}", line_idx + 1)
                    })
                })
                .collect::<Result<Vec<f64>>>()?;

            rows.push(row);
        }

        Self::from_rows(&rows)
    }

    /// Parse a matrix written as a JSON array of row arrays.
    pub fn from_json(reader: impl Read) -> Result<Self> {
        let rows: Vec<Vec<f64>> =
            serde_json::from_reader(reader).context("failed to parse score matrix JSON")?;
        Self::from_rows(&rows)
    }

    pub fn from_json_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(&path).with_context(|| {
            format!(
                "failed to open score matrix file: {}",
                path.as_ref().to_string_lossy()
            )
        })?;

        Self::from_json(BufReader::new(file))
    }

    pub fn from_text_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(&path).with_context(|| {
            format!(
                "failed to open score matrix file: {}",
                path.as_ref().to_string_lossy()
            )
        })?;

        Self::from_text(BufReader::new(file))
    }

    #[inline]
    pub fn get(&self, row_idx: usize, col_idx: usize) -> f64 {
        debug_assert!(row_idx < self.rows);
        debug_assert!(col_idx < self.cols);
        self.data[row_idx * self.cols + col_idx]
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Check that this matrix pairs with the given sequences:
    /// `rows == row_seq.length` and `cols == col_seq.length`.
    ///
    /// A 0x0 matrix carries no column count when it is read from nested
    /// rows, so it is accepted for any pairing that involves an empty
    /// sequence. Any other shape must match exactly.
    pub fn check_dimensions(&self, row_seq: &Sequence, col_seq: &Sequence) -> Result<()> {
        let empty_pairing =
            self.rows == 0 && self.cols == 0 && (row_seq.is_empty() || col_seq.is_empty());

        if empty_pairing || (self.rows == row_seq.length && self.cols == col_seq.length) {
            Ok(())
        } else {
            Err(InvalidInputError::DimensionMismatch {
                rows: self.rows,
                cols: self.cols,
                row_length: row_seq.length,
                col_length: col_seq.length,
            }
            .into())
        }
    }
}
