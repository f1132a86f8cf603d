use anyhow::Result;
use log::debug;

use crate::structs::{ScoreMatrix, Sequence};

use super::gap_penalty::{GapModel, GapPenalty};
use super::structs::TransformedMatrix;

/// Fill a transformed matrix under the selected gap model.
pub fn fill_matrix(
    score_matrix: &ScoreMatrix,
    row_seq: &Sequence,
    col_seq: &Sequence,
    gap_model: &GapModel,
) -> Result<TransformedMatrix> {
    match gap_model {
        GapModel::Fixed => fill_matrix_with(score_matrix, row_seq, col_seq, &super::FixedGap),
        GapModel::Affine(gap) => fill_matrix_with(score_matrix, row_seq, col_seq, gap),
    }
}

/// Fill a transformed matrix with the Smith-Waterman recurrence.
///
/// For every cell, the three candidates are
///
/// ```text
/// left     = max(0, T[i][j-1]   + cost(G[i][j-1]))
/// top      = max(0, T[i-1][j]   + cost(G[i-1][j]))
/// diagonal = max(0, T[i-1][j-1] + S[i-1][j-1])
/// ```
///
/// and the first of left, top, diagonal that attains the maximum wins.
/// A winning gap branch advances the gap state of the neighbor it came
/// from; a winning diagonal closes the gap state. The winning value is
/// truncated toward zero when it is stored.
pub fn fill_matrix_with<G: GapPenalty>(
    score_matrix: &ScoreMatrix,
    row_seq: &Sequence,
    col_seq: &Sequence,
    gap: &G,
) -> Result<TransformedMatrix> {
    score_matrix.check_dimensions(row_seq, col_seq)?;
    gap.validate()?;

    let row_length = row_seq.length;
    let col_length = col_seq.length;
    let stride = col_length + 1;

    let mut matrix = TransformedMatrix::new(row_length, col_length);
    let mut states: Vec<G::State> = vec![G::State::default(); (row_length + 1) * stride];

    // the boundary only ever carries gaps; since costs are never
    // positive, the boundary values stay at zero
    for col_idx in 1..=col_length {
        states[col_idx] = gap.extend(states[col_idx - 1]);
    }

    for row_idx in 1..=row_length {
        states[row_idx * stride] = gap.extend(states[(row_idx - 1) * stride]);

        for col_idx in 1..=col_length {
            let cell_idx = row_idx * stride + col_idx;
            let left_state = states[cell_idx - 1];
            let top_state = states[cell_idx - stride];

            let left = (matrix.get(row_idx, col_idx - 1) + gap.cost(left_state)).max(0) as f64;
            let top = (matrix.get(row_idx - 1, col_idx) + gap.cost(top_state)).max(0) as f64;
            let diagonal = (matrix.get(row_idx - 1, col_idx - 1) as f64
                + score_matrix.get(row_idx - 1, col_idx - 1))
            .max(0.0);

            let (value, state) = if left >= top && left >= diagonal {
                (left, gap.extend(left_state))
            } else if top >= diagonal {
                (top, gap.extend(top_state))
            } else {
                (diagonal, G::State::default())
            };

            matrix.set(row_idx, col_idx, value.trunc() as i64);
            states[cell_idx] = state;
        }
    }

    debug!(
        "filled {}x{} transformed matrix, max score: {}",
        row_length + 1,
        col_length + 1,
        matrix.max_value()
    );

    Ok(matrix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::align::{AffineGap, FixedGap, DEFAULT_GAP_EXTEND, DEFAULT_GAP_OPEN};
    use crate::structs::InvalidInputError;
    use assert2::{assert, check, let_assert};
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg64;

    fn match_mismatch(row: &[u8], col: &[u8]) -> (Sequence, Sequence, ScoreMatrix) {
        let row_seq = Sequence::from_utf8(row);
        let col_seq = Sequence::from_utf8(col);
        let scores = ScoreMatrix::from_match_mismatch(&row_seq, &col_seq, 2.0, -1.0).unwrap();
        (row_seq, col_seq, scores)
    }

    #[test]
    fn test_fixed_gap_recurrence() {
        let (row_seq, col_seq, scores) = match_mismatch(b"AC", b"AAC");
        let_assert!(Ok(matrix) = fill_matrix_with(&scores, &row_seq, &col_seq, &FixedGap));

        let rows: Vec<Vec<i64>> = matrix.rows().map(|r| r.to_vec()).collect();
        check!(rows[0] == vec![0, 0, 0, 0]);
        check!(rows[1] == vec![0, 2, 2, 2]);
        check!(rows[2] == vec![0, 2, 2, 4]);
    }

    #[test]
    fn test_gattaca_fixed_gap_peak() {
        let (row_seq, col_seq, scores) = match_mismatch(b"GATTACA", b"GCATGCU");
        let_assert!(Ok(matrix) = fill_matrix_with(&scores, &row_seq, &col_seq, &FixedGap));
        // without gap penalties, the best path collects G, A, T and C matches
        check!(matrix.max_value() == 8);
        check!(matrix.first_maximum().row_idx == 6);
        check!(matrix.first_maximum().col_idx == 6);
    }

    #[test]
    fn test_fixed_values_match_zero_cost_affine() {
        let (row_seq, col_seq, scores) = match_mismatch(b"HEAGAWGHEE", b"PAWHEAE");
        let_assert!(Ok(fixed) = fill_matrix_with(&scores, &row_seq, &col_seq, &FixedGap));
        let_assert!(
            Ok(affine) = fill_matrix_with(&scores, &row_seq, &col_seq, &AffineGap::new(0, 0))
        );
        check!(fixed == affine);
    }

    #[test]
    fn test_affine_two_symbol_gap_costs_open_once() {
        // AB--CD against ABXYCD: the X and Y columns form a two symbol gap
        // in the row sequence, so the path is 2 + 2 (AB) - 1 (gap) + 2 + 2 (CD)
        let row_seq = Sequence::from_utf8(b"ABCD");
        let col_seq = Sequence::from_utf8(b"ABXYCD");
        let scores =
            ScoreMatrix::from_match_mismatch(&row_seq, &col_seq, 2.0, -10.0).unwrap();
        let_assert!(
            Ok(matrix) = fill_matrix_with(&scores, &row_seq, &col_seq, &AffineGap::default())
        );
        check!(matrix.get(2, 2) == 4);
        check!(matrix.get(2, 3) == 4);
        check!(matrix.get(2, 4) == 3);
        check!(matrix.max_value() == 7);
        check!(matrix.get(4, 6) == 7);
    }

    #[test]
    fn test_affine_longer_gap_pays_extension() {
        let row_seq = Sequence::from_utf8(b"ABCD");
        let col_seq = Sequence::from_utf8(b"ABXYZCD");
        let scores =
            ScoreMatrix::from_match_mismatch(&row_seq, &col_seq, 2.0, -10.0).unwrap();
        let_assert!(
            Ok(matrix) = fill_matrix_with(&scores, &row_seq, &col_seq, &AffineGap::new(-1, -1))
        );
        // three gap positions: free, open (-1), extend (-1)
        check!(matrix.get(2, 5) == 2);
        check!(matrix.get(4, 7) == 6);
    }

    #[test]
    fn test_left_wins_a_tie_with_the_diagonal() {
        let row_seq = Sequence::from_utf8(b"A");
        let col_seq = Sequence::from_utf8(b"XYZ");
        let gap = AffineGap::default();

        // at (1, 2) left and diagonal both give 2: the gap branch wins,
        // so the gap leaving (1, 2) pays the opening penalty
        let tied = ScoreMatrix::new(1, 3, vec![2.0, 2.0, 0.5]).unwrap();
        let_assert!(Ok(matrix) = fill_matrix_with(&tied, &row_seq, &col_seq, &gap));
        check!(matrix.get(1, 2) == 2);
        check!(matrix.get(1, 3) == 1);

        // a strictly better diagonal closes the gap state instead
        let untied = ScoreMatrix::new(1, 3, vec![2.0, 2.5, 0.5]).unwrap();
        let_assert!(Ok(matrix) = fill_matrix_with(&untied, &row_seq, &col_seq, &gap));
        check!(matrix.get(1, 2) == 2);
        check!(matrix.get(1, 3) == 2);
    }

    #[test]
    fn test_top_wins_a_tie_with_the_diagonal() {
        let row_seq = Sequence::from_utf8(b"XYZ");
        let col_seq = Sequence::from_utf8(b"A");
        let gap = AffineGap::default();

        let tied = ScoreMatrix::new(3, 1, vec![2.0, 2.0, 0.5]).unwrap();
        let_assert!(Ok(matrix) = fill_matrix_with(&tied, &row_seq, &col_seq, &gap));
        check!(matrix.get(2, 1) == 2);
        check!(matrix.get(3, 1) == 1);

        let untied = ScoreMatrix::new(3, 1, vec![2.0, 2.5, 0.5]).unwrap();
        let_assert!(Ok(matrix) = fill_matrix_with(&untied, &row_seq, &col_seq, &gap));
        check!(matrix.get(3, 1) == 2);
    }

    /// A plain two dimensional fill for the default affine penalties,
    /// with the gap state stored as the penalty in effect and 1 marking
    /// a cell without an open gap.
    fn reference_affine_fill(scores: &ScoreMatrix, rows: usize, cols: usize) -> Vec<Vec<i64>> {
        const NO_GAP: i64 = 1;
        let next_penalty = |p: i64| {
            if p == NO_GAP {
                DEFAULT_GAP_OPEN
            } else {
                DEFAULT_GAP_EXTEND
            }
        };
        let charge = |value: i64, p: i64| if p == NO_GAP { value } else { value + p };

        let mut values = vec![vec![0i64; cols + 1]; rows + 1];
        let mut penalties = vec![vec![NO_GAP; cols + 1]; rows + 1];

        for i in 0..=rows {
            for j in 0..=cols {
                if i == 0 && j == 0 {
                    continue;
                } else if i == 0 {
                    values[i][j] = charge(values[i][j - 1], penalties[i][j - 1]).max(0);
                    penalties[i][j] = next_penalty(penalties[i][j - 1]);
                } else if j == 0 {
                    values[i][j] = charge(values[i - 1][j], penalties[i - 1][j]).max(0);
                    penalties[i][j] = next_penalty(penalties[i - 1][j]);
                } else {
                    let left = charge(values[i][j - 1], penalties[i][j - 1]).max(0) as f64;
                    let top = charge(values[i - 1][j], penalties[i - 1][j]).max(0) as f64;
                    let diagonal = (values[i - 1][j - 1] as f64 + scores.get(i - 1, j - 1)).max(0.0);
                    let best = left.max(top).max(diagonal);

                    if best == left {
                        values[i][j] = left as i64;
                        penalties[i][j] = next_penalty(penalties[i][j - 1]);
                    } else if best == top {
                        values[i][j] = top as i64;
                        penalties[i][j] = next_penalty(penalties[i - 1][j]);
                    } else {
                        values[i][j] = diagonal.trunc() as i64;
                        penalties[i][j] = NO_GAP;
                    }
                }
            }
        }
        values
    }

    #[test]
    fn test_affine_fill_matches_reference_recurrence() {
        let mut rng = Pcg64::seed_from_u64(0x5EED);

        for _ in 0..500 {
            let rows = rng.gen_range(0..10);
            let cols = rng.gen_range(0..10);
            let row_seq = Sequence::from_utf8(&vec![b'R'; rows]);
            let col_seq = Sequence::from_utf8(&vec![b'C'; cols]);

            // whole-number scores make ties between branches common
            let whole_numbers = rng.gen_bool(0.5);
            let values: Vec<f64> = (0..rows * cols)
                .map(|_| {
                    if whole_numbers {
                        rng.gen_range(-3..=3) as f64
                    } else {
                        rng.gen_range(-3.0..3.0)
                    }
                })
                .collect();
            let scores = ScoreMatrix::new(rows, cols, values).unwrap();

            let_assert!(
                Ok(matrix) = fill_matrix_with(&scores, &row_seq, &col_seq, &AffineGap::default())
            );
            let filled: Vec<Vec<i64>> = matrix.rows().map(|r| r.to_vec()).collect();
            check!(filled == reference_affine_fill(&scores, rows, cols));
        }
    }

    #[test]
    fn test_truncates_real_scores() {
        let row_seq = Sequence::from_utf8(b"A");
        let col_seq = Sequence::from_utf8(b"B");
        let scores = ScoreMatrix::new(1, 1, vec![2.9]).unwrap();
        let_assert!(Ok(matrix) = fill_matrix_with(&scores, &row_seq, &col_seq, &FixedGap));
        check!(matrix.get(1, 1) == 2);
    }

    #[test]
    fn test_negative_scores_clamp_to_zero() {
        let row_seq = Sequence::from_utf8(b"AAA");
        let col_seq = Sequence::from_utf8(b"BB");
        let scores = ScoreMatrix::new(3, 2, vec![-5.0; 6]).unwrap();
        let_assert!(Ok(matrix) = fill_matrix(&scores, &row_seq, &col_seq, &GapModel::default()));
        check!(matrix.rows().flatten().all(|&v| v == 0));
    }

    #[test]
    fn test_empty_sequences() {
        let empty = Sequence::from_utf8(b"");
        let other = Sequence::from_utf8(b"ACDE");
        let scores = ScoreMatrix::from_rows(&[]).unwrap();

        for model in [GapModel::Fixed, GapModel::default()] {
            let_assert!(Ok(matrix) = fill_matrix(&scores, &empty, &other, &model));
            check!(matrix.row_length == 0);
            check!(matrix.col_length == 4);
            check!(matrix.rows().flatten().all(|&v| v == 0));

            let_assert!(Ok(matrix) = fill_matrix(&scores, &other, &empty, &model));
            check!(matrix.rows().count() == 5);
            check!(matrix.max_value() == 0);
        }
    }

    #[test]
    fn test_dimension_mismatch() {
        let (row_seq, col_seq, scores) = match_mismatch(b"ABC", b"AB");
        let_assert!(Err(err) = fill_matrix(&scores, &col_seq, &row_seq, &GapModel::Fixed));
        assert!(matches!(
            err.downcast_ref::<InvalidInputError>(),
            Some(InvalidInputError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_positive_gap_penalty_is_rejected() {
        let (row_seq, col_seq, scores) = match_mismatch(b"ABC", b"AB");
        let model = GapModel::Affine(AffineGap::new(1, 0));
        let_assert!(Err(err) = fill_matrix(&scores, &row_seq, &col_seq, &model));
        assert!(matches!(
            err.downcast_ref::<InvalidInputError>(),
            Some(InvalidInputError::PositiveGapPenalty { .. })
        ));
    }
}
