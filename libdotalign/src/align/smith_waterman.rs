use anyhow::Result;

use crate::structs::{ScoreMatrix, Sequence};

use super::structs::{Alignment, TransformedMatrix};
use super::{fill_matrix, GapModel, Traceback, TracebackParams};

/// Fill the transformed matrix for a pair of sequences and trace back
/// the optimal local alignment(s).
pub fn smith_waterman(
    score_matrix: &ScoreMatrix,
    row_seq: &Sequence,
    col_seq: &Sequence,
    gap_model: &GapModel,
    params: &TracebackParams,
) -> Result<(TransformedMatrix, Vec<Alignment>)> {
    let matrix = fill_matrix(score_matrix, row_seq, col_seq, gap_model)?;

    let alignments = Traceback::new(&matrix, row_seq, col_seq)?
        .with_score_matrix(score_matrix)
        .with_stop_rule(params.stop)
        .run(params.maxima)?;

    Ok((matrix, alignments))
}
