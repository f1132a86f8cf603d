use std::path::{Path, PathBuf};

use libdotalign::structs::{ScoreMatrix, Sequence};
use log::{debug, warn};
use thiserror::Error;

#[derive(Error, Debug)]
#[error("no sequences found in fasta file: {path}")]
pub struct EmptyFastaError {
    path: String,
}

/// Read a score matrix from a JSON array of rows (`.json`) or from a
/// whitespace separated text matrix (anything else).
pub fn read_score_matrix(path: &PathBuf) -> anyhow::Result<ScoreMatrix> {
    let score_matrix = match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => ScoreMatrix::from_json_path(path)?,
        _ => ScoreMatrix::from_text_path(path)?,
    };

    debug!(
        "read {}x{} score matrix from {}",
        score_matrix.rows,
        score_matrix.cols,
        path.to_string_lossy()
    );

    Ok(score_matrix)
}

/// Interpret a sequence argument: an existing file is read as fasta
/// and its first record is used, anything else is taken literally.
pub fn read_sequence(arg: &str) -> anyhow::Result<Sequence> {
    let path = Path::new(arg);

    if !path.is_file() {
        return Ok(Sequence::from_utf8(arg.as_bytes()));
    }

    let seqs = Sequence::from_fasta(path)?;
    if seqs.len() > 1 {
        warn!(
            "{} holds {} sequences, only the first is aligned",
            arg,
            seqs.len()
        );
    }

    seqs.into_iter().next().ok_or_else(|| {
        EmptyFastaError {
            path: arg.to_string(),
        }
        .into()
    })
}
