use std::io::Write;

use anyhow::Context;
use libdotalign::align::fill_matrix;

use crate::{
    args::MatrixArgs,
    io::{read_score_matrix, read_sequence},
    util::writer_or_stdout,
};

/// Fill the alignment matrix and write it as a text grid or as JSON.
pub fn matrix(args: &MatrixArgs) -> anyhow::Result<()> {
    let score_matrix = read_score_matrix(&args.input_args.scores_path)?;
    let row_seq = read_sequence(&args.input_args.row_seq)?;
    let col_seq = read_sequence(&args.input_args.col_seq)?;

    let matrix = fill_matrix(
        &score_matrix,
        &row_seq,
        &col_seq,
        &args.gap_args.gap_model(),
    )?;

    let mut writer = writer_or_stdout(&args.output_path, args.common_args.allow_overwrite)?;
    if args.json {
        serde_json::to_writer(&mut writer, &matrix).context("failed to write matrix JSON")?;
        writeln!(writer)?;
    } else {
        matrix
            .dump(&mut writer, &row_seq, &col_seq)
            .context("failed to write matrix")?;
    }
    writer.flush()?;

    Ok(())
}
