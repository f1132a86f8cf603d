use std::io::Write;
use std::time::{Duration, Instant};

use anyhow::Context;
use derive_builder::Builder;
use libdotalign::{
    align::{fill_matrix, structs::Alignment, Traceback},
    output::{write_standard_output, TableFormat, DEFAULT_COLUMNS},
};
use log::info;
use rayon::prelude::*;

use crate::{
    args::{AlignArgs, OutputArgs},
    io::{read_score_matrix, read_sequence},
    util::{writer_or_stdout, PathBufExt},
};

#[derive(Builder, Default, Debug)]
#[builder(default)]
pub struct RunStats {
    pub fill_time: Duration,
    pub traceback_time: Duration,
    pub write_time: Duration,
    pub num_cells: usize,
    pub num_maxima: usize,
    pub max_score: i64,
}

pub fn align(args: &AlignArgs) -> anyhow::Result<RunStats> {
    let mut stats = RunStatsBuilder::default();

    let score_matrix = read_score_matrix(&args.input_args.scores_path)?;
    let row_seq = read_sequence(&args.input_args.row_seq)?;
    let col_seq = read_sequence(&args.input_args.col_seq)?;

    let now = Instant::now();
    let matrix = fill_matrix(
        &score_matrix,
        &row_seq,
        &col_seq,
        &args.gap_args.gap_model(),
    )?;
    stats
        .fill_time(now.elapsed())
        .num_cells((row_seq.length + 1) * (col_seq.length + 1))
        .max_score(matrix.max_value());

    let params = args.traceback_args.params();
    let start_cells = params.maxima.start_cells(&matrix);
    stats.num_maxima(start_cells.len());

    let now = Instant::now();
    let traceback = Traceback::new(&matrix, &row_seq, &col_seq)?
        .with_score_matrix(&score_matrix)
        .with_stop_rule(params.stop);

    // an indexed collect keeps the alignments in start cell order
    let alignments: Vec<Alignment> = start_cells
        .par_iter()
        .map(|&start| traceback.from_cell(start))
        .collect::<anyhow::Result<_>>()?;
    stats.traceback_time(now.elapsed());

    let now = Instant::now();
    write_results(
        &alignments,
        &args.output_args,
        args.common_args.allow_overwrite,
    )?;
    stats.write_time(now.elapsed());

    let stats = stats.build()?;
    info!(
        "aligned {}x{} ({} cells) in {:.3?}: {} alignment(s) with score {}",
        row_seq.length,
        col_seq.length,
        stats.num_cells,
        stats.fill_time + stats.traceback_time,
        stats.num_maxima,
        stats.max_score,
    );

    Ok(stats)
}

fn write_results(
    alignments: &[Alignment],
    args: &OutputArgs,
    allow_overwrite: bool,
) -> anyhow::Result<()> {
    let mut alignment_writer = writer_or_stdout(&args.ali_results_path, allow_overwrite)?;
    write_standard_output(alignments, &mut alignment_writer)
        .context("failed to write alignments")?;
    alignment_writer.flush()?;

    if let Some(path) = &args.tbl_results_path {
        let mut table_format = TableFormat::new(&DEFAULT_COLUMNS)?;
        table_format.update_widths(alignments);

        let mut table_writer = path.open(allow_overwrite)?;
        writeln!(table_writer, "{}", table_format.header()?)?;
        alignments
            .iter()
            .try_for_each(|ali| writeln!(table_writer, "{}", ali.tab_string_formatted(&table_format)))
            .context("failed to write tabular output")?;
        table_writer.flush()?;
    }

    if let Some(path) = &args.json_results_path {
        let mut json_writer = path.open(allow_overwrite)?;
        serde_json::to_writer_pretty(&mut json_writer, alignments)
            .context("failed to write JSON output")?;
        writeln!(json_writer)?;
        json_writer.flush()?;
    }

    Ok(())
}
