use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};
use libdotalign::align::{
    AffineGap, GapModel, MaximaSelection, StopRule, TracebackParams, DEFAULT_GAP_EXTEND,
    DEFAULT_GAP_OPEN,
};
use strum::{Display, EnumString};

#[derive(Subcommand, Debug)]
pub enum SubCommands {
    #[command(about = "Align two sequences over a precomputed score matrix")]
    Align(AlignArgs),
    #[command(about = "Fill the alignment matrix and write it out")]
    Matrix(MatrixArgs),
}

#[derive(Parser, Debug)]
#[command(name = "dotalign")]
#[command(
    about = "Local (Smith-Waterman) alignment of two sequences scored by a dot-product matrix"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: SubCommands,
}

#[derive(Args, Debug, Clone)]
pub struct CommonArgs {
    /// The number of threads that dotalign will use
    #[arg(
        short = 't',
        long = "threads",
        default_value_t = 8usize,
        value_name = "n"
    )]
    pub num_threads: usize,

    /// Allow dotalign to overwrite files
    #[arg(short = 'q', long = "allow-overwrite", default_value_t = false)]
    pub allow_overwrite: bool,

    /// Log more (-v: info, -vv: debug, -vvv: trace); RUST_LOG takes precedence
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Args, Debug, Clone)]
pub struct InputArgs {
    /// The score matrix: a .json array of rows, or a whitespace separated text matrix
    #[arg(value_name = "SCORES.[json:txt]")]
    pub scores_path: PathBuf,

    /// The sequence along the matrix rows: a fasta file or a literal sequence
    #[arg(value_name = "ROW_SEQ")]
    pub row_seq: String,

    /// The sequence along the matrix columns: a fasta file or a literal sequence
    #[arg(value_name = "COL_SEQ")]
    pub col_seq: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum GapModelArg {
    Fixed,
    #[default]
    Affine,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum MaximaArg {
    #[default]
    First,
    All,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum StopArg {
    #[default]
    Zero,
    Edge,
}

#[derive(Args, Debug, Clone)]
pub struct GapArgs {
    /// The gap penalty model [fixed, affine]
    #[arg(long = "gap-model", default_value_t = GapModelArg::Affine, value_name = "MODEL")]
    pub gap_model: GapModelArg,

    /// The penalty for opening a gap (affine model only, must not be positive)
    #[arg(
        long = "gap-open",
        default_value_t = DEFAULT_GAP_OPEN,
        allow_negative_numbers = true,
        value_name = "N"
    )]
    pub gap_open: i64,

    /// The penalty for extending a gap (affine model only, must not be positive)
    #[arg(
        long = "gap-extend",
        default_value_t = DEFAULT_GAP_EXTEND,
        allow_negative_numbers = true,
        value_name = "N"
    )]
    pub gap_extend: i64,
}

impl GapArgs {
    pub fn gap_model(&self) -> GapModel {
        match self.gap_model {
            GapModelArg::Fixed => GapModel::Fixed,
            GapModelArg::Affine => GapModel::Affine(AffineGap::new(self.gap_open, self.gap_extend)),
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct TracebackArgs {
    /// Trace back from the first maximum, or from every cell holding it [first, all]
    #[arg(long = "maxima", default_value_t = MaximaArg::First, value_name = "POLICY")]
    pub maxima: MaximaArg,

    /// Stop tracing at the first zero cell, or walk on to the matrix edge [zero, edge]
    #[arg(long = "stop", default_value_t = StopArg::Zero, value_name = "RULE")]
    pub stop: StopArg,
}

impl TracebackArgs {
    pub fn params(&self) -> TracebackParams {
        TracebackParams {
            maxima: match self.maxima {
                MaximaArg::First => MaximaSelection::First,
                MaximaArg::All => MaximaSelection::All,
            },
            stop: match self.stop {
                StopArg::Zero => StopRule::AtZero,
                StopArg::Edge => StopRule::AtEdge,
            },
        }
    }
}

#[derive(Args, Debug, Clone, Default)]
pub struct OutputArgs {
    /// Where to write the alignments (stdout if not provided)
    #[arg(short = 'O', long = "output", value_name = "PATH")]
    pub ali_results_path: Option<PathBuf>,

    /// Where to write the tabular summary of the alignments
    #[arg(short = 'T', long = "tab-output", value_name = "PATH")]
    pub tbl_results_path: Option<PathBuf>,

    /// Where to write the alignments as JSON
    #[arg(short = 'J', long = "json-output", value_name = "PATH")]
    pub json_results_path: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct AlignArgs {
    #[command(flatten)]
    pub input_args: InputArgs,

    /// Arguments that control the gap penalty
    #[command(flatten)]
    pub gap_args: GapArgs,

    /// Arguments that control the traceback
    #[command(flatten)]
    pub traceback_args: TracebackArgs,

    /// Arguments that control output options
    #[command(flatten)]
    pub output_args: OutputArgs,

    /// Arguments that are common across all dotalign subcommands
    #[command(flatten)]
    pub common_args: CommonArgs,
}

#[derive(Debug, Args)]
pub struct MatrixArgs {
    #[command(flatten)]
    pub input_args: InputArgs,

    /// Arguments that control the gap penalty
    #[command(flatten)]
    pub gap_args: GapArgs,

    /// Where to write the matrix (stdout if not provided)
    #[arg(short = 'O', long = "output", value_name = "PATH")]
    pub output_path: Option<PathBuf>,

    /// Write the matrix as JSON instead of a text grid
    #[arg(long = "json", default_value_t = false)]
    pub json: bool,

    /// Arguments that are common across all dotalign subcommands
    #[command(flatten)]
    pub common_args: CommonArgs,
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::{check, let_assert};

    #[test]
    fn test_align_defaults() {
        let_assert!(
            Ok(cli) = Cli::try_parse_from(["dotalign", "align", "scores.json", "ACGT", "AGT"])
        );
        let_assert!(SubCommands::Align(args) = cli.command);
        check!(args.gap_args.gap_model() == GapModel::default());
        check!(args.traceback_args.params() == TracebackParams::default());
        check!(args.common_args.num_threads == 8);
        check!(args.output_args.ali_results_path.is_none());
    }

    #[test]
    fn test_gap_and_traceback_options() {
        let_assert!(
            Ok(cli) = Cli::try_parse_from([
                "dotalign",
                "align",
                "scores.txt",
                "ACGT",
                "AGT",
                "--gap-open",
                "-3",
                "--gap-extend",
                "-1",
                "--maxima",
                "all",
                "--stop",
                "edge",
                "-vv",
            ])
        );
        let_assert!(SubCommands::Align(args) = cli.command);
        check!(args.gap_args.gap_model() == GapModel::Affine(AffineGap::new(-3, -1)));
        check!(args.traceback_args.params().maxima == MaximaSelection::All);
        check!(args.traceback_args.params().stop == StopRule::AtEdge);
        check!(args.common_args.verbose == 2);
    }

    #[test]
    fn test_unknown_gap_model_is_rejected() {
        let result =
            Cli::try_parse_from(["dotalign", "matrix", "s.json", "A", "B", "--gap-model", "linear"]);
        check!(result.is_err());
    }
}
