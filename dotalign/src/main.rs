mod args;
mod io;
mod pipeline;
mod util;

use args::{Cli, SubCommands};
use pipeline::{align, matrix};
use util::{init_logging, set_threads};

use clap::Parser;

fn main() -> anyhow::Result<()> {
    color_backtrace::install();

    match Cli::parse().command {
        SubCommands::Align(args) => {
            init_logging(args.common_args.verbose);
            set_threads(args.common_args.num_threads)?;
            align(&args)?;
        }
        SubCommands::Matrix(args) => {
            init_logging(args.common_args.verbose);
            matrix(&args)?;
        }
    }
    Ok(())
}
