use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::path::PathBuf;

use anyhow::Context;

pub trait PathBufExt {
    fn open(&self, allow_overwrite: bool) -> anyhow::Result<BufWriter<File>>;
}

impl PathBufExt for PathBuf {
    fn open(&self, allow_overwrite: bool) -> anyhow::Result<BufWriter<File>> {
        let mut file_options = File::options();

        if allow_overwrite {
            file_options.write(true).truncate(true).create(true);
        } else {
            file_options.write(true).create_new(true);
        };

        let file = file_options
            .open(self)
            .context(format!("failed to create file: {}", self.to_string_lossy()))?;

        Ok(BufWriter::new(file))
    }
}

/// Open `path` for writing, or fall back to stdout.
pub fn writer_or_stdout(
    path: &Option<PathBuf>,
    allow_overwrite: bool,
) -> anyhow::Result<Box<dyn Write>> {
    Ok(match path {
        Some(path) => Box::new(path.open(allow_overwrite)?),
        None => Box::new(BufWriter::new(stdout())),
    })
}

pub fn set_threads(num_threads: usize) -> anyhow::Result<()> {
    rayon::ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .build_global()
        .context("failed to build rayon global threadpool")
}

pub fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::{check, let_assert};

    #[test]
    fn test_open_respects_overwrite() {
        let_assert!(Ok(dir) = tempfile::tempdir());
        let path = dir.path().join("out.txt");

        let_assert!(Ok(mut writer) = path.open(false));
        let_assert!(Ok(()) = writeln!(writer, "first"));
        drop(writer);

        check!(path.open(false).is_err());
        check!(path.open(true).is_ok());
    }
}
