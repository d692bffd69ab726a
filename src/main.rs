mod bench;
mod config;
mod ext;
mod format;
mod group;
mod run;
mod stats;

use std::{path::PathBuf, time::Duration};

use anyhow::{Context, Result};
use clap::Parser;

use self::{
  bench::Bench,
  config::{Config, SkipEntry, SkipSet},
  run::{BuildError, Hyperfine},
};

/// Builds every Advent of Code year in release mode, times each day with
/// hyperfine and writes a markdown report.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
  /// A year directory, or a directory containing year directories.
  #[arg(long, default_value = ".")]
  root: PathBuf,
  /// Report file, overwritten on success. Defaults to `benchmarks.md` in the
  /// root.
  #[arg(short, long)]
  output: Option<PathBuf>,
  /// Seconds a single day may take, warmup included.
  #[arg(short, long, default_value_t = 10)]
  timeout: u64,
  /// Warmup runs before measuring.
  #[arg(short, long, default_value_t = 2)]
  warmup: u32,
  /// Additional days to skip, as `YEAR:DAY`.
  #[arg(short, long)]
  skip: Vec<SkipEntry>,
  /// Measure days that are skipped by default for being too slow.
  #[arg(long)]
  no_default_skips: bool,
}

impl Args {
  fn config(&self) -> Config {
    let mut skip = if self.no_default_skips {
      SkipSet::default()
    } else {
      SkipSet::slow_days()
    };

    for entry in &self.skip {
      skip.insert(entry.clone());
    }

    Config {
      skip,
      timeout: Duration::from_secs(self.timeout),
      warmup: self.warmup,
    }
  }
}

fn bench(args: Args) -> Result<()> {
  let groups = group::discover(&args.root).context("discover")?;
  if groups.is_empty() {
    anyhow::bail!("no year directories found in {:?}", args.root);
  }

  let output = args.output.clone().unwrap_or_else(|| args.root.join("benchmarks.md"));
  let config = args.config();
  let toolchain = Hyperfine::new(config.warmup);

  Bench::new(config, toolchain).bench_to_file(&groups, &output)?;

  Ok(())
}

fn main() {
  env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

  if let Err(err) = bench(Args::parse()) {
    log::error!("{err:#}");
    std::process::exit(exit_code(&err));
  }
}

/// A failed build passes its own exit code through; anything else is 1.
fn exit_code(err: &anyhow::Error) -> i32 {
  err.downcast_ref::<BuildError>().map_or(1, BuildError::exit_code)
}
