use std::{fs, path::Path};

use anyhow::{Context, Result};
use tempfile::TempDir;

use crate::{
  config::Config,
  format,
  group::{Group, Unit},
  run::{MeasureError, Toolchain},
  stats::{Report, Row, RunResult, Section},
};

pub struct Bench<T> {
  config: Config,
  toolchain: T,
}

impl<T: Toolchain> Bench<T> {
  pub fn new(config: Config, toolchain: T) -> Self {
    Self { config, toolchain }
  }

  /// Builds every group, then measures each of their units in order. Only a
  /// failed build (or scratch directory I/O) aborts the run.
  pub fn run(&mut self, groups: &[Group]) -> Result<Report> {
    for group in groups {
      self.toolchain.build(group)?;
    }

    let mut report = Report::default();
    for group in groups {
      let section = self.bench_group(group).with_context(|| format!("bench {group}"))?;
      report.push(section);
    }

    let (measured, skipped, timed_out, errored) = report.tally();
    log::info!("{measured} measured, {skipped} skipped, {timed_out} timed out, {errored} errored");

    Ok(report)
  }

  /// Runs the benchmarks and overwrites `output` with the rendered report. On
  /// error, `output` is left untouched.
  pub fn bench_to_file(&mut self, groups: &[Group], output: &Path) -> Result<Report> {
    let report = self.run(groups)?;

    let markdown = format::format(&report).context("format")?;
    fs::write(output, markdown).with_context(|| format!("write {output:?}"))?;
    log::info!("wrote {output:?}");

    Ok(report)
  }

  fn bench_group(&mut self, group: &Group) -> Result<Section> {
    let scratch = TempDir::with_prefix("aoc-bench-").context("tempdir")?;

    let rows = group
      .units()
      .map(|unit| {
        let result = self.bench_unit(group, &unit, scratch.path());
        Row { unit, result }
      })
      .collect();

    scratch.close().context("remove tempdir")?;

    Ok(Section {
      group: group.clone(),
      rows,
    })
  }

  fn bench_unit(&mut self, group: &Group, unit: &Unit, scratch: &Path) -> RunResult {
    if self.config.skip.contains(unit) {
      log::info!("skipping {unit}");
      return RunResult::Skipped;
    }

    let export = scratch.join(format!("{:02}.json", unit.day));

    match self.toolchain.measure(group, unit, &export, self.config.timeout) {
      Ok(mean) => {
        log::info!("{unit}: {mean:?}");
        RunResult::Measured(mean)
      }
      Err(err @ MeasureError::TimedOut(_)) => {
        log::warn!("{unit}: {err}");
        RunResult::TimedOut
      }
      Err(err) => {
        log::warn!("{unit}: {:#}", anyhow::Error::from(err));
        RunResult::Errored
      }
    }
  }
}
