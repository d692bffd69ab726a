use std::{
  ffi::OsString,
  fs, io,
  path::Path,
  process::{Command, ExitStatus},
  time::Duration,
};

use serde::Deserialize;

use crate::{
  ext::{ChildExt, CommandExt},
  group::{Group, Unit},
};

#[derive(Debug, thiserror::Error)]
pub enum BuildError {
  #[error("could not spawn build for {group}")]
  Spawn {
    group: String,
    #[source]
    source: io::Error,
  },
  #[error("build for {group} exited with {status}")]
  Failed { group: String, status: ExitStatus },
}

impl BuildError {
  /// Exit code the whole process should terminate with.
  pub fn exit_code(&self) -> i32 {
    match self {
      BuildError::Failed { status, .. } => status.code().unwrap_or(1),
      BuildError::Spawn { .. } => 1,
    }
  }
}

#[derive(Debug, thiserror::Error)]
pub enum MeasureError {
  #[error("could not spawn timing tool")]
  Spawn(#[source] io::Error),
  #[error("could not wait for timing tool")]
  Wait(#[source] io::Error),
  #[error("timed out after {0:?}")]
  TimedOut(Duration),
  #[error("timing tool exited with {0}")]
  Failed(ExitStatus),
  #[error("malformed result: {0}")]
  Malformed(String),
}

/// The external tools the aggregator drives.
pub trait Toolchain {
  /// Builds every unit of `group` ahead of measuring.
  fn build(&mut self, group: &Group) -> Result<(), BuildError>;

  /// Times `unit`, leaving the tool's structured output at `export`, and
  /// returns the mean duration.
  fn measure(
    &mut self,
    group: &Group,
    unit: &Unit,
    export: &Path,
    timeout: Duration,
  ) -> Result<Duration, MeasureError>;
}

/// An external program, with any arguments that precede the ones added per
/// invocation.
#[derive(Clone, Debug)]
pub struct Tool {
  program: OsString,
  args: Vec<OsString>,
}

impl Tool {
  pub fn new<S: Into<OsString>>(program: S) -> Self {
    Self {
      program: program.into(),
      args: Vec::new(),
    }
  }

  fn command(&self) -> Command {
    let mut command = Command::new(&self.program);
    command.args(&self.args);

    command
  }
}

/// `cargo build --release` followed by `hyperfine` for each day.
pub struct Hyperfine {
  pub warmup: u32,
  pub cargo: Tool,
  pub hyperfine: Tool,
}

impl Hyperfine {
  pub fn new(warmup: u32) -> Self {
    Self {
      warmup,
      cargo: Tool::new("cargo"),
      hyperfine: Tool::new("hyperfine"),
    }
  }
}

impl Toolchain for Hyperfine {
  fn build(&mut self, group: &Group) -> Result<(), BuildError> {
    log::info!("building {group}");

    let mut cargo = self.cargo.command();
    cargo.current_dir(group.root()).args(["build", "--release"]);
    log::debug!("{cargo:?}");

    let status = cargo.status().map_err(|source| BuildError::Spawn {
      group: group.label().to_string(),
      source,
    })?;

    if !status.success() {
      return Err(BuildError::Failed {
        group: group.label().to_string(),
        status,
      });
    }

    Ok(())
  }

  fn measure(
    &mut self,
    group: &Group,
    unit: &Unit,
    export: &Path,
    timeout: Duration,
  ) -> Result<Duration, MeasureError> {
    let mut hyperfine = self.hyperfine.command();
    hyperfine
      .current_dir(group.root())
      .arg("--warmup")
      .arg(self.warmup.to_string())
      .arg("--export-json")
      .arg(export)
      .arg("--command-name")
      .arg(unit.to_string())
      .args(["--time-unit", "millisecond"])
      .arg("--input")
      .arg(unit.input())
      .arg(unit.executable());
    log::debug!("{hyperfine:?}");

    let status = hyperfine
      .spawn_group()
      .map_err(MeasureError::Spawn)?
      .wait_or_kill(timeout)
      .map_err(MeasureError::Wait)?
      .ok_or(MeasureError::TimedOut(timeout))?;

    if !status.success() {
      return Err(MeasureError::Failed(status));
    }

    let json =
      fs::read_to_string(export).map_err(|err| MeasureError::Malformed(format!("read {export:?}: {err}")))?;

    parse_export(&json)
  }
}

#[derive(Deserialize)]
struct Export {
  results: Vec<Measurement>,
}

#[derive(Deserialize)]
struct Measurement {
  /// Seconds.
  mean: f64,
}

/// Extracts the mean of the first result from hyperfine's `--export-json`
/// output.
pub fn parse_export(json: &str) -> Result<Duration, MeasureError> {
  let export: Export = serde_json::from_str(json).map_err(|err| MeasureError::Malformed(err.to_string()))?;

  let Some(measurement) = export.results.first() else {
    return Err(MeasureError::Malformed("no results".to_string()));
  };

  Duration::try_from_secs_f64(measurement.mean)
    .map_err(|err| MeasureError::Malformed(format!("mean {}: {err}", measurement.mean)))
}
