use std::time::Duration;

use crate::group::{Group, Unit};

/// Outcome of benchmarking a single unit. Created once per unit and never
/// changed afterwards.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RunResult {
  /// Mean wall-clock time reported by the timing tool.
  Measured(Duration),
  Skipped,
  TimedOut,
  Errored,
}

impl RunResult {
  /// The report cell for this result: milliseconds with two decimals, or a
  /// status string.
  pub fn cell(&self) -> String {
    match self {
      RunResult::Measured(mean) => format!("{:.2}", mean.as_secs_f64() * 1000.0),
      RunResult::Skipped => "Skipped".to_string(),
      RunResult::TimedOut => "Timed out".to_string(),
      RunResult::Errored => "Error".to_string(),
    }
  }
}

/// A unit together with how it fared.
#[derive(Clone, Debug, PartialEq)]
pub struct Row {
  pub unit: Unit,
  pub result: RunResult,
}

/// Results for every unit of one group, in ascending unit order.
#[derive(Clone, Debug, PartialEq)]
pub struct Section {
  pub group: Group,
  pub rows: Vec<Row>,
}

/// Results for a whole run, one section per group in input order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Report {
  pub sections: Vec<Section>,
}

impl Report {
  pub fn push(&mut self, section: Section) {
    self.sections.push(section);
  }

  pub fn rows(&self) -> impl Iterator<Item = &Row> {
    self.sections.iter().flat_map(|section| &section.rows)
  }

  /// Counts of measured, skipped, timed out and errored units.
  pub fn tally(&self) -> (usize, usize, usize, usize) {
    self.rows().fold((0, 0, 0, 0), |(m, s, t, e), row| match row.result {
      RunResult::Measured(_) => (m + 1, s, t, e),
      RunResult::Skipped => (m, s + 1, t, e),
      RunResult::TimedOut => (m, s, t + 1, e),
      RunResult::Errored => (m, s, t, e + 1),
    })
  }
}
