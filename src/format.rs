use std::fmt::Write;

use anyhow::Result;

use crate::stats::{Report, Section};

const HEADER: &str = "| Command | Mean [ms] |";
const ALIGNMENT: &str = "|:---|---:|";

fn format_section(section: &Section) -> Result<String> {
  let mut table = String::new();

  writeln!(table, "## {}", section.group)?;
  writeln!(table)?;
  writeln!(table, "{HEADER}")?;
  writeln!(table, "{ALIGNMENT}")?;

  for row in &section.rows {
    writeln!(table, "| `{}` | {} |", row.unit, row.result.cell())?;
  }

  Ok(table)
}

/// Renders the report as markdown, one subsection per group.
pub fn format(report: &Report) -> Result<String> {
  let sections = report.sections.iter().map(format_section).collect::<Result<Vec<_>>>()?;

  Ok(sections.join("\n"))
}

#[cfg(test)]
mod tests {
  use std::time::Duration;

  use super::*;
  use crate::{
    group::Group,
    stats::{Row, RunResult},
  };

  fn section(label: &str, results: &[RunResult]) -> Section {
    let group = Group::new(label, label);
    let rows = results
      .iter()
      .zip(1..)
      .map(|(&result, day)| Row { unit: group.unit(day), result })
      .collect();

    Section { group, rows }
  }

  #[test]
  fn single_group() {
    let mut report = Report::default();
    report.push(section(
      "2016",
      &[
        RunResult::Measured(Duration::from_micros(1_500)),
        RunResult::Errored,
        RunResult::TimedOut,
        RunResult::Skipped,
      ],
    ));

    let expected = "\
## 2016

| Command | Mean [ms] |
|:---|---:|
| `2016 Day 1` | 1.50 |
| `2016 Day 2` | Error |
| `2016 Day 3` | Timed out |
| `2016 Day 4` | Skipped |
";

    assert_eq!(format(&report).unwrap(), expected);
  }

  #[test]
  fn groups_are_separated_by_a_blank_line() {
    let mut report = Report::default();
    report.push(section("2015", &[RunResult::Skipped]));
    report.push(section("2017", &[RunResult::Measured(Duration::from_millis(42))]));

    let expected = "\
## 2015

| Command | Mean [ms] |
|:---|---:|
| `2015 Day 1` | Skipped |

## 2017

| Command | Mean [ms] |
|:---|---:|
| `2017 Day 1` | 42.00 |
";

    assert_eq!(format(&report).unwrap(), expected);
  }

  #[test]
  fn empty_report() {
    assert_eq!(format(&Report::default()).unwrap(), "");
  }
}
