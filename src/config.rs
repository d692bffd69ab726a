use std::{
  collections::{BTreeMap, BTreeSet},
  str::FromStr,
  time::Duration,
};

use anyhow::Context;

use crate::group::{Unit, DAYS};

/// Days that are too slow to benchmark, keyed by year.
const SLOW_DAYS: &[(&str, &[u8])] = &[
  ("2015", &[]),
  ("2016", &[5]),
  ("2017", &[]),
  ("2019", &[]),
  ("2020", &[]),
  ("2021", &[19, 24]),
  ("2022", &[]),
  ("2023", &[]),
];

/// Days to bypass, keyed by year. Years without an entry skip nothing.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SkipSet(BTreeMap<String, BTreeSet<u8>>);

impl SkipSet {
  /// The days known to be too slow.
  pub fn slow_days() -> Self {
    let mut skip = Self::default();
    for (year, days) in SLOW_DAYS {
      let entry = skip.0.entry(year.to_string()).or_default();
      entry.extend(days.iter().copied());
    }

    skip
  }

  pub fn insert(&mut self, entry: SkipEntry) {
    self.0.entry(entry.group).or_default().insert(entry.day);
  }

  pub fn contains(&self, unit: &Unit) -> bool {
    self.0.get(&unit.group).is_some_and(|days| days.contains(&unit.day))
  }
}

/// A single `year:day` pair to skip.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SkipEntry {
  pub group: String,
  pub day: u8,
}

impl FromStr for SkipEntry {
  type Err = anyhow::Error;

  fn from_str(s: &str) -> anyhow::Result<Self> {
    let (group, day) = s.split_once(':').context("expected YEAR:DAY")?;

    if group.is_empty() || !group.bytes().all(|b| b.is_ascii_digit()) {
      anyhow::bail!("year {group:?} is not numeric");
    }

    let day: u8 = day.parse().with_context(|| format!("day {day:?}"))?;
    if !DAYS.contains(&day) {
      anyhow::bail!("day {day} is outside {}..={}", DAYS.start(), DAYS.end());
    }

    Ok(Self {
      group: group.to_string(),
      day,
    })
  }
}

/// Everything the aggregator needs besides the groups themselves.
#[derive(Clone, Debug)]
pub struct Config {
  pub skip: SkipSet,
  /// Wall-clock bound on a single timing tool invocation.
  pub timeout: Duration,
  /// Warmup runs the timing tool performs before measuring.
  pub warmup: u32,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      skip: SkipSet::slow_days(),
      timeout: Duration::from_secs(10),
      warmup: 2,
    }
  }
}
