use std::{
  fmt, fs,
  path::{Path, PathBuf},
};

use anyhow::{Context, Result};

/// Days of a single Advent of Code year.
pub const DAYS: std::ops::RangeInclusive<u8> = 1..=25;

/// A year directory, holding one cargo workspace with a binary per day.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Group {
  label: String,
  root: PathBuf,
}

impl Group {
  pub fn new<S: Into<String>, P: Into<PathBuf>>(label: S, root: P) -> Self {
    Self {
      label: label.into(),
      root: root.into(),
    }
  }

  pub fn label(&self) -> &str {
    &self.label
  }

  pub fn root(&self) -> &Path {
    &self.root
  }

  pub fn unit(&self, day: u8) -> Unit {
    Unit {
      group: self.label.clone(),
      day,
    }
  }

  /// Every day of the year, in ascending order.
  pub fn units(&self) -> impl Iterator<Item = Unit> + '_ {
    DAYS.map(|day| self.unit(day))
  }
}

impl fmt::Display for Group {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.label)
  }
}

/// One day of a year. Paths are relative to the group root.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Unit {
  pub group: String,
  pub day: u8,
}

impl Unit {
  pub fn dir_name(&self) -> String {
    format!("day{:02}", self.day)
  }

  pub fn executable(&self) -> PathBuf {
    Path::new("target/release").join(self.dir_name())
  }

  pub fn input(&self) -> PathBuf {
    Path::new(&self.dir_name()).join("resources/input")
  }
}

impl fmt::Display for Unit {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{} Day {}", self.group, self.day)
  }
}

fn is_numeric(name: &str) -> bool {
  !name.is_empty() && name.bytes().all(|b| b.is_ascii_digit())
}

/// Finds the groups to benchmark under `root`. A root with a numeric name is a
/// single group; otherwise each numeric subdirectory is one, ordered by year.
pub fn discover(root: &Path) -> Result<Vec<Group>> {
  let root = root.canonicalize().with_context(|| format!("canonicalize {root:?}"))?;

  if let Some(name) = root.file_name().and_then(|name| name.to_str()) {
    if is_numeric(name) {
      return Ok(vec![Group::new(name, &root)]);
    }
  }

  let mut groups = Vec::new();
  for entry in fs::read_dir(&root).context("read dir")? {
    let entry = entry.context("dir entry")?;
    if !entry.file_type().context("file type")?.is_dir() {
      continue;
    }

    let Ok(name) = entry.file_name().into_string() else {
      continue;
    };

    if is_numeric(&name) {
      groups.push(Group::new(name, entry.path()));
    }
  }

  groups.sort_by_key(|group| (group.label.len(), group.label.clone()));

  Ok(groups)
}

#[cfg(test)]
mod tests {
  use tempfile::TempDir;

  use super::*;

  #[test]
  fn unit_paths() {
    let unit = Group::new("2021", "/aoc/2021").unit(7);

    assert_eq!(unit.dir_name(), "day07");
    assert_eq!(unit.executable(), Path::new("target/release/day07"));
    assert_eq!(unit.input(), Path::new("day07/resources/input"));
    assert_eq!(unit.to_string(), "2021 Day 7");
  }

  #[test]
  fn units_cover_every_day_in_order() {
    let days: Vec<u8> = Group::new("2015", "2015").units().map(|unit| unit.day).collect();

    assert_eq!(days, (1..=25).collect::<Vec<_>>());
  }

  #[test]
  fn numeric() {
    assert!(is_numeric("2021"));
    assert!(!is_numeric(""));
    assert!(!is_numeric("tools"));
    assert!(!is_numeric("2021a"));
  }

  #[test]
  fn discovers_numeric_subdirectories_in_order() {
    let root = TempDir::new().unwrap();
    for dir in ["2023", "tools", "2015", "999", "libs", "2021"] {
      fs::create_dir(root.path().join(dir)).unwrap();
    }
    fs::write(root.path().join("2019"), "not a directory").unwrap();

    let groups = discover(root.path()).unwrap();
    let labels: Vec<&str> = groups.iter().map(Group::label).collect();

    assert_eq!(labels, ["999", "2015", "2021", "2023"]);
    assert!(groups[1].root().ends_with("2015"));
  }

  #[test]
  fn numeric_root_is_a_single_group() {
    let parent = TempDir::new().unwrap();
    let year = parent.path().join("2022");
    fs::create_dir_all(year.join("2023")).unwrap();

    let groups = discover(&year).unwrap();

    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].label(), "2022");
    assert_eq!(groups[0].root(), year.canonicalize().unwrap());
  }

  #[test]
  fn missing_root_is_an_error() {
    let parent = TempDir::new().unwrap();

    assert!(discover(&parent.path().join("nope")).is_err());
  }
}
