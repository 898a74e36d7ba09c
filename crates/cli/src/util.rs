use std::fs;
use std::io::{self, Read};

use anyhow::{Context, Result};
use pimstore_lib::StoreId;
use pimstore_lib::header::{HeaderExt, parse_assignment};
use toml::Value;

/// Read a whole file, or stdin for `-`.
pub fn read_input(source: &str) -> Result<String> {
  if source == "-" {
    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf).context("Failed to read stdin")?;
    return Ok(buf);
  }
  fs::read_to_string(source).with_context(|| format!("Failed to read {}", source))
}

pub fn parse_id(raw: &str) -> Result<StoreId> {
  StoreId::new_baseless(raw).with_context(|| format!("Invalid entry id {:?}", raw))
}

/// Apply `key=value` assignments to a copy of `header`.
///
/// Nothing is changed unless every assignment applies.
pub fn with_assignments(header: &Value, assignments: &[String]) -> Result<Value> {
  let mut header = header.clone();
  for assignment in assignments {
    let (path, value) = parse_assignment(assignment).with_context(|| format!("Invalid header {:?}", assignment))?;
    header
      .set(&path, value)
      .with_context(|| format!("Failed to set header {:?}", path))?;
  }
  Ok(header)
}
