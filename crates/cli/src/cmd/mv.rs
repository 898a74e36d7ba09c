//! Implementation of the `pim move` command.

use anyhow::{Context, Result};
use pimstore_lib::runtime::Runtime;
use pimstore_lib::store_lock::LockMode;
use serde_json::json;
use tracing::info;

use crate::output::{OutputFormat, print_json, print_success, symbols};
use crate::util::parse_id;

pub fn cmd_move(runtime: &Runtime, from: &str, to: &str, output: OutputFormat) -> Result<()> {
  let from = parse_id(from)?;
  let to = parse_id(to)?;
  let _lock = runtime
    .lock_store(LockMode::Exclusive, "move")
    .context("Failed to acquire store lock")?;

  runtime
    .store()
    .move_by_id(from.clone(), to.clone())
    .with_context(|| format!("Failed to move {} to {}", from, to))?;
  info!(from = %from, to = %to, "moved entry");

  if output.is_json() {
    print_json(&json!({ "from": from.to_string(), "to": to.to_string() }))?;
  } else {
    print_success(&format!("Moved {} {} {}", from, symbols::ARROW, to));
  }
  Ok(())
}
