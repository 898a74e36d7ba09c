//! Implementation of the `pim delete` command.

use anyhow::{Context, Result};
use pimstore_lib::runtime::Runtime;
use pimstore_lib::store_lock::LockMode;
use serde_json::json;
use tracing::info;

use crate::output::{OutputFormat, print_json, print_success};
use crate::util::parse_id;

pub fn cmd_delete(runtime: &Runtime, id: &str, output: OutputFormat) -> Result<()> {
  let id = parse_id(id)?;
  let _lock = runtime
    .lock_store(LockMode::Exclusive, "delete")
    .context("Failed to acquire store lock")?;

  runtime
    .store()
    .delete(id.clone())
    .with_context(|| format!("Failed to delete entry {}", id))?;
  info!(id = %id, "deleted entry");

  if output.is_json() {
    print_json(&json!({ "deleted": id.to_string() }))?;
  } else {
    print_success(&format!("Deleted {}", id));
  }
  Ok(())
}
