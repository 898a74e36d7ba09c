//! Implementation of the `pim list` command.
//!
//! Text output is one id per line so it can be piped into other commands.

use anyhow::{Context, Result};
use pimstore_lib::runtime::Runtime;
use pimstore_lib::store_lock::LockMode;

use crate::output::{OutputFormat, print_json};

pub fn cmd_list(runtime: &Runtime, collection: Option<&str>, output: OutputFormat) -> Result<()> {
  let _lock = runtime
    .lock_store(LockMode::Shared, "list")
    .context("Failed to acquire store lock")?;

  let store = runtime.store();
  let ids = match collection {
    Some(collection) => store.retrieve_for_module(collection),
    None => store.entries(),
  }
  .context("Failed to list entries")?;

  let ids: Vec<String> = ids.into_iter().map(|id| id.without_base().to_string()).collect();

  if output.is_json() {
    print_json(&ids)?;
  } else {
    for id in &ids {
      println!("{}", id);
    }
  }
  Ok(())
}
