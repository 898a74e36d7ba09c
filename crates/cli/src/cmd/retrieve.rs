//! Implementation of the `pim retrieve` and `pim get` commands.

use anyhow::{Context, Result, bail};
use pimstore_lib::Entry;
use pimstore_lib::runtime::Runtime;
use pimstore_lib::store_lock::LockMode;

use crate::PrintArgs;
use crate::output::{EntryView, OutputFormat, print_json, render_entry};
use crate::util::parse_id;

/// Print an entry, creating it first if it is missing.
pub fn cmd_retrieve(runtime: &Runtime, id: &str, print: PrintArgs, output: OutputFormat) -> Result<()> {
  let id = parse_id(id)?;
  let _lock = runtime
    .lock_store(LockMode::Exclusive, "retrieve")
    .context("Failed to acquire store lock")?;

  let entry = runtime
    .store()
    .retrieve(id.clone())
    .with_context(|| format!("Failed to retrieve entry {}", id))?;
  show(&entry, print, output)
}

/// Print an entry. A missing entry is an error.
pub fn cmd_get(runtime: &Runtime, id: &str, print: PrintArgs, output: OutputFormat) -> Result<()> {
  let id = parse_id(id)?;
  // Borrowed entries are written back on drop, so this is not a shared lock.
  let _lock = runtime
    .lock_store(LockMode::Exclusive, "get")
    .context("Failed to acquire store lock")?;

  let Some(entry) = runtime
    .store()
    .get(id.clone())
    .with_context(|| format!("Failed to get entry {}", id))?
  else {
    bail!("No entry {}", id);
  };
  show(&entry, print, output)
}

fn show(entry: &Entry, print: PrintArgs, output: OutputFormat) -> Result<()> {
  if output.is_json() {
    return print_json(&EntryView::new(entry));
  }
  print!("{}", render_entry(entry, print)?);
  Ok(())
}
