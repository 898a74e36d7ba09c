//! Implementation of the `pim update` command.

use anyhow::{Context, Result, bail};
use pimstore_lib::runtime::Runtime;
use pimstore_lib::store_lock::LockMode;
use tracing::info;

use crate::output::{EntryView, OutputFormat, print_json, print_success};
use crate::util::{parse_id, read_input, with_assignments};

pub fn cmd_update(
  runtime: &Runtime,
  id: &str,
  content: Option<&str>,
  headers: &[String],
  output: OutputFormat,
) -> Result<()> {
  let id = parse_id(id)?;
  let content = content.map(read_input).transpose()?;

  let _lock = runtime
    .lock_store(LockMode::Exclusive, "update")
    .context("Failed to acquire store lock")?;

  let store = runtime.store();
  let Some(mut entry) = store.get(id.clone()).with_context(|| format!("Failed to get entry {}", id))? else {
    bail!("No entry {}", id);
  };

  let header = with_assignments(entry.header(), headers)?;
  entry.set_header(header);
  if let Some(content) = content {
    entry.set_content(content);
  }
  store
    .update(&mut entry)
    .with_context(|| format!("Failed to write entry {}", id))?;

  info!(id = %id, headers = headers.len(), "updated entry");

  if output.is_json() {
    print_json(&EntryView::new(&entry))?;
  } else {
    print_success(&format!("Updated {}", id));
  }
  Ok(())
}
