//! Implementation of the `pim edit` command.
//!
//! The serialized entry is written to a temp file, handed to the editor and
//! parsed back. An edit that no longer parses is rejected and the entry is
//! left as it was.

use std::fs;
use std::io::Write;

use anyhow::{Context, Result, anyhow, bail};
use pimstore_lib::Entry;
use pimstore_lib::runtime::Runtime;
use pimstore_lib::store_lock::LockMode;
use tracing::debug;

use crate::output::{print_info, print_success};
use crate::util::parse_id;

pub fn cmd_edit(runtime: &Runtime, id: &str) -> Result<()> {
  let id = parse_id(id)?;
  let mut editor = runtime
    .editor()
    .ok_or_else(|| anyhow!("No editor configured. Pass --editor, set `editor` in the config, or set $EDITOR"))?;

  let _lock = runtime
    .lock_store(LockMode::Exclusive, "edit")
    .context("Failed to acquire store lock")?;

  let store = runtime.store();
  let mut entry = store
    .retrieve(id.clone())
    .with_context(|| format!("Failed to retrieve entry {}", id))?;
  let before = entry.to_str()?;

  let mut file = tempfile::Builder::new()
    .prefix("pim-edit-")
    .suffix(".md")
    .tempfile()
    .context("Failed to create temp file")?;
  file.write_all(before.as_bytes()).context("Failed to write temp file")?;
  file.flush().context("Failed to write temp file")?;

  debug!(editor = ?editor, file = %file.path().display(), "launching editor");
  let status = editor
    .arg(file.path())
    .status()
    .with_context(|| format!("Failed to launch editor {:?}", editor.get_program()))?;
  if !status.success() {
    bail!("Editor exited with {}", status);
  }

  let after = fs::read_to_string(file.path()).context("Failed to read edited entry")?;
  if after == before {
    print_info(&format!("{} unchanged", id));
    return Ok(());
  }

  let edited = Entry::from_str(entry.location().clone(), &after).context("Edited entry is not valid")?;
  entry.set_header(edited.header().clone());
  entry.set_content(edited.content());
  store
    .update(&mut entry)
    .with_context(|| format!("Failed to write entry {}", id))?;

  print_success(&format!("Edited {}", id));
  Ok(())
}
