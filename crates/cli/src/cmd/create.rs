//! Implementation of the `pim create` command.

use anyhow::{Context, Result};
use pimstore_lib::Entry;
use pimstore_lib::runtime::Runtime;
use pimstore_lib::store_lock::LockMode;
use serde::Serialize;
use tracing::info;

use crate::output::{OutputFormat, print_json, print_stat, print_success};
use crate::util::{parse_id, read_input, with_assignments};

pub struct CreateArgs<'a> {
  pub id: &'a str,
  pub content: Option<&'a str>,
  pub content_from: Option<&'a str>,
  pub headers: &'a [String],
  pub from_raw: Option<&'a str>,
}

#[derive(Serialize)]
struct Created {
  id: String,
  path: String,
}

/// Create an entry.
///
/// All input is read and validated before the entry is created, so a bad
/// `--header` or unreadable file leaves the store untouched.
pub fn cmd_create(runtime: &Runtime, args: CreateArgs<'_>, output: OutputFormat) -> Result<()> {
  let id = parse_id(args.id)?;

  let template = match args.from_raw {
    Some(source) => {
      let text = read_input(source)?;
      Entry::from_str(id.clone(), &text).with_context(|| format!("Failed to parse entry from {}", source))?
    }
    None => {
      let mut entry = Entry::new(id.clone());
      if let Some(content) = args.content {
        entry.set_content(content);
      } else if let Some(source) = args.content_from {
        entry.set_content(read_input(source)?);
      }
      entry
    }
  };
  let header = with_assignments(template.header(), args.headers)?;

  let _lock = runtime
    .lock_store(LockMode::Exclusive, "create")
    .context("Failed to acquire store lock")?;

  let store = runtime.store();
  let mut entry = store
    .create(id.clone())
    .with_context(|| format!("Failed to create entry {}", id))?;
  entry.set_header(header);
  entry.set_content(template.content());
  store
    .update(&mut entry)
    .with_context(|| format!("Failed to write entry {}", id))?;

  let path = entry.location().to_str()?;
  info!(id = %id, path = %path, "created entry");

  if output.is_json() {
    print_json(&Created { id: id.to_string(), path })?;
  } else {
    print_success(&format!("Created {}", id));
    print_stat("Path", &path);
  }

  Ok(())
}
