//! CLI output formatting.
//!
//! Status lines carry a colored symbol; entry data itself is printed plain
//! so it can be piped.

use anyhow::Context;
use clap::ValueEnum;
use owo_colors::{OwoColorize, Stream};
use pimstore_lib::Entry;
use serde::Serialize;

use crate::PrintArgs;

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
  #[default]
  Text,
  Json,
}

impl OutputFormat {
  pub fn is_json(self) -> bool {
    matches!(self, OutputFormat::Json)
  }
}

pub mod symbols {
  pub const SUCCESS: &str = "✓";
  pub const ERROR: &str = "✗";
  pub const INFO: &str = "•";
  pub const ARROW: &str = "→";
}

pub fn print_success(message: &str) {
  println!(
    "{} {}",
    symbols::SUCCESS.if_supports_color(Stream::Stdout, |s| s.green()),
    message
  );
}

pub fn print_error(message: &str) {
  eprintln!(
    "{} {}",
    symbols::ERROR.if_supports_color(Stream::Stderr, |s| s.red()),
    message.if_supports_color(Stream::Stderr, |s| s.red())
  );
}

pub fn print_info(message: &str) {
  println!(
    "{} {}",
    symbols::INFO.if_supports_color(Stream::Stdout, |s| s.blue()),
    message
  );
}

pub fn print_stat(label: &str, value: &str) {
  println!(
    "  {}: {}",
    label.if_supports_color(Stream::Stdout, |s| s.dimmed()),
    value
  );
}

pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
  let json = serde_json::to_string_pretty(value).context("Failed to serialize to JSON")?;
  println!("{}", json);
  Ok(())
}

/// JSON view of an entry.
#[derive(Debug, Serialize)]
pub struct EntryView<'a> {
  pub id: String,
  pub header: &'a toml::Value,
  pub content: &'a str,
}

impl<'a> EntryView<'a> {
  pub fn new(entry: &'a Entry) -> Self {
    EntryView {
      id: entry.location().clone().without_base().to_string(),
      header: entry.header(),
      content: entry.content(),
    }
  }
}

/// Render the parts of `entry` selected by `print`, in a fixed order:
/// header TOML, header JSON, content.
pub fn render_entry(entry: &Entry, print: PrintArgs) -> anyhow::Result<String> {
  if print.raw || !(print.content || print.header || print.header_json) {
    return Ok(entry.to_str()?);
  }

  let mut out = String::new();
  if print.header {
    out.push_str(&toml::to_string(entry.header()).context("Failed to serialize header")?);
  }
  if print.header_json {
    out.push_str(&serde_json::to_string_pretty(entry.header()).context("Failed to serialize header to JSON")?);
    out.push('\n');
  }
  if print.content {
    out.push_str(entry.content());
  }
  Ok(out)
}
