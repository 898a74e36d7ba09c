//! Store entries and their on-disk form.
//!
//! ```text
//! ---
//! [pim]
//! version = "0.3.0"
//! links = []
//! ---
//! free-form content
//! ```

use toml::Value;

use super::error::StoreError;
use super::id::StoreId;
use crate::consts::ENTRY_FENCE;
use crate::header::{default_header, verify_header};

#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
  location: StoreId,
  header: Value,
  content: String,
}

impl Entry {
  pub fn new(location: StoreId) -> Self {
    Entry {
      location,
      header: default_header(),
      content: String::new(),
    }
  }

  /// Parse the serialized form of an entry and verify its header.
  pub fn from_str(location: StoreId, text: &str) -> Result<Self, StoreError> {
    let (raw_header, content) = split_fences(text).ok_or_else(|| StoreError::MalformedEntry {
      location: location.to_string(),
      reason: format!("expected header between two '{}' lines", ENTRY_FENCE),
    })?;

    let header: Value = toml::from_str(raw_header).map_err(|source| StoreError::HeaderParse {
      location: location.to_string(),
      source,
    })?;

    let entry = Entry {
      location,
      header,
      content: content.to_string(),
    };
    entry.verify()?;
    Ok(entry)
  }

  /// Serialize header and content into the on-disk form.
  pub fn to_str(&self) -> Result<String, StoreError> {
    let mut header = toml::to_string(&self.header).map_err(|source| StoreError::HeaderSerialize {
      location: self.location.to_string(),
      source,
    })?;
    if !header.is_empty() && !header.ends_with('\n') {
      header.push('\n');
    }
    Ok(format!("{fence}\n{header}{fence}\n{}", self.content, fence = ENTRY_FENCE))
  }

  pub fn verify(&self) -> Result<(), StoreError> {
    verify_header(&self.header).map_err(|reason| StoreError::HeaderInvalid {
      location: self.location.to_string(),
      reason,
    })
  }

  pub fn location(&self) -> &StoreId {
    &self.location
  }

  pub(crate) fn set_location(&mut self, location: StoreId) {
    self.location = location;
  }

  pub fn header(&self) -> &Value {
    &self.header
  }

  pub fn header_mut(&mut self) -> &mut Value {
    &mut self.header
  }

  pub fn set_header(&mut self, header: Value) {
    self.header = header;
  }

  pub fn content(&self) -> &str {
    &self.content
  }

  pub fn content_mut(&mut self) -> &mut String {
    &mut self.content
  }

  pub fn set_content(&mut self, content: impl Into<String>) {
    self.content = content.into();
  }
}

/// Split `---\n<header>---\n<content>` into header and content.
fn split_fences(text: &str) -> Option<(&str, &str)> {
  let rest = text
    .strip_prefix("---\n")
    .or_else(|| text.strip_prefix("---\r\n"))?;

  let mut offset = 0;
  for line in rest.split_inclusive('\n') {
    if line.trim_end_matches(['\r', '\n']) == ENTRY_FENCE {
      return Some((&rest[..offset], &rest[offset + line.len()..]));
    }
    offset += line.len();
  }
  None
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::header::HeaderExt;

  fn id(s: &str) -> StoreId {
    StoreId::new_baseless(s).unwrap()
  }

  #[test]
  fn new_entry_has_default_header_and_no_content() {
    let entry = Entry::new(id("test"));
    assert!(entry.verify().is_ok());
    assert_eq!(entry.content(), "");
    assert!(entry.header().read("pim.version").unwrap().is_some());
  }

  #[test]
  fn serialized_form_parses_back() {
    let mut entry = Entry::new(id("test"));
    entry.set_content("line one\n---\nline three\n");
    entry
      .header_mut()
      .set("note.title", Value::String("hello".into()))
      .unwrap();

    let text = entry.to_str().unwrap();
    assert!(text.starts_with("---\n"));

    let parsed = Entry::from_str(id("test"), &text).unwrap();
    assert_eq!(parsed, entry);
  }

  #[test]
  fn parses_handwritten_entry() {
    let text = "---\n[pim]\nversion = \"0.1.0\"\nlinks = [\"other\"]\n---\nbody";
    let entry = Entry::from_str(id("x"), text).unwrap();
    assert_eq!(entry.content(), "body");
    assert_eq!(
      entry.header().read("pim.links.[0]").unwrap(),
      Some(&Value::String("other".into()))
    );
  }

  #[test]
  fn closing_fence_without_trailing_newline() {
    let text = "---\n[pim]\nversion = \"0.1.0\"\n---";
    let entry = Entry::from_str(id("x"), text).unwrap();
    assert_eq!(entry.content(), "");
  }

  #[test]
  fn missing_fences_are_malformed() {
    for text in ["no header at all", "---\n[pim]\nversion = \"0.1.0\"\n"] {
      let err = Entry::from_str(id("x"), text).unwrap_err();
      assert!(matches!(err, StoreError::MalformedEntry { .. }), "{text:?}");
    }
  }

  #[test]
  fn invalid_toml_is_a_parse_error() {
    let err = Entry::from_str(id("x"), "---\n[pim\n---\n").unwrap_err();
    assert!(matches!(err, StoreError::HeaderParse { .. }));
  }

  #[test]
  fn header_without_pim_table_is_rejected() {
    let err = Entry::from_str(id("x"), "---\n[other]\nkey = 1\n---\n").unwrap_err();
    assert!(matches!(err, StoreError::HeaderInvalid { .. }));
  }
}
