//! Entry headers.
//!
//! Every entry carries a TOML header. The store owns the `[pim]` table; other
//! tables belong to whoever writes them. Fields are addressed with dotted
//! paths such as `pim.version` or `pim.links.[0]`.

use std::fmt;

use thiserror::Error;
use toml::{Table, Value};

use crate::consts::{ENTRY_FORMAT_VERSION, HEADER_TABLE};

#[derive(Debug, Error, PartialEq)]
pub enum HeaderError {
  #[error("invalid header path: {0:?}")]
  InvalidPath(String),

  #[error("cannot descend into {segment} of {path}: parent is not a table or array")]
  TypeMismatch { path: String, segment: String },

  #[error("index {index} out of bounds in {path}")]
  IndexOutOfBounds { path: String, index: usize },

  #[error("invalid header assignment {0:?}, expected path=value")]
  InvalidAssignment(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
  Key(String),
  Index(usize),
}

impl fmt::Display for Segment {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Segment::Key(k) => write!(f, "{}", k),
      Segment::Index(i) => write!(f, "[{}]", i),
    }
  }
}

fn parse_path(path: &str) -> Result<Vec<Segment>, HeaderError> {
  if path.is_empty() {
    return Err(HeaderError::InvalidPath(path.to_string()));
  }

  path
    .split('.')
    .map(|part| {
      if part.is_empty() {
        return Err(HeaderError::InvalidPath(path.to_string()));
      }
      match part.strip_prefix('[').and_then(|rest| rest.strip_suffix(']')) {
        Some(index) => index
          .parse::<usize>()
          .map(Segment::Index)
          .map_err(|_| HeaderError::InvalidPath(path.to_string())),
        None if part.contains('[') || part.contains(']') => Err(HeaderError::InvalidPath(path.to_string())),
        None => Ok(Segment::Key(part.to_string())),
      }
    })
    .collect()
}

/// Missing intermediate for `set`: an array when indexed next, a table otherwise.
fn empty_container(next: &Segment) -> Value {
  match next {
    Segment::Index(_) => Value::Array(Vec::new()),
    Segment::Key(_) => Value::Table(Table::new()),
  }
}

fn mismatch(path: &str, segment: &Segment) -> HeaderError {
  HeaderError::TypeMismatch {
    path: path.to_string(),
    segment: segment.to_string(),
  }
}

/// Dotted-path access into a TOML value.
pub trait HeaderExt {
  /// Read the value at `path`. Missing keys and indexes yield `Ok(None)`.
  fn read(&self, path: &str) -> Result<Option<&Value>, HeaderError>;

  /// Set the value at `path`, creating intermediate tables and arrays. Returns the old value.
  ///
  /// An array index may point one past the end, which appends.
  fn set(&mut self, path: &str, value: Value) -> Result<Option<Value>, HeaderError>;

  /// Remove the value at `path` and return it.
  fn delete(&mut self, path: &str) -> Result<Option<Value>, HeaderError>;
}

impl HeaderExt for Value {
  fn read(&self, path: &str) -> Result<Option<&Value>, HeaderError> {
    let segments = parse_path(path)?;
    let mut current = self;

    for segment in &segments {
      let next = match (segment, current) {
        (Segment::Key(key), Value::Table(table)) => table.get(key),
        (Segment::Index(index), Value::Array(array)) => array.get(*index),
        _ => return Err(mismatch(path, segment)),
      };
      match next {
        Some(value) => current = value,
        None => return Ok(None),
      }
    }

    Ok(Some(current))
  }

  fn set(&mut self, path: &str, value: Value) -> Result<Option<Value>, HeaderError> {
    let segments = parse_path(path)?;
    let (last, parents) = segments
      .split_last()
      .ok_or_else(|| HeaderError::InvalidPath(path.to_string()))?;

    let mut current = self;
    for (i, segment) in parents.iter().enumerate() {
      current = match (segment, current) {
        (Segment::Key(key), Value::Table(table)) => table
          .entry(key.clone())
          .or_insert_with(|| empty_container(&segments[i + 1])),
        (Segment::Index(index), Value::Array(array)) => {
          array.get_mut(*index).ok_or_else(|| HeaderError::IndexOutOfBounds {
            path: path.to_string(),
            index: *index,
          })?
        }
        _ => return Err(mismatch(path, segment)),
      };
    }

    match (last, current) {
      (Segment::Key(key), Value::Table(table)) => Ok(table.insert(key.clone(), value)),
      (Segment::Index(index), Value::Array(array)) => {
        if *index < array.len() {
          Ok(Some(std::mem::replace(&mut array[*index], value)))
        } else if *index == array.len() {
          array.push(value);
          Ok(None)
        } else {
          Err(HeaderError::IndexOutOfBounds {
            path: path.to_string(),
            index: *index,
          })
        }
      }
      _ => Err(mismatch(path, last)),
    }
  }

  fn delete(&mut self, path: &str) -> Result<Option<Value>, HeaderError> {
    let segments = parse_path(path)?;
    let (last, parents) = segments
      .split_last()
      .ok_or_else(|| HeaderError::InvalidPath(path.to_string()))?;

    let mut current = self;
    for segment in parents {
      let next = match (segment, current) {
        (Segment::Key(key), Value::Table(table)) => table.get_mut(key),
        (Segment::Index(index), Value::Array(array)) => array.get_mut(*index),
        _ => return Err(mismatch(path, segment)),
      };
      match next {
        Some(value) => current = value,
        None => return Ok(None),
      }
    }

    match (last, current) {
      (Segment::Key(key), Value::Table(table)) => Ok(table.remove(key)),
      (Segment::Index(index), Value::Array(array)) if *index < array.len() => Ok(Some(array.remove(*index))),
      (Segment::Index(_), Value::Array(_)) => Ok(None),
      _ => Err(mismatch(path, last)),
    }
  }
}

/// Parse a `path=value` assignment as given on the command line.
///
/// Both sides are trimmed. Values are typed in order: boolean, integer,
/// float, string.
pub fn parse_assignment(input: &str) -> Result<(String, Value), HeaderError> {
  let (path, raw) = input
    .split_once('=')
    .ok_or_else(|| HeaderError::InvalidAssignment(input.to_string()))?;
  let path = path.trim();
  parse_path(path)?;

  Ok((path.to_string(), infer_value(raw.trim())))
}

fn infer_value(raw: &str) -> Value {
  match raw {
    "true" => return Value::Boolean(true),
    "false" => return Value::Boolean(false),
    _ => {}
  }
  if let Ok(i) = raw.parse::<i64>() {
    return Value::Integer(i);
  }
  if raw.chars().any(|c| c.is_ascii_digit())
    && let Ok(f) = raw.parse::<f64>()
  {
    return Value::Float(f);
  }
  Value::String(raw.to_string())
}

/// Header of a freshly created entry.
pub fn default_header() -> Value {
  let mut pim = Table::new();
  pim.insert("version".to_string(), Value::String(ENTRY_FORMAT_VERSION.to_string()));
  pim.insert("links".to_string(), Value::Array(Vec::new()));

  let mut root = Table::new();
  root.insert(HEADER_TABLE.to_string(), Value::Table(pim));
  Value::Table(root)
}

/// Check the store-owned part of a header. Returns a reason on failure.
pub fn verify_header(header: &Value) -> Result<(), String> {
  let table = header.as_table().ok_or("header is not a table")?;
  let pim = table
    .get(HEADER_TABLE)
    .ok_or_else(|| format!("missing [{}] table", HEADER_TABLE))?
    .as_table()
    .ok_or_else(|| format!("[{}] is not a table", HEADER_TABLE))?;

  let version = pim
    .get("version")
    .and_then(Value::as_str)
    .ok_or_else(|| format!("{}.version is missing or not a string", HEADER_TABLE))?;
  semver::Version::parse(version).map_err(|e| format!("{}.version {:?} is not a version: {}", HEADER_TABLE, version, e))?;

  if let Some(links) = pim.get("links") {
    let links = links
      .as_array()
      .ok_or_else(|| format!("{}.links is not an array", HEADER_TABLE))?;
    if !links.iter().all(Value::is_str) {
      return Err(format!("{}.links must only contain strings", HEADER_TABLE));
    }
  }

  Ok(())
}
