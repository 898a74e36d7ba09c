//! Store identifiers.
//!
//! A [`StoreId`] is a relative path naming an entry, optionally anchored to a
//! store directory (its *base*). Ids handed in by callers are usually baseless;
//! the store rebases them onto its own location before touching disk.

use std::fmt;
use std::path::{Component, Path, PathBuf};
use std::str::FromStr;

use super::error::StoreError;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StoreId {
  base: Option<PathBuf>,
  id: PathBuf,
}

impl StoreId {
  /// Build an id from an optional base and a relative local part.
  ///
  /// The local part is normalized: `.` components are dropped, while absolute
  /// paths, `..`, empty ids and components starting with `.` are rejected.
  /// Dot-names belong to the store itself (lock file, in-flight writes).
  pub fn new(base: Option<PathBuf>, id: PathBuf) -> Result<Self, StoreError> {
    let id = normalize_local(id)?;
    Ok(StoreId { base, id })
  }

  pub fn new_baseless(id: impl Into<PathBuf>) -> Result<Self, StoreError> {
    Self::new(None, id.into())
  }

  /// Turn a full path below `store` back into an id based at `store`.
  pub fn from_full_path(store: &Path, full: &Path) -> Result<Self, StoreError> {
    let local = full.strip_prefix(store).map_err(|_| StoreError::StoreIdNotInStore {
      store: store.to_path_buf(),
      path: full.to_path_buf(),
    })?;
    Self::new(Some(store.to_path_buf()), local.to_path_buf())
  }

  pub fn with_base(mut self, base: impl Into<PathBuf>) -> Self {
    self.base = Some(base.into());
    self
  }

  pub fn without_base(mut self) -> Self {
    self.base = None;
    self
  }

  pub fn base(&self) -> Option<&Path> {
    self.base.as_deref()
  }

  pub fn local(&self) -> &Path {
    &self.id
  }

  pub fn has_base(&self) -> bool {
    self.base.is_some()
  }

  /// Full filesystem path of the entry. Requires a base.
  pub fn into_pathbuf(self) -> Result<PathBuf, StoreError> {
    match self.base {
      Some(base) => Ok(base.join(self.id)),
      None => Err(StoreError::StoreIdHasNoBase(self.id)),
    }
  }

  /// Render the id as a string: `base/id` when based, `id` otherwise.
  pub fn to_str(&self) -> Result<String, StoreError> {
    let path = self.joined();
    match path.to_str() {
      Some(s) => Ok(s.to_string()),
      None => Err(StoreError::StoreIdHandlingError(path)),
    }
  }

  /// Whether the local part starts with the given collection components.
  pub fn is_in_collection(&self, colls: &[&str]) -> bool {
    let components: Vec<_> = self.id.components().collect();
    components.len() > colls.len()
      && components
        .iter()
        .zip(colls)
        .all(|(c, want)| c.as_os_str() == std::ffi::OsStr::new(want))
  }

  /// First component of the local part.
  pub fn collection(&self) -> Option<&str> {
    self.id.components().next().and_then(|c| c.as_os_str().to_str())
  }

  fn joined(&self) -> PathBuf {
    match &self.base {
      Some(base) => base.join(&self.id),
      None => self.id.clone(),
    }
  }
}

fn normalize_local(id: PathBuf) -> Result<PathBuf, StoreError> {
  if id.is_absolute() {
    return Err(StoreError::StoreIdLocalPartAbsolute(id));
  }

  let mut normalized = PathBuf::new();
  for component in id.components() {
    match component {
      Component::Normal(part) if part.as_encoded_bytes().starts_with(b".") => {
        return Err(StoreError::HiddenStoreIdComponent(id));
      }
      Component::Normal(part) => normalized.push(part),
      Component::CurDir => {}
      Component::ParentDir => return Err(StoreError::InvalidStoreId(id)),
      Component::RootDir | Component::Prefix(_) => return Err(StoreError::StoreIdLocalPartAbsolute(id)),
    }
  }

  if normalized.as_os_str().is_empty() {
    return Err(StoreError::EmptyStoreId);
  }

  Ok(normalized)
}

impl fmt::Display for StoreId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.joined().display())
  }
}

impl FromStr for StoreId {
  type Err = StoreError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    StoreId::new_baseless(s)
  }
}
