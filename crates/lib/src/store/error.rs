use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::header::HeaderError;

#[derive(Debug, Error)]
pub enum StoreError {
  #[error("store id local part must be relative: {0}")]
  StoreIdLocalPartAbsolute(PathBuf),

  #[error("store id is empty")]
  EmptyStoreId,

  #[error("store id contains an invalid component: {0}")]
  InvalidStoreId(PathBuf),

  #[error("store id component starts with '.', which is reserved for store files: {0}")]
  HiddenStoreIdComponent(PathBuf),

  #[error("store id has no base: {0}")]
  StoreIdHasNoBase(PathBuf),

  #[error("store id is not valid UTF-8: {0}")]
  StoreIdHandlingError(PathBuf),

  #[error("path {path} is not inside the store at {store}")]
  StoreIdNotInStore { store: PathBuf, path: PathBuf },

  #[error("refusing to create missing store directory {0} (store.implicit_create is off)")]
  CreateStoreDirDenied(PathBuf),

  #[error("store path exists but is not a directory: {0}")]
  StorePathIsFile(PathBuf),

  #[error("entry already exists: {0}")]
  EntryAlreadyExists(String),

  #[error("entry is currently borrowed: {0}")]
  IdLocked(String),

  #[error("entry not found: {0}")]
  FileNotFound(String),

  #[error("malformed entry {location}: {reason}")]
  MalformedEntry { location: String, reason: String },

  #[error("failed to parse header of {location}: {source}")]
  HeaderParse {
    location: String,
    #[source]
    source: toml::de::Error,
  },

  #[error("failed to serialize header of {location}: {source}")]
  HeaderSerialize {
    location: String,
    #[source]
    source: toml::ser::Error,
  },

  #[error("invalid header in {location}: {reason}")]
  HeaderInvalid { location: String, reason: String },

  #[error(transparent)]
  Header(#[from] HeaderError),

  #[error("I/O error on {path}: {source}")]
  Io {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("store bookkeeping lock poisoned")]
  LockPoisoned,
}

impl StoreError {
  pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
    StoreError::Io {
      path: path.into(),
      source,
    }
  }
}
