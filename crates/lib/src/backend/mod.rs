//! Storage backends for the store.
//!
//! The store never touches the filesystem directly; it goes through a
//! [`FileAbstraction`]. [`FsFileAbstraction`] is the real thing,
//! [`InMemoryFileAbstraction`] keeps everything in a map and is what the
//! in-memory store handle and most tests use.

mod fs;
mod memory;

use std::fmt::Debug;
use std::path::{Path, PathBuf};

pub use fs::FsFileAbstraction;
pub use memory::InMemoryFileAbstraction;

use crate::store::StoreError;

pub trait FileAbstraction: Debug + Send + Sync {
  /// Read a whole file. A missing file is [`StoreError::FileNotFound`].
  fn read_to_string(&self, path: &Path) -> Result<String, StoreError>;

  /// Replace the contents of `path`, creating parent directories as needed.
  fn write(&self, path: &Path, content: &str) -> Result<(), StoreError>;

  fn exists(&self, path: &Path) -> bool;

  /// Whether `path` exists and is a directory.
  fn is_dir(&self, path: &Path) -> bool;

  fn remove(&self, path: &Path) -> Result<(), StoreError>;

  fn rename(&self, from: &Path, to: &Path) -> Result<(), StoreError>;

  fn create_dir_all(&self, path: &Path) -> Result<(), StoreError>;

  /// All regular, non-hidden files below `root`, sorted.
  fn list_files(&self, root: &Path) -> Result<Vec<PathBuf>, StoreError>;
}

/// Hidden files (lock file, in-flight temp files) are never entries.
pub(crate) fn is_hidden(path: &Path) -> bool {
  path
    .file_name()
    .and_then(|n| n.to_str())
    .is_some_and(|n| n.starts_with('.'))
}
