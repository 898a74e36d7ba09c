use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use super::FileAbstraction;
use crate::store::StoreError;

/// Backend that keeps every file in memory.
///
/// Directories are tracked separately so `is_dir` behaves like the
/// filesystem for the store root.
#[derive(Debug, Default)]
pub struct InMemoryFileAbstraction {
  files: Mutex<BTreeMap<PathBuf, String>>,
  dirs: Mutex<BTreeSet<PathBuf>>,
}

impl InMemoryFileAbstraction {
  pub fn new() -> Self {
    Self::default()
  }

  fn files(&self) -> Result<MutexGuard<'_, BTreeMap<PathBuf, String>>, StoreError> {
    self.files.lock().map_err(|_| StoreError::LockPoisoned)
  }

  fn dirs(&self) -> Result<MutexGuard<'_, BTreeSet<PathBuf>>, StoreError> {
    self.dirs.lock().map_err(|_| StoreError::LockPoisoned)
  }

  fn add_parents(&self, path: &Path) -> Result<(), StoreError> {
    let mut dirs = self.dirs()?;
    for ancestor in path.ancestors().skip(1) {
      if ancestor.as_os_str().is_empty() {
        break;
      }
      dirs.insert(ancestor.to_path_buf());
    }
    Ok(())
  }
}

fn not_found(path: &Path) -> StoreError {
  StoreError::FileNotFound(path.display().to_string())
}

impl FileAbstraction for InMemoryFileAbstraction {
  fn read_to_string(&self, path: &Path) -> Result<String, StoreError> {
    self.files()?.get(path).cloned().ok_or_else(|| not_found(path))
  }

  fn write(&self, path: &Path, content: &str) -> Result<(), StoreError> {
    self.add_parents(path)?;
    self.files()?.insert(path.to_path_buf(), content.to_string());
    Ok(())
  }

  fn exists(&self, path: &Path) -> bool {
    let is_file = self.files.lock().map(|f| f.contains_key(path)).unwrap_or(false);
    is_file || self.is_dir(path)
  }

  fn is_dir(&self, path: &Path) -> bool {
    self.dirs.lock().map(|d| d.contains(path)).unwrap_or(false)
  }

  fn remove(&self, path: &Path) -> Result<(), StoreError> {
    self.files()?.remove(path).map(|_| ()).ok_or_else(|| not_found(path))
  }

  fn rename(&self, from: &Path, to: &Path) -> Result<(), StoreError> {
    let content = self.files()?.remove(from).ok_or_else(|| not_found(from))?;
    self.add_parents(to)?;
    self.files()?.insert(to.to_path_buf(), content);
    Ok(())
  }

  fn create_dir_all(&self, path: &Path) -> Result<(), StoreError> {
    self.add_parents(path)?;
    self.dirs()?.insert(path.to_path_buf());
    Ok(())
  }

  fn list_files(&self, root: &Path) -> Result<Vec<PathBuf>, StoreError> {
    let files = self.files()?;
    Ok(
      files
        .keys()
        .filter(|path| {
          path.strip_prefix(root).is_ok_and(|rel| {
            rel
              .components()
              .all(|c| !c.as_os_str().to_string_lossy().starts_with('.'))
          })
        })
        .cloned()
        .collect(),
    )
  }
}
