use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::trace;
use walkdir::WalkDir;

use super::{FileAbstraction, is_hidden};
use crate::store::StoreError;

/// Backend over the local filesystem.
///
/// Writes go to a hidden temp file next to the target and are renamed into
/// place, so a crash never leaves a half-written entry behind.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsFileAbstraction;

fn not_found_or_io(path: &Path, e: io::Error) -> StoreError {
  if e.kind() == io::ErrorKind::NotFound {
    StoreError::FileNotFound(path.display().to_string())
  } else {
    StoreError::io(path, e)
  }
}

fn temp_path_for(path: &Path) -> PathBuf {
  let name = path
    .file_name()
    .map(|n| n.to_string_lossy().into_owned())
    .unwrap_or_default();
  path.with_file_name(format!(".{}.tmp", name))
}

impl FileAbstraction for FsFileAbstraction {
  fn read_to_string(&self, path: &Path) -> Result<String, StoreError> {
    fs::read_to_string(path).map_err(|e| not_found_or_io(path, e))
  }

  fn write(&self, path: &Path, content: &str) -> Result<(), StoreError> {
    if let Some(parent) = path.parent() {
      fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;
    }

    let temp_path = temp_path_for(path);
    trace!(path = %path.display(), "writing file");
    fs::write(&temp_path, content).map_err(|e| StoreError::io(&temp_path, e))?;
    fs::rename(&temp_path, path).map_err(|e| StoreError::io(path, e))
  }

  fn exists(&self, path: &Path) -> bool {
    path.exists()
  }

  fn is_dir(&self, path: &Path) -> bool {
    path.is_dir()
  }

  fn remove(&self, path: &Path) -> Result<(), StoreError> {
    fs::remove_file(path).map_err(|e| not_found_or_io(path, e))
  }

  fn rename(&self, from: &Path, to: &Path) -> Result<(), StoreError> {
    if !from.exists() {
      return Err(StoreError::FileNotFound(from.display().to_string()));
    }
    if let Some(parent) = to.parent() {
      fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;
    }
    fs::rename(from, to).map_err(|e| StoreError::io(from, e))
  }

  fn create_dir_all(&self, path: &Path) -> Result<(), StoreError> {
    fs::create_dir_all(path).map_err(|e| StoreError::io(path, e))
  }

  fn list_files(&self, root: &Path) -> Result<Vec<PathBuf>, StoreError> {
    if !root.is_dir() {
      return Ok(Vec::new());
    }

    let mut files = Vec::new();
    // The root itself may be hidden (e.g. ~/.pimstore/store); only prune below it.
    let walker = WalkDir::new(root)
      .sort_by_file_name()
      .into_iter()
      .filter_entry(|e| e.depth() == 0 || !is_hidden(e.path()));

    for entry in walker {
      let entry = entry.map_err(|e| StoreError::io(root, e.into()))?;
      if entry.file_type().is_file() {
        files.push(entry.into_path());
      }
    }

    files.sort();
    Ok(files)
  }
}
