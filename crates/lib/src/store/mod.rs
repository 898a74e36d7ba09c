//! The entry store.
//!
//! A store is a directory of entries addressed by [`StoreId`]. Entries are
//! handed out as [`FileLockEntry`] guards; while a guard is alive its id is
//! locked against other borrows, and dropping the guard writes the entry back.
//!
//! # Layout
//!
//! ```text
//! <store>/
//! ├── .pim.lock               # advisory lock (see store_lock)
//! ├── <id>                    # one file per entry, id = relative path
//! └── <collection>/<id>
//! ```

mod entry;
mod error;
mod id;

use std::collections::HashMap;
use std::fmt;
use std::ops::{Deref, DerefMut};
use std::path::{Path, PathBuf};
use std::sync::{RwLock, RwLockWriteGuard};

use tracing::{debug, error};

pub use entry::Entry;
pub use error::StoreError;
pub use id::StoreId;

use crate::backend::{FileAbstraction, FsFileAbstraction, InMemoryFileAbstraction};
use crate::config::StoreConfig;

/// Bookkeeping for ids this handle has touched. Only `Borrowed` is
/// authoritative; whether an entry exists is always asked of the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EntryStatus {
  /// Touched by this handle, nobody holds it.
  Present,
  /// A `FileLockEntry` for this id is alive.
  Borrowed,
}

#[derive(Debug)]
pub struct Store {
  location: PathBuf,
  config: StoreConfig,
  backend: Box<dyn FileAbstraction>,
  /// Keyed by the baseless id.
  entries: RwLock<HashMap<StoreId, EntryStatus>>,
}

impl Store {
  /// Open a store on the filesystem.
  pub fn new(location: impl Into<PathBuf>, config: StoreConfig) -> Result<Self, StoreError> {
    Self::with_backend(location, config, Box::new(FsFileAbstraction))
  }

  /// Open a store whose entries only live in memory.
  pub fn new_in_memory(location: impl Into<PathBuf>, config: StoreConfig) -> Result<Self, StoreError> {
    Self::with_backend(location, config, Box::new(InMemoryFileAbstraction::new()))
  }

  /// Open a store with the default configuration, in memory or on disk.
  pub fn open(in_memory: bool, location: impl Into<PathBuf>) -> Result<Self, StoreError> {
    if in_memory {
      Self::new_in_memory(location, StoreConfig::default())
    } else {
      Self::new(location, StoreConfig::default())
    }
  }

  pub fn with_backend(
    location: impl Into<PathBuf>,
    config: StoreConfig,
    backend: Box<dyn FileAbstraction>,
  ) -> Result<Self, StoreError> {
    let location = location.into();

    if backend.exists(&location) {
      if !backend.is_dir(&location) {
        return Err(StoreError::StorePathIsFile(location));
      }
    } else {
      if !config.implicit_create {
        return Err(StoreError::CreateStoreDirDenied(location));
      }
      debug!(store = %location.display(), "creating store directory");
      backend.create_dir_all(&location)?;
    }

    debug!(store = %location.display(), "store opened");
    Ok(Store {
      location,
      config,
      backend,
      entries: RwLock::new(HashMap::new()),
    })
  }

  pub fn path(&self) -> &Path {
    &self.location
  }

  pub fn config(&self) -> &StoreConfig {
    &self.config
  }

  /// Create a new entry. Fails if the id already exists.
  pub fn create(&self, id: StoreId) -> Result<FileLockEntry<'_>, StoreError> {
    let id = self.rebase(id);
    let key = id.clone().without_base();

    let mut entries = self.entries_mut()?;
    if is_borrowed(&entries, &key) || self.backend.exists(&self.entry_path(&id)) {
      return Err(StoreError::EntryAlreadyExists(key.to_string()));
    }
    entries.insert(key, EntryStatus::Borrowed);

    debug!(id = %id, "created entry");
    Ok(FileLockEntry::new(self, Entry::new(id)))
  }

  /// Borrow an entry, creating it if it does not exist yet.
  pub fn retrieve(&self, id: StoreId) -> Result<FileLockEntry<'_>, StoreError> {
    let id = self.rebase(id);
    let key = id.clone().without_base();
    self
      .borrow(id, true)?
      .ok_or_else(|| StoreError::FileNotFound(key.to_string()))
  }

  /// Borrow an existing entry. Returns `None` if the backend has no file for it.
  pub fn get(&self, id: StoreId) -> Result<Option<FileLockEntry<'_>>, StoreError> {
    self.borrow(self.rebase(id), false)
  }

  /// Write the entry now without giving up the borrow.
  pub fn update(&self, entry: &mut FileLockEntry<'_>) -> Result<(), StoreError> {
    debug!(id = %entry.location(), "updating entry");
    self.write_entry(&entry.entry)
  }

  /// Remove an entry from the store.
  pub fn delete(&self, id: StoreId) -> Result<(), StoreError> {
    let id = self.rebase(id);
    let key = id.clone().without_base();

    let mut entries = self.entries_mut()?;
    if is_borrowed(&entries, &key) {
      return Err(StoreError::IdLocked(key.to_string()));
    }

    let path = self.entry_path(&id);
    if !self.backend.exists(&path) {
      entries.remove(&key);
      return Err(StoreError::FileNotFound(key.to_string()));
    }

    self.backend.remove(&path)?;
    entries.remove(&key);
    debug!(id = %id, "deleted entry");
    Ok(())
  }

  /// Rename an entry. Neither id may be borrowed and the target must not exist.
  pub fn move_by_id(&self, old: StoreId, new: StoreId) -> Result<(), StoreError> {
    let old = self.rebase(old);
    let new = self.rebase(new);
    let old_key = old.clone().without_base();
    let new_key = new.clone().without_base();

    let mut entries = self.entries_mut()?;
    if is_borrowed(&entries, &old_key) {
      return Err(StoreError::IdLocked(old_key.to_string()));
    }
    if is_borrowed(&entries, &new_key) || self.backend.exists(&self.entry_path(&new)) {
      return Err(StoreError::EntryAlreadyExists(new_key.to_string()));
    }

    let old_path = self.entry_path(&old);
    if !self.backend.exists(&old_path) {
      return Err(StoreError::FileNotFound(old_key.to_string()));
    }

    self.backend.rename(&old_path, &self.entry_path(&new))?;
    entries.remove(&old_key);
    entries.insert(new_key, EntryStatus::Present);
    debug!(from = %old, to = %new, "moved entry");
    Ok(())
  }

  /// Write a copy of a borrowed entry under another id.
  ///
  /// The original keeps its borrow; the copy is not borrowed.
  pub fn save_as(&self, entry: &FileLockEntry<'_>, new_id: StoreId) -> Result<(), StoreError> {
    let new_id = self.rebase(new_id);
    let new_key = new_id.clone().without_base();

    let mut entries = self.entries_mut()?;
    if is_borrowed(&entries, &new_key) || self.backend.exists(&self.entry_path(&new_id)) {
      return Err(StoreError::EntryAlreadyExists(new_key.to_string()));
    }

    let mut copy = entry.entry.clone();
    copy.set_location(new_id);
    self.write_entry(&copy)?;
    entries.insert(new_key, EntryStatus::Present);

    debug!(from = %entry.location(), to = %copy.location(), "saved entry copy");
    Ok(())
  }

  /// Whether the entry is borrowed right now or present in the backend.
  pub fn exists(&self, id: &StoreId) -> Result<bool, StoreError> {
    let id = self.rebase(id.clone());
    let entries = self.entries.read().map_err(|_| StoreError::LockPoisoned)?;
    Ok(is_borrowed(&entries, &id.clone().without_base()) || self.backend.exists(&self.entry_path(&id)))
  }

  /// All entries in the backend, sorted.
  pub fn entries(&self) -> Result<Vec<StoreId>, StoreError> {
    self
      .backend
      .list_files(&self.location)?
      .iter()
      .map(|path| StoreId::from_full_path(&self.location, path))
      .collect()
  }

  /// Entries whose id starts with `collection`.
  pub fn retrieve_for_module(&self, collection: &str) -> Result<Vec<StoreId>, StoreError> {
    Ok(
      self
        .entries()?
        .into_iter()
        .filter(|id| id.is_in_collection(&[collection]))
        .collect(),
    )
  }

  /// Lock `id` and load it. A missing file yields a fresh entry when
  /// `create_missing` is set and `None` otherwise.
  fn borrow(&self, id: StoreId, create_missing: bool) -> Result<Option<FileLockEntry<'_>>, StoreError> {
    let key = id.clone().without_base();

    let mut entries = self.entries_mut()?;
    if is_borrowed(&entries, &key) {
      return Err(StoreError::IdLocked(key.to_string()));
    }

    let path = self.entry_path(&id);
    let entry = if self.backend.exists(&path) {
      let text = self.backend.read_to_string(&path)?;
      Entry::from_str(id, &text)?
    } else if create_missing {
      debug!(id = %id, "entry absent, creating on retrieve");
      Entry::new(id)
    } else {
      entries.remove(&key);
      debug!(id = %id, "get: no such entry");
      return Ok(None);
    };
    entries.insert(key, EntryStatus::Borrowed);

    debug!(id = %entry.location(), "retrieved entry");
    Ok(Some(FileLockEntry::new(self, entry)))
  }

  fn rebase(&self, id: StoreId) -> StoreId {
    id.with_base(&self.location)
  }

  fn entry_path(&self, id: &StoreId) -> PathBuf {
    self.location.join(id.local())
  }

  fn entries_mut(&self) -> Result<RwLockWriteGuard<'_, HashMap<StoreId, EntryStatus>>, StoreError> {
    self.entries.write().map_err(|_| StoreError::LockPoisoned)
  }

  fn write_entry(&self, entry: &Entry) -> Result<(), StoreError> {
    entry.verify()?;
    let text = entry.to_str()?;
    self.backend.write(&self.entry_path(entry.location()), &text)
  }

  /// Write back and unlock. Called when a guard goes away.
  fn release(&self, entry: &Entry) -> Result<(), StoreError> {
    let result = self.write_entry(entry);
    let key = entry.location().clone().without_base();

    let mut entries = self.entries_mut()?;
    if result.is_ok() || self.backend.exists(&self.entry_path(entry.location())) {
      entries.insert(key, EntryStatus::Present);
    } else {
      entries.remove(&key);
    }
    result
  }
}

fn is_borrowed(entries: &HashMap<StoreId, EntryStatus>, key: &StoreId) -> bool {
  entries.get(key) == Some(&EntryStatus::Borrowed)
}

/// A borrowed entry. Derefs to [`Entry`]; written back to the store on drop.
pub struct FileLockEntry<'a> {
  store: &'a Store,
  entry: Entry,
}

impl<'a> FileLockEntry<'a> {
  fn new(store: &'a Store, entry: Entry) -> Self {
    FileLockEntry { store, entry }
  }
}

impl Deref for FileLockEntry<'_> {
  type Target = Entry;

  fn deref(&self) -> &Entry {
    &self.entry
  }
}

impl DerefMut for FileLockEntry<'_> {
  fn deref_mut(&mut self) -> &mut Entry {
    &mut self.entry
  }
}

impl fmt::Debug for FileLockEntry<'_> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("FileLockEntry")
      .field("store", &self.store.location)
      .field("entry", &self.entry)
      .finish()
  }
}

impl Drop for FileLockEntry<'_> {
  fn drop(&mut self) {
    if let Err(e) = self.store.release(&self.entry) {
      error!(id = %self.entry.location(), error = %e, "failed to write entry back to the store");
    }
  }
}
