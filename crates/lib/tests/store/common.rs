//! Shared helpers for library integration tests.

use std::path::PathBuf;

use pimstore_lib::Store;
use tempfile::TempDir;

/// A store on disk in its own temp directory.
pub struct TestStore {
  pub temp: TempDir,
  pub store: Store,
}

impl TestStore {
  pub fn new() -> Self {
    let temp = TempDir::new().unwrap();
    let store = Store::open(false, temp.path().join("store")).unwrap();
    Self { temp, store }
  }

  pub fn path(&self) -> PathBuf {
    self.temp.path().join("store")
  }

  /// Open a second handle on the same directory.
  pub fn reopen(&self) -> Store {
    Store::open(false, self.path()).unwrap()
  }
}
