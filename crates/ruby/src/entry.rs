//! `Pim::Entry`: a snapshot of an entry plus the store it came from.
//!
//! Ruby objects cannot hold a `FileLockEntry` borrow, so every write
//! borrows the entry for the duration of the call and refreshes the snapshot.

use std::cell::RefCell;
use std::sync::Arc;

use magnus::prelude::*;
use magnus::{Error, RModule, Ruby, method};
use pimstore_lib::{Entry, FileLockEntry, Store, StoreError};

use crate::errors::runtime_error;
use crate::id::RStoreId;

#[magnus::wrap(class = "Pim::Entry", free_immediately, size)]
pub struct REntry {
  store: Arc<Store>,
  entry: RefCell<Entry>,
}

impl REntry {
  /// Write the borrowed entry, release the borrow and keep a copy.
  pub fn detach(store: &Arc<Store>, mut borrowed: FileLockEntry<'_>) -> Result<Self, StoreError> {
    store.update(&mut borrowed)?;
    let entry = Entry::clone(&borrowed);
    drop(borrowed);
    Ok(REntry {
      store: Arc::clone(store),
      entry: RefCell::new(entry),
    })
  }

  fn location(&self) -> RStoreId {
    RStoreId::from(self.entry.borrow().location().clone())
  }

  fn content(&self) -> String {
    self.entry.borrow().content().to_string()
  }

  fn set_content(ruby: &Ruby, rb_self: &Self, content: String) -> Result<(), Error> {
    rb_self
      .modify(|entry| entry.set_content(content))
      .map_err(|e| runtime_error(ruby, e))
  }

  fn header_json(ruby: &Ruby, rb_self: &Self) -> Result<String, Error> {
    serde_json::to_string(rb_self.entry.borrow().header()).map_err(|e| runtime_error(ruby, e))
  }

  fn to_str(ruby: &Ruby, rb_self: &Self) -> Result<String, Error> {
    rb_self.entry.borrow().to_str().map_err(|e| runtime_error(ruby, e))
  }

  fn modify(&self, f: impl FnOnce(&mut Entry)) -> Result<(), StoreError> {
    let id = self.entry.borrow().location().clone();
    let mut borrowed = self.store.retrieve(id)?;
    f(&mut borrowed);
    self.store.update(&mut borrowed)?;
    *self.entry.borrow_mut() = Entry::clone(&borrowed);
    Ok(())
  }
}

pub fn define_entry_class(ruby: &Ruby, module: &RModule) -> Result<(), Error> {
  let class = module.define_class("Entry", ruby.class_object())?;
  // Entries only come from a StoreHandle.
  class.undef_default_alloc_func();

  class.define_method("location", method!(REntry::location, 0))?;
  class.define_method("content", method!(REntry::content, 0))?;
  class.define_method("content=", method!(REntry::set_content, 1))?;
  class.define_method("header_json", method!(REntry::header_json, 0))?;
  class.define_method("to_str", method!(REntry::to_str, 0))?;

  Ok(())
}
