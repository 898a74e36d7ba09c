use std::sync::Arc;

use magnus::prelude::*;
use magnus::{Error, RArray, RModule, Ruby, function, method};
use pimstore_lib::Store;
use tracing::debug;

use crate::entry::REntry;
use crate::errors::runtime_error;
use crate::id::RStoreId;

/// `Pim::StoreHandle`
#[magnus::wrap(class = "Pim::StoreHandle", free_immediately, size)]
pub struct RStoreHandle {
  store: Arc<Store>,
}

impl RStoreHandle {
  /// `Pim::StoreHandle.new(in_memory, path)`
  fn new(ruby: &Ruby, in_memory: bool, path: String) -> Result<Self, Error> {
    let store = Store::open(in_memory, path).map_err(|e| runtime_error(ruby, e))?;
    debug!(store = %store.path().display(), in_memory, "store handle opened");
    Ok(RStoreHandle { store: Arc::new(store) })
  }

  fn create(ruby: &Ruby, rb_self: &Self, id: &RStoreId) -> Result<REntry, Error> {
    let borrowed = rb_self
      .store
      .create(id.inner().clone())
      .map_err(|e| runtime_error(ruby, e))?;
    REntry::detach(&rb_self.store, borrowed).map_err(|e| runtime_error(ruby, e))
  }

  fn retrieve(ruby: &Ruby, rb_self: &Self, id: &RStoreId) -> Result<REntry, Error> {
    let borrowed = rb_self
      .store
      .retrieve(id.inner().clone())
      .map_err(|e| runtime_error(ruby, e))?;
    REntry::detach(&rb_self.store, borrowed).map_err(|e| runtime_error(ruby, e))
  }

  fn get(ruby: &Ruby, rb_self: &Self, id: &RStoreId) -> Result<Option<REntry>, Error> {
    match rb_self.store.get(id.inner().clone()) {
      Ok(Some(borrowed)) => REntry::detach(&rb_self.store, borrowed)
        .map(Some)
        .map_err(|e| runtime_error(ruby, e)),
      Ok(None) => Ok(None),
      Err(e) => Err(runtime_error(ruby, e)),
    }
  }

  fn delete(ruby: &Ruby, rb_self: &Self, id: &RStoreId) -> Result<(), Error> {
    rb_self
      .store
      .delete(id.inner().clone())
      .map_err(|e| runtime_error(ruby, e))
  }

  fn exists(ruby: &Ruby, rb_self: &Self, id: &RStoreId) -> Result<bool, Error> {
    rb_self.store.exists(id.inner()).map_err(|e| runtime_error(ruby, e))
  }

  fn entries(ruby: &Ruby, rb_self: &Self) -> Result<RArray, Error> {
    let ids = rb_self.store.entries().map_err(|e| runtime_error(ruby, e))?;
    let array = ruby.ary_new_capa(ids.len());
    for id in ids {
      array.push(RStoreId::from(id))?;
    }
    Ok(array)
  }

  fn path(&self) -> String {
    self.store.path().to_string_lossy().into_owned()
  }
}

pub fn define_store_handle_class(ruby: &Ruby, module: &RModule) -> Result<(), Error> {
  let class = module.define_class("StoreHandle", ruby.class_object())?;

  class.define_singleton_method("new", function!(RStoreHandle::new, 2))?;

  class.define_method("create", method!(RStoreHandle::create, 1))?;
  class.define_method("retrieve", method!(RStoreHandle::retrieve, 1))?;
  class.define_method("get", method!(RStoreHandle::get, 1))?;
  class.define_method("delete", method!(RStoreHandle::delete, 1))?;
  class.define_method("exists?", method!(RStoreHandle::exists, 1))?;
  class.define_method("entries", method!(RStoreHandle::entries, 0))?;
  class.define_method("path", method!(RStoreHandle::path, 0))?;

  Ok(())
}
