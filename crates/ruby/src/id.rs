use std::path::PathBuf;

use magnus::prelude::*;
use magnus::{Error, RModule, Ruby, function, method};
use pimstore_lib::StoreId;

use crate::errors::runtime_error;

/// `Pim::StoreId`
#[magnus::wrap(class = "Pim::StoreId", free_immediately, size)]
#[derive(Debug, Clone)]
pub struct RStoreId(StoreId);

impl RStoreId {
  pub fn inner(&self) -> &StoreId {
    &self.0
  }

  fn new(ruby: &Ruby, base: Option<String>, id: String) -> Result<Self, Error> {
    StoreId::new(base.map(PathBuf::from), PathBuf::from(id))
      .map(RStoreId)
      .map_err(|e| runtime_error(ruby, e))
  }

  fn new_baseless(ruby: &Ruby, id: String) -> Result<Self, Error> {
    StoreId::new_baseless(id).map(RStoreId).map_err(|e| runtime_error(ruby, e))
  }

  fn to_str(ruby: &Ruby, rb_self: &Self) -> Result<String, Error> {
    rb_self.0.to_str().map_err(|e| runtime_error(ruby, e))
  }

  fn local(&self) -> String {
    self.0.local().to_string_lossy().into_owned()
  }

  fn with_base(&self, base: String) -> Self {
    RStoreId(self.0.clone().with_base(base))
  }

  fn has_base(&self) -> bool {
    self.0.has_base()
  }

  fn inspect(&self) -> String {
    format!("#<Pim::StoreId {}>", self.0)
  }
}

impl From<StoreId> for RStoreId {
  fn from(id: StoreId) -> Self {
    RStoreId(id)
  }
}

pub fn define_store_id_class(ruby: &Ruby, module: &RModule) -> Result<(), Error> {
  let class = module.define_class("StoreId", ruby.class_object())?;

  class.define_singleton_method("new", function!(RStoreId::new, 2))?;
  class.define_singleton_method("new_baseless", function!(RStoreId::new_baseless, 1))?;

  class.define_method("to_str", method!(RStoreId::to_str, 0))?;
  class.define_method("to_s", method!(RStoreId::to_str, 0))?;
  class.define_method("local", method!(RStoreId::local, 0))?;
  class.define_method("with_base", method!(RStoreId::with_base, 1))?;
  class.define_method("has_base?", method!(RStoreId::has_base, 0))?;
  class.define_method("inspect", method!(RStoreId::inspect, 0))?;

  Ok(())
}
