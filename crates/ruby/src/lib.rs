//! Ruby bindings for the pim store.
//!
//! # Example
//!
//! ```ruby
//! require "pimstore"
//!
//! Pim.init_logger(false, true, true)
//!
//! store = Pim::StoreHandle.new(false, "/tmp/store")
//! entry = store.create(Pim::StoreId.new_baseless("test"))
//! Pim.info "Created #{entry.location.to_str} from Ruby"
//! ```

use magnus::{Error, Ruby};

mod entry;
mod errors;
mod id;
mod logger;
mod store;

/// Called by Ruby when the extension is loaded.
#[magnus::init(name = "pimstore")]
fn init(ruby: &Ruby) -> Result<(), Error> {
  let module = ruby.define_module("Pim")?;

  logger::define_logger_functions(&module)?;
  id::define_store_id_class(ruby, &module)?;
  entry::define_entry_class(ruby, &module)?;
  store::define_store_handle_class(ruby, &module)?;

  Ok(())
}
