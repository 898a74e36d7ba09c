//! pimstore-lib: a store of TOML-headed text entries.
//!
//! - [`store::Store`]: entries addressed by [`store::StoreId`], borrowed as
//!   [`store::FileLockEntry`] guards that write back on drop
//! - [`header`]: dotted-path access to entry headers
//! - [`runtime::Runtime`]: path resolution, configuration and store setup for binaries
//! - [`logging`]: the `[pim][LEVEL]` stderr logger

pub mod backend;
pub mod config;
pub mod consts;
pub mod header;
pub mod logging;
pub mod runtime;
pub mod store;
pub mod store_lock;

pub use logging::init_logger;
pub use store::{Entry, FileLockEntry, Store, StoreError, StoreId};
