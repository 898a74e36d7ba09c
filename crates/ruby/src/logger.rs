use magnus::prelude::*;
use magnus::{Error, RModule, function};
use pimstore_lib::logging::{self, LoggerError};
use tracing::{debug, error, info, warn};

/// `Pim.init_logger(debug, verbose, color)`. Returns false if a logger was
/// already installed.
fn init_logger(debug: bool, verbose: bool, color: bool) -> bool {
  match logging::init_logger(debug, verbose, color) {
    Ok(()) => true,
    Err(LoggerError::AlreadyInitialized) => false,
  }
}

fn log_info(msg: String) {
  info!("{}", msg);
}

fn log_debug(msg: String) {
  debug!("{}", msg);
}

fn log_warn(msg: String) {
  warn!("{}", msg);
}

fn log_error(msg: String) {
  error!("{}", msg);
}

pub fn define_logger_functions(module: &RModule) -> Result<(), Error> {
  module.define_module_function("init_logger", function!(init_logger, 3))?;
  module.define_module_function("info", function!(log_info, 1))?;
  module.define_module_function("debug", function!(log_debug, 1))?;
  module.define_module_function("warn", function!(log_warn, 1))?;
  module.define_module_function("error", function!(log_error, 1))?;
  Ok(())
}
