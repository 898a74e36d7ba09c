use std::fmt::Display;

use magnus::{Error, Ruby};

/// Library errors surface in Ruby as `RuntimeError` with the error's message.
pub fn runtime_error(ruby: &Ruby, err: impl Display) -> Error {
  Error::new(ruby.exception_runtime_error(), err.to_string())
}
