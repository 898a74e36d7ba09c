use pimstore_lib::init_logger;
use pimstore_lib::logging::LoggerError;

#[test]
fn second_init_is_reported_not_fatal() {
  // Another test in this binary may have installed it first.
  let _ = init_logger(true, true, false);

  let again = init_logger(false, false, false);
  assert!(matches!(again, Err(LoggerError::AlreadyInitialized)));

  tracing::info!("logging still works after a failed init");
}
