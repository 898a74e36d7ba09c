//! Runtime environment for binaries and bindings.
//!
//! Resolves the runtime path, loads the configuration and opens the store.
//! Installing the logger is a separate step, see [`Runtime::init_logger`].
//!
//! # Path resolution
//!
//! | what   | first match of                                             |
//! |--------|------------------------------------------------------------|
//! | rtp    | `--rtp`, `$PIMSTORE_RTP`, `$HOME/.pimstore`                |
//! | store  | `--store`, `$PIMSTORE_STORE`, `<rtp>/store`                |
//! | config | `--config`, `<rtp>/config.toml`                            |

use std::env;
use std::path::{Path, PathBuf};
use std::process::Command;

use thiserror::Error;
use tracing::debug;

use crate::config::{ConfigError, Configuration};
use crate::consts::{CONFIG_FILENAME, EDITOR_ENV, RTP_DIRNAME, RTP_ENV, STORE_DIRNAME, STORE_ENV};
use crate::logging::{LogConfig, LoggerError};
use crate::store::{Store, StoreError};
use crate::store_lock::{LockMode, StoreLock, StoreLockError};

#[derive(Debug, Error)]
pub enum RuntimeError {
  #[error("no home directory found; pass --rtp or set PIMSTORE_RTP")]
  NoHome,

  #[error(transparent)]
  Config(#[from] ConfigError),

  #[error(transparent)]
  Store(#[from] StoreError),

  #[error(transparent)]
  Logger(#[from] LoggerError),

  #[error(transparent)]
  Lock(#[from] StoreLockError),
}

/// Everything a binary may override on the command line.
#[derive(Debug, Clone, Default)]
pub struct RuntimeOptions {
  pub rtp: Option<PathBuf>,
  pub config_path: Option<PathBuf>,
  pub store_path: Option<PathBuf>,
  pub editor: Option<String>,
  pub verbose: bool,
  pub debug: bool,
  pub color: bool,
  pub in_memory: bool,
}

#[derive(Debug)]
pub struct Runtime {
  rtp: PathBuf,
  config_path: PathBuf,
  configuration: Option<Configuration>,
  store: Store,
  options: RuntimeOptions,
}

impl Runtime {
  pub fn new(options: RuntimeOptions) -> Result<Self, RuntimeError> {
    let rtp = resolve_rtp(options.rtp.as_deref())?;
    let config_path = options
      .config_path
      .clone()
      .unwrap_or_else(|| rtp.join(CONFIG_FILENAME));
    let configuration = Configuration::load(&config_path)?;

    let store_path = resolve_store_path(options.store_path.as_deref(), &rtp);
    let store_config = configuration
      .as_ref()
      .map(|c| c.store.clone())
      .unwrap_or_default();

    let store = if options.in_memory {
      Store::new_in_memory(&store_path, store_config)?
    } else {
      Store::new(&store_path, store_config)?
    };

    debug!(
      rtp = %rtp.display(),
      config = %config_path.display(),
      store = %store_path.display(),
      in_memory = options.in_memory,
      "runtime ready"
    );

    Ok(Runtime {
      rtp,
      config_path,
      configuration,
      store,
      options,
    })
  }

  /// Install the global logger from the runtime's flags and configuration.
  pub fn init_logger(&self) -> Result<(), RuntimeError> {
    self.log_config().init()?;
    Ok(())
  }

  pub fn log_config(&self) -> LogConfig {
    LogConfig::new(self.is_debugging(), self.is_verbose(), self.options.color)
  }

  /// Lock the store directory. In-memory stores have nothing to lock.
  pub fn lock_store(&self, mode: LockMode, command: &str) -> Result<Option<StoreLock>, RuntimeError> {
    if self.options.in_memory {
      return Ok(None);
    }
    Ok(Some(StoreLock::acquire(self.store.path(), mode, command)?))
  }

  /// The editor command: `--editor`, config `editor`, then `$EDITOR`.
  /// Config `editor_opts` are appended.
  pub fn editor(&self) -> Option<Command> {
    let editor = self
      .options
      .editor
      .clone()
      .or_else(|| self.configuration.as_ref().and_then(|c| c.editor.clone()))
      .or_else(|| env::var(EDITOR_ENV).ok())
      .filter(|e| !e.trim().is_empty())?;

    let mut parts = editor.split_whitespace();
    let mut command = Command::new(parts.next()?);
    command.args(parts);
    if let Some(configuration) = &self.configuration {
      command.args(configuration.editor_args());
    }
    Some(command)
  }

  pub fn rtp(&self) -> &Path {
    &self.rtp
  }

  pub fn config_path(&self) -> &Path {
    &self.config_path
  }

  pub fn store(&self) -> &Store {
    &self.store
  }

  pub fn configuration(&self) -> Option<&Configuration> {
    self.configuration.as_ref()
  }

  pub fn is_verbose(&self) -> bool {
    self.options.verbose || self.configuration.as_ref().is_some_and(|c| c.verbosity)
  }

  pub fn is_debugging(&self) -> bool {
    self.options.debug
  }
}

/// The user's home directory, if the environment names one.
pub fn home_dir() -> Option<PathBuf> {
  #[cfg(windows)]
  let home = env::var_os("USERPROFILE");
  #[cfg(not(windows))]
  let home = env::var_os("HOME");

  home.filter(|h| !h.is_empty()).map(PathBuf::from)
}

fn env_path(name: &str) -> Option<PathBuf> {
  env::var_os(name).filter(|v| !v.is_empty()).map(PathBuf::from)
}

fn resolve_rtp(explicit: Option<&Path>) -> Result<PathBuf, RuntimeError> {
  if let Some(rtp) = explicit {
    return Ok(rtp.to_path_buf());
  }
  if let Some(rtp) = env_path(RTP_ENV) {
    return Ok(rtp);
  }
  home_dir().map(|h| h.join(RTP_DIRNAME)).ok_or(RuntimeError::NoHome)
}

fn resolve_store_path(explicit: Option<&Path>, rtp: &Path) -> PathBuf {
  explicit
    .map(Path::to_path_buf)
    .or_else(|| env_path(STORE_ENV))
    .unwrap_or_else(|| rtp.join(STORE_DIRNAME))
}
