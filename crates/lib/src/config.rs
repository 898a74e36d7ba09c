//! User configuration.
//!
//! Read from `<rtp>/config.toml` unless another file is given. The file is
//! optional; every key has a default.
//!
//! ```toml
//! verbosity = false
//! editor = "vim"
//! editor_opts = "-n"
//!
//! [store]
//! implicit_create = true
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("failed to read config {path}: {source}")]
  Read {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("failed to parse config {path}: {source}")]
  Parse {
    path: PathBuf,
    #[source]
    source: toml::de::Error,
  },
}

/// Settings that change how the store itself behaves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StoreConfig {
  /// Create the store directory if it is missing.
  pub implicit_create: bool,
}

impl Default for StoreConfig {
  fn default() -> Self {
    StoreConfig { implicit_create: true }
  }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Configuration {
  pub verbosity: bool,
  pub editor: Option<String>,
  pub editor_opts: String,
  pub store: StoreConfig,
}

impl Configuration {
  /// Load the config file at `path`. A missing file is `Ok(None)`.
  pub fn load(path: &Path) -> Result<Option<Self>, ConfigError> {
    let content = match fs::read_to_string(path) {
      Ok(content) => content,
      Err(e) if e.kind() == io::ErrorKind::NotFound => {
        debug!(path = %path.display(), "no config file");
        return Ok(None);
      }
      Err(source) => {
        return Err(ConfigError::Read {
          path: path.to_path_buf(),
          source,
        });
      }
    };

    let config: Configuration = toml::from_str(&content).map_err(|source| ConfigError::Parse {
      path: path.to_path_buf(),
      source,
    })?;

    debug!(
      path = %path.display(),
      verbosity = config.verbosity,
      editor = ?config.editor,
      editor_opts = %config.editor_opts,
      "loaded configuration"
    );
    Ok(Some(config))
  }

  /// Extra editor arguments, split on whitespace.
  pub fn editor_args(&self) -> Vec<String> {
    self.editor_opts.split_whitespace().map(String::from).collect()
  }
}
