//! Shared test helpers for CLI integration tests.

use std::path::PathBuf;

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use tempfile::TempDir;

/// Isolated test environment.
///
/// Each test gets its own runtime path, with the store at `<rtp>/store`.
pub struct TestEnv {
  pub temp: TempDir,
}

impl TestEnv {
  pub fn empty() -> Self {
    Self {
      temp: TempDir::new().unwrap(),
    }
  }

  /// Create with a config file in the runtime path.
  pub fn with_config(content: &str) -> Self {
    let env = Self::empty();
    env.write_file("rtp/config.toml", content);
    env
  }

  /// Write a file relative to the temp directory and return its path.
  pub fn write_file(&self, relative_path: &str, content: &str) -> PathBuf {
    let path = self.temp.path().join(relative_path);
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, content).unwrap();
    path
  }

  pub fn rtp_path(&self) -> PathBuf {
    let p = self.temp.path().join("rtp");
    std::fs::create_dir_all(&p).unwrap();
    dunce::canonicalize(&p).unwrap_or(p)
  }

  pub fn store_path(&self) -> PathBuf {
    self.rtp_path().join("store")
  }

  /// Path of an entry file in the store.
  pub fn entry_path(&self, id: &str) -> PathBuf {
    self.store_path().join(id)
  }

  pub fn read_entry(&self, id: &str) -> String {
    std::fs::read_to_string(self.entry_path(id)).unwrap_or_else(|e| panic!("Failed to read entry {}: {}", id, e))
  }

  /// Get a pre-configured Command for the pim binary.
  ///
  /// Points `PIMSTORE_RTP` at the isolated runtime path and clears the
  /// variables that would leak the caller's setup into the test.
  pub fn pim_cmd(&self) -> Command {
    let mut cmd: Command = cargo_bin_cmd!("pim");
    cmd.env("PIMSTORE_RTP", self.rtp_path());
    cmd.env_remove("PIMSTORE_STORE");
    cmd.env_remove("EDITOR");
    cmd.env_remove("RUST_LOG");
    cmd
  }

  /// Create an entry, asserting success.
  pub fn create(&self, id: &str, content: &str) {
    self
      .pim_cmd()
      .args(["create", "--id", id, "--content", content])
      .assert()
      .success();
  }
}
