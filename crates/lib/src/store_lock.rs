//! Advisory lock on a store directory.
//!
//! `pim list` takes the lock shared; every command that borrows entries takes
//! it exclusively, since borrowed entries are written back when released.
//! An exclusive holder records itself in `<store>/.pim.lock` so a second
//! `pim` can name the process in the way.

use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::consts::LOCK_FILENAME;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockMode {
  Shared,
  Exclusive,
}

/// Who holds the store exclusively.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockHolder {
  pub pid: u32,
  pub command: String,
  /// Seconds since the Unix epoch.
  pub since: u64,
}

impl fmt::Display for LockHolder {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "`pim {}` (pid {}, since {})", self.command, self.pid, self.since)
  }
}

#[derive(Debug, Error)]
pub enum StoreLockError {
  #[error("store is in use by {}; remove {} if no pim is running", holder_or_unknown(.holder), .lock_path.display())]
  Locked {
    lock_path: PathBuf,
    holder: Option<LockHolder>,
  },

  #[error("failed to {action} {}: {source}", .lock_path.display())]
  Io {
    action: &'static str,
    lock_path: PathBuf,
    #[source]
    source: io::Error,
  },
}

fn holder_or_unknown(holder: &Option<LockHolder>) -> String {
  match holder {
    Some(holder) => holder.to_string(),
    None => "another process".to_string(),
  }
}

/// The lock is released by the OS when this value drops.
#[derive(Debug)]
pub struct StoreLock {
  file: File,
  lock_path: PathBuf,
  mode: LockMode,
}

impl StoreLock {
  /// Lock the existing store directory `store`. Never waits: a held lock is
  /// reported as [`StoreLockError::Locked`].
  pub fn acquire(store: &Path, mode: LockMode, command: &str) -> Result<Self, StoreLockError> {
    let lock_path = store.join(LOCK_FILENAME);

    let file = OpenOptions::new()
      .read(true)
      .write(true)
      .create(true)
      .truncate(false)
      .open(&lock_path)
      .map_err(io_error("open", &lock_path))?;

    match try_lock(&file, mode) {
      Ok(()) => {}
      Err(e) if e.kind() == io::ErrorKind::WouldBlock => {
        let holder = read_holder(&lock_path);
        warn!(lock = %lock_path.display(), ?holder, command, "store is locked");
        return Err(StoreLockError::Locked { lock_path, holder });
      }
      Err(e) => return Err(io_error("lock", &lock_path)(e)),
    }

    let lock = StoreLock { file, lock_path, mode };
    if mode == LockMode::Exclusive {
      lock
        .record_holder(command)
        .map_err(io_error("write", &lock.lock_path))?;
    }

    debug!(lock = %lock.lock_path.display(), ?mode, command, "store lock acquired");
    Ok(lock)
  }

  /// The recorded holder, read through the held handle. Opening the file a
  /// second time fails on Windows while it is locked.
  pub fn holder(&self) -> io::Result<LockHolder> {
    let mut file = &self.file;
    file.seek(SeekFrom::Start(0))?;
    let mut contents = String::new();
    file.read_to_string(&mut contents)?;
    serde_json::from_str(&contents).map_err(io::Error::other)
  }

  pub fn lock_path(&self) -> &Path {
    &self.lock_path
  }

  pub fn mode(&self) -> LockMode {
    self.mode
  }

  fn record_holder(&self, command: &str) -> io::Result<()> {
    let holder = LockHolder {
      pid: std::process::id(),
      command: command.to_string(),
      since: SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs(),
    };

    let mut file = &self.file;
    file.set_len(0)?;
    file.seek(SeekFrom::Start(0))?;
    serde_json::to_writer(&mut file, &holder).map_err(io::Error::other)?;
    file.flush()
  }
}

impl Drop for StoreLock {
  fn drop(&mut self) {
    // Clear the record before the handle closes and the lock goes away.
    if self.mode == LockMode::Exclusive
      && let Err(e) = self.file.set_len(0)
    {
      debug!(lock = %self.lock_path.display(), error = %e, "failed to clear lock holder");
    }
  }
}

fn io_error(action: &'static str, lock_path: &Path) -> impl FnOnce(io::Error) -> StoreLockError {
  let lock_path = lock_path.to_path_buf();
  move |source| StoreLockError::Io {
    action,
    lock_path,
    source,
  }
}

/// Best effort: shared holders never record themselves.
fn read_holder(lock_path: &Path) -> Option<LockHolder> {
  let contents = std::fs::read_to_string(lock_path).ok()?;
  serde_json::from_str(&contents).ok()
}

#[cfg(unix)]
fn try_lock(file: &File, mode: LockMode) -> io::Result<()> {
  use rustix::fs::{FlockOperation, flock};
  use std::os::unix::io::AsFd;

  let operation = match mode {
    LockMode::Shared => FlockOperation::NonBlockingLockShared,
    LockMode::Exclusive => FlockOperation::NonBlockingLockExclusive,
  };

  flock(file.as_fd(), operation).map_err(|e| io::Error::from_raw_os_error(e.raw_os_error()))
}

#[cfg(windows)]
fn try_lock(file: &File, mode: LockMode) -> io::Result<()> {
  use std::os::windows::io::AsRawHandle;
  use windows_sys::Win32::Foundation::HANDLE;
  use windows_sys::Win32::Storage::FileSystem::{LOCKFILE_EXCLUSIVE_LOCK, LOCKFILE_FAIL_IMMEDIATELY, LockFileEx};

  let handle = file.as_raw_handle() as HANDLE;
  let flags = match mode {
    LockMode::Shared => LOCKFILE_FAIL_IMMEDIATELY,
    LockMode::Exclusive => LOCKFILE_FAIL_IMMEDIATELY | LOCKFILE_EXCLUSIVE_LOCK,
  };

  // SAFETY: OVERLAPPED is plain data and valid zeroed; the handle is owned by `file`.
  let result = unsafe {
    let mut overlapped = std::mem::zeroed();
    LockFileEx(handle, flags, 0, 1, 0, &mut overlapped)
  };

  if result == 0 {
    Err(io::Error::last_os_error())
  } else {
    Ok(())
  }
}
