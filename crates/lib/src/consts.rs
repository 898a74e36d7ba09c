/// Short name printed in front of every log line.
pub const LOG_PREFIX: &str = "pim";

/// Header table owned by the store itself.
pub const HEADER_TABLE: &str = "pim";

/// Fence line separating the TOML header from the entry content.
pub const ENTRY_FENCE: &str = "---";

/// Version stamped into freshly created entry headers.
pub const ENTRY_FORMAT_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Advisory lock file kept inside the store directory.
pub const LOCK_FILENAME: &str = ".pim.lock";

/// Default config file name inside the runtime path.
pub const CONFIG_FILENAME: &str = "config.toml";

/// Default store directory name inside the runtime path.
pub const STORE_DIRNAME: &str = "store";

/// Overrides the runtime path.
pub const RTP_ENV: &str = "PIMSTORE_RTP";

/// Overrides the store path.
pub const STORE_ENV: &str = "PIMSTORE_STORE";

/// Runtime path directory name below the home directory.
pub const RTP_DIRNAME: &str = ".pimstore";

/// Fallback editor variable.
pub const EDITOR_ENV: &str = "EDITOR";
