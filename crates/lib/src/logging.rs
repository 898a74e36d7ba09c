//! Logger setup.
//!
//! All crates log through `tracing`. Binaries and bindings install the
//! subscriber once via [`init_logger`]; lines go to stderr as
//!
//! ```text
//! [pim][INFO ]: created entry
//! [pim][DEBUG][crates/lib/src/store/mod.rs][  112]: created entry id=notes/a
//! ```

use std::fmt;

use owo_colors::OwoColorize;
use thiserror::Error;
use tracing::{Event, Level, Subscriber, debug};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::FmtContext;
use tracing_subscriber::fmt::format::{self, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;

use crate::consts::LOG_PREFIX;

#[derive(Debug, Error)]
pub enum LoggerError {
  #[error("logger already initialized")]
  AlreadyInitialized,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LogConfig {
  pub debug: bool,
  pub verbose: bool,
  pub color: bool,
}

impl LogConfig {
  pub fn new(debug: bool, verbose: bool, color: bool) -> Self {
    LogConfig { debug, verbose, color }
  }

  /// Debug wins over verbose; without either only errors are shown.
  pub fn level(&self) -> LevelFilter {
    if self.debug {
      LevelFilter::DEBUG
    } else if self.verbose {
      LevelFilter::INFO
    } else {
      LevelFilter::ERROR
    }
  }

  /// Install the global subscriber. `RUST_LOG` overrides the computed level.
  pub fn init(self) -> Result<(), LoggerError> {
    let filter = EnvFilter::builder()
      .with_default_directive(self.level().into())
      .from_env_lossy();

    tracing_subscriber::fmt()
      .with_env_filter(filter)
      .with_writer(std::io::stderr)
      .with_ansi(self.color)
      .event_format(PimFormat::new(&self))
      .try_init()
      .map_err(|_| LoggerError::AlreadyInitialized)?;

    debug!(level = %self.level(), color = self.color, "logger initialized");
    Ok(())
  }
}

/// Install the global logger. A second call fails with [`LoggerError::AlreadyInitialized`].
pub fn init_logger(debug: bool, verbose: bool, color: bool) -> Result<(), LoggerError> {
  LogConfig::new(debug, verbose, color).init()
}

/// Line format: `[pim][LEVEL]: message`, with file and line on debug records.
#[derive(Debug, Clone)]
pub struct PimFormat {
  color: bool,
  file_and_line: bool,
}

impl PimFormat {
  pub fn new(config: &LogConfig) -> Self {
    PimFormat {
      color: config.color,
      file_and_line: config.debug,
    }
  }

  fn paint(&self, level: Level, text: &str, emphasize: bool) -> String {
    if !self.color {
      return text.to_string();
    }
    match level {
      Level::DEBUG => text.cyan().to_string(),
      Level::INFO => text.yellow().to_string(),
      Level::WARN | Level::ERROR if emphasize => text.red().bold().to_string(),
      Level::WARN | Level::ERROR => text.red().to_string(),
      _ => text.to_string(),
    }
  }
}

impl<S, N> FormatEvent<S, N> for PimFormat
where
  S: Subscriber + for<'a> LookupSpan<'a>,
  N: for<'a> FormatFields<'a> + 'static,
{
  fn format_event(&self, ctx: &FmtContext<'_, S, N>, mut writer: format::Writer<'_>, event: &Event<'_>) -> fmt::Result {
    let meta = event.metadata();
    let level = *meta.level();

    let mut message = String::new();
    ctx.field_format().format_fields(format::Writer::new(&mut message), event)?;

    let lvl = self.paint(level, &format!("{:<5}", level.as_str()), true);
    let msg = self.paint(level, &message, false);

    if level == Level::DEBUG && self.file_and_line {
      let file = self.paint(level, meta.file().unwrap_or("?"), false);
      let line = self.paint(
        level,
        &format!("{:>5}", meta.line().map(|l| l.to_string()).unwrap_or_default()),
        false,
      );
      writeln!(writer, "[{}][{}][{}][{}]: {}", LOG_PREFIX, lvl, file, line, msg)
    } else {
      writeln!(writer, "[{}][{}]: {}", LOG_PREFIX, lvl, msg)
    }
  }
}
