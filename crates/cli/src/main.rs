mod cmd;
mod output;
mod util;

use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use pimstore_lib::runtime::{Runtime, RuntimeOptions};

use crate::output::{OutputFormat, print_error};

/// pim - keep notes, bookmarks and other entries in a plain-text store
#[derive(Parser)]
#[command(name = "pim")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Enable verbose output
  #[arg(short, long, global = true)]
  verbose: bool,

  /// Enable debug output (implies verbose, adds file and line)
  #[arg(long, global = true)]
  debug: bool,

  /// Disable colored output
  #[arg(long, global = true)]
  no_color: bool,

  /// Config file (default: <rtp>/config.toml)
  #[arg(long, global = true, value_name = "FILE")]
  config: Option<PathBuf>,

  /// Runtime path (default: $PIMSTORE_RTP or ~/.pimstore)
  #[arg(long, global = true, value_name = "DIR")]
  rtp: Option<PathBuf>,

  /// Store path (default: $PIMSTORE_STORE or <rtp>/store)
  #[arg(long, global = true, value_name = "DIR")]
  store: Option<PathBuf>,

  /// Editor command for `edit`
  #[arg(long, global = true, value_name = "CMD")]
  editor: Option<String>,

  /// Output format
  #[arg(short, long, global = true, value_enum, default_value_t)]
  output: OutputFormat,

  #[command(subcommand)]
  command: Commands,
}

/// Which parts of an entry to print. Nothing selected prints the raw entry.
#[derive(Args, Debug, Clone, Copy, Default)]
pub struct PrintArgs {
  /// Print the content
  #[arg(long)]
  pub content: bool,

  /// Print the header as TOML
  #[arg(long)]
  pub header: bool,

  /// Print the header as JSON
  #[arg(long)]
  pub header_json: bool,

  /// Print the whole serialized entry
  #[arg(long)]
  pub raw: bool,
}

#[derive(Subcommand)]
enum Commands {
  /// Create a new entry
  Create {
    /// Entry id, relative to the store
    #[arg(long)]
    id: String,

    /// Entry content
    #[arg(long, conflicts_with = "content_from")]
    content: Option<String>,

    /// Read the content from a file ('-' for stdin)
    #[arg(long, value_name = "FILE")]
    content_from: Option<String>,

    /// Set a header field, e.g. `note.title=Groceries` (repeatable)
    #[arg(long = "header", value_name = "KEY=VALUE")]
    headers: Vec<String>,

    /// Parse a complete serialized entry from a file ('-' for stdin)
    #[arg(long, value_name = "FILE", conflicts_with_all = ["content", "content_from"])]
    from_raw: Option<String>,
  },

  /// Print an entry, creating it if it does not exist
  Retrieve {
    #[arg(long)]
    id: String,

    #[command(flatten)]
    print: PrintArgs,
  },

  /// Print an existing entry
  Get {
    #[arg(long)]
    id: String,

    #[command(flatten)]
    print: PrintArgs,
  },

  /// Change the content or header of an existing entry
  Update {
    #[arg(long)]
    id: String,

    /// Replace the content with a file ('-' for stdin)
    #[arg(long, value_name = "FILE")]
    content: Option<String>,

    /// Set a header field (repeatable)
    #[arg(long = "header", value_name = "KEY=VALUE")]
    headers: Vec<String>,
  },

  /// Delete an entry
  Delete {
    #[arg(long)]
    id: String,
  },

  /// List entries
  List {
    /// Only list entries in this collection
    #[arg(long)]
    collection: Option<String>,
  },

  /// Rename an entry
  Move {
    #[arg(long)]
    from: String,

    #[arg(long)]
    to: String,
  },

  /// Open an entry in the editor
  Edit {
    #[arg(long)]
    id: String,
  },
}

fn main() -> ExitCode {
  let cli = Cli::parse();

  if cli.no_color {
    owo_colors::set_override(false);
  }

  match run(cli) {
    Ok(()) => ExitCode::SUCCESS,
    Err(e) => {
      print_error(&format!("{:#}", e));
      ExitCode::FAILURE
    }
  }
}

fn run(cli: Cli) -> Result<()> {
  let runtime = Runtime::new(RuntimeOptions {
    rtp: cli.rtp,
    config_path: cli.config,
    store_path: cli.store,
    editor: cli.editor,
    verbose: cli.verbose,
    debug: cli.debug,
    color: !cli.no_color && std::io::stderr().is_terminal(),
    in_memory: false,
  })
  .context("Failed to set up the runtime")?;
  runtime.init_logger().context("Failed to initialize logging")?;

  let output = cli.output;
  match cli.command {
    Commands::Create {
      id,
      content,
      content_from,
      headers,
      from_raw,
    } => cmd::cmd_create(
      &runtime,
      cmd::CreateArgs {
        id: &id,
        content: content.as_deref(),
        content_from: content_from.as_deref(),
        headers: &headers,
        from_raw: from_raw.as_deref(),
      },
      output,
    ),
    Commands::Retrieve { id, print } => cmd::cmd_retrieve(&runtime, &id, print, output),
    Commands::Get { id, print } => cmd::cmd_get(&runtime, &id, print, output),
    Commands::Update { id, content, headers } => cmd::cmd_update(&runtime, &id, content.as_deref(), &headers, output),
    Commands::Delete { id } => cmd::cmd_delete(&runtime, &id, output),
    Commands::List { collection } => cmd::cmd_list(&runtime, collection.as_deref(), output),
    Commands::Move { from, to } => cmd::cmd_move(&runtime, &from, &to, output),
    Commands::Edit { id } => cmd::cmd_edit(&runtime, &id),
  }
}
