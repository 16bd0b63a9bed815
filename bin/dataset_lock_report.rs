//! Writes a CSV of every lock held by datasets with any of the given lock types.

use std::error::Error;
use std::path::PathBuf;

use clap::Parser;

use dataverse_util::api::DataverseClient;
use dataverse_util::cli::{LogArgs, ServerArgs};
use dataverse_util::locks::{self, DEFAULT_LOCK_TYPES};

#[derive(Parser, Debug)]
#[command(version, about = "Report locked datasets and their locks")]
struct Cli {
  #[command(flatten)]
  server: ServerArgs,

  /// Lock type to look for; repeat for several (default: Ingest, finalizePublication)
  #[arg(long = "lock-type")]
  lock_types: Vec<String>,

  /// Directory to write dataset_locked_status_<timestamp>.csv into
  #[arg(long, default_value = ".")]
  output_dir: PathBuf,

  #[command(flatten)]
  log: LogArgs,
}

fn main() -> Result<(), Box<dyn Error>> {
  let cli = Cli::parse();
  cli.log.init();

  let lock_types = if cli.lock_types.is_empty() {
    DEFAULT_LOCK_TYPES.iter().map(|t| t.to_string()).collect()
  } else {
    cli.lock_types
  };
  let client = DataverseClient::new(&cli.server.to_config())?;
  match locks::run(&client, &lock_types, &cli.output_dir)? {
    Some(path) => println!("Lock report written to {}", path.display()),
    None => println!("No locked datasets found."),
  }
  Ok(())
}
