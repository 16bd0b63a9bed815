//! Replaces the title, description and (optionally) authors of the datasets
//! listed in a CSV file with columns persistent_id, title, dsDescriptionValue
//! and an optional authorName (names separated by `;`).

use std::error::Error;
use std::path::PathBuf;

use clap::Parser;

use dataverse_util::api::DataverseClient;
use dataverse_util::cli::{LogArgs, ServerArgs};
use dataverse_util::replace;

#[derive(Parser, Debug)]
#[command(version, about = "Replace dataset metadata from a CSV file")]
struct Cli {
  #[command(flatten)]
  server: ServerArgs,

  /// CSV file listing the datasets and their replacement values
  csv_file: PathBuf,

  #[command(flatten)]
  log: LogArgs,
}

fn main() -> Result<(), Box<dyn Error>> {
  let cli = Cli::parse();
  cli.log.init();

  let client = DataverseClient::new(&cli.server.to_config())?;
  let summary = replace::run(&client, &cli.csv_file)?;
  println!(
    "Replaced metadata of {} dataset(s), {} failed",
    summary.succeeded.len(),
    summary.failed.len()
  );
  for (pid, status) in &summary.failed {
    println!("{} ({})", pid, status);
  }
  Ok(())
}
