//! Collects the related publication metadata of a folder of dataset JSON
//! exports (as returned by the "Get JSON" endpoint) into relatedpublication.csv.

use std::error::Error;
use std::path::PathBuf;

use clap::Parser;

use dataverse_util::cli::LogArgs;
use dataverse_util::publications;

#[derive(Parser, Debug)]
#[command(version, about = "Extract related publication fields from dataset JSON exports")]
struct Cli {
  /// Folder containing the dataset JSON files
  json_dir: PathBuf,

  /// Directory to write relatedpublication.csv into
  #[arg(long, default_value = ".")]
  output_dir: PathBuf,

  #[command(flatten)]
  log: LogArgs,
}

fn main() -> Result<(), Box<dyn Error>> {
  let cli = Cli::parse();
  cli.log.init();

  let path = publications::run(&cli.json_dir, &cli.output_dir)?;
  println!("Related publications written to {}", path.display());
  Ok(())
}
