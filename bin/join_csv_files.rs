//! Full outer join of CSV files on one or more shared key columns.

use std::error::Error;
use std::path::PathBuf;

use clap::Parser;

use dataverse_util::cli::LogArgs;
use dataverse_util::join;

#[derive(Parser, Debug)]
#[command(version, about = "Join CSV files (full outer join) into joined.csv")]
struct Cli {
  /// Column names to join on, separated by commas
  #[arg(long, short, value_delimiter = ',', required = true)]
  keys: Vec<String>,

  /// Directory to write joined.csv into
  #[arg(long, default_value = ".")]
  output_dir: PathBuf,

  /// CSV files to join
  #[arg(required = true)]
  files: Vec<PathBuf>,

  #[command(flatten)]
  log: LogArgs,
}

fn main() -> Result<(), Box<dyn Error>> {
  let cli = Cli::parse();
  cli.log.init();

  let keys: Vec<String> = cli.keys.iter().map(|key| key.trim().to_string()).collect();
  let path = join::run(&cli.files, &keys, &cli.output_dir)?;
  println!("Joined CSV exported to {}", path.display());
  Ok(())
}
