//! Lists the datasets created within a date range together with their files,
//! one CSV row per file, for spotting problem datasets (e.g. ones with no data).
//!
//! The CSV is appended to dataset by dataset, so an interrupted run still
//! leaves a usable partial report behind.

use std::error::Error;
use std::path::PathBuf;

use clap::Parser;

use dataverse_util::api::DataverseClient;
use dataverse_util::cli::{LogArgs, ServerArgs};
use dataverse_util::config::{DateRange, HarvestConfig, DEFAULT_PAGE_SIZE};
use dataverse_util::harvest;

#[derive(Parser, Debug)]
#[command(version, about = "Report dataset and file info for datasets created within a date range")]
struct Cli {
  #[command(flatten)]
  server: ServerArgs,

  /// First creation date to include, YYYY-MM-DD
  #[arg(long)]
  start_date: String,

  /// Last creation date to include, YYYY-MM-DD
  #[arg(long)]
  end_date: String,

  /// Directory to write datasetinfo_<start>-<end>.csv into
  #[arg(long, default_value = ".")]
  output_dir: PathBuf,

  /// Search results requested per page
  #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
  page_size: usize,

  /// Write last update times as dates only
  #[arg(long)]
  short_date: bool,

  /// Don't search for each dataset's dataverse name and alias
  #[arg(long)]
  skip_dataverse_lookup: bool,

  #[command(flatten)]
  log: LogArgs,
}

fn main() -> Result<(), Box<dyn Error>> {
  let cli = Cli::parse();
  cli.log.init();

  let config = HarvestConfig {
    server: cli.server.to_config(),
    range: DateRange::parse(&cli.start_date, &cli.end_date)?,
    output_dir: cli.output_dir,
    page_size: cli.page_size,
    short_date: cli.short_date,
    dataverse_lookup: !cli.skip_dataverse_lookup,
    show_progress: cli.log.show_progress(),
  };
  let client = DataverseClient::new(&config.server)?;
  let summary = harvest::run(&client, &config)?;

  if summary.misindexed > 0 {
    println!("Datasets misindexed: {}", summary.misindexed);
  }
  if summary.had_duplicates() {
    println!(
      "Unique datasets: {} of {} PIDs found",
      summary.unique_datasets, summary.pids_found
    );
  }
  println!(
    "Finished writing dataset and file info of {} dataset(s) to {}",
    summary.datasets_written,
    summary.output_path.display()
  );
  if !summary.pid_errors.is_empty() {
    println!(
      "Info about the following PIDs could not be retrieved. To investigate, try the \"Get JSON\" endpoint or the Search API on these datasets:"
    );
    for pid in &summary.pid_errors {
      println!("{}", pid);
    }
  }
  Ok(())
}
