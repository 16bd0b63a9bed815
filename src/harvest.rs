//! The dataset and file report.
//!
//! Finds datasets created within a date range, fetches each one's latest
//! version, and writes one CSV row per file. Per-dataset failures are
//! collected and reported at the end instead of stopping the run; only a
//! failing initial search aborts.

use std::collections::BTreeSet;
use std::path::PathBuf;

use tracing::{info, warn};

use crate::api::{DataverseClient, SearchQuery};
use crate::config::HarvestConfig;
use crate::dataset::{fetch_dataset, lookup_dataverse};
use crate::error::Result;
use crate::progress;
use crate::rows::{dataset_rows, HEADER};
use crate::search::{dedup_pids, search_dataset_pids};
use crate::writer::ReportWriter;

#[derive(Debug, Clone, Default)]
pub struct HarvestSummary {
  pub output_path: PathBuf,
  pub total_reported: usize,
  pub pids_found: usize,
  pub unique_datasets: usize,
  pub misindexed: usize,
  pub datasets_written: usize,
  pub rows_written: usize,
  /// PIDs whose info could not be fully retrieved.
  pub pid_errors: BTreeSet<String>,
}

impl HarvestSummary {
  pub fn had_duplicates(&self) -> bool {
    self.unique_datasets != self.pids_found
  }
}

pub fn run(client: &DataverseClient, config: &HarvestConfig) -> Result<HarvestSummary> {
  let query = SearchQuery::datasets_in_range(&config.range);
  info!("searching for dataset PIDs");
  let counter = progress::pid_counter(config.show_progress);
  let found = search_dataset_pids(client, &query, config.page_size, &counter)?;
  let pids_found = found.pids.len();
  let pids = dedup_pids(found.pids);

  let mut summary = HarvestSummary {
    output_path: config.output_path(),
    total_reported: found.total,
    pids_found,
    unique_datasets: pids.len(),
    misindexed: found.misindexed,
    ..HarvestSummary::default()
  };

  let mut report = ReportWriter::create(&summary.output_path, HEADER)?;
  info!("writing dataset and file info to {}", summary.output_path.display());
  let dots = progress::dots(pids.len() as u64, config.show_progress);
  dots.set_prefix("Writing");

  for pid in &pids {
    dots.inc(1);
    let mut record = match fetch_dataset(client, pid) {
      Ok(record) => record,
      Err(e) => {
        warn!(%pid, "could not get dataset info: {}", e);
        summary.pid_errors.insert(pid.clone());
        continue;
      }
    };
    if config.dataverse_lookup {
      match lookup_dataverse(client, pid) {
        Ok(dataverse) => record.dataverse = Some(dataverse),
        Err(e) => {
          warn!(%pid, "could not find the dataset's dataverse: {}", e);
          summary.pid_errors.insert(pid.clone());
        }
      }
    }
    let rows = dataset_rows(&record, config.short_date);
    report.append(rows.into_iter().map(|row| row.into_record()))?;
    summary.datasets_written += 1;
  }
  dots.finish();

  summary.rows_written = report.rows_written();
  Ok(summary)
}
