use std::path::{Path, PathBuf};

use chrono::Local;
use serde_json::Value;
use tracing::{info, warn};

use crate::api::DataverseClient;
use crate::error::{Error, Result};
use crate::fields::FieldAccess;
use crate::format::convert_to_local_tz;
use crate::search::dedup_pids;
use crate::writer::ReportWriter;

pub const DEFAULT_LOCK_TYPES: [&str; 2] = ["Ingest", "finalizePublication"];

pub const HEADER: [&str; 5] = [
  "dataset_pid",
  "dataset_url",
  "lock_reason",
  "locked_date",
  "user_name",
];

/// PIDs of every dataset holding any of `lock_types`, deduplicated.
pub fn locked_dataset_pids(client: &DataverseClient, lock_types: &[String]) -> Result<Vec<String>> {
  let mut pids = Vec::new();
  for lock_type in lock_types {
    match client.locks_by_type(lock_type) {
      Ok(locks) => pids.extend(
        locks
          .iter()
          .map(|lock| lock.text("/dataset"))
          .filter(|pid| !pid.is_empty()),
      ),
      Err(Error::Api { message, .. }) => {
        warn!(%lock_type, "lock listing refused: {}", message);
      }
      Err(e) => return Err(e),
    }
  }
  Ok(dedup_pids(pids))
}

pub fn lock_row(client: &DataverseClient, pid: &str, lock: &Value) -> [String; 5] {
  [
    pid.to_string(),
    client.server().dataset_url(pid),
    lock.text("/lockType"),
    convert_to_local_tz(&lock.text("/date"), true),
    lock.text("/user"),
  ]
}

/// `dataset_locked_status_2022.05.04_13.45.10.csv`
pub fn report_file_name() -> String {
  format!(
    "dataset_locked_status_{}.csv",
    Local::now().format("%Y.%m.%d_%H.%M.%S")
  )
}

/// Writes one row per lock of every locked dataset. Returns `None` when no
/// dataset is locked, in which case no file is created.
pub fn run(client: &DataverseClient, lock_types: &[String], output_dir: &Path) -> Result<Option<PathBuf>> {
  let pids = locked_dataset_pids(client, lock_types)?;
  if pids.is_empty() {
    info!("no locked datasets found");
    return Ok(None);
  }

  let path = output_dir.join(report_file_name());
  let mut report = ReportWriter::create(&path, HEADER)?;
  let total = pids.len();
  for (count, pid) in pids.iter().enumerate() {
    let locks = client.dataset_locks(pid)?;
    report.append(locks.iter().map(|lock| lock_row(client, pid, lock)))?;
    info!("{} of {} datasets: {}", count + 1, total, pid);
  }
  Ok(Some(path))
}
