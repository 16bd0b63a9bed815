use std::path::PathBuf;

use chrono::NaiveDate;

use crate::error::{Error, Result};

pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Where to reach the installation, and as whom.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
  pub base_url: String,
  pub api_token: Option<String>,
}

impl ServerConfig {
  pub fn new(base_url: &str, api_token: Option<String>) -> Self {
    ServerConfig {
      base_url: base_url.trim_end_matches('/').to_string(),
      api_token: api_token.filter(|token| !token.trim().is_empty()),
    }
  }

  /// Landing page of a dataset, as linked from reports.
  pub fn dataset_url(&self, pid: &str) -> String {
    format!("{}/dataset.xhtml?persistentId={}", self.base_url, pid)
  }
}

/// Inclusive range of creation dates, both ends as `YYYY-MM-DD`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
  pub start: NaiveDate,
  pub end: NaiveDate,
}

impl DateRange {
  pub fn parse(start: &str, end: &str) -> Result<Self> {
    let start = parse_date(start)?;
    let end = parse_date(end)?;
    if start > end {
      return Err(Error::Invalid(format!(
        "start date {} is after end date {}",
        start, end
      )));
    }
    Ok(DateRange { start, end })
  }

  /// Solr filter query on the `dateSort` field covering both whole days.
  pub fn filter_query(&self) -> String {
    format!(
      "dateSort:[{}T00:00:00Z TO {}T23:59:59Z]",
      self.start.format("%Y-%m-%d"),
      self.end.format("%Y-%m-%d")
    )
  }

  /// `datasetinfo_2021.03.01-2021.03.31.csv`
  pub fn report_file_name(&self) -> String {
    format!(
      "datasetinfo_{}-{}.csv",
      self.start.format("%Y.%m.%d"),
      self.end.format("%Y.%m.%d")
    )
  }
}

fn parse_date(value: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
    Error::Invalid(format!(
      "expecting a date in the format YYYY-MM-DD, got `{}`",
      value
    ))
  })
}

/// Everything the dataset and file report needs, fixed for the whole run.
#[derive(Debug, Clone)]
pub struct HarvestConfig {
  pub server: ServerConfig,
  pub range: DateRange,
  pub output_dir: PathBuf,
  pub page_size: usize,
  pub short_date: bool,
  pub dataverse_lookup: bool,
  pub show_progress: bool,
}

impl HarvestConfig {
  pub fn output_path(&self) -> PathBuf {
    self.output_dir.join(self.range.report_file_name())
  }
}
