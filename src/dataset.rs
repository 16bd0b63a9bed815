use std::fmt;

use chrono::{DateTime, FixedOffset};
use serde_json::Value;

use crate::api::{DataverseClient, SearchQuery};
use crate::error::{Error, Result};
use crate::fields::{find_typed, FieldAccess};
use crate::format::parse_timestamp;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionState {
  Draft,
  Released,
  Deaccessioned,
  Archived,
  Other(String),
}

impl VersionState {
  pub fn parse(raw: &str) -> Self {
    match raw {
      "DRAFT" => VersionState::Draft,
      "RELEASED" => VersionState::Released,
      "DEACCESSIONED" => VersionState::Deaccessioned,
      "ARCHIVED" => VersionState::Archived,
      other => VersionState::Other(other.to_string()),
    }
  }
}

impl fmt::Display for VersionState {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      VersionState::Draft => f.write_str("DRAFT"),
      VersionState::Released => f.write_str("RELEASED"),
      VersionState::Deaccessioned => f.write_str("DEACCESSIONED"),
      VersionState::Archived => f.write_str("ARCHIVED"),
      VersionState::Other(raw) => f.write_str(raw),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
  pub label: String,
  pub size_bytes: u64,
  pub content_type: String,
}

/// The dataverse (collection) a dataset lives in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataverseName {
  pub name: String,
  pub alias: String,
}

impl fmt::Display for DataverseName {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{} ({})", self.name, self.alias)
  }
}

/// Snapshot of a dataset's latest version.
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetRecord {
  pub persistent_id: String,
  pub title: String,
  pub version_state: VersionState,
  pub last_update_time: Option<DateTime<FixedOffset>>,
  pub files: Vec<FileRecord>,
  pub dataverse: Option<DataverseName>,
}

impl DatasetRecord {
  /// Builds a record from the `data` block of the dataset "Get JSON" endpoint.
  pub fn from_json(pid: &str, data: &Value) -> Result<Self> {
    let latest = data
      .field("/latestVersion")
      .filter(|latest| latest.is_object())
      .ok_or_else(|| Error::NoLatestVersion(pid.to_string()))?;

    let citation = latest.list("/metadataBlocks/citation/fields");
    let title = find_typed(citation, "title")
      .or_else(|| citation.first())
      .map(|field| field.text("/value"))
      .unwrap_or_default();

    let mut persistent_id = latest.text("/datasetPersistentId");
    if persistent_id.is_empty() {
      persistent_id = pid.to_string();
    }

    let files = latest
      .list("/files")
      .iter()
      .map(|file| FileRecord {
        label: file.text("/label"),
        size_bytes: file.count("/dataFile/filesize"),
        content_type: file.text("/dataFile/contentType"),
      })
      .collect();

    Ok(DatasetRecord {
      persistent_id,
      title,
      version_state: VersionState::parse(&latest.text("/versionState")),
      last_update_time: parse_timestamp(&latest.text("/lastUpdateTime")),
      files,
      dataverse: None,
    })
  }
}

pub fn fetch_dataset(client: &DataverseClient, pid: &str) -> Result<DatasetRecord> {
  let data = client.dataset(pid)?;
  DatasetRecord::from_json(pid, &data)
}

/// Looks the dataset up in the Search API to learn its dataverse's name and alias.
pub fn lookup_dataverse(client: &DataverseClient, pid: &str) -> Result<DataverseName> {
  let data = client.search(&SearchQuery::dataset_by_pid(pid), 0, 10)?;
  let item = data
    .items
    .into_iter()
    .next()
    .ok_or_else(|| Error::Invalid(format!("no search result for {}", pid)))?;
  Ok(DataverseName {
    name: item.name_of_dataverse.unwrap_or_default(),
    alias: item.identifier_of_dataverse.unwrap_or_default(),
  })
}
