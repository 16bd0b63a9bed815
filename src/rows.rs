use crate::dataset::DatasetRecord;
use crate::format::{format_bytes, format_local};

pub const HEADER: [&str; 5] = [
  "datasetTitle (versionState) (DOI)",
  "fileName (fileSize)",
  "fileType",
  "lastUpdateTime",
  "dataverseName (alias)",
];

pub const NO_FILES: &str = "(no files found)";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputRow {
  pub dataset: String,
  pub file: String,
  pub file_type: String,
  pub last_update: String,
  pub dataverse: String,
}

impl OutputRow {
  pub fn into_record(self) -> [String; 5] {
    [
      self.dataset,
      self.file,
      self.file_type,
      self.last_update,
      self.dataverse,
    ]
  }
}

/// One row per file, or a single placeholder row for a dataset without files.
pub fn dataset_rows(record: &DatasetRecord, short_date: bool) -> Vec<OutputRow> {
  let dataset = format!(
    "{} ({}) ({})",
    record.title, record.version_state, record.persistent_id
  );
  let last_update = record
    .last_update_time
    .as_ref()
    .map(|timestamp| format_local(timestamp, short_date))
    .unwrap_or_default();
  let dataverse = record
    .dataverse
    .as_ref()
    .map(ToString::to_string)
    .unwrap_or_default();

  let row = |file: String, file_type: String| OutputRow {
    dataset: dataset.clone(),
    file,
    file_type,
    last_update: last_update.clone(),
    dataverse: dataverse.clone(),
  };

  if record.files.is_empty() {
    return vec![row(NO_FILES.to_string(), NO_FILES.to_string())];
  }
  record
    .files
    .iter()
    .map(|file| {
      row(
        format!("{} ({})", file.label, format_bytes(file.size_bytes)),
        file.content_type.clone(),
      )
    })
    .collect()
}
