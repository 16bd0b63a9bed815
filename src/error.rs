use thiserror::Error;

/// Errors raised while talking to a Dataverse installation or writing reports.
#[derive(Debug, Error)]
pub enum Error {
  #[error("HTTP request failed: {0}")]
  Http(#[from] reqwest::Error),

  #[error("IO error: {0}")]
  Io(#[from] std::io::Error),

  #[error("CSV error: {0}")]
  Csv(#[from] csv::Error),

  #[error("malformed JSON response: {0}")]
  Json(#[from] serde_json::Error),

  /// The server answered with a status other than "OK".
  #[error("API returned status {status}: {message}")]
  Api { status: String, message: String },

  /// Deaccessioned datasets have no latest version to report on.
  #[error("dataset {0} has no latest version")]
  NoLatestVersion(String),

  #[error("search page at offset {0} returned no items")]
  EmptyPage(usize),

  #[error("column `{column}` not found in {file}")]
  MissingColumn { column: String, file: String },

  #[error("column `{0}` appears in more than one file")]
  OverlappingColumn(String),

  #[error("invalid input: {0}")]
  Invalid(String),
}

pub type Result<T> = std::result::Result<T, Error>;
