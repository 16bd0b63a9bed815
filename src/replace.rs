use std::path::Path;

use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::api::DataverseClient;
use crate::error::Result;

/// One line of the input CSV. Extra columns are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct ReplacementRow {
  pub persistent_id: String,
  pub title: String,
  #[serde(rename = "dsDescriptionValue")]
  pub description: String,
  /// Author names separated by `;`; the author field is left alone when empty.
  #[serde(rename = "authorName", default)]
  pub authors: Option<String>,
}

impl ReplacementRow {
  /// The `fields` payload accepted by the editMetadata endpoint.
  pub fn payload(&self) -> Value {
    let mut fields = vec![json!({
      "typeName": "title",
      "value": self.title.trim_end(),
    })];

    let authors: Vec<Value> = self
      .authors
      .as_deref()
      .unwrap_or_default()
      .split(';')
      .map(str::trim)
      .filter(|name| !name.is_empty())
      .map(|name| {
        json!({
          "authorName": {"typeName": "authorName", "value": name}
        })
      })
      .collect();
    if !authors.is_empty() {
      fields.push(json!({"typeName": "author", "value": authors}));
    }

    fields.push(json!({
      "typeName": "dsDescription",
      "value": [{
        "dsDescriptionValue": {
          "typeName": "dsDescriptionValue",
          "value": self.description.trim_end(),
        }
      }]
    }));
    json!({ "fields": fields })
  }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplaceSummary {
  pub succeeded: Vec<String>,
  /// PID and the HTTP status code the server answered with.
  pub failed: Vec<(String, u16)>,
}

pub fn read_rows(csv_path: &Path) -> Result<Vec<ReplacementRow>> {
  let mut reader = csv::Reader::from_path(csv_path)?;
  let mut rows = Vec::new();
  for row in reader.deserialize::<ReplacementRow>() {
    rows.push(row?);
  }
  Ok(rows)
}

/// Replaces the metadata of every dataset listed in `csv_path`.
pub fn run(client: &DataverseClient, csv_path: &Path) -> Result<ReplaceSummary> {
  let rows = read_rows(csv_path)?;
  let total = rows.len();
  let mut summary = ReplaceSummary::default();
  for (count, row) in rows.iter().enumerate() {
    let pid = row.persistent_id.trim_end();
    let status = client.edit_metadata(pid, &row.payload())?;
    if status.as_u16() == 200 {
      info!("Success! {} - {} of {}", pid, count + 1, total);
      summary.succeeded.push(pid.to_string());
    } else {
      warn!("Failed ({}): {}! {} of {}", status.as_u16(), pid, count + 1, total);
      summary.failed.push((pid.to_string(), status.as_u16()));
    }
  }
  Ok(summary)
}
