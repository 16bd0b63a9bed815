use std::fs;
use std::path::{Path, PathBuf};

use jwalk::WalkDir;
use serde_json::Value;
use tracing::{info, warn};

use crate::error::Result;
use crate::fields::{find_typed, FieldAccess};
use crate::writer::ReportWriter;

pub const OUTPUT_FILE_NAME: &str = "relatedpublication.csv";

pub const HEADER: [&str; 6] = [
  "dataset_id",
  "persistentUrl",
  "publicationIDType",
  "publicationIDNumber",
  "publicationURL",
  "publicationCitation",
];

/// Rows for every related publication of one "Get JSON" dataset export.
pub fn publication_rows(export: &Value) -> Vec<[String; 6]> {
  let dataset_id = export.text("/data/id");
  let persistent_url = export.text("/data/persistentUrl");
  let fields = export.list("/data/latestVersion/metadataBlocks/citation/fields");
  let publications = find_typed(fields, "publication")
    .map(|field| field.list("/value"))
    .unwrap_or(&[]);

  publications
    .iter()
    .map(|publication| {
      [
        dataset_id.clone(),
        persistent_url.clone(),
        publication.text("/publicationIDType/value"),
        publication.text("/publicationIDNumber/value"),
        publication.text("/publicationURL/value"),
        publication.text("/publicationCitation/value"),
      ]
    })
    .collect()
}

/// The `*.json` files directly inside `dir`, in name order.
pub fn json_exports(dir: &Path) -> Vec<PathBuf> {
  WalkDir::new(dir)
    .sort(true)
    .min_depth(1)
    .max_depth(1)
    .into_iter()
    .flatten()
    .map(|entry| entry.path())
    .filter(|path| path.is_file() && path.extension().map_or(false, |ext| ext == "json"))
    .collect()
}

fn read_export(path: &Path) -> Result<Value> {
  let text = fs::read_to_string(path)?;
  Ok(serde_json::from_str(&text)?)
}

/// Writes `relatedpublication.csv` into `output_dir` from the exports in `json_dir`.
pub fn run(json_dir: &Path, output_dir: &Path) -> Result<PathBuf> {
  let path = output_dir.join(OUTPUT_FILE_NAME);
  let mut report = ReportWriter::create(&path, HEADER)?;
  let exports = json_exports(json_dir);
  info!("reading {} dataset export(s) from {}", exports.len(), json_dir.display());

  for export_path in exports {
    let export = match read_export(&export_path) {
      Ok(export) => export,
      Err(e) => {
        warn!("skipping {}: {}", export_path.display(), e);
        continue;
      }
    };
    report.append(publication_rows(&export))?;
  }
  info!("wrote {} row(s) to {}", report.rows_written(), path.display());
  Ok(path)
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  fn export() -> Value {
    json!({"status": "OK", "data": {
      "id": 1234,
      "persistentUrl": "https://doi.org/10.5072/FK2/ABC",
      "latestVersion": {"metadataBlocks": {"citation": {"fields": [
        {"typeName": "title", "value": "Survey"},
        {"typeName": "publication", "multiple": true, "typeClass": "compound", "value": [
          {
            "publicationIDType": {"typeName": "publicationIDType", "value": "doi"},
            "publicationIDNumber": {"typeName": "publicationIDNumber", "value": "10.1000/xyz"},
            "publicationCitation": {"typeName": "publicationCitation", "value": "Doe, J. (2020)."}
          },
          {
            "publicationURL": {"typeName": "publicationURL", "value": "https://example.org/paper"}
          }
        ]}
      ]}}}
    }})
  }

  #[test]
  fn one_row_per_publication_with_blank_gaps() {
    let rows = publication_rows(&export());
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0][0], "1234");
    assert_eq!(rows[0][2], "doi");
    assert_eq!(rows[0][4], "");
    assert_eq!(rows[1][4], "https://example.org/paper");
    assert_eq!(rows[1][5], "");
  }

  #[test]
  fn datasets_without_publications_write_nothing() {
    let bare = json!({"data": {"id": 1, "latestVersion": {}}});
    assert!(publication_rows(&bare).is_empty());
  }

  #[test]
  fn reads_only_json_exports() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("b.json"), export().to_string()).unwrap();
    fs::write(dir.path().join("a.json"), "not json").unwrap();
    fs::write(dir.path().join("notes.txt"), "ignore me").unwrap();
    let out = tempfile::tempdir().unwrap();

    let path = run(dir.path(), out.path()).unwrap();
    let text = fs::read_to_string(path).unwrap();
    assert_eq!(text.lines().count(), 3);
    assert!(text.lines().next().unwrap().starts_with("dataset_id,persistentUrl"));
  }
}
