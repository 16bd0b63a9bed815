use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::{Error, Result};
use crate::writer::ReportWriter;

pub const JOINED_FILE_NAME: &str = "joined.csv";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
  pub name: String,
  pub headers: Vec<String>,
  pub rows: Vec<Vec<String>>,
}

impl Table {
  pub fn read(path: &Path) -> Result<Self> {
    let mut reader = csv::Reader::from_path(path)?;
    let headers = reader.headers()?.iter().map(String::from).collect();
    let mut rows = Vec::new();
    for record in reader.records() {
      rows.push(record?.iter().map(String::from).collect());
    }
    Ok(Table {
      name: path.display().to_string(),
      headers,
      rows,
    })
  }

  fn column(&self, name: &str) -> Result<usize> {
    self
      .headers
      .iter()
      .position(|header| header == name)
      .ok_or_else(|| Error::MissingColumn {
        column: name.to_string(),
        file: self.name.clone(),
      })
  }
}

/// A table's rows grouped by their key, keeping only the non-key cells.
struct Keyed {
  width: usize,
  groups: BTreeMap<Vec<String>, Vec<Vec<String>>>,
}

/// Full outer join of `tables` on the `keys` columns.
///
/// The result has the key columns first, then every table's remaining
/// columns in order. Rows come out sorted by key; a key missing from a table
/// leaves that table's cells empty, and keys repeated within tables produce
/// every combination.
pub fn full_outer_join(tables: &[Table], keys: &[String]) -> Result<Table> {
  if tables.is_empty() || keys.is_empty() {
    return Err(Error::Invalid(String::from(
      "need at least one file and one key column to join",
    )));
  }

  let mut headers: Vec<String> = keys.to_vec();
  let mut seen: HashSet<String> = keys.iter().cloned().collect();
  let mut keyed = Vec::with_capacity(tables.len());
  let mut all_keys = BTreeSet::new();

  for table in tables {
    let key_columns = keys
      .iter()
      .map(|key| table.column(key))
      .collect::<Result<Vec<_>>>()?;
    let value_columns: Vec<usize> = (0..table.headers.len())
      .filter(|i| !key_columns.contains(i))
      .collect();
    for &i in &value_columns {
      let header = &table.headers[i];
      if !seen.insert(header.clone()) {
        return Err(Error::OverlappingColumn(header.clone()));
      }
      headers.push(header.clone());
    }

    let mut groups: BTreeMap<Vec<String>, Vec<Vec<String>>> = BTreeMap::new();
    for row in &table.rows {
      let cell = |i: usize| row.get(i).cloned().unwrap_or_default();
      let key: Vec<String> = key_columns.iter().map(|&i| cell(i)).collect();
      let values = value_columns.iter().map(|&i| cell(i)).collect();
      all_keys.insert(key.clone());
      groups.entry(key).or_default().push(values);
    }
    keyed.push(Keyed {
      width: value_columns.len(),
      groups,
    });
  }

  let mut rows = Vec::new();
  for key in all_keys {
    let mut combined = vec![key.clone()];
    for table in &keyed {
      let blank = vec![vec![String::new(); table.width]];
      let parts = table.groups.get(&key).unwrap_or(&blank);
      combined = combined
        .iter()
        .flat_map(|prefix| {
          parts.iter().map(move |part| {
            let mut row = prefix.clone();
            row.extend(part.iter().cloned());
            row
          })
        })
        .collect();
    }
    rows.extend(combined);
  }

  Ok(Table {
    name: String::from(JOINED_FILE_NAME),
    headers,
    rows,
  })
}

pub fn run(files: &[PathBuf], keys: &[String], output_dir: &Path) -> Result<PathBuf> {
  info!("reading {} CSV file(s)", files.len());
  let tables = files
    .iter()
    .map(|path| Table::read(path))
    .collect::<Result<Vec<_>>>()?;
  info!("joining on {}", keys.join(", "));
  let joined = full_outer_join(&tables, keys)?;

  let path = output_dir.join(JOINED_FILE_NAME);
  let mut report = ReportWriter::create(&path, &joined.headers)?;
  report.append(&joined.rows)?;
  info!("joined {} rows into {}", joined.rows.len(), path.display());
  Ok(path)
}
