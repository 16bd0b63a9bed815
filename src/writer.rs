use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use csv::WriterBuilder;

use crate::error::Result;

/// Append-only CSV report.
///
/// The file is created once with its header, then reopened in append mode for
/// every batch, so whatever was written before an interruption stays a valid
/// CSV on disk.
#[derive(Debug, Clone)]
pub struct ReportWriter {
  path: PathBuf,
  rows_written: usize,
}

impl ReportWriter {
  /// Creates (or truncates) `path` and writes `header`.
  pub fn create<H>(path: &Path, header: H) -> Result<Self>
  where
    H: IntoIterator,
    H::Item: AsRef<[u8]>,
  {
    let file = File::create(path)?;
    let mut csv_writer = WriterBuilder::new().from_writer(file);
    csv_writer.write_record(header)?;
    csv_writer.flush()?;
    Ok(ReportWriter {
      path: path.to_path_buf(),
      rows_written: 0,
    })
  }

  pub fn append<R, I>(&mut self, rows: R) -> Result<usize>
  where
    R: IntoIterator<Item = I>,
    I: IntoIterator,
    I::Item: AsRef<[u8]>,
  {
    let file = OpenOptions::new().append(true).open(&self.path)?;
    let mut csv_writer = WriterBuilder::new().from_writer(file);
    let mut count = 0;
    for row in rows {
      csv_writer.write_record(row)?;
      count += 1;
    }
    csv_writer.flush()?;
    self.rows_written += count;
    Ok(count)
  }

  pub fn path(&self) -> &Path {
    &self.path
  }

  pub fn rows_written(&self) -> usize {
    self.rows_written
  }
}
