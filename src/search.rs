//! Paging through Search API results.
//!
//! Some installations carry misindexed datasets that make any search page
//! containing them fail (https://github.com/IQSS/dataverse/issues/4225).
//! When a page fails, the [`Paginator`] steps through the range one item at a
//! time until it finds the culprit, skips it, and goes back to full pages.

use std::collections::HashSet;

use indicatif::ProgressBar;
use tracing::{debug, info, warn};

use crate::api::{DataverseClient, SearchQuery};
use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
  Batch,
  Single,
}

/// Lazy sequence of identifier pages, driven by a `fetch(start, per_page)` callback.
///
/// The total is fixed at construction; a server whose count changes mid-run
/// is not tracked.
pub struct Paginator<F> {
  fetch: F,
  total: usize,
  page_size: usize,
  start: usize,
  mode: Mode,
  misindexed: usize,
}

impl<F> Paginator<F>
where
  F: FnMut(usize, usize) -> Result<Vec<String>>,
{
  pub fn new(total: usize, page_size: usize, fetch: F) -> Self {
    Paginator {
      fetch,
      total,
      page_size: page_size.max(1),
      start: 0,
      mode: Mode::Batch,
      misindexed: 0,
    }
  }

  /// Items skipped because they failed even when fetched on their own.
  pub fn misindexed(&self) -> usize {
    self.misindexed
  }

  pub fn offset(&self) -> usize {
    self.start
  }
}

impl<F> Iterator for Paginator<F>
where
  F: FnMut(usize, usize) -> Result<Vec<String>>,
{
  type Item = Vec<String>;

  fn next(&mut self) -> Option<Vec<String>> {
    while self.start < self.total {
      match self.mode {
        Mode::Batch => match (self.fetch)(self.start, self.page_size) {
          Ok(ids) => {
            self.start += self.page_size;
            return Some(ids);
          }
          Err(e) => {
            debug!(start = self.start, "page failed, retrying one at a time: {}", e);
            self.mode = Mode::Single;
          }
        },
        Mode::Single => {
          let start = self.start;
          let attempt = (self.fetch)(start, 1).and_then(|mut ids| {
            if ids.is_empty() {
              Err(Error::EmptyPage(start))
            } else {
              ids.truncate(1);
              Ok(ids)
            }
          });
          self.start += 1;
          match attempt {
            Ok(ids) => {
              self.mode = Mode::Batch;
              return Some(ids);
            }
            Err(e) => {
              warn!(start, "skipping misindexed search result: {}", e);
              self.misindexed += 1;
            }
          }
        }
      }
    }
    None
  }
}

/// Identifiers gathered from a full pagination run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PidHarvest {
  pub pids: Vec<String>,
  pub total: usize,
  pub misindexed: usize,
}

/// Drains a paginator, ticking `progress` once per identifier found.
pub fn collect_pids<F>(total: usize, page_size: usize, fetch: F, progress: &ProgressBar) -> PidHarvest
where
  F: FnMut(usize, usize) -> Result<Vec<String>>,
{
  let mut pages = Paginator::new(total, page_size, fetch);
  let mut pids = Vec::new();
  for page in pages.by_ref() {
    progress.inc(page.len() as u64);
    pids.extend(page);
  }
  PidHarvest {
    pids,
    total,
    misindexed: pages.misindexed(),
  }
}

/// Reads the total result count from a one-item page. This is the only
/// search call whose failure stops the run; a malformed first hit is left
/// for the paginator to skip.
pub fn total_results(client: &DataverseClient, query: &SearchQuery) -> Result<usize> {
  client.search_total(query)
}

/// Finds the PIDs of every dataset matching `query`.
pub fn search_dataset_pids(
  client: &DataverseClient,
  query: &SearchQuery,
  page_size: usize,
  progress: &ProgressBar,
) -> Result<PidHarvest> {
  let total = total_results(client, query)?;
  info!("search reports {} datasets", total);
  progress.set_length(total as u64);
  let harvest = collect_pids(
    total,
    page_size,
    |start, per_page| {
      let data = client.search(query, start, per_page)?;
      Ok(data.items.into_iter().map(|item| item.global_id).collect())
    },
    progress,
  );
  progress.finish();
  Ok(harvest)
}

/// Drops repeated identifiers, keeping each one's first position.
///
/// The Search API lists a published dataset that has a draft twice, once per
/// version.
pub fn dedup_pids(pids: Vec<String>) -> Vec<String> {
  let mut seen = HashSet::with_capacity(pids.len());
  pids.into_iter().filter(|pid| seen.insert(pid.clone())).collect()
}
