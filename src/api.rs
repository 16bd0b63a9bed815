use reqwest::blocking::{Client, RequestBuilder};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::config::{DateRange, ServerConfig};
use crate::error::{Error, Result};

const USER_AGENT: &str = concat!("dataverse-util/", env!("CARGO_PKG_VERSION"));
const API_KEY_HEADER: &str = "X-Dataverse-key";

/// Every native API response is wrapped as `{"status": "OK", "data": ...}`,
/// or `{"status": "ERROR", "message": ...}` when the call failed server-side.
#[derive(Debug, Deserialize)]
struct Envelope {
  status: String,
  #[serde(default)]
  message: Option<Value>,
  #[serde(default)]
  data: Value,
}

fn unwrap_envelope<T: DeserializeOwned>(body: &str) -> Result<T> {
  let envelope: Envelope = serde_json::from_str(body)?;
  if envelope.status != "OK" {
    let message = match envelope.message {
      Some(Value::String(text)) => text,
      Some(other) => other.to_string(),
      None => String::new(),
    };
    return Err(Error::Api {
      status: envelope.status,
      message,
    });
  }
  Ok(serde_json::from_value(envelope.data)?)
}

/// Parameters of a Search API call, minus the paging window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
  pub q: String,
  pub filters: Vec<String>,
  pub sort: Option<(String, String)>,
}

impl SearchQuery {
  /// Non-harvested datasets created within `range`, newest first.
  pub fn datasets_in_range(range: &DateRange) -> Self {
    SearchQuery {
      q: String::from("*"),
      filters: vec![
        String::from("-metadataSource:\"Harvested\""),
        range.filter_query(),
      ],
      sort: Some((String::from("date"), String::from("desc"))),
    }
  }

  /// Exact-phrase search for one dataset, used to find its dataverse.
  pub fn dataset_by_pid(pid: &str) -> Self {
    SearchQuery {
      q: format!("\"{}\"", pid),
      filters: Vec::new(),
      sort: None,
    }
  }

  fn params(&self, start: usize, per_page: usize) -> Vec<(&'static str, String)> {
    let mut params = vec![("q", self.q.clone()), ("type", String::from("dataset"))];
    for filter in &self.filters {
      params.push(("fq", filter.clone()));
    }
    if let Some((sort, order)) = &self.sort {
      params.push(("sort", sort.clone()));
      params.push(("order", order.clone()));
    }
    params.push(("start", start.to_string()));
    params.push(("per_page", per_page.to_string()));
    params
  }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchData {
  pub total_count: usize,
  #[serde(default)]
  pub items: Vec<SearchItem>,
}

/// Only the count of a search response, so a malformed first hit does not
/// hide the total.
#[derive(Debug, Clone, Deserialize)]
struct SearchCount {
  total_count: usize,
}

/// One search hit. Items without a `global_id` fail to parse, which is how
/// misindexed entries show up.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchItem {
  pub global_id: String,
  #[serde(default)]
  pub name_of_dataverse: Option<String>,
  #[serde(default)]
  pub identifier_of_dataverse: Option<String>,
}

/// Blocking client for the handful of native API endpoints the reports use.
#[derive(Debug, Clone)]
pub struct DataverseClient {
  http: Client,
  server: ServerConfig,
}

impl DataverseClient {
  pub fn new(server: &ServerConfig) -> Result<Self> {
    let http = Client::builder().user_agent(USER_AGENT).build()?;
    Ok(DataverseClient {
      http,
      server: server.clone(),
    })
  }

  pub fn server(&self) -> &ServerConfig {
    &self.server
  }

  fn endpoint(&self, path: &str) -> String {
    format!("{}{}", self.server.base_url, path)
  }

  fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
    match &self.server.api_token {
      Some(token) => request.header(API_KEY_HEADER, token),
      None => request,
    }
  }

  fn fetch<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
    let response = self.authorized(request).send()?;
    let status = response.status();
    let url = response.url().clone();
    let body = response.text()?;
    debug!(%url, %status, "fetched {} bytes", body.len());
    unwrap_envelope(&body)
  }

  fn search_request(&self, query: &SearchQuery, start: usize, per_page: usize) -> RequestBuilder {
    self
      .http
      .get(self.endpoint("/api/search"))
      .query(&query.params(start, per_page))
  }

  pub fn search(&self, query: &SearchQuery, start: usize, per_page: usize) -> Result<SearchData> {
    self.fetch(self.search_request(query, start, per_page))
  }

  /// Total number of results for `query`, read from a one-item page without
  /// looking at the item itself.
  pub fn search_total(&self, query: &SearchQuery) -> Result<usize> {
    let count: SearchCount = self.fetch(self.search_request(query, 0, 1))?;
    Ok(count.total_count)
  }

  /// The "Get JSON" representation of a dataset (the envelope's `data` block).
  pub fn dataset(&self, pid: &str) -> Result<Value> {
    let request = self
      .http
      .get(self.endpoint("/api/datasets/:persistentId/"))
      .query(&[("persistentId", pid)]);
    self.fetch(request)
  }

  /// All locks of one type across the installation.
  pub fn locks_by_type(&self, lock_type: &str) -> Result<Vec<Value>> {
    let request = self
      .http
      .get(self.endpoint("/api/datasets/locks"))
      .query(&[("type", lock_type)]);
    self.fetch(request)
  }

  pub fn dataset_locks(&self, pid: &str) -> Result<Vec<Value>> {
    let request = self
      .http
      .get(self.endpoint("/api/datasets/:persistentId/locks"))
      .query(&[("persistentId", pid)]);
    self.fetch(request)
  }

  /// Replaces the given metadata fields of a dataset's draft; the status code
  /// is returned as-is so callers can report per-dataset outcomes.
  pub fn edit_metadata(&self, pid: &str, fields: &Value) -> Result<StatusCode> {
    let request = self
      .http
      .put(self.endpoint("/api/datasets/:persistentId/editMetadata"))
      .query(&[("persistentId", pid), ("replace", "true")])
      .json(fields);
    let response = self.authorized(request).send()?;
    Ok(response.status())
  }
}
