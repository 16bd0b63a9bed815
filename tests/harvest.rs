//! End-to-end runs of the dataset and file report against a mocked installation.

use std::path::Path;

use dataverse_util::api::DataverseClient;
use dataverse_util::config::{DateRange, HarvestConfig, ServerConfig};
use dataverse_util::harvest;
use dataverse_util::rows::NO_FILES;
use dataverse_util::Error;
use mockito::{Matcher, Mock, Server};
use serde_json::json;

fn config(server: &Server, output_dir: &Path, dataverse_lookup: bool) -> HarvestConfig {
  HarvestConfig {
    server: ServerConfig::new(&server.url(), Some(String::from("secret-token"))),
    range: DateRange::parse("2021-03-01", "2021-03-31").unwrap(),
    output_dir: output_dir.to_path_buf(),
    page_size: 10,
    short_date: true,
    dataverse_lookup,
    show_progress: false,
  }
}

fn search_page(server: &mut Server, start: &str, per_page: &str, total: usize, pids: &[&str]) -> Mock {
  let items: Vec<_> = pids.iter().map(|pid| json!({"global_id": pid})).collect();
  server
    .mock("GET", "/api/search")
    .match_query(Matcher::AllOf(vec![
      Matcher::UrlEncoded("q".into(), "*".into()),
      Matcher::UrlEncoded("start".into(), start.into()),
      Matcher::UrlEncoded("per_page".into(), per_page.into()),
    ]))
    .with_header("content-type", "application/json")
    .with_body(json!({"status": "OK", "data": {"total_count": total, "items": items}}).to_string())
    .create()
}

fn dataset(server: &mut Server, pid: &str, title: &str, files: serde_json::Value) -> Mock {
  let body = json!({"status": "OK", "data": {"latestVersion": {
    "datasetPersistentId": pid,
    "versionState": "RELEASED",
    "lastUpdateTime": "2021-03-15T12:00:00Z",
    "metadataBlocks": {"citation": {"fields": [{"typeName": "title", "value": title}]}},
    "files": files
  }}});
  server
    .mock("GET", "/api/datasets/:persistentId/")
    .match_query(Matcher::UrlEncoded("persistentId".into(), pid.into()))
    .match_header("X-Dataverse-key", "secret-token")
    .with_header("content-type", "application/json")
    .with_body(body.to_string())
    .create()
}

fn dataverse_of(server: &mut Server, pid: &str, name: &str, alias: &str) -> Mock {
  server
    .mock("GET", "/api/search")
    .match_query(Matcher::UrlEncoded("q".into(), format!("\"{}\"", pid)))
    .with_header("content-type", "application/json")
    .with_body(
      json!({"status": "OK", "data": {"total_count": 1, "items": [{
        "global_id": pid,
        "name_of_dataverse": name,
        "identifier_of_dataverse": alias
      }]}})
      .to_string(),
    )
    .create()
}

fn read_rows(path: &Path) -> (Vec<String>, Vec<Vec<String>>) {
  let mut reader = csv::Reader::from_path(path).unwrap();
  let header = reader.headers().unwrap().iter().map(String::from).collect();
  let rows = reader
    .records()
    .map(|record| record.unwrap().iter().map(String::from).collect())
    .collect();
  (header, rows)
}

#[test]
fn writes_one_row_per_file_and_a_placeholder_for_empty_datasets() {
  let mut server = Server::new();
  let _count = search_page(&mut server, "0", "1", 3, &["doi:10.5072/FK2/A"]);
  let _page = search_page(
    &mut server,
    "0",
    "10",
    3,
    &["doi:10.5072/FK2/A", "doi:10.5072/FK2/B", "doi:10.5072/FK2/C"],
  );
  let _a = dataset(
    &mut server,
    "doi:10.5072/FK2/A",
    "Rainfall, daily",
    json!([{"label": "rain.csv", "dataFile": {"filesize": 1024, "contentType": "text/csv"}}]),
  );
  let _b = dataset(
    &mut server,
    "doi:10.5072/FK2/B",
    "Soil samples",
    json!([{"label": "soil.tab", "dataFile": {"filesize": 10, "contentType": "text/tab-separated-values"}}]),
  );
  let _c = dataset(&mut server, "doi:10.5072/FK2/C", "Empty deposit", json!([]));
  let _dv_a = dataverse_of(&mut server, "doi:10.5072/FK2/A", "Hydrology Lab", "hydro");
  let _dv_b = dataverse_of(&mut server, "doi:10.5072/FK2/B", "Soil Lab", "soil");
  let _dv_c = dataverse_of(&mut server, "doi:10.5072/FK2/C", "Soil Lab", "soil");

  let out = tempfile::tempdir().unwrap();
  let config = config(&server, out.path(), true);
  let client = DataverseClient::new(&config.server).unwrap();
  let summary = harvest::run(&client, &config).unwrap();

  assert_eq!(summary.total_reported, 3);
  assert_eq!(summary.misindexed, 0);
  assert_eq!(summary.datasets_written, 3);
  assert_eq!(summary.rows_written, 3);
  assert!(summary.pid_errors.is_empty());
  assert!(summary
    .output_path
    .ends_with("datasetinfo_2021.03.01-2021.03.31.csv"));

  let (header, rows) = read_rows(&summary.output_path);
  assert_eq!(header[0], "datasetTitle (versionState) (DOI)");
  assert_eq!(rows.len(), 3);
  assert_eq!(rows[0][0], "Rainfall, daily (RELEASED) (doi:10.5072/FK2/A)");
  assert_eq!(rows[0][1], "rain.csv (1.0 KB)");
  assert_eq!(rows[0][2], "text/csv");
  assert_eq!(rows[0][4], "Hydrology Lab (hydro)");
  assert_eq!(rows[1][1], "soil.tab (10 bytes)");
  assert_eq!(rows[2][1], NO_FILES);
  assert_eq!(rows[2][2], NO_FILES);
  assert_eq!(rows[2][4], "Soil Lab (soil)");
}

#[test]
fn duplicates_and_deaccessioned_datasets() {
  let mut server = Server::new();
  let _count = search_page(&mut server, "0", "1", 3, &["doi:1"]);
  let _page = search_page(&mut server, "0", "10", 3, &["doi:1", "doi:1", "doi:2"]);
  let _one = dataset(&mut server, "doi:1", "Draft and published", json!([]));
  let _two = server
    .mock("GET", "/api/datasets/:persistentId/")
    .match_query(Matcher::UrlEncoded("persistentId".into(), "doi:2".into()))
    .with_body(json!({"status": "OK", "data": {"id": 2}}).to_string())
    .create();

  let out = tempfile::tempdir().unwrap();
  let config = config(&server, out.path(), false);
  let client = DataverseClient::new(&config.server).unwrap();
  let summary = harvest::run(&client, &config).unwrap();

  assert_eq!(summary.pids_found, 3);
  assert_eq!(summary.unique_datasets, 2);
  assert!(summary.had_duplicates());
  assert_eq!(summary.datasets_written, 1);
  assert!(summary.pid_errors.contains("doi:2"));

  let (_, rows) = read_rows(&summary.output_path);
  assert_eq!(rows.len(), 1);
  assert_eq!(rows[0][4], "");
}

#[test]
fn skips_misindexed_search_results() {
  let mut server = Server::new();
  let _broken_pages = server
    .mock("GET", "/api/search")
    .match_query(Matcher::AllOf(vec![
      Matcher::UrlEncoded("q".into(), "*".into()),
      Matcher::UrlEncoded("per_page".into(), "10".into()),
    ]))
    .with_status(500)
    .with_body("<html>Internal Server Error</html>")
    .create();
  let _first = search_page(&mut server, "0", "1", 3, &["doi:1"]);
  let _misindexed = server
    .mock("GET", "/api/search")
    .match_query(Matcher::AllOf(vec![
      Matcher::UrlEncoded("q".into(), "*".into()),
      Matcher::UrlEncoded("start".into(), "1".into()),
      Matcher::UrlEncoded("per_page".into(), "1".into()),
    ]))
    .with_body(json!({"status": "OK", "data": {"total_count": 3, "items": [{"name": "broken"}]}}).to_string())
    .create();
  let _third = search_page(&mut server, "2", "1", 3, &["doi:3"]);
  let _one = dataset(&mut server, "doi:1", "First", json!([]));
  let _three = dataset(&mut server, "doi:3", "Third", json!([]));

  let out = tempfile::tempdir().unwrap();
  let config = config(&server, out.path(), false);
  let client = DataverseClient::new(&config.server).unwrap();
  let summary = harvest::run(&client, &config).unwrap();

  assert_eq!(summary.misindexed, 1);
  assert_eq!(summary.pids_found, 2);
  assert_eq!(summary.rows_written, 2);
}

#[test]
fn misindexed_first_hit_is_skipped_not_fatal() {
  let mut server = Server::new();
  let _broken_pages = server
    .mock("GET", "/api/search")
    .match_query(Matcher::AllOf(vec![
      Matcher::UrlEncoded("q".into(), "*".into()),
      Matcher::UrlEncoded("per_page".into(), "10".into()),
    ]))
    .with_status(500)
    .with_body("<html>Internal Server Error</html>")
    .create();
  let _first = server
    .mock("GET", "/api/search")
    .match_query(Matcher::AllOf(vec![
      Matcher::UrlEncoded("q".into(), "*".into()),
      Matcher::UrlEncoded("start".into(), "0".into()),
      Matcher::UrlEncoded("per_page".into(), "1".into()),
    ]))
    .with_body(json!({"status": "OK", "data": {"total_count": 2, "items": [{"name": "broken"}]}}).to_string())
    .create();
  let _second = search_page(&mut server, "1", "1", 2, &["doi:2"]);
  let _two = dataset(&mut server, "doi:2", "Second", json!([]));

  let out = tempfile::tempdir().unwrap();
  let config = config(&server, out.path(), false);
  let client = DataverseClient::new(&config.server).unwrap();
  let summary = harvest::run(&client, &config).unwrap();

  assert_eq!(summary.total_reported, 2);
  assert_eq!(summary.misindexed, 1);
  assert_eq!(summary.pids_found, 1);
  assert_eq!(summary.datasets_written, 1);
  assert!(summary.pid_errors.is_empty());
  let (_, rows) = read_rows(&summary.output_path);
  assert_eq!(rows.len(), 1);
  assert_eq!(rows[0][0], "Second (RELEASED) (doi:2)");
}

#[test]
fn failing_initial_search_aborts_the_run() {
  let mut server = Server::new();
  let _count = server
    .mock("GET", "/api/search")
    .match_query(Matcher::Any)
    .with_status(400)
    .with_body(json!({"status": "ERROR", "message": "Invalid date range"}).to_string())
    .create();

  let out = tempfile::tempdir().unwrap();
  let config = config(&server, out.path(), true);
  let client = DataverseClient::new(&config.server).unwrap();
  match harvest::run(&client, &config) {
    Err(Error::Api { message, .. }) => assert_eq!(message, "Invalid date range"),
    other => panic!("unexpected {:?}", other),
  }
  assert!(!config.output_path().exists());
}

#[test]
fn empty_result_writes_only_the_header() {
  let mut server = Server::new();
  let _count = search_page(&mut server, "0", "1", 0, &[]);

  let out = tempfile::tempdir().unwrap();
  let config = config(&server, out.path(), true);
  let client = DataverseClient::new(&config.server).unwrap();
  let summary = harvest::run(&client, &config).unwrap();

  assert_eq!(summary.rows_written, 0);
  let (header, rows) = read_rows(&summary.output_path);
  assert_eq!(header.len(), 5);
  assert!(rows.is_empty());
}
