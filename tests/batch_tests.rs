//! End-to-end batch tests: raw text -> normalize -> run -> classify -> export
//!
//! A wiremock server answers with different statuses per path prefix so a
//! single run covers every bucket.

mod common;

use common::{batch_config, probe_config, refused_url};
use link_prober::batch::{buckets, group_by_host, summarize};
use link_prober::checker::{ProbeResult, StatusClass};
use link_prober::export::{plain_text_urls, write_csv_file, CSV_HEADER};
use link_prober::{normalize, run, Prober};
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn start_mixed_server() -> MockServer {
    let mock_server = MockServer::start().await;

    Mock::given(method("HEAD"))
        .and(path_regex("^/ok/"))
        .respond_with(ResponseTemplate::new(200).insert_header("content-type", "text/plain"))
        .mount(&mock_server)
        .await;

    Mock::given(method("HEAD"))
        .and(path_regex("^/missing/"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    Mock::given(method("HEAD"))
        .and(path_regex("^/error/"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    mock_server
}

/// 24 mock URLs (ok / missing / error in rotation) plus one refused URL,
/// mixed with blank and invalid pieces.
fn build_input(base: &str) -> String {
    let mut pieces = Vec::new();
    for i in 0..24 {
        let kind = match i % 3 {
            0 => "ok",
            1 => "missing",
            _ => "error",
        };
        pieces.push(format!("{}/{}/{}", base, kind, i));
        if i == 5 {
            pieces.push("https://bad..url".to_string());
        }
        if i == 12 {
            pieces.push("   ".to_string());
        }
    }
    pieces.push(refused_url());

    // Alternate separators
    pieces
        .iter()
        .enumerate()
        .map(|(i, piece)| if i % 2 == 0 { format!("{},", piece) } else { format!("{}\n", piece) })
        .collect()
}

#[tokio::test]
async fn test_batch_of_25_in_groups_of_10() {
    let mock_server = start_mixed_server().await;
    let urls = normalize(&build_input(&mock_server.uri()));
    assert_eq!(urls.len(), 25);

    let prober = Prober::new(&probe_config(5)).unwrap();
    let mut progress = Vec::new();

    let report = run(&prober, &urls, &batch_config(10), &CancellationToken::new(), |p| {
        progress.push((p.completed, p.total))
    })
    .await;

    assert_eq!(progress, vec![(10, 25), (20, 25), (25, 25)]);
    assert!(!report.cancelled);
    assert_eq!(report.results.len(), urls.len());
    for (result, url) in report.results.iter().zip(&urls) {
        assert_eq!(&result.url, url);
        // Exactly one of status / error
        assert_ne!(result.status.is_some(), result.error.is_some());
    }

    let summary = summarize(&report.results);
    assert_eq!(summary.success, 8);
    assert_eq!(summary.client_error, 8);
    assert_eq!(summary.server_error, 8);
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.problems(), 17);

    let buckets = buckets(&report.results);
    assert_eq!(buckets[&StatusClass::Failed][0].url, urls[24]);

    let hosts = group_by_host(&report.results);
    assert_eq!(hosts.len(), 1);
    assert_eq!(hosts["127.0.0.1"].len(), 25);

    let working = plain_text_urls(&report.results);
    assert_eq!(working.len(), 8);
    assert!(working.iter().all(|url| url.contains("/ok/")));
}

/// Checks every CSV column against the result it was written from
fn assert_row_matches(record: &csv::StringRecord, result: &ProbeResult) {
    assert_eq!(record.len(), CSV_HEADER.len());
    assert_eq!(&record[0], result.url);
    assert_eq!(
        &record[1],
        result.status.map(|s| s.to_string()).unwrap_or_default()
    );
    assert_eq!(&record[2], result.status_text);
    assert_eq!(&record[3], result.response_time_ms.to_string());
    assert_eq!(&record[4], if result.redirected { "Yes" } else { "No" });
    assert_eq!(&record[5], result.redirect_url.clone().unwrap_or_default());
    assert_eq!(&record[6], result.page_title.clone().unwrap_or_default());
    assert_eq!(&record[7], result.meta_description.clone().unwrap_or_default());
    assert_eq!(&record[8], result.canonical.clone().unwrap_or_default());
    assert_eq!(&record[9], result.error.clone().unwrap_or_default());
}

fn read_back(path: &std::path::Path) -> Vec<csv::StringRecord> {
    let mut reader = csv::Reader::from_path(path).unwrap();
    let headers: Vec<String> = reader.headers().unwrap().iter().map(str::to_string).collect();
    assert_eq!(headers, CSV_HEADER);
    reader.records().map(Result::unwrap).collect()
}

#[tokio::test]
async fn test_csv_export_reads_back() {
    let mock_server = start_mixed_server().await;
    let urls = normalize(&build_input(&mock_server.uri()));

    let prober = Prober::new(&probe_config(5)).unwrap();
    let report = run(&prober, &urls, &batch_config(10), &CancellationToken::new(), |_| {}).await;

    let dir = tempfile::tempdir().unwrap();
    let csv_path = dir.path().join("results.csv");
    write_csv_file(&report.results, &csv_path).unwrap();

    let records = read_back(&csv_path);
    assert_eq!(records.len(), report.results.len());
    for (record, result) in records.iter().zip(&report.results) {
        assert_row_matches(record, result);
    }
}

#[tokio::test]
async fn test_csv_keeps_scraped_fields_with_quotes_commas_and_newlines() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();
    let target = format!("{}/new", base);
    let canonical = format!("{}/c,d", base);

    Mock::given(path("/old"))
        .respond_with(ResponseTemplate::new(301).insert_header("location", target.as_str()))
        .mount(&mock_server)
        .await;

    Mock::given(method("HEAD"))
        .and(path("/new"))
        .respond_with(ResponseTemplate::new(200).insert_header("content-type", "text/html"))
        .mount(&mock_server)
        .await;

    let page = format!(
        "<html><head>\n<title>A \"q\", b</title>\n\
         <meta name=\"description\" content=\"line1\nline2 &quot;x&quot;\">\n\
         <link rel=\"canonical\" href=\"{}\">\n</head><body></body></html>",
        canonical
    );
    Mock::given(method("GET"))
        .and(path("/new"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/html")
                .set_body_string(page),
        )
        .mount(&mock_server)
        .await;

    let urls = normalize(&format!("{}/old\n{}", base, refused_url()));
    assert_eq!(urls.len(), 2);

    let prober = Prober::new(&probe_config(5)).unwrap();
    let report = run(&prober, &urls, &batch_config(10), &CancellationToken::new(), |_| {}).await;

    // The in-memory result carries the awkward values we want to export
    let scraped = &report.results[0];
    assert!(scraped.redirected);
    assert_eq!(scraped.redirect_url.as_deref(), Some(target.as_str()));
    assert_eq!(scraped.page_title.as_deref(), Some("A \"q\", b"));
    assert_eq!(scraped.meta_description.as_deref(), Some("line1\nline2 \"x\""));
    assert_eq!(scraped.canonical.as_deref(), Some(canonical.as_str()));
    assert!(report.results[1].is_failed());

    let dir = tempfile::tempdir().unwrap();
    let csv_path = dir.path().join("scraped.csv");
    write_csv_file(&report.results, &csv_path).unwrap();

    // Quotes are doubled and the newline stays inside its quoted field
    let raw = std::fs::read_to_string(&csv_path).unwrap();
    assert!(raw.contains("\"A \"\"q\"\", b\""));
    assert!(raw.contains("\"line1\nline2 \"\"x\"\"\""));

    let records = read_back(&csv_path);
    assert_eq!(records.len(), 2);
    for (record, result) in records.iter().zip(&report.results) {
        assert_row_matches(record, result);
    }

    assert_eq!(&records[0][0], format!("{}/old", base));
    assert_eq!(&records[0][1], "200");
    assert_eq!(&records[0][4], "Yes");
    assert_eq!(&records[0][5], target);
    assert_eq!(&records[0][6], "A \"q\", b");
    assert_eq!(&records[0][7], "line1\nline2 \"x\"");
    assert_eq!(&records[0][8], canonical);
    assert_eq!(&records[0][9], "");

    assert_eq!(&records[1][1], "");
    assert_eq!(&records[1][2], "Error");
    assert_eq!(&records[1][4], "No");
    assert!(records[1][9].starts_with("Connection failed"));
}

#[tokio::test]
async fn test_cancelled_run_keeps_completed_groups() {
    let mock_server = start_mixed_server().await;
    let urls = normalize(&build_input(&mock_server.uri()));

    let prober = Prober::new(&probe_config(5)).unwrap();
    let cancel = CancellationToken::new();
    let trigger = cancel.clone();

    let report = run(&prober, &urls, &batch_config(10), &cancel, |p| {
        if p.completed >= 10 {
            trigger.cancel();
        }
    })
    .await;

    assert!(report.cancelled);
    assert_eq!(report.results.len(), 10);
    assert_eq!(report.progress.total, 25);
    for (result, url) in report.results.iter().zip(&urls) {
        assert_eq!(&result.url, url);
    }
}
