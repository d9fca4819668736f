//! World Community Grid crawls through the full ingestion run

use crate::common::{api_page, api_record, wcg_config, FailingSink};
use boinc_ingest::crawler::run_ingestion;
use boinc_ingest::{IngestError, MemorySink, MetricSink};
use std::collections::HashMap;
use std::sync::Arc;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const RESULTS_PATH: &str = "/api/members/profile/alice/results";

async fn mount_offset(server: &MockServer, offset: u32, body: serde_json::Value, calls: u64) {
    Mock::given(method("GET"))
        .and(path(RESULTS_PATH))
        .and(query_param("code", "CODE123"))
        .and(query_param("offset", offset.to_string()))
        .and(query_param("limit", "250"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(calls)
        .mount(server)
        .await;
}

fn named_records(range: std::ops::Range<usize>, granted: f64) -> Vec<serde_json::Value> {
    range
        .map(|i| api_record(&format!("MCM1_0001_{:04}_0", i), granted))
        .collect()
}

#[tokio::test]
async fn test_ungranted_results_are_not_persisted() {
    let server = MockServer::start().await;

    let mut records = named_records(0..245, 62.0);
    records.extend(named_records(245..248, 0.0));
    records.extend(named_records(248..250, -1.0));
    mount_offset(&server, 0, api_page(records), 1).await;
    mount_offset(&server, 240, api_page(vec![]), 1).await;

    let sink = Arc::new(MemorySink::new());
    let summary = run_ingestion(wcg_config(server.uri()), sink.clone())
        .await
        .unwrap();

    assert_eq!(summary.total_persisted, 245);
    assert_eq!(sink.count(), 245);

    let report = summary.wcg.unwrap();
    assert_eq!(report.records_seen, 250);
    assert_eq!(report.points_emitted, 245);

    let point = &sink.points()[0];
    assert_eq!(point.measurement, "boinc_results");
    assert_eq!(point.tag("Project"), Some("World Community Grid"));
    assert_eq!(point.tag("DeviceName"), Some("crunchbox"));
    assert_eq!(point.field("CpuTime"), Some(4500.0));
    assert_eq!(point.field("ClaimedCredit"), Some(70.5));
    assert_eq!(point.time, 1_704_103_200);
}

#[tokio::test]
async fn test_empty_first_page_ends_crawl() {
    let server = MockServer::start().await;
    mount_offset(&server, 0, api_page(vec![]), 1).await;
    mount_offset(&server, 240, api_page(named_records(0..3, 1.0)), 0).await;

    let sink = Arc::new(MemorySink::new());
    let summary = run_ingestion(wcg_config(server.uri()), sink.clone())
        .await
        .unwrap();

    assert_eq!(summary.total_persisted, 0);
    assert_eq!(summary.wcg.unwrap().pages_fetched, 1);
}

#[tokio::test]
async fn test_overlapping_windows_repeat_ten_records() {
    let server = MockServer::start().await;
    mount_offset(&server, 0, api_page(named_records(0..250, 10.0)), 1).await;
    mount_offset(&server, 240, api_page(named_records(240..300, 10.0)), 1).await;
    mount_offset(&server, 480, api_page(vec![]), 1).await;

    let sink = Arc::new(MemorySink::new());
    run_ingestion(wcg_config(server.uri()), sink.clone())
        .await
        .unwrap();

    let points = sink.points();
    assert_eq!(points.len(), 310);

    let mut seen: HashMap<String, usize> = HashMap::new();
    for point in &points {
        *seen.entry(point.tag("Name").unwrap().to_string()).or_default() += 1;
    }
    assert_eq!(seen.len(), 300);

    let duplicated: Vec<_> = seen.values().filter(|&&n| n > 1).collect();
    assert_eq!(duplicated.len(), 10);
    assert!(duplicated.iter().all(|&&n| n == 2));

    // Duplicates carry identical series keys and timestamps
    let first = points.iter().find(|p| p.tag("Name") == Some("MCM1_0001_0245_0"));
    let last = points.iter().rev().find(|p| p.tag("Name") == Some("MCM1_0001_0245_0"));
    assert_eq!(first, last);
}

#[tokio::test]
async fn test_server_error_keeps_earlier_pages() {
    let server = MockServer::start().await;
    mount_offset(&server, 0, api_page(named_records(0..250, 10.0)), 1).await;
    Mock::given(method("GET"))
        .and(path(RESULTS_PATH))
        .and(query_param("offset", "240"))
        .respond_with(ResponseTemplate::new(502))
        .expect(1)
        .mount(&server)
        .await;
    mount_offset(&server, 480, api_page(vec![]), 0).await;

    let sink = Arc::new(MemorySink::new());
    let summary = run_ingestion(wcg_config(server.uri()), sink.clone())
        .await
        .unwrap();

    let report = summary.wcg.unwrap();
    assert_eq!(report.pages_fetched, 1);
    assert_eq!(report.pages_failed, 1);
    assert_eq!(summary.total_persisted, 250);
}

#[tokio::test]
async fn test_missing_results_key_ends_crawl() {
    let server = MockServer::start().await;
    mount_offset(
        &server,
        0,
        serde_json::json!({ "ResultsStatus": { "ResultsAvailable": 0 } }),
        1,
    )
    .await;

    let sink = Arc::new(MemorySink::new());
    let summary = run_ingestion(wcg_config(server.uri()), sink.clone())
        .await
        .unwrap();
    assert_eq!(summary.total_persisted, 0);
}

#[tokio::test]
async fn test_persistence_failure_halts_run() {
    let server = MockServer::start().await;
    mount_offset(&server, 0, api_page(named_records(0..250, 10.0)), 1).await;
    mount_offset(&server, 240, api_page(named_records(240..300, 10.0)), 0).await;

    let sink = Arc::new(FailingSink::new(100));
    let err = run_ingestion(wcg_config(server.uri()), sink.clone())
        .await
        .unwrap_err();

    match err {
        IngestError::Persistence(e) => assert!(e.is_persistence()),
        other => panic!("unexpected error: {}", other),
    }
    assert_eq!(sink.count(), 100);
}
