//! Einstein@Home host crawls through the full ingestion run

use crate::common::{einstein_config, pager, task_page, task_row, FailingSink};
use boinc_ingest::crawler::run_ingestion;
use boinc_ingest::{IngestError, MemorySink, MetricSink};
use std::sync::Arc;
use wiremock::matchers::{method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount_first_page(server: &MockServer, host_id: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(format!("/host/{}/tasks/0/0", host_id)))
        .and(query_param_is_missing("page"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .expect(1)
        .mount(server)
        .await;
}

async fn mount_page(server: &MockServer, host_id: &str, page: &str, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(format!("/host/{}/tasks/0/0", host_id)))
        .and(query_param("page", page))
        .respond_with(response)
        .expect(1)
        .mount(server)
        .await;
}

fn base_url(server: &MockServer) -> String {
    format!("{}/host/", server.uri())
}

#[tokio::test]
async fn test_pager_pages_are_fetched_once() {
    let server = MockServer::start().await;
    let links = pager(&["?page=1", "?page=2"]);

    mount_first_page(
        &server,
        "4711",
        task_page(&[task_row("1001", "Completed and validated", "3,600.5", "693.0")], &links),
    )
    .await;
    mount_page(
        &server,
        "4711",
        "1",
        ResponseTemplate::new(200).set_body_string(task_page(
            &[task_row("1002", "Completed and validated", "100", "10")],
            &links,
        )),
    )
    .await;
    mount_page(
        &server,
        "4711",
        "2",
        ResponseTemplate::new(200).set_body_string(task_page(
            &[task_row("1003", "Completed and validated", "100", "10")],
            &links,
        )),
    )
    .await;

    let sink = Arc::new(MemorySink::new());
    let summary = run_ingestion(einstein_config(base_url(&server), &[("4711", "desk")]), sink.clone())
        .await
        .unwrap();

    assert_eq!(summary.hosts.len(), 1);
    assert_eq!(summary.hosts[0].report.pages_fetched, 3);
    assert_eq!(summary.total_persisted, 3);

    let points = sink.points();
    assert!(points.iter().all(|p| p.tag("DeviceName") == Some("desk")));
    assert!(points.iter().all(|p| p.tag("Project") == Some("EinsteinAtHome")));
    assert_eq!(points[0].field("CpuTime"), Some(3600.5));
    assert_eq!(points[0].field("GrantedCredit"), Some(693.0));
    assert_eq!(points[0].field("ClaimedCredit"), Some(0.0));
    assert_eq!(points[0].time, 1_704_103_200);
}

#[tokio::test]
async fn test_in_progress_tasks_are_skipped() {
    let server = MockServer::start().await;
    mount_first_page(
        &server,
        "1",
        task_page(
            &[
                task_row("1", "In progress", "0", "0"),
                task_row("2", "Completed, waiting for validation", "50", "0"),
                task_row("3", "Completed and validated", "50", "15"),
            ],
            "",
        ),
    )
    .await;

    let sink = Arc::new(MemorySink::new());
    let summary = run_ingestion(einstein_config(base_url(&server), &[("1", "desk")]), sink.clone())
        .await
        .unwrap();

    assert_eq!(summary.hosts[0].report.records_seen, 3);
    assert_eq!(summary.total_persisted, 2);
}

#[tokio::test]
async fn test_failed_page_does_not_stop_host() {
    let server = MockServer::start().await;
    let links = pager(&["?page=1", "?page=2"]);

    mount_first_page(
        &server,
        "9",
        task_page(&[task_row("1", "Completed and validated", "1", "1")], &links),
    )
    .await;
    mount_page(&server, "9", "1", ResponseTemplate::new(500)).await;
    mount_page(
        &server,
        "9",
        "2",
        ResponseTemplate::new(200).set_body_string(task_page(
            &[task_row("3", "Completed and validated", "1", "1")],
            "",
        )),
    )
    .await;

    let sink = Arc::new(MemorySink::new());
    let summary = run_ingestion(einstein_config(base_url(&server), &[("9", "desk")]), sink.clone())
        .await
        .unwrap();

    let report = summary.hosts[0].report;
    assert_eq!(report.pages_fetched, 2);
    assert_eq!(report.pages_failed, 1);
    assert_eq!(summary.total_persisted, 2);
}

#[tokio::test]
async fn test_failed_host_does_not_stop_others() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/host/1/tasks/0/0"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;
    mount_first_page(
        &server,
        "2",
        task_page(&[task_row("7", "Completed and validated", "1", "1")], ""),
    )
    .await;

    let sink = Arc::new(MemorySink::new());
    let summary = run_ingestion(
        einstein_config(base_url(&server), &[("1", "gone"), ("2", "desk")]),
        sink.clone(),
    )
    .await
    .unwrap();

    assert_eq!(summary.hosts[0].report.pages_failed, 1);
    assert_eq!(summary.hosts[1].report.points_emitted, 1);
    assert_eq!(summary.total_persisted, 1);
}

#[tokio::test]
async fn test_hosts_crawled_concurrently() {
    let server = MockServer::start().await;
    for id in ["1", "2", "3", "4"] {
        mount_first_page(
            &server,
            id,
            task_page(
                &[
                    task_row(&format!("{}01", id), "Completed and validated", "1", "1"),
                    task_row(&format!("{}02", id), "Completed and validated", "1", "1"),
                ],
                "",
            ),
        )
        .await;
    }

    let mut config = einstein_config(
        base_url(&server),
        &[("1", "a"), ("2", "b"), ("3", "c"), ("4", "d")],
    );
    config.http.max_concurrent_hosts = 3;

    let sink = Arc::new(MemorySink::new());
    let summary = run_ingestion(config, sink.clone()).await.unwrap();

    let names: Vec<_> = summary.hosts.iter().map(|h| h.host_name.as_str()).collect();
    assert_eq!(names, vec!["a", "b", "c", "d"]);
    assert_eq!(summary.total_persisted, 8);
    assert_eq!(sink.count(), 8);
}

#[tokio::test]
async fn test_persistence_failure_halts_run() {
    let server = MockServer::start().await;
    mount_first_page(
        &server,
        "1",
        task_page(
            &[
                task_row("1", "Completed and validated", "1", "1"),
                task_row("2", "Completed and validated", "1", "1"),
            ],
            &pager(&["?page=1"]),
        ),
    )
    .await;
    Mock::given(method("GET"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(task_page(&[], "")))
        .expect(0)
        .mount(&server)
        .await;

    let sink = Arc::new(FailingSink::new(1));
    let err = run_ingestion(einstein_config(base_url(&server), &[("1", "desk")]), sink.clone())
        .await
        .unwrap_err();

    assert!(matches!(err, IngestError::Persistence(_)));
    assert_eq!(sink.count(), 1);
}
