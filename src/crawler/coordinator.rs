//! Ingestion coordinator - main run orchestration logic
//!
//! This module drives one ingestion run:
//! - Crawling World Community Grid, if configured
//! - Crawling every configured Einstein@Home host, with bounded parallelism
//! - Closing the sink exactly once
//! - Collecting the run summary

use crate::config::{Config, HostEntry};
use crate::crawler::{build_http_client, OffsetApiCrawler, PagedHtmlCrawler};
use crate::output::{CrawlReport, HostReport, RunSummary};
use crate::sink::MetricSink;
use crate::url::host_results_url;
use crate::IngestError;
use reqwest::Client;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// Main ingestion coordinator structure
pub struct Coordinator {
    config: Arc<Config>,
    client: Client,
    sink: Arc<dyn MetricSink>,
}

impl Coordinator {
    /// Creates a new coordinator with an HTTP client built from the config
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Successfully created coordinator
    /// * `Err(IngestError)` - The HTTP client could not be built
    pub fn new(config: Config, sink: Arc<dyn MetricSink>) -> Result<Self, IngestError> {
        let client = build_http_client(&config.http)?;
        Ok(Self::with_client(config, client, sink))
    }

    /// Creates a coordinator around an existing HTTP client
    pub fn with_client(config: Config, client: Client, sink: Arc<dyn MetricSink>) -> Self {
        Self {
            config: Arc::new(config),
            client,
            sink,
        }
    }

    /// Runs every configured crawl
    ///
    /// World Community Grid is crawled first, then the Einstein@Home hosts.
    /// A sink failure aborts the remaining crawls and is returned. The sink
    /// is not closed here.
    pub async fn run(&self) -> Result<RunSummary, IngestError> {
        let mut summary = RunSummary::default();

        if let Some(wcg) = &self.config.wcg {
            let crawler = OffsetApiCrawler::new(self.client.clone(), wcg);
            summary.wcg = Some(crawler.crawl(self.sink.as_ref()).await?);
        }

        if let Some(einstein) = &self.config.einstein {
            summary.hosts = self.crawl_hosts(&einstein.url, &einstein.hosts).await?;
        }

        summary.total_persisted = self.sink.count();
        Ok(summary)
    }

    /// Crawls all hosts, at most `max-concurrent-hosts` at a time
    ///
    /// Reports are returned in configuration order.
    async fn crawl_hosts(
        &self,
        base_url: &str,
        hosts: &[HostEntry],
    ) -> Result<Vec<HostReport>, IngestError> {
        let limit = self.config.http.max_concurrent_hosts.max(1) as usize;
        let semaphore = Arc::new(Semaphore::new(limit));
        let crawler = PagedHtmlCrawler::new(self.client.clone());
        let mut tasks: JoinSet<(usize, Result<CrawlReport, IngestError>)> = JoinSet::new();

        tracing::info!(
            "Crawling {} Einstein@Home hosts ({} at a time)",
            hosts.len(),
            limit
        );

        for (index, host) in hosts.iter().enumerate() {
            let semaphore = Arc::clone(&semaphore);
            let crawler = crawler.clone();
            let sink = Arc::clone(&self.sink);
            let url = host_results_url(base_url, &host.id);
            let name = host.name.clone();

            tasks.spawn(async move {
                (index, crawl_host(&semaphore, &crawler, &url, &name, sink.as_ref()).await)
            });
        }

        let mut reports: Vec<Option<CrawlReport>> = vec![None; hosts.len()];

        while let Some(joined) = tasks.join_next().await {
            let (index, result) = match joined {
                Ok(outcome) => outcome,
                Err(e) => {
                    tasks.abort_all();
                    return Err(IngestError::Task(e.to_string()));
                }
            };

            match result {
                Ok(report) => reports[index] = Some(report),
                Err(e) => {
                    tracing::error!("Crawl of host {} failed: {}", hosts[index].name, e);
                    tasks.abort_all();
                    return Err(e);
                }
            }
        }

        Ok(hosts
            .iter()
            .zip(reports)
            .map(|(host, report)| HostReport {
                host_name: host.name.clone(),
                report: report.unwrap_or_default(),
            })
            .collect())
    }
}

/// Crawls one host once a permit is available
async fn crawl_host(
    semaphore: &Semaphore,
    crawler: &PagedHtmlCrawler,
    url: &str,
    host_name: &str,
    sink: &dyn MetricSink,
) -> Result<CrawlReport, IngestError> {
    let _permit = semaphore
        .acquire()
        .await
        .map_err(|e| IngestError::Task(format!("host {}: {}", host_name, e)))?;

    Ok(crawler.crawl(url, host_name, sink).await?)
}

/// Runs a complete ingestion and closes the sink
///
/// This is the main entry point for an ingestion run. The sink is closed
/// exactly once, whether or not the crawls succeed; a crawl error takes
/// precedence over a close error.
///
/// # Returns
///
/// * `Ok(RunSummary)` - All crawls finished and buffered points were flushed
/// * `Err(IngestError)` - A crawl or the final flush failed
pub async fn run_ingestion(
    config: Config,
    sink: Arc<dyn MetricSink>,
) -> Result<RunSummary, IngestError> {
    let coordinator = Coordinator::new(config, Arc::clone(&sink))?;
    finish(coordinator.run().await, sink.as_ref()).await
}

/// Like [`run_ingestion`], reusing an existing HTTP client
pub async fn run_ingestion_with_client(
    config: Config,
    client: Client,
    sink: Arc<dyn MetricSink>,
) -> Result<RunSummary, IngestError> {
    let coordinator = Coordinator::with_client(config, client, Arc::clone(&sink));
    finish(coordinator.run().await, sink.as_ref()).await
}

async fn finish(
    outcome: Result<RunSummary, IngestError>,
    sink: &dyn MetricSink,
) -> Result<RunSummary, IngestError> {
    let closed = sink.close().await;

    let mut summary = match outcome {
        Ok(summary) => summary,
        Err(e) => {
            if let Err(close_err) = closed {
                tracing::warn!("Failed to close sink after error: {}", close_err);
            }
            return Err(e);
        }
    };
    closed?;

    summary.total_persisted = sink.count();
    tracing::info!("Ingestion complete: {} points persisted", summary.total_persisted);

    Ok(summary)
}
