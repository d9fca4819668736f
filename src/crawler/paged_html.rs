//! Einstein@Home host crawler
//!
//! Walks every task page of one host, starting from the host's first task
//! page and following the pager links found there.

use crate::crawler::fetcher::fetch_text;
use crate::crawler::parser::parse_task_page;
use crate::output::CrawlReport;
use crate::sink::{MetricSink, SinkError};
use crate::state::HtmlCursor;
use reqwest::Client;

/// Crawler for paginated HTML task pages
#[derive(Debug, Clone)]
pub struct PagedHtmlCrawler {
    client: Client,
}

impl PagedHtmlCrawler {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Crawls all task pages of one host into the sink
    ///
    /// A page that cannot be fetched is treated as an empty page and the
    /// crawl continues; if that page is the first one, no further pages are
    /// discovered. Only sink failures end the crawl early.
    ///
    /// # Arguments
    ///
    /// * `first_page_url` - The host's first task page
    /// * `host_name` - Value for the `DeviceName` tag
    /// * `sink` - Destination for the emitted points
    pub async fn crawl(
        &self,
        first_page_url: &str,
        host_name: &str,
        sink: &dyn MetricSink,
    ) -> Result<CrawlReport, SinkError> {
        let mut cursor = HtmlCursor::new(first_page_url);
        let mut report = CrawlReport::default();

        tracing::info!("Crawling task pages for host {}", host_name);

        while let Some(request) = cursor.next_page() {
            tracing::debug!("Fetching task page {}", request.url);

            let body = match fetch_text(&self.client, &request.url).await {
                Ok(body) => {
                    report.pages_fetched += 1;
                    body
                }
                Err(e) => {
                    tracing::warn!("Failed to fetch task page for {}: {}", host_name, e);
                    report.pages_failed += 1;
                    String::new()
                }
            };

            let page = parse_task_page(&body, host_name, request.discover_pager);

            if request.discover_pager {
                let added = cursor.enqueue_queries(&page.pager_queries);
                if added > 0 {
                    tracing::debug!("Found {} more task pages for {}", added, host_name);
                }
            }

            if page.undated > 0 {
                tracing::warn!(
                    "{} tasks on {} have an unreadable time, stored at epoch",
                    page.undated,
                    request.url
                );
            }

            report.records_seen += page.rows as u64;
            report.undated_points += page.undated as u64;

            let appended = sink.append_all(page.points).await?;
            report.points_emitted += appended as u64;

            tracing::debug!(
                "Stored {} tasks from {} ({} in progress, {} malformed)",
                appended,
                request.url,
                page.in_progress,
                page.short_rows
            );
        }

        tracing::info!(
            "Host {} done: {} pages, {} tasks stored",
            host_name,
            report.pages_fetched + report.pages_failed,
            report.points_emitted
        );

        Ok(report)
    }
}
