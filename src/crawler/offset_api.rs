//! World Community Grid results API crawler
//!
//! Pages through a member's results with overlapping offset/limit windows
//! until the API returns an empty page.

use crate::config::WcgConfig;
use crate::crawler::fetcher::fetch_text;
use crate::normalize::{normalize_api_record, ApiResponse, RawApiRecord, UNKNOWN_TIME};
use crate::output::CrawlReport;
use crate::sink::{MetricSink, SinkError};
use crate::state::{OffsetCursor, PAGE_SIZE, PAGE_STEP};
use crate::url::api_results_url;
use crate::{IngestError, ParseError};
use reqwest::Client;
use url::form_urlencoded;

/// Upper bound on pages requested in one crawl
pub const MAX_API_PAGES: u32 = 10_000;

/// Crawler for the offset-paginated results API
#[derive(Debug, Clone)]
pub struct OffsetApiCrawler {
    client: Client,
    api_url: String,
    username: String,
    api_code: String,
    page_size: u32,
    page_step: u32,
}

impl OffsetApiCrawler {
    pub fn new(client: Client, config: &WcgConfig) -> Self {
        Self {
            client,
            api_url: config.api_url.clone(),
            username: config.username.clone(),
            api_code: config.api_code.clone(),
            page_size: PAGE_SIZE,
            page_step: PAGE_STEP,
        }
    }

    /// Overrides the offset/limit window
    pub fn with_window(mut self, page_size: u32, page_step: u32) -> Self {
        self.page_size = page_size;
        self.page_step = page_step;
        self
    }

    /// Crawls every results page into the sink
    ///
    /// The crawl ends at the first empty page. A page that cannot be fetched
    /// or decoded also ends the crawl; points from earlier pages are kept and
    /// the failure is counted in the report. Only sink failures are returned
    /// as errors.
    pub async fn crawl(&self, sink: &dyn MetricSink) -> Result<CrawlReport, SinkError> {
        let mut cursor = OffsetCursor::with_window(self.page_size, self.page_step);
        let mut report = CrawlReport::default();

        tracing::info!("Crawling World Community Grid results for {}", self.username);

        loop {
            if cursor.pages() >= MAX_API_PAGES {
                tracing::warn!(
                    "Stopping after {} result pages without reaching an empty page",
                    MAX_API_PAGES
                );
                break;
            }

            tracing::info!("Fetching results from offset {}", cursor.offset());

            let records = match self.fetch_page(&cursor).await {
                Ok(records) => {
                    report.pages_fetched += 1;
                    records
                }
                Err(e) => {
                    tracing::warn!(
                        "Stopping World Community Grid crawl at offset {}: {}",
                        cursor.offset(),
                        redact_code(&e.to_string(), &self.api_code)
                    );
                    report.pages_failed += 1;
                    break;
                }
            };

            if records.is_empty() {
                break;
            }

            tracing::info!("Parsing {} results", records.len());
            report.records_seen += records.len() as u64;

            let points: Vec<_> = records.iter().filter_map(normalize_api_record).collect();
            let undated = points.iter().filter(|p| p.time == UNKNOWN_TIME).count();
            if undated > 0 {
                tracing::warn!(
                    "{} results at offset {} have an unreadable time, stored at epoch",
                    undated,
                    cursor.offset()
                );
                report.undated_points += undated as u64;
            }

            let stored = sink.append_all(points).await?;
            report.points_emitted += stored as u64;
            tracing::info!("Stored {} results - {} total", stored, sink.count());

            cursor.advance();
        }

        tracing::info!(
            "World Community Grid done: {} pages, {} results stored",
            report.pages_fetched,
            report.points_emitted
        );

        Ok(report)
    }

    async fn fetch_page(&self, cursor: &OffsetCursor) -> Result<Vec<RawApiRecord>, IngestError> {
        let url = api_results_url(
            &self.api_url,
            &self.username,
            &self.api_code,
            cursor.offset(),
            cursor.limit(),
        )?;

        let body = fetch_text(&self.client, url.as_str()).await?;
        let response: ApiResponse =
            serde_json::from_str(&body).map_err(|source| ParseError::Json {
                url: url.to_string(),
                source,
            })?;

        Ok(response.into_records())
    }
}

/// Masks the verification code, raw or as encoded in the URL, in a logged message
fn redact_code(message: &str, api_code: &str) -> String {
    if api_code.is_empty() {
        return message.to_string();
    }

    let encoded: String = form_urlencoded::byte_serialize(api_code.as_bytes()).collect();
    message.replace(&encoded, "***").replace(api_code, "***")
}
