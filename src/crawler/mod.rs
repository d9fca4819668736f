//! Crawler module for provider fetching and parsing
//!
//! This module contains the crawling logic, including:
//! - HTTP fetching with timeouts and error classification
//! - Einstein@Home task page parsing and pagination
//! - World Community Grid results API pagination
//! - Overall run coordination

mod coordinator;
mod fetcher;
mod offset_api;
mod paged_html;
mod parser;

pub use coordinator::{run_ingestion, run_ingestion_with_client, Coordinator};
pub use fetcher::{build_http_client, fetch_text};
pub use offset_api::{OffsetApiCrawler, MAX_API_PAGES};
pub use paged_html::PagedHtmlCrawler;
pub use parser::{extract_pager_queries, parse_task_page, ParsedTaskPage};
