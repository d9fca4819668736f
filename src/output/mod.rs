//! Output module for run reporting
//!
//! Per-crawl counters collected while ingesting, and the summary printed at
//! the end of a run.

mod stats;

pub use stats::{print_summary, CrawlReport, HostReport, RunSummary};
