//! Record normalization
//!
//! Pure mappings from provider-specific raw records onto [`MetricPoint`]:
//! - World Community Grid API records (`api`)
//! - Einstein@Home task table rows (`html`)
//! - lenient number and timestamp parsing shared by both (`values`)
//!
//! Nothing in here performs I/O or logs.
//!
//! [`MetricPoint`]: crate::metric::MetricPoint

mod api;
mod html;
mod values;

pub use api::{normalize_api_record, ApiResponse, RawApiRecord, ResultsStatus, SECONDS_PER_HOUR};
pub use html::{normalize_html_row, RawHtmlRow, IN_PROGRESS, MIN_COLUMNS};
pub use values::{parse_float, parse_timestamp};

/// Timestamp given to points whose provider time could not be parsed
pub const UNKNOWN_TIME: i64 = 0;
