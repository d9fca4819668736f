//! State module for tracking crawl progress
//!
//! Cursors live for a single crawl and are never persisted; every run starts
//! from the first page.
//!
//! # Components
//!
//! - `HtmlCursor`: queue of task pages for one Einstein@Home host
//! - `OffsetCursor`: offset/limit window over the World Community Grid API

mod html_cursor;
mod offset_cursor;

// Re-export main types
pub use html_cursor::{HtmlCursor, PageRequest};
pub use offset_cursor::{OffsetCursor, PAGE_SIZE, PAGE_STEP};
