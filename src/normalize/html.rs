//! Einstein@Home task table rows

use crate::metric::{MetricPoint, Provider, TaskIdentity, TaskValues};
use crate::normalize::values::{parse_float, parse_timestamp};
use crate::normalize::UNKNOWN_TIME;

/// Minimum number of cells a task row must have
pub const MIN_COLUMNS: usize = 9;

/// Status text of tasks that have not finished yet
pub const IN_PROGRESS: &str = "In progress";

const COL_SENT: usize = 2;
const COL_STATUS: usize = 4;
const COL_CPU_TIME: usize = 6;
const COL_GRANTED_CREDIT: usize = 7;
const COL_APPLICATION: usize = 8;

/// Raw text of one row of the task table
///
/// Lives only for the duration of a page parse.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawHtmlRow {
    /// Anchor text of the first cell, empty if the cell has no link
    pub name: String,
    pub status: String,
    pub time: String,
    /// CPU time in seconds, as displayed
    pub cpu_time: String,
    pub granted_credit: String,
    pub app_name: String,
}

impl RawHtmlRow {
    /// Builds a row from its cell texts and first-cell link text
    ///
    /// Returns `None` for rows with fewer than [`MIN_COLUMNS`] cells. Cell
    /// text is trimmed of surrounding whitespace.
    pub fn from_cells(cells: &[String], name: Option<String>) -> Option<Self> {
        if cells.len() < MIN_COLUMNS {
            return None;
        }

        let cell = |i: usize| cells[i].trim().to_string();

        Some(Self {
            name: name.map(|n| n.trim().to_string()).unwrap_or_default(),
            status: cell(COL_STATUS),
            time: cell(COL_SENT),
            cpu_time: cell(COL_CPU_TIME),
            granted_credit: cell(COL_GRANTED_CREDIT),
            app_name: cell(COL_APPLICATION),
        })
    }

    /// True for tasks still running on the host (exact, case-sensitive)
    pub fn is_in_progress(&self) -> bool {
        self.status == IN_PROGRESS
    }
}

/// Maps a task table row onto the common metric schema
///
/// The task pages never show a claimed credit, so `ClaimedCredit` is always
/// `0`. An unreadable time cell yields [`UNKNOWN_TIME`].
pub fn normalize_html_row(row: &RawHtmlRow, host_name: &str) -> MetricPoint {
    let time = parse_timestamp(&row.time).unwrap_or(UNKNOWN_TIME);

    MetricPoint::new(
        TaskIdentity {
            provider: Provider::EinsteinAtHome,
            device_name: host_name,
            app_name: &row.app_name,
            name: &row.name,
        },
        TaskValues {
            claimed_credit: 0.0,
            cpu_time: parse_float(&row.cpu_time),
            granted_credit: parse_float(&row.granted_credit),
        },
        time,
    )
}
