//! Sink trait and error types
//!
//! This module defines the interface every metric sink implements, and the
//! errors a sink can report.

use crate::metric::MetricPoint;
use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur while persisting metric points
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("Write rejected by store (HTTP {status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("Store connection error: {0}")]
    Connection(#[from] reqwest::Error),

    #[error("Store health check failed: {0}")]
    Unhealthy(String),

    #[error("Invalid sink configuration: {0}")]
    InvalidConfig(String),

    #[error("Sink is closed")]
    Closed,
}

impl SinkError {
    /// True if the store refused or failed to take the write
    pub fn is_persistence(&self) -> bool {
        matches!(self, Self::Rejected { .. } | Self::Connection(_))
    }

    /// True if the sink was used after `close()`
    pub fn is_illegal_state(&self) -> bool {
        matches!(self, Self::Closed)
    }
}

/// Result type for sink operations
pub type SinkResult<T> = Result<T, SinkError>;

/// Destination for normalized metric points
///
/// Implementations own their connection and counter, and must accept
/// concurrent `append` calls from several crawls at once.
///
/// Lifecycle: any number of `append` calls, then exactly one `close`.
/// `append` after `close` fails with [`SinkError::Closed`].
#[async_trait]
pub trait MetricSink: Send + Sync {
    /// Accepts one point
    ///
    /// The point may be buffered. Write failures of the batch this point
    /// completes are reported here and are never swallowed.
    async fn append(&self, point: MetricPoint) -> SinkResult<()>;

    /// Number of points accepted since construction
    ///
    /// Points of a batch the store rejected are not counted.
    fn count(&self) -> u64;

    /// Flushes buffered points and releases the connection
    async fn close(&self) -> SinkResult<()>;

    /// Appends every point in order, stopping at the first failure
    ///
    /// Returns the number of points appended.
    async fn append_all(&self, points: Vec<MetricPoint>) -> SinkResult<usize> {
        let mut appended = 0;
        for point in points {
            self.append(point).await?;
            appended += 1;
        }
        Ok(appended)
    }
}
