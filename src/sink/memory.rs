//! In-memory sink
//!
//! Keeps every appended point in a vector. Used for dry runs and tests; it
//! follows the same lifecycle rules as the InfluxDB sink.

use crate::metric::MetricPoint;
use crate::sink::traits::{MetricSink, SinkError, SinkResult};
use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

#[derive(Debug, Default)]
struct MemoryState {
    points: Vec<MetricPoint>,
    closed: bool,
}

/// Thread-safe sink holding points in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    state: Mutex<MemoryState>,
    count: AtomicU64,
}

impl MemorySink {
    /// Creates an empty, open sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of every point appended so far, in append order
    pub fn points(&self) -> Vec<MetricPoint> {
        self.lock().points.clone()
    }

    /// True once `close()` has succeeded
    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl MetricSink for MemorySink {
    async fn append(&self, point: MetricPoint) -> SinkResult<()> {
        let mut state = self.lock();
        if state.closed {
            return Err(SinkError::Closed);
        }
        state.points.push(point);
        self.count.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn count(&self) -> u64 {
        self.count.load(Ordering::SeqCst)
    }

    async fn close(&self) -> SinkResult<()> {
        let mut state = self.lock();
        if state.closed {
            return Err(SinkError::Closed);
        }
        state.closed = true;
        Ok(())
    }
}
