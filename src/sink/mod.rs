//! Metric sinks
//!
//! This module holds the [`MetricSink`] interface and its implementations:
//! - `InfluxSink`: batched writes to an InfluxDB v2 bucket
//! - `MemorySink`: in-memory collection for dry runs and tests

mod influx;
mod memory;
mod traits;

pub use influx::InfluxSink;
pub use memory::MemorySink;
pub use traits::{MetricSink, SinkError, SinkResult};
