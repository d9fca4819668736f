//! InfluxDB v2 sink
//!
//! Points are buffered and written in batches through the v2 HTTP write API
//! as line protocol with second precision. Writing the same measurement, tag
//! set and timestamp twice overwrites the earlier point, so re-ingesting a
//! task result is harmless.

use crate::config::InfluxConfig;
use crate::metric::{encode_batch, MetricPoint};
use crate::sink::traits::{MetricSink, SinkError, SinkResult};
use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::Client;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::Mutex;
use url::Url;

#[derive(Debug, Default)]
struct InfluxState {
    buffer: Vec<MetricPoint>,
    closed: bool,
}

/// Sink writing to an InfluxDB v2 bucket
#[derive(Debug)]
pub struct InfluxSink {
    client: Client,
    write_url: Url,
    token: String,
    batch_size: usize,
    // Held across the write request so batches never interleave
    state: Mutex<InfluxState>,
    accepted: AtomicU64,
    written: AtomicU64,
}

impl InfluxSink {
    /// Creates a sink and checks that the store is reachable
    ///
    /// # Arguments
    ///
    /// * `config` - InfluxDB connection parameters
    /// * `client` - HTTP client used for health check and writes
    ///
    /// # Returns
    ///
    /// * `Ok(InfluxSink)` - The store answered its health check
    /// * `Err(SinkError)` - Bad parameters, or the store is unreachable/unhealthy
    pub async fn connect(config: &InfluxConfig, client: Client) -> SinkResult<Self> {
        let base = base_url(config)?;

        let health_url = base
            .join("health")
            .map_err(|e| SinkError::InvalidConfig(e.to_string()))?;
        tracing::debug!("Checking InfluxDB health at {}", health_url);

        let response = client.get(health_url).send().await?;
        if !response.status().is_success() {
            return Err(SinkError::Unhealthy(format!(
                "HTTP {} from {}",
                response.status().as_u16(),
                base
            )));
        }

        let sink = Self::new(config, client)?;
        tracing::info!(
            "Connected to InfluxDB at {} (org: {}, bucket: {})",
            base,
            config.org,
            config.bucket
        );
        Ok(sink)
    }

    /// Creates a sink without contacting the store
    pub fn new(config: &InfluxConfig, client: Client) -> SinkResult<Self> {
        let mut write_url = base_url(config)?
            .join("api/v2/write")
            .map_err(|e| SinkError::InvalidConfig(e.to_string()))?;
        write_url
            .query_pairs_mut()
            .append_pair("org", &config.org)
            .append_pair("bucket", &config.bucket)
            .append_pair("precision", "s");

        Ok(Self {
            client,
            write_url,
            token: config.token.clone(),
            batch_size: config.batch_size.max(1),
            state: Mutex::new(InfluxState::default()),
            accepted: AtomicU64::new(0),
            written: AtomicU64::new(0),
        })
    }

    /// Number of points the store has confirmed
    pub fn written(&self) -> u64 {
        self.written.load(Ordering::SeqCst)
    }

    /// Sends one batch; a failed batch is reported and not retried
    async fn write_batch(&self, batch: Vec<MetricPoint>) -> SinkResult<()> {
        if batch.is_empty() {
            return Ok(());
        }

        let body = encode_batch(&batch);
        let response = self
            .client
            .post(self.write_url.clone())
            .header(AUTHORIZATION, format!("Token {}", self.token))
            .header("Content-Type", "text/plain; charset=utf-8")
            .body(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            tracing::error!(
                "InfluxDB rejected a batch of {} points (HTTP {}): {}",
                batch.len(),
                status.as_u16(),
                message
            );
            return Err(SinkError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        let total = self.written.fetch_add(batch.len() as u64, Ordering::SeqCst) + batch.len() as u64;
        tracing::debug!("Wrote batch of {} points ({} total)", batch.len(), total);
        Ok(())
    }
}

#[async_trait]
impl MetricSink for InfluxSink {
    async fn append(&self, point: MetricPoint) -> SinkResult<()> {
        let mut state = self.state.lock().await;
        if state.closed {
            return Err(SinkError::Closed);
        }

        state.buffer.push(point);
        if state.buffer.len() < self.batch_size {
            self.accepted.fetch_add(1, Ordering::SeqCst);
            return Ok(());
        }

        // Earlier points of this batch were counted when they were buffered
        let batch = std::mem::take(&mut state.buffer);
        let buffered = batch.len() as u64 - 1;
        match self.write_batch(batch).await {
            Ok(()) => {
                self.accepted.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
            Err(e) => {
                self.accepted.fetch_sub(buffered, Ordering::SeqCst);
                Err(e)
            }
        }
    }

    fn count(&self) -> u64 {
        self.accepted.load(Ordering::SeqCst)
    }

    async fn close(&self) -> SinkResult<()> {
        let mut state = self.state.lock().await;
        if state.closed {
            return Err(SinkError::Closed);
        }
        state.closed = true;

        let batch = std::mem::take(&mut state.buffer);
        let buffered = batch.len() as u64;
        if let Err(e) = self.write_batch(batch).await {
            self.accepted.fetch_sub(buffered, Ordering::SeqCst);
            return Err(e);
        }

        tracing::debug!("InfluxDB sink closed after {} points", self.written());
        Ok(())
    }
}

/// `http://host:port/`, or the configured origin if `host` already has a scheme
fn base_url(config: &InfluxConfig) -> SinkResult<Url> {
    let origin = if config.host.starts_with("http://") || config.host.starts_with("https://") {
        format!("{}:{}/", config.host.trim_end_matches('/'), config.port)
    } else {
        format!("http://{}:{}/", config.host, config.port)
    };

    Url::parse(&origin)
        .map_err(|e| SinkError::InvalidConfig(format!("Invalid InfluxDB address '{}': {}", origin, e)))
}
