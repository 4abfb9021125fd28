//! Metrics collection and exposition.
//!
//! # Metrics
//! - `archive_requests_total` (counter): archive requests by response status
//! - `archive_streams_total` (counter): finished streams by outcome
//! - `archive_bytes_sent_total` (counter): bytes handed to clients
//! - `archive_stream_duration_seconds` (histogram): time from spawn to stream end
//! - `archive_processes_active` (gauge): archivers currently owned by a request

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// How a stream ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamOutcome {
    Completed,
    Disconnected,
    Failed,
}

impl StreamOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            StreamOutcome::Completed => "completed",
            StreamOutcome::Disconnected => "disconnected",
            StreamOutcome::Failed => "failed",
        }
    }
}

/// Start the Prometheus scrape endpoint.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_request(status: u16) {
    counter!("archive_requests_total", "status" => status.to_string()).increment(1);
}

pub fn record_stream(outcome: StreamOutcome, bytes: u64, started: Instant) {
    counter!("archive_streams_total", "outcome" => outcome.as_str()).increment(1);
    counter!("archive_bytes_sent_total").increment(bytes);
    histogram!("archive_stream_duration_seconds").record(started.elapsed().as_secs_f64());
}

pub fn set_active_processes(active: u64) {
    gauge!("archive_processes_active").set(active as f64);
}
