// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Metrics instrumentation for search-retrieve.
//!
//! Uses the `metrics` crate for backend-agnostic metrics collection.
//! The embedding service is responsible for choosing the exporter (Prometheus, OTEL, etc.)
//!
//! # Metric Naming Convention
//! - `search_retrieve_` prefix for all metrics
//! - `_total` suffix for counters
//! - `_seconds` suffix for duration histograms
//!
//! # Labels
//! - `index`: target index name
//! - `status`: success, or the error kind (malformed_filter, backend, ...)
//! - `operation`: create, delete

use metrics::{counter, histogram};
use std::time::{Duration, Instant};

/// Record a retrieve call outcome
pub fn record_retrieve(index: &str, status: &str) {
    counter!(
        "search_retrieve_requests_total",
        "index" => index.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}

/// Record end-to-end retrieve latency
pub fn record_retrieve_latency(index: &str, duration: Duration) {
    histogram!(
        "search_retrieve_request_seconds",
        "index" => index.to_string()
    )
    .record(duration.as_secs_f64());
}

/// Record number of items returned on a page
pub fn record_page_size(index: &str, count: usize) {
    histogram!(
        "search_retrieve_page_size",
        "index" => index.to_string()
    )
    .record(count as f64);
}

/// Record a filter tree rejected before reaching the backend
pub fn record_compile_error(reason: &str) {
    counter!(
        "search_retrieve_compile_errors_total",
        "reason" => reason.to_string()
    )
    .increment(1);
}

/// Record index creation/deletion
pub fn record_index_operation(operation: &str, success: bool) {
    let status = if success { "success" } else { "failure" };
    counter!(
        "search_retrieve_index_operations_total",
        "operation" => operation.to_string(),
        "status" => status
    )
    .increment(1);
}

/// A timing guard that records retrieve latency on drop
pub struct LatencyTimer {
    index: String,
    start: Instant,
}

impl LatencyTimer {
    /// Start a new latency timer
    pub fn new(index: &str) -> Self {
        Self {
            index: index.to_string(),
            start: Instant::now(),
        }
    }
}

impl Drop for LatencyTimer {
    fn drop(&mut self) {
        record_retrieve_latency(&self.index, self.start.elapsed());
    }
}
