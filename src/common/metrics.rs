//! Prometheus-compatible metrics for the log server
//!
//! Request counters and latency histograms are tracked per endpoint; the
//! log-specific counters track what went in and out of the store.

use std::collections::BTreeMap;
use std::fmt::Write;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// Histogram bucket boundaries for latency measurements (in milliseconds)
const LATENCY_BUCKETS: [f64; 10] = [0.1, 0.5, 1.0, 5.0, 10.0, 25.0, 50.0, 100.0, 250.0, 1000.0];

/// Fixed-bucket latency histogram
#[derive(Debug)]
pub struct Histogram {
    buckets: Vec<AtomicU64>,
    boundaries: &'static [f64],
    /// Sum in microseconds
    sum_us: AtomicU64,
    count: AtomicU64,
}

impl Histogram {
    pub fn new() -> Self {
        Self {
            buckets: (0..=LATENCY_BUCKETS.len()).map(|_| AtomicU64::new(0)).collect(),
            boundaries: &LATENCY_BUCKETS,
            sum_us: AtomicU64::new(0),
            count: AtomicU64::new(0),
        }
    }

    /// Record a latency in milliseconds
    pub fn observe(&self, value_ms: f64) {
        let idx = self
            .boundaries
            .iter()
            .position(|&boundary| value_ms <= boundary)
            .unwrap_or(self.boundaries.len());

        self.buckets[idx].fetch_add(1, Ordering::Relaxed);
        self.sum_us
            .fetch_add((value_ms * 1000.0) as u64, Ordering::Relaxed);
        self.count.fetch_add(1, Ordering::Relaxed);
    }

    /// Cumulative bucket counts, ending with the `+Inf` bucket
    pub fn cumulative_buckets(&self) -> Vec<(f64, u64)> {
        let mut cumulative = 0u64;
        self.boundaries
            .iter()
            .copied()
            .chain(std::iter::once(f64::INFINITY))
            .zip(&self.buckets)
            .map(|(le, bucket)| {
                cumulative += bucket.load(Ordering::Relaxed);
                (le, cumulative)
            })
            .collect()
    }

    /// Sum of observed values in milliseconds
    pub fn sum(&self) -> f64 {
        self.sum_us.load(Ordering::Relaxed) as f64 / 1000.0
    }

    pub fn count(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }
}

impl Default for Histogram {
    fn default() -> Self {
        Self::new()
    }
}

/// Monotonic counter
#[derive(Debug, Default)]
pub struct Counter {
    value: AtomicU64,
}

impl Counter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn inc(&self) {
        self.add(1);
    }

    pub fn add(&self, n: u64) {
        self.value.fetch_add(n, Ordering::Relaxed);
    }

    pub fn get(&self) -> u64 {
        self.value.load(Ordering::Relaxed)
    }
}

/// Per-endpoint request metrics
#[derive(Debug, Default)]
pub struct EndpointMetrics {
    pub requests_total: Counter,
    pub requests_error: Counter,
    pub latency: Histogram,
}

/// Metrics registry shared by the HTTP layer
#[derive(Debug)]
pub struct MetricsRegistry {
    /// Keyed by "METHOD route", where route is the matched route template
    endpoints: Mutex<BTreeMap<String, Arc<EndpointMetrics>>>,

    pub total_requests: Counter,
    pub total_errors: Counter,

    pub records_appended: Counter,
    pub records_read: Counter,
    pub reads_not_found: Counter,
    pub bytes_written: Counter,
    pub bytes_read: Counter,

    start_time: Instant,
}

impl MetricsRegistry {
    pub fn new() -> Self {
        Self {
            endpoints: Mutex::new(BTreeMap::new()),
            total_requests: Counter::new(),
            total_errors: Counter::new(),
            records_appended: Counter::new(),
            records_read: Counter::new(),
            reads_not_found: Counter::new(),
            bytes_written: Counter::new(),
            bytes_read: Counter::new(),
            start_time: Instant::now(),
        }
    }

    /// Get or create metrics for an endpoint
    pub fn endpoint(&self, method: &str, path: &str) -> Arc<EndpointMetrics> {
        let mut endpoints = self
            .endpoints
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        endpoints
            .entry(format!("{} {}", method, path))
            .or_default()
            .clone()
    }

    /// Record a finished request
    pub fn record_request(&self, method: &str, path: &str, duration: Duration, success: bool) {
        let endpoint = self.endpoint(method, path);

        endpoint.requests_total.inc();
        endpoint.latency.observe(duration.as_secs_f64() * 1000.0);
        self.total_requests.inc();

        if !success {
            endpoint.requests_error.inc();
            self.total_errors.inc();
        }
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    /// Render all metrics in the Prometheus text format.
    ///
    /// `log_records` is the current length of the log, sampled by the caller.
    pub fn to_prometheus(&self, log_records: u64) -> String {
        let mut out = String::new();

        let scalars: [(&str, &str, &str, u64); 9] = [
            ("proglog_requests_total", "counter", "Total number of requests", self.total_requests.get()),
            ("proglog_errors_total", "counter", "Total number of failed requests", self.total_errors.get()),
            ("proglog_records_appended_total", "counter", "Records appended to the log", self.records_appended.get()),
            ("proglog_records_read_total", "counter", "Records served from the log", self.records_read.get()),
            ("proglog_reads_not_found_total", "counter", "Reads past the end of the log", self.reads_not_found.get()),
            ("proglog_bytes_written_total", "counter", "Payload bytes appended", self.bytes_written.get()),
            ("proglog_bytes_read_total", "counter", "Payload bytes served", self.bytes_read.get()),
            ("proglog_log_records", "gauge", "Current number of records in the log", log_records),
            ("proglog_uptime_seconds", "gauge", "Server uptime in seconds", self.uptime_seconds()),
        ];
        for (name, kind, help, value) in scalars {
            let _ = writeln!(out, "# HELP {} {}", name, help);
            let _ = writeln!(out, "# TYPE {} {}", name, kind);
            let _ = writeln!(out, "{} {}", name, value);
        }

        let endpoints = self
            .endpoints
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        out.push_str("# HELP proglog_endpoint_requests_total Requests per endpoint\n");
        out.push_str("# TYPE proglog_endpoint_requests_total counter\n");
        for (endpoint, metrics) in endpoints.iter() {
            let _ = writeln!(
                out,
                "proglog_endpoint_requests_total{{endpoint=\"{}\"}} {}",
                endpoint,
                metrics.requests_total.get()
            );
        }

        out.push_str("# HELP proglog_endpoint_errors_total Errors per endpoint\n");
        out.push_str("# TYPE proglog_endpoint_errors_total counter\n");
        for (endpoint, metrics) in endpoints.iter() {
            let _ = writeln!(
                out,
                "proglog_endpoint_errors_total{{endpoint=\"{}\"}} {}",
                endpoint,
                metrics.requests_error.get()
            );
        }

        out.push_str("# HELP proglog_request_duration_ms Request duration in milliseconds\n");
        out.push_str("# TYPE proglog_request_duration_ms histogram\n");
        for (endpoint, metrics) in endpoints.iter() {
            for (le, count) in metrics.latency.cumulative_buckets() {
                let le = if le.is_infinite() {
                    "+Inf".to_string()
                } else {
                    le.to_string()
                };
                let _ = writeln!(
                    out,
                    "proglog_request_duration_ms_bucket{{endpoint=\"{}\",le=\"{}\"}} {}",
                    endpoint, le, count
                );
            }
            let _ = writeln!(
                out,
                "proglog_request_duration_ms_sum{{endpoint=\"{}\"}} {}",
                endpoint,
                metrics.latency.sum()
            );
            let _ = writeln!(
                out,
                "proglog_request_duration_ms_count{{endpoint=\"{}\"}} {}",
                endpoint,
                metrics.latency.count()
            );
        }

        out
    }
}

impl Default for MetricsRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_histogram_buckets_are_cumulative() {
        let hist = Histogram::new();
        hist.observe(0.05);
        hist.observe(7.0);
        hist.observe(5000.0);

        assert_eq!(hist.count(), 3);
        let buckets = hist.cumulative_buckets();
        assert_eq!(buckets.len(), LATENCY_BUCKETS.len() + 1);
        assert_eq!(buckets[0], (0.1, 1));
        assert_eq!(buckets.last().unwrap().1, 3);
        assert!(buckets.windows(2).all(|w| w[0].1 <= w[1].1));
    }

    #[test]
    fn test_counter() {
        let counter = Counter::new();
        assert_eq!(counter.get(), 0);
        counter.inc();
        counter.add(5);
        assert_eq!(counter.get(), 6);
    }

    #[test]
    fn test_record_request() {
        let registry = MetricsRegistry::new();

        registry.record_request("POST", "/", Duration::from_millis(2), true);
        registry.record_request("GET", "/", Duration::from_millis(3), false);
        registry.record_request("GET", "/", Duration::from_millis(1), true);

        assert_eq!(registry.total_requests.get(), 3);
        assert_eq!(registry.total_errors.get(), 1);

        let get = registry.endpoint("GET", "/");
        assert_eq!(get.requests_total.get(), 2);
        assert_eq!(get.requests_error.get(), 1);
        assert_eq!(get.latency.count(), 2);
    }

    #[test]
    fn test_prometheus_output() {
        let registry = MetricsRegistry::new();
        registry.records_appended.add(4);
        registry.record_request("POST", "/", Duration::from_millis(1), true);

        let out = registry.to_prometheus(4);
        assert!(out.contains("proglog_records_appended_total 4"));
        assert!(out.contains("proglog_log_records 4"));
        assert!(out.contains("proglog_endpoint_requests_total{endpoint=\"POST /\"} 1"));
        assert!(out.contains("le=\"+Inf\"} 1"));
    }
}
