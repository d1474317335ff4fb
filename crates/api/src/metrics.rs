use ingest::SourceTag;
use serde::Serialize;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::Instant;

pub struct Metrics {
    // Loads by outcome
    total_loads: AtomicUsize,
    remote_loads: AtomicUsize,
    local_fallback_loads: AtomicUsize,
    failed_loads: AtomicUsize,
    rejected_refreshes: AtomicUsize,

    // Parsing (time in microseconds)
    total_parse_time_us: AtomicU64,
    documents_parsed: AtomicUsize,
    total_records_parsed: AtomicUsize,
}

impl Metrics {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            total_loads: AtomicUsize::new(0),
            remote_loads: AtomicUsize::new(0),
            local_fallback_loads: AtomicUsize::new(0),
            failed_loads: AtomicUsize::new(0),
            rejected_refreshes: AtomicUsize::new(0),
            total_parse_time_us: AtomicU64::new(0),
            documents_parsed: AtomicUsize::new(0),
            total_records_parsed: AtomicUsize::new(0),
        })
    }

    /// `None` means both sources failed.
    pub fn record_load(&self, source: Option<SourceTag>) {
        self.total_loads.fetch_add(1, Ordering::Relaxed);
        let counter = match source {
            Some(SourceTag::Remote) => &self.remote_loads,
            Some(SourceTag::LocalFallback) => &self.local_fallback_loads,
            None => &self.failed_loads,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_rejected(&self) {
        self.rejected_refreshes.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_parse(&self, duration: std::time::Duration, records: usize) {
        self.total_parse_time_us.fetch_add(duration.as_micros() as u64, Ordering::Relaxed);
        self.documents_parsed.fetch_add(1, Ordering::Relaxed);
        self.total_records_parsed.fetch_add(records, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            total_loads: self.total_loads.load(Ordering::Relaxed),
            remote_loads: self.remote_loads.load(Ordering::Relaxed),
            local_fallback_loads: self.local_fallback_loads.load(Ordering::Relaxed),
            failed_loads: self.failed_loads.load(Ordering::Relaxed),
            rejected_refreshes: self.rejected_refreshes.load(Ordering::Relaxed),
            avg_parse_time_ms: self.avg_time_ms(&self.total_parse_time_us, &self.documents_parsed),
            total_records_parsed: self.total_records_parsed.load(Ordering::Relaxed),
        }
    }

    fn avg_time_ms(&self, total_us: &AtomicU64, count: &AtomicUsize) -> f64 {
        let total = total_us.load(Ordering::Relaxed) as f64;
        let cnt = count.load(Ordering::Relaxed) as f64;
        if cnt > 0.0 {
            total / cnt / 1000.0 // Convert to ms
        } else {
            0.0
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MetricsSnapshot {
    pub total_loads: usize,
    pub remote_loads: usize,
    pub local_fallback_loads: usize,
    pub failed_loads: usize,
    pub rejected_refreshes: usize,
    pub avg_parse_time_ms: f64,
    pub total_records_parsed: usize,
}

pub struct TimedOperation {
    start: Instant,
}

impl TimedOperation {
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> std::time::Duration {
        self.start.elapsed()
    }
}
