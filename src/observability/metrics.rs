//! Thread-safe metrics collection system
//!
//! Atomic counters and mutex-protected collections for invocation,
//! per-tool and protocol statistics. A collector is created at startup and
//! shared by `Arc` between the dispatcher, the server and the health endpoint.

use serde::Serialize;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

const MAX_SAMPLES: usize = 1000;

/// Thread-safe metrics collector using atomics and mutexes
pub struct MetricsCollector {
    // Invocation metrics (atomic for high frequency)
    invocations_received: AtomicU64,
    invocations_in_flight: AtomicU64,
    max_in_flight: AtomicU64,
    invocations_succeeded: AtomicU64,
    invocations_failed: AtomicU64,
    unknown_tool_calls: AtomicU64,

    // Protocol metrics
    requests_received: AtomicU64,
    parse_errors: AtomicU64,
    responses_written: AtomicU64,

    // Invocation durations in milliseconds
    invocation_times: Mutex<Vec<u64>>,

    // Per-tool statistics
    tool_stats: Mutex<HashMap<String, ToolExecutionStats>>,

    uptime_start: AtomicU64,
}

impl MetricsCollector {
    pub fn new() -> Self {
        Self {
            invocations_received: AtomicU64::new(0),
            invocations_in_flight: AtomicU64::new(0),
            max_in_flight: AtomicU64::new(0),
            invocations_succeeded: AtomicU64::new(0),
            invocations_failed: AtomicU64::new(0),
            unknown_tool_calls: AtomicU64::new(0),
            requests_received: AtomicU64::new(0),
            parse_errors: AtomicU64::new(0),
            responses_written: AtomicU64::new(0),
            invocation_times: Mutex::new(Vec::new()),
            tool_stats: Mutex::new(HashMap::new()),
            uptime_start: AtomicU64::new(current_timestamp()),
        }
    }

    // Invocation metrics
    pub fn invocation_started(&self) {
        self.invocations_received.fetch_add(1, Ordering::Relaxed);
        let in_flight = self.invocations_in_flight.fetch_add(1, Ordering::Relaxed) + 1;
        self.max_in_flight.fetch_max(in_flight, Ordering::Relaxed);
    }

    pub fn invocation_finished(&self, duration: Duration, success: bool) {
        if success {
            self.invocations_succeeded.fetch_add(1, Ordering::Relaxed);
        } else {
            self.invocations_failed.fetch_add(1, Ordering::Relaxed);
        }
        self.invocations_in_flight.fetch_sub(1, Ordering::Relaxed);

        if let Ok(mut times) = self.invocation_times.lock() {
            push_bounded(&mut times, duration.as_millis() as u64);
        }
    }

    pub fn unknown_tool(&self) {
        self.unknown_tool_calls.fetch_add(1, Ordering::Relaxed);
    }

    // Protocol metrics
    pub fn request_received(&self) {
        self.requests_received.fetch_add(1, Ordering::Relaxed);
    }

    pub fn parse_error(&self) {
        self.parse_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn response_written(&self) {
        self.responses_written.fetch_add(1, Ordering::Relaxed);
    }

    /// Update tool execution statistics (pure function)
    fn update_tool_execution_stats(
        tool_stats: &mut ToolExecutionStats,
        duration: Duration,
        success: bool,
    ) {
        tool_stats.executions += 1;
        tool_stats.last_execution = current_timestamp();
        push_bounded(&mut tool_stats.execution_times, duration.as_millis() as u64);

        if !success {
            tool_stats.failures += 1;
        }
    }

    // Tool execution metrics
    pub fn tool_executed(&self, tool_name: &str, duration: Duration, success: bool) {
        if let Ok(mut stats) = self.tool_stats.lock() {
            let tool_stats = stats
                .entry(tool_name.to_string())
                .or_insert_with(|| ToolExecutionStats::new(tool_name));
            Self::update_tool_execution_stats(tool_stats, duration, success);
        }
    }

    #[cfg(test)]
    fn reset(&self) {
        for counter in [
            &self.invocations_received,
            &self.invocations_in_flight,
            &self.max_in_flight,
            &self.invocations_succeeded,
            &self.invocations_failed,
            &self.unknown_tool_calls,
            &self.requests_received,
            &self.parse_errors,
            &self.responses_written,
        ] {
            counter.store(0, Ordering::Relaxed);
        }
        self.uptime_start
            .store(current_timestamp(), Ordering::Relaxed);
        if let Ok(mut times) = self.invocation_times.lock() {
            times.clear();
        }
        if let Ok(mut stats) = self.tool_stats.lock() {
            stats.clear();
        }
    }

    /// Calculate invocation time statistics: (avg, p50, p95, p99)
    fn calculate_invocation_time_statistics(&self) -> (f64, f64, f64, f64) {
        let Ok(times) = self.invocation_times.lock() else {
            return (0.0, 0.0, 0.0, 0.0);
        };
        if times.is_empty() {
            return (0.0, 0.0, 0.0, 0.0);
        }

        let mut sorted_times = times.clone();
        sorted_times.sort_unstable();

        let avg = sorted_times.iter().sum::<u64>() as f64 / sorted_times.len() as f64;
        (
            avg,
            percentile(&sorted_times, 50.0),
            percentile(&sorted_times, 95.0),
            percentile(&sorted_times, 99.0),
        )
    }

    /// Create tool execution snapshot (pure function)
    fn create_tool_snapshot(stats: &ToolExecutionStats) -> ToolExecutionStatsSnapshot {
        let avg_execution_time = if stats.execution_times.is_empty() {
            0.0
        } else {
            stats.execution_times.iter().sum::<u64>() as f64 / stats.execution_times.len() as f64
        };

        let success_rate = if stats.executions == 0 {
            0.0
        } else {
            (stats.executions - stats.failures) as f64 / stats.executions as f64
        };

        ToolExecutionStatsSnapshot {
            name: stats.name.clone(),
            executions: stats.executions,
            failures: stats.failures,
            avg_execution_time_ms: avg_execution_time,
            last_execution: stats.last_execution,
            success_rate,
        }
    }

    fn build_tool_metrics(&self) -> ToolMetrics {
        let Ok(stats) = self.tool_stats.lock() else {
            return ToolMetrics::default();
        };

        let mut metrics = ToolMetrics::default();
        for (name, stats) in stats.iter() {
            metrics.total_executions += stats.executions;
            metrics.total_failures += stats.failures;
            metrics
                .tool_stats
                .insert(name.clone(), Self::create_tool_snapshot(stats));
        }
        metrics
    }

    /// Get complete metrics snapshot
    pub fn get_metrics(&self) -> MetricsSnapshot {
        let now = current_timestamp();
        let (avg_invocation_time_ms, p50, p95, p99) = self.calculate_invocation_time_statistics();

        MetricsSnapshot {
            invocations: InvocationMetrics {
                received: self.invocations_received.load(Ordering::Relaxed),
                in_flight: self.invocations_in_flight.load(Ordering::Relaxed),
                max_in_flight: self.max_in_flight.load(Ordering::Relaxed),
                succeeded: self.invocations_succeeded.load(Ordering::Relaxed),
                failed: self.invocations_failed.load(Ordering::Relaxed),
                unknown_tool_calls: self.unknown_tool_calls.load(Ordering::Relaxed),
                avg_invocation_time_ms,
                invocation_time_p50_ms: p50,
                invocation_time_p95_ms: p95,
                invocation_time_p99_ms: p99,
            },
            protocol: ProtocolMetrics {
                requests_received: self.requests_received.load(Ordering::Relaxed),
                parse_errors: self.parse_errors.load(Ordering::Relaxed),
                responses_written: self.responses_written.load(Ordering::Relaxed),
            },
            tools: self.build_tool_metrics(),
            uptime_seconds: now.saturating_sub(self.uptime_start.load(Ordering::Relaxed)),
            timestamp: now,
        }
    }
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new()
    }
}

// Internal tool statistics (with timing data)
#[derive(Debug)]
struct ToolExecutionStats {
    name: String,
    executions: u64,
    failures: u64,
    execution_times: Vec<u64>, // milliseconds
    last_execution: u64,
}

impl ToolExecutionStats {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            executions: 0,
            failures: 0,
            execution_times: Vec::new(),
            last_execution: 0,
        }
    }
}

// Public metrics structures
#[derive(Debug, Serialize)]
pub struct MetricsSnapshot {
    pub invocations: InvocationMetrics,
    pub protocol: ProtocolMetrics,
    pub tools: ToolMetrics,
    pub uptime_seconds: u64,
    pub timestamp: u64,
}

#[derive(Debug, Serialize)]
pub struct InvocationMetrics {
    pub received: u64,
    pub in_flight: u64,
    pub max_in_flight: u64,
    pub succeeded: u64,
    pub failed: u64,
    pub unknown_tool_calls: u64,
    pub avg_invocation_time_ms: f64,
    pub invocation_time_p50_ms: f64,
    pub invocation_time_p95_ms: f64,
    pub invocation_time_p99_ms: f64,
}

#[derive(Debug, Serialize)]
pub struct ProtocolMetrics {
    pub requests_received: u64,
    pub parse_errors: u64,
    pub responses_written: u64,
}

#[derive(Debug, Default, Serialize)]
pub struct ToolMetrics {
    pub tool_stats: HashMap<String, ToolExecutionStatsSnapshot>,
    pub total_executions: u64,
    pub total_failures: u64,
}

#[derive(Debug, Serialize)]
pub struct ToolExecutionStatsSnapshot {
    pub name: String,
    pub executions: u64,
    pub failures: u64,
    pub avg_execution_time_ms: f64,
    pub last_execution: u64,
    pub success_rate: f64,
}

// Helper functions
fn push_bounded(samples: &mut Vec<u64>, value: u64) {
    samples.push(value);
    if samples.len() > MAX_SAMPLES {
        samples.remove(0);
    }
}

fn current_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

fn percentile(sorted_data: &[u64], percentile: f64) -> f64 {
    if sorted_data.is_empty() {
        return 0.0;
    }

    let len = sorted_data.len();
    let index = (percentile / 100.0) * (len - 1) as f64;

    if index.fract() == 0.0 {
        sorted_data[index as usize] as f64
    } else {
        let lower_index = index.floor() as usize;
        let upper_index = index.ceil() as usize;
        let lower_value = sorted_data[lower_index] as f64;
        let upper_value = sorted_data[upper_index] as f64;

        lower_value + (upper_value - lower_value) * index.fract()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_invocation_metrics() {
        let collector = MetricsCollector::new();

        collector.invocation_started();
        collector.invocation_started();
        collector.invocation_finished(Duration::from_millis(1500), true);
        collector.invocation_finished(Duration::from_millis(500), false);

        let metrics = collector.get_metrics();
        assert_eq!(metrics.invocations.received, 2);
        assert_eq!(metrics.invocations.succeeded, 1);
        assert_eq!(metrics.invocations.failed, 1);
        assert_eq!(metrics.invocations.in_flight, 0);
        assert_eq!(metrics.invocations.max_in_flight, 2);
        assert!(metrics.invocations.avg_invocation_time_ms > 900.0);
    }

    #[test]
    fn test_tool_metrics() {
        let collector = MetricsCollector::new();

        collector.tool_executed("news-search", Duration::from_millis(500), true);
        collector.tool_executed("news-search", Duration::from_millis(300), false);

        let metrics = collector.get_metrics();
        let tool_stats = metrics.tools.tool_stats.get("news-search").unwrap();

        assert_eq!(tool_stats.executions, 2);
        assert_eq!(tool_stats.failures, 1);
        assert_eq!(tool_stats.success_rate, 0.5);
        assert!(tool_stats.avg_execution_time_ms > 350.0);
        assert_eq!(metrics.tools.total_executions, 2);
    }

    #[test]
    fn test_thread_safety() {
        let collector = Arc::new(MetricsCollector::new());

        let handles: Vec<_> = (0..10)
            .map(|_| {
                let collector = Arc::clone(&collector);
                thread::spawn(move || {
                    for _ in 0..100 {
                        collector.request_received();
                        collector.response_written();
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        let metrics = collector.get_metrics();
        assert_eq!(metrics.protocol.requests_received, 1000);
        assert_eq!(metrics.protocol.responses_written, 1000);
    }

    #[test]
    fn test_percentile_calculation() {
        let data = vec![1, 2, 3, 4, 5, 6, 7, 8, 9, 10];

        let p50 = percentile(&data, 50.0);
        let p95 = percentile(&data, 95.0);

        assert!((p50 - 5.5).abs() < 0.1, "P50: expected ~5.5, got {p50}");
        assert!((p95 - 9.55).abs() < 0.1, "P95: expected ~9.55, got {p95}");
        assert_eq!(percentile(&data, 0.0), 1.0);
        assert_eq!(percentile(&data, 100.0), 10.0);
        assert_eq!(percentile(&[], 50.0), 0.0);
    }

    #[test]
    fn test_samples_are_bounded() {
        let mut samples = Vec::new();
        for i in 0..1500 {
            push_bounded(&mut samples, i);
        }
        assert_eq!(samples.len(), MAX_SAMPLES);
        assert_eq!(samples[0], 500);
    }

    #[test]
    fn test_reset_functionality() {
        let collector = MetricsCollector::new();

        collector.invocation_started();
        collector.unknown_tool();
        collector.tool_executed("blog-search", Duration::from_millis(100), true);

        collector.reset();

        let metrics = collector.get_metrics();
        assert_eq!(metrics.invocations.received, 0);
        assert_eq!(metrics.invocations.unknown_tool_calls, 0);
        assert!(metrics.tools.tool_stats.is_empty());
    }
}
