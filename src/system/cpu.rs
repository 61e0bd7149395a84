//! Per-process CPU utilization from wall-clock and cumulative CPU time deltas.

use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq)]
struct Baseline {
    at: Instant,
    cpu_time: Duration,
}

/// Tracks the last sample of one process and the utilization derived from it.
///
/// Two states only: with or without a baseline. The first sample of a
/// sampler without a baseline just records one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CpuSampler {
    baseline: Option<Baseline>,
    utilization: f64,
}

impl CpuSampler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_baseline(at: Instant, cpu_time: Duration) -> Self {
        Self {
            baseline: Some(Baseline { at, cpu_time }),
            utilization: 0.0,
        }
    }

    /// Last computed utilization, always within `[0, 100]`.
    pub fn utilization(&self) -> f64 {
        self.utilization
    }

    pub fn has_baseline(&self) -> bool {
        self.baseline.is_some()
    }

    pub fn baseline(&self) -> Option<(Instant, Duration)> {
        self.baseline.map(|b| (b.at, b.cpu_time))
    }

    /// Computes utilization against the stored baseline and advances it.
    ///
    /// `utilization = cpu_delta / (logical_cpus * wall_delta) * 100`, in
    /// milliseconds, clamped to `[0, 100]`. A non-positive wall delta keeps
    /// the previous value.
    pub fn sample(&mut self, now: Instant, cpu_time: Duration, logical_cpus: usize) -> f64 {
        if let Some(prev) = self.baseline {
            let wall_ms = now
                .checked_duration_since(prev.at)
                .map(|d| d.as_secs_f64() * 1000.0)
                .unwrap_or(0.0);
            if wall_ms > 0.0 {
                let cpu_ms = cpu_time.saturating_sub(prev.cpu_time).as_secs_f64() * 1000.0;
                let cpus = logical_cpus.max(1) as f64;
                self.utilization = (cpu_ms / (cpus * wall_ms) * 100.0).clamp(0.0, 100.0);
            }
        }

        self.baseline = Some(Baseline { at: now, cpu_time });
        self.utilization
    }

    /// The CPU time read failed: report 0 and leave the baseline stale.
    pub fn record_failure(&mut self) -> f64 {
        self.utilization = 0.0;
        self.utilization
    }
}
