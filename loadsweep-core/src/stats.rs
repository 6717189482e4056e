//! Latency statistics over a set of samples.
//!
//! Percentiles use linear interpolation between the two closest ranks of the sorted samples,
//! so `percentile(0)` is the minimum and `percentile(100)` the maximum. Every function here
//! treats an empty input as all zeros instead of failing.
use std::time::Duration;

/// Summary of one set of latency samples.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LatencyStats {
    pub count: usize,
    pub mean: Duration,
    pub p95: Duration,
    pub p99: Duration,
    pub max: Duration,
}

impl LatencyStats {
    /// Reduce unordered samples. The result does not depend on the input order.
    pub fn from_samples(samples: &[Duration]) -> Self {
        if samples.is_empty() {
            return Self::default();
        }

        let mut sorted: Vec<f64> = samples.iter().map(Duration::as_secs_f64).collect();
        sorted.sort_by(f64::total_cmp);

        Self {
            count: sorted.len(),
            mean: secs_to_duration(mean(&sorted)),
            p95: secs_to_duration(percentile(&sorted, 95.)),
            p99: secs_to_duration(percentile(&sorted, 99.)),
            max: secs_to_duration(sorted.last().copied().unwrap_or(0.)),
        }
    }
}

/// Arithmetic mean, `0.0` for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

/// Linearly interpolated percentile of an already sorted slice.
///
/// `p` is in `[0, 100]` and is clamped to that range.
pub fn percentile(sorted: &[f64], p: f64) -> f64 {
    match sorted.len() {
        0 => 0.,
        1 => sorted[0],
        n => {
            let rank = p.clamp(0., 100.) / 100. * (n - 1) as f64;
            let lo = rank.floor() as usize;
            let hi = rank.ceil() as usize;
            if lo == hi {
                sorted[lo]
            } else {
                sorted[lo] + (rank - lo as f64) * (sorted[hi] - sorted[lo])
            }
        }
    }
}

/// Milliseconds as a float, the unit reports are written in.
pub fn as_millis_f64(dur: Duration) -> f64 {
    dur.as_secs_f64() * 1_000.
}

pub(crate) fn secs_to_duration(secs: f64) -> Duration {
    Duration::try_from_secs_f64(secs).unwrap_or(Duration::ZERO)
}
