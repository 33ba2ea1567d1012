//! Aggregate statistics over business-hour samples

use common::models::TimingMetric;

/// Round to two decimal places, halves away from zero
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// `numerator / denominator` as a percentage, 0.0 for an empty denominator
pub fn percentage(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        return 0.0;
    }
    round2(numerator as f64 / denominator as f64 * 100.0)
}

/// Mean of the samples, 0.0 when there are none
pub fn average(samples: &[f64]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    round2(samples.iter().sum::<f64>() / samples.len() as f64)
}

/// Nearest-rank percentile: the sorted sample at `round(p/100 * (n-1))`.
/// No interpolation between ranks. 0.0 when there are no samples.
pub fn percentile(samples: &[f64], p: f64) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    let mut sorted = samples.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let rank = (p / 100.0 * (sorted.len() - 1) as f64).round() as usize;
    round2(sorted[rank.min(sorted.len() - 1)])
}

/// Average and p90 of a sample set
pub fn timing_metric(samples: &[f64]) -> TimingMetric {
    TimingMetric {
        average: average(samples),
        p90: percentile(samples, 90.0),
    }
}
