use super::daily::DailyMetric;

/// Days whose negative share rose by at least `threshold` percentage points
/// over the previous day, in series order. An empty result is a valid answer.
pub fn detect_spikes(daily: &[DailyMetric], threshold: f64) -> Vec<DailyMetric> {
    daily
        .iter()
        .filter(|d| d.neg_diff >= threshold)
        .cloned()
        .collect()
}
