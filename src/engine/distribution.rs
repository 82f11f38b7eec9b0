use serde::Serialize;

use super::metrics::{mean, std_dev};

pub const DEFAULT_BIN_COUNT: usize = 20;

/// One equal-width histogram bucket, half-open except the last.
#[derive(Clone, Debug, Serialize)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
    /// Height relative to the tallest bin, 0..1. Not a probability density.
    pub frequency: f64,
}

#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryStats {
    pub mean: f64,
    /// Middle element of the ascending sort; for even-length inputs the
    /// upper-middle element (index n/2), never an average of the pair.
    pub median: f64,
    pub std_dev: f64,
    pub skewness: f64,
    pub min: f64,
    pub max: f64,
}

/// Histogram, fitted normal overlay, and descriptive statistics for a
/// collection of scalar metric samples.
#[derive(Clone, Debug, Default, Serialize)]
pub struct Distribution {
    pub bins: Vec<HistogramBin>,
    /// Gaussian kernel evaluated at bin midpoints, normalized so its
    /// maximum is 1 (overlays against the frequency-normalized bins).
    /// All zeros when the samples have no spread.
    pub curve: Vec<f64>,
    pub stats: SummaryStats,
}

/// Bin `values` into `bin_count` equal-width buckets over [min, max] and fit
/// a normal curve over the same bins.
///
/// A zero-spread sample set collapses to a single bin of width 1 centered on
/// the value. An empty sample set yields an empty distribution.
pub fn summarize(values: &[f64], bin_count: usize) -> Distribution {
    if values.is_empty() || bin_count == 0 {
        return Distribution::default();
    }

    let lo = values.iter().copied().fold(f64::INFINITY, f64::min);
    let hi = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    let (bins_len, origin, width) = if hi == lo {
        (1, lo - 0.5, 1.0)
    } else {
        (bin_count, lo, (hi - lo) / bin_count as f64)
    };

    let mut counts = vec![0usize; bins_len];
    for &value in values {
        // Floor-index into the bins; the max value lands in the last one.
        let idx = (((value - origin) / width) as usize).min(bins_len - 1);
        counts[idx] += 1;
    }
    let tallest = counts.iter().copied().max().unwrap_or(1) as f64;

    let bins: Vec<HistogramBin> = counts
        .iter()
        .enumerate()
        .map(|(i, &count)| {
            let start = origin + i as f64 * width;
            HistogramBin {
                start,
                end: start + width,
                count,
                frequency: count as f64 / tallest,
            }
        })
        .collect();

    let m = mean(values);
    let s = std_dev(values);
    let curve = normal_overlay(&bins, m, s);

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let median = sorted[sorted.len() / 2];

    let skewness = if s == 0.0 {
        0.0
    } else {
        values
            .iter()
            .map(|v| {
                let z = (v - m) / s;
                z * z * z
            })
            .sum::<f64>()
            / values.len() as f64
    };

    Distribution {
        bins,
        curve,
        stats: SummaryStats {
            mean: m,
            median,
            std_dev: s,
            skewness,
            min: lo,
            max: hi,
        },
    }
}

fn normal_overlay(bins: &[HistogramBin], mean: f64, std_dev: f64) -> Vec<f64> {
    if std_dev == 0.0 {
        return vec![0.0; bins.len()];
    }
    let kernel: Vec<f64> = bins
        .iter()
        .map(|bin| {
            let mid = (bin.start + bin.end) / 2.0;
            let z = (mid - mean) / std_dev;
            (-0.5 * z * z).exp()
        })
        .collect();
    let peak = kernel.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    kernel.into_iter().map(|k| k / peak).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::rolling;
    use chrono::NaiveDate;

    const EPS: f64 = 1e-9;

    #[test]
    fn zero_spread_values_collapse_to_a_single_unit_bin() {
        let dist = summarize(&[1.0, 1.0, 1.0, 1.0], DEFAULT_BIN_COUNT);
        assert_eq!(dist.bins.len(), 1);
        let bin = &dist.bins[0];
        assert!((bin.start - 0.5).abs() < EPS);
        assert!((bin.end - 1.5).abs() < EPS);
        assert_eq!(bin.count, 4);
        assert_eq!(bin.frequency, 1.0);
        assert_eq!(dist.stats.min, 1.0);
        assert_eq!(dist.stats.max, 1.0);
    }

    #[test]
    fn the_maximum_value_lands_in_the_last_bin() {
        let values: Vec<f64> = (0..=10).map(f64::from).collect();
        let dist = summarize(&values, 5);
        assert_eq!(dist.bins.len(), 5);
        assert_eq!(dist.bins[4].count, 3); // 8, 9 and the closed-end 10
        assert_eq!(dist.bins.iter().map(|b| b.count).sum::<usize>(), 11);
    }

    #[test]
    fn frequency_is_relative_to_the_tallest_bin() {
        let dist = summarize(&[0.0, 0.1, 0.2, 0.3, 10.0], 2);
        assert_eq!(dist.bins[0].count, 4);
        assert_eq!(dist.bins[0].frequency, 1.0);
        assert_eq!(dist.bins[1].count, 1);
        assert!((dist.bins[1].frequency - 0.25).abs() < EPS);
    }

    #[test]
    fn median_takes_the_upper_middle_for_even_lengths() {
        let dist = summarize(&[4.0, 1.0, 3.0, 2.0], 4);
        assert_eq!(dist.stats.median, 3.0);

        let odd = summarize(&[5.0, 1.0, 3.0], 3);
        assert_eq!(odd.stats.median, 3.0);
    }

    #[test]
    fn normal_overlay_is_all_zeros_without_spread() {
        let dist = summarize(&[2.0, 2.0], DEFAULT_BIN_COUNT);
        assert!(dist.curve.iter().all(|&c| c == 0.0));
    }

    #[test]
    fn normal_overlay_peaks_at_one() {
        let values = vec![-2.0, -1.0, 0.0, 0.0, 1.0, 2.0];
        let dist = summarize(&values, 6);
        let peak = dist.curve.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        assert!((peak - 1.0).abs() < EPS);
        assert!(dist.curve.iter().all(|&c| c > 0.0 && c <= 1.0));
    }

    #[test]
    fn symmetric_values_have_zero_skewness() {
        let dist = summarize(&[-3.0, -1.0, 1.0, 3.0], 4);
        assert!(dist.stats.skewness.abs() < EPS);
    }

    #[test]
    fn empty_samples_yield_an_empty_distribution() {
        let dist = summarize(&[], DEFAULT_BIN_COUNT);
        assert!(dist.bins.is_empty());
        assert!(dist.curve.is_empty());
        assert_eq!(dist.stats.mean, 0.0);
    }

    #[test]
    fn rolling_sharpe_samples_round_trip_through_the_histogram() {
        let days: Vec<NaiveDate> = (0..60u64)
            .map(|d| NaiveDate::from_ymd_opt(2025, 1, 1).unwrap() + chrono::Days::new(d))
            .collect();
        let changes: Vec<f64> = (0..60)
            .map(|i| match i % 4 {
                0 => 120.0,
                1 => -40.0,
                2 => 80.0,
                _ => -90.0,
            })
            .collect();

        let samples = rolling::analyze(&days, &changes, 100_000.0, 14, 1);
        let sharpes: Vec<f64> = samples
            .iter()
            .filter_map(|s| s.metrics.metric("sharpeRatio"))
            .collect();
        assert!(!sharpes.is_empty());

        let dist = summarize(&sharpes, DEFAULT_BIN_COUNT);
        let total: usize = dist.bins.iter().map(|b| b.count).sum();
        assert_eq!(total, sharpes.len());
    }
}
