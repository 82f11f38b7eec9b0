use chrono::NaiveDate;
use serde::Serialize;

use super::metrics::{self, MetricsResult};
use super::portfolio::PortfolioSeries;

/// One metric snapshot for a rolling window ending on `end_day`.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RollingSample {
    pub end_day: NaiveDate,
    #[serde(flatten)]
    pub metrics: MetricsResult,
}

/// Slide a `window_days`-long window across a daily change series in
/// `step_days` increments, computing the metric set for each slice.
///
/// Each slice rebuilds its running-sum curve from zero, so samples are
/// independent of one another and of any state: the same inputs always
/// reproduce the same sequence. Different window lengths are simply
/// independent calls.
pub fn analyze(
    days: &[NaiveDate],
    changes: &[f64],
    initial_capital: f64,
    window_days: usize,
    step_days: usize,
) -> Vec<RollingSample> {
    if window_days == 0 || step_days == 0 || changes.len() < window_days {
        return Vec::new();
    }
    debug_assert_eq!(days.len(), changes.len());

    let label = format!("{window_days}d");
    let mut samples = Vec::with_capacity((changes.len() - window_days) / step_days + 1);
    let mut start = 0;
    while start + window_days <= changes.len() {
        let end = start + window_days;
        let slice = PortfolioSeries::from_changes(
            days[start..end].to_vec(),
            changes[start..end].to_vec(),
            initial_capital,
        );
        samples.push(RollingSample {
            end_day: days[end - 1],
            metrics: metrics::compute(&label, &slice),
        });
        start += step_days;
    }
    samples
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: i32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 1).unwrap() + chrono::Days::new(d as u64)
    }

    fn history(len: usize) -> (Vec<NaiveDate>, Vec<f64>) {
        let days: Vec<NaiveDate> = (0..len as i32).map(day).collect();
        let changes: Vec<f64> = (0..len).map(|i| if i % 3 == 0 { -50.0 } else { 100.0 }).collect();
        (days, changes)
    }

    #[test]
    fn one_sample_per_step_tagged_with_the_window_end_day() {
        let (days, changes) = history(10);
        let samples = analyze(&days, &changes, 100_000.0, 3, 1);
        assert_eq!(samples.len(), 8);
        assert_eq!(samples[0].end_day, day(2));
        assert_eq!(samples[7].end_day, day(9));
        assert!(samples.iter().all(|s| s.metrics.window == "3d"));
    }

    #[test]
    fn larger_steps_skip_offsets() {
        let (days, changes) = history(10);
        let samples = analyze(&days, &changes, 100_000.0, 4, 3);
        assert_eq!(samples.len(), 3);
        assert_eq!(samples[1].end_day, day(6));
    }

    #[test]
    fn too_short_a_history_yields_no_samples() {
        let (days, changes) = history(5);
        assert!(analyze(&days, &changes, 100_000.0, 6, 1).is_empty());
        assert!(analyze(&days, &changes, 100_000.0, 0, 1).is_empty());
    }

    #[test]
    fn reruns_reproduce_the_same_sequence() {
        let (days, changes) = history(20);
        let a = analyze(&days, &changes, 100_000.0, 7, 2);
        let b = analyze(&days, &changes, 100_000.0, 7, 2);
        assert_eq!(a.len(), b.len());
        for (x, y) in a.iter().zip(&b) {
            assert_eq!(x.end_day, y.end_day);
            assert_eq!(x.metrics.total_pnl, y.metrics.total_pnl);
            assert_eq!(x.metrics.sharpe_ratio, y.metrics.sharpe_ratio);
        }
    }

    #[test]
    fn slices_are_independent_of_preceding_history() {
        let (days, changes) = history(12);
        let full = analyze(&days, &changes, 100_000.0, 4, 1);
        let tail = analyze(&days[8..], &changes[8..], 100_000.0, 4, 1);
        let last = full.last().unwrap();
        let only = tail.last().unwrap();
        assert_eq!(last.end_day, only.end_day);
        assert_eq!(last.metrics.total_pnl, only.metrics.total_pnl);
        assert_eq!(last.metrics.max_drawdown, only.metrics.max_drawdown);
    }
}
