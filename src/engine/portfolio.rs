use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Deserialize;

use super::metrics::CAGR_CAP;
use super::series::DailySeries;

pub const DEFAULT_INITIAL_CAPITAL: f64 = 100_000.0;

/// Assumed capital base of tracked traders, used to scale their dollar
/// deltas down to the hypothetical portfolio's size in capital-scaled mode.
pub const DEFAULT_REFERENCE_CAPITAL: f64 = 1_000_000.0;

/// Percentage allocation to one tracked trader.
///
/// Percentages are applied as given; the set is not renormalized to sum
/// to 100.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Allocation {
    pub trader_address: String,
    pub percentage: f64,
}

/// How per-trader daily P&L deltas combine into one portfolio series.
///
/// The two modes produce materially different numbers and both are part of
/// the calculator's contract; neither replaces the other.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Weighting {
    /// Weighted sum of raw dollar deltas per day.
    DeltaWeighted,
    /// Weighted deltas scaled by `initial_capital / reference_capital`,
    /// applied to an equity curve seeded at the initial capital.
    CapitalScaled { reference_capital: f64 },
}

/// A composed portfolio history, ready for metric computation.
#[derive(Clone, Debug, Default)]
pub struct PortfolioSeries {
    /// Days with at least one contributing trader, ascending.
    pub days: Vec<NaiveDate>,
    /// Daily portfolio change, parallel to `days`.
    pub changes: Vec<f64>,
    /// Cumulative value series tracked for drawdown: a running P&L sum in
    /// delta mode, the seeded equity curve (one leading entry) in
    /// capital-scaled mode.
    pub curve: Vec<f64>,
    /// Start and end values for growth-rate computation.
    pub start_value: f64,
    pub end_value: f64,
    /// Upper bound on CAGR where the composition mode defines one.
    pub cagr_cap: Option<f64>,
}

impl PortfolioSeries {
    /// Running-sum series over raw daily changes (delta-mode semantics):
    /// the curve accumulates from zero and the end value is the initial
    /// capital plus total P&L.
    pub fn from_changes(days: Vec<NaiveDate>, changes: Vec<f64>, initial_capital: f64) -> Self {
        let mut curve = Vec::with_capacity(changes.len());
        let mut acc = 0.0;
        for change in &changes {
            acc += change;
            curve.push(acc);
        }
        PortfolioSeries {
            days,
            changes,
            curve,
            start_value: initial_capital,
            end_value: initial_capital + acc,
            cagr_cap: None,
        }
    }
}

impl Weighting {
    /// Combine per-trader delta series into one portfolio series.
    ///
    /// Traders are joined by day key, not by index: a day enters the output
    /// when at least one trader has a delta for it, and only the traders
    /// present that day contribute. Days with no contributors are skipped,
    /// never zero-filled.
    pub fn compose(
        &self,
        trader_deltas: &[(f64, DailySeries)],
        initial_capital: f64,
    ) -> PortfolioSeries {
        let mut weighted: BTreeMap<NaiveDate, f64> = BTreeMap::new();
        for (percentage, deltas) in trader_deltas {
            let weight = percentage / 100.0;
            for (day, delta) in deltas {
                *weighted.entry(*day).or_insert(0.0) += delta * weight;
            }
        }

        let days: Vec<NaiveDate> = weighted.keys().copied().collect();
        let deltas: Vec<f64> = weighted.into_values().collect();

        match *self {
            Weighting::DeltaWeighted => {
                PortfolioSeries::from_changes(days, deltas, initial_capital)
            }
            Weighting::CapitalScaled { reference_capital } => {
                let scale = if reference_capital > 0.0 {
                    initial_capital / reference_capital
                } else {
                    0.0
                };
                let mut equity = initial_capital;
                let mut curve = Vec::with_capacity(deltas.len() + 1);
                curve.push(equity);
                let changes: Vec<f64> = deltas
                    .iter()
                    .map(|delta| {
                        let scaled = delta * scale;
                        equity += scaled;
                        curve.push(equity);
                        scaled
                    })
                    .collect();
                PortfolioSeries {
                    days,
                    changes,
                    curve,
                    start_value: initial_capital,
                    end_value: equity,
                    cagr_cap: Some(CAGR_CAP),
                }
            }
        }
    }
}
