use serde::Serialize;

use super::portfolio::PortfolioSeries;

/// Annualization factor for daily change series.
const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Upper bound on annualized growth in capital-scaled mode, where a
/// near-zero-duration window makes the exponent blow up.
pub const CAGR_CAP: f64 = 99_999.0;

/// Wire-format keys a distribution request may select a metric by.
pub const METRIC_KEYS: &[&str] = &[
    "maxDrawdown",
    "cagr",
    "totalPnL",
    "sharpeRatio",
    "sortinoRatio",
    "winRate",
    "avgWin",
    "avgLoss",
    "profitFactor",
];

/// Risk/performance metrics for one requested window.
///
/// Ratio fields are `None` when the quantity is undefined (zero variance,
/// no losing days) and serialize as JSON `null`; zero is a distinct,
/// meaningful value.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsResult {
    pub window: String,
    /// Largest peak-to-trough decline, reported as a negative percentage.
    pub max_drawdown: f64,
    pub cagr: f64,
    #[serde(rename = "totalPnL")]
    pub total_pnl: f64,
    pub sharpe_ratio: Option<f64>,
    pub sortino_ratio: Option<f64>,
    pub win_rate: f64,
    pub avg_win: f64,
    pub avg_loss: f64,
    pub profit_factor: Option<f64>,
}

impl MetricsResult {
    /// All-zero metrics with undefined ratios, for windows with no
    /// overlapping observations. Sparse data is not an error.
    pub fn empty(window: impl Into<String>) -> Self {
        MetricsResult {
            window: window.into(),
            max_drawdown: 0.0,
            cagr: 0.0,
            total_pnl: 0.0,
            sharpe_ratio: None,
            sortino_ratio: None,
            win_rate: 0.0,
            avg_win: 0.0,
            avg_loss: 0.0,
            profit_factor: None,
        }
    }

    /// Look up a metric by its wire-format key.
    pub fn metric(&self, key: &str) -> Option<f64> {
        match key {
            "maxDrawdown" => Some(self.max_drawdown),
            "cagr" => Some(self.cagr),
            "totalPnL" => Some(self.total_pnl),
            "sharpeRatio" => self.sharpe_ratio,
            "sortinoRatio" => self.sortino_ratio,
            "winRate" => Some(self.win_rate),
            "avgWin" => Some(self.avg_win),
            "avgLoss" => Some(self.avg_loss),
            "profitFactor" => self.profit_factor,
            _ => None,
        }
    }
}

/// Compute the full metric set for one composed portfolio window.
pub fn compute(window: &str, series: &PortfolioSeries) -> MetricsResult {
    let changes = &series.changes;
    if changes.is_empty() {
        return MetricsResult::empty(window);
    }

    let wins: Vec<f64> = changes.iter().copied().filter(|c| *c > 0.0).collect();
    let losses: Vec<f64> = changes.iter().copied().filter(|c| *c < 0.0).collect();

    let win_rate = wins.len() as f64 / changes.len() as f64 * 100.0;
    let avg_win = if wins.is_empty() {
        0.0
    } else {
        wins.iter().sum::<f64>() / wins.len() as f64
    };
    let avg_loss = if losses.is_empty() {
        0.0
    } else {
        losses.iter().sum::<f64>() / losses.len() as f64
    };

    // Undefined without losing days, not infinite.
    let profit_factor = if losses.is_empty() {
        None
    } else {
        Some(wins.iter().sum::<f64>() / losses.iter().sum::<f64>().abs())
    };

    let mean_change = mean(changes);
    let std = std_dev(changes);
    let sharpe_ratio = if std == 0.0 {
        None
    } else {
        Some(mean_change / std * TRADING_DAYS_PER_YEAR.sqrt())
    };

    let downside = std_dev(&losses);
    let sortino_ratio = if losses.is_empty() || downside == 0.0 {
        None
    } else {
        Some(mean_change / downside * TRADING_DAYS_PER_YEAR.sqrt())
    };

    MetricsResult {
        window: window.into(),
        max_drawdown: max_drawdown(&series.curve),
        cagr: cagr(
            changes.len(),
            series.start_value,
            series.end_value,
            series.cagr_cap,
        ),
        total_pnl: series.end_value - series.start_value,
        sharpe_ratio,
        sortino_ratio,
        win_rate,
        avg_win,
        avg_loss,
        profit_factor,
    }
}

/// Largest decline from a running peak, as a negative percentage.
/// Points reached before the curve is positive contribute no drawdown.
fn max_drawdown(curve: &[f64]) -> f64 {
    let mut peak = f64::NEG_INFINITY;
    let mut worst = 0.0_f64;
    for &value in curve {
        if value > peak {
            peak = value;
        }
        if peak > 0.0 {
            let decline = (peak - value) / peak * 100.0;
            if decline > 0.0 {
                worst = worst.min(-decline);
            }
        }
    }
    worst
}

/// Compound annual growth rate over `observations` daily changes, in
/// percent. Zero when the elapsed time or start value gives no meaningful
/// base; optionally capped (capital-scaled mode).
fn cagr(observations: usize, start_value: f64, end_value: f64, cap: Option<f64>) -> f64 {
    let years = observations as f64 / 365.0;
    if years <= 0.0 || start_value <= 0.0 {
        return 0.0;
    }
    let growth = ((end_value / start_value).powf(1.0 / years) - 1.0) * 100.0;
    match cap {
        Some(cap) => growth.min(cap),
        None => growth,
    }
}

pub(crate) fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation (divide by N, not N - 1).
pub(crate) fn std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    let variance = values.iter().map(|v| (v - m) * (v - m)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}
