use clickhouse::Row;
use serde::{Deserialize, Serialize};

use crate::engine::distribution::{HistogramBin, SummaryStats};
use crate::engine::metrics::MetricsResult;
use crate::engine::portfolio::{self, Allocation, Weighting};
use crate::engine::rolling::RollingSample;

// -- Calculator --

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculatorRequest {
    #[serde(default)]
    pub allocations: Vec<Allocation>,
    #[serde(default)]
    pub windows: Vec<String>,
    pub initial_capital: Option<f64>,
    #[serde(default)]
    pub strategy: Strategy,
    pub reference_capital: Option<f64>,
}

/// Wire name of the weighting mode. Both modes stay selectable; they give
/// materially different numbers for the same allocations.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub enum Strategy {
    #[default]
    DeltaWeighted,
    CapitalScaled,
}

impl Strategy {
    pub fn weighting(self, reference_capital: Option<f64>) -> Weighting {
        match self {
            Strategy::DeltaWeighted => Weighting::DeltaWeighted,
            Strategy::CapitalScaled => Weighting::CapitalScaled {
                reference_capital: reference_capital
                    .unwrap_or(portfolio::DEFAULT_REFERENCE_CAPITAL),
            },
        }
    }
}

#[derive(Serialize)]
pub struct CalculatorResponse {
    pub metrics: Vec<MetricsResult>,
}

// -- Rolling distribution --

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistributionRequest {
    #[serde(default)]
    pub allocations: Vec<Allocation>,
    /// History to analyze, as a window token. Defaults to one year.
    pub window: Option<String>,
    /// Length of each rolling slice in days. Defaults to 30.
    pub window_days: Option<usize>,
    pub metric: Option<String>,
    pub bin_count: Option<usize>,
    pub initial_capital: Option<f64>,
    #[serde(default)]
    pub strategy: Strategy,
    pub reference_capital: Option<f64>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DistributionResponse {
    pub samples: Vec<RollingSample>,
    pub histogram: Vec<HistogramBin>,
    pub curve: Vec<f64>,
    pub stats: SummaryStats,
}

// -- Health --

#[derive(Row, Deserialize)]
pub struct HealthStats {
    pub observation_count: u64,
    pub trader_count: u64,
    pub latest_observation: String,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub observation_count: u64,
    pub trader_count: u64,
    pub latest_observation: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strategy_defaults_to_delta_weighted() {
        let req: CalculatorRequest = serde_json::from_str(
            r#"{"allocations":[{"traderAddress":"0xAbC","percentage":60}],"windows":["30d"]}"#,
        )
        .unwrap();
        assert_eq!(req.strategy, Strategy::DeltaWeighted);
        assert_eq!(req.allocations[0].trader_address, "0xAbC");
        assert_eq!(req.allocations[0].percentage, 60.0);
        assert_eq!(req.initial_capital, None);
    }

    #[test]
    fn capital_scaled_strategy_parses_with_reference_capital() {
        let req: CalculatorRequest = serde_json::from_str(
            r#"{"allocations":[],"windows":[],"strategy":"capitalScaled","referenceCapital":500000,"initialCapital":25000}"#,
        )
        .unwrap();
        assert_eq!(req.strategy, Strategy::CapitalScaled);
        assert_eq!(
            req.strategy.weighting(req.reference_capital),
            Weighting::CapitalScaled {
                reference_capital: 500_000.0
            }
        );
    }
}
