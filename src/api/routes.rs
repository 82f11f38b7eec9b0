use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};

use super::store;
use super::types::*;
use crate::engine::metrics::{self, METRIC_KEYS};
use crate::engine::portfolio::{self, Allocation, PortfolioSeries, Weighting};
use crate::engine::window::WindowSpec;
use crate::engine::{distribution, rolling, series};

pub async fn calculator(
    State(client): State<clickhouse::Client>,
    Json(req): Json<CalculatorRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    if req.allocations.is_empty() {
        return Err((StatusCode::BAD_REQUEST, "allocations required".into()));
    }
    if req.windows.is_empty() {
        return Err((StatusCode::BAD_REQUEST, "windows required".into()));
    }

    let initial_capital = req
        .initial_capital
        .unwrap_or(portfolio::DEFAULT_INITIAL_CAPITAL);
    let weighting = req.strategy.weighting(req.reference_capital);

    // Windows are independent; results keep request order.
    let mut results = Vec::with_capacity(req.windows.len());
    for token in &req.windows {
        let spec = WindowSpec::parse(token);
        let composed =
            compose_window(&client, &req.allocations, &spec, weighting, initial_capital).await?;
        results.push(metrics::compute(token, &composed));
    }

    Ok(Json(CalculatorResponse { metrics: results }))
}

pub async fn distribution(
    State(client): State<clickhouse::Client>,
    Json(req): Json<DistributionRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    if req.allocations.is_empty() {
        return Err((StatusCode::BAD_REQUEST, "allocations required".into()));
    }
    let metric = match req.metric.as_deref() {
        None | Some("") => return Err((StatusCode::BAD_REQUEST, "metric required".into())),
        Some(m) if !METRIC_KEYS.contains(&m) => {
            return Err((
                StatusCode::BAD_REQUEST,
                format!("Invalid metric. Allowed: {METRIC_KEYS:?}"),
            ));
        }
        Some(m) => m,
    };

    let spec = WindowSpec::parse(req.window.as_deref().unwrap_or("1y"));
    let window_days = req.window_days.unwrap_or(30);
    let bin_count = req.bin_count.unwrap_or(distribution::DEFAULT_BIN_COUNT);
    let initial_capital = req
        .initial_capital
        .unwrap_or(portfolio::DEFAULT_INITIAL_CAPITAL);
    let weighting = req.strategy.weighting(req.reference_capital);

    let composed =
        compose_window(&client, &req.allocations, &spec, weighting, initial_capital).await?;
    let samples = rolling::analyze(
        &composed.days,
        &composed.changes,
        initial_capital,
        window_days,
        1,
    );
    let values: Vec<f64> = samples
        .iter()
        .filter_map(|sample| sample.metrics.metric(metric))
        .collect();
    let dist = distribution::summarize(&values, bin_count);

    Ok(Json(DistributionResponse {
        samples,
        histogram: dist.bins,
        curve: dist.curve,
        stats: dist.stats,
    }))
}

/// Pull each allocated trader's observations for the window, align them to
/// daily deltas, and compose the weighted portfolio series.
async fn compose_window(
    client: &clickhouse::Client,
    allocations: &[Allocation],
    spec: &WindowSpec,
    weighting: Weighting,
    initial_capital: f64,
) -> Result<PortfolioSeries, (StatusCode, String)> {
    let mut trader_deltas = Vec::with_capacity(allocations.len());
    for allocation in allocations {
        let address = allocation.trader_address.to_lowercase();
        let observations = store::fetch_observations(client, &address, spec)
            .await
            .map_err(internal_error)?;
        let closes = series::daily_closes(&observations);
        trader_deltas.push((allocation.percentage, series::daily_deltas(&closes)));
    }
    Ok(weighting.compose(&trader_deltas, initial_capital))
}

/// Collapse store failures to one opaque message; the detail goes to the
/// log, never to the client.
fn internal_error(e: clickhouse::error::Error) -> (StatusCode, String) {
    tracing::error!("calculator query failed: {e}");
    (StatusCode::INTERNAL_SERVER_ERROR, "Internal error".into())
}

pub async fn health(
    State(client): State<clickhouse::Client>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let stats = client
        .query(
            "SELECT
                count() AS observation_count,
                uniqExact(trader) AS trader_count,
                toString(max(observed_at)) AS latest_observation
            FROM poly_folio.pnl_observations",
        )
        .fetch_one::<HealthStats>()
        .await
        .map_err(internal_error)?;

    Ok(Json(HealthResponse {
        status: "ok",
        observation_count: stats.observation_count,
        trader_count: stats.trader_count,
        latest_observation: stats.latest_observation,
    }))
}
