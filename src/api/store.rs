use chrono::{DateTime, Utc};
use clickhouse::Row;
use serde::Deserialize;

use crate::engine::series::PnlObservation;
use crate::engine::window::WindowSpec;

#[derive(Row, Deserialize)]
struct ObservationRow {
    observed_at: i64,
    total_pnl: f64,
}

/// Fetch one trader's cumulative P&L readings over `[now - window, now]`,
/// oldest first.
pub async fn fetch_observations(
    client: &clickhouse::Client,
    trader: &str,
    window: &WindowSpec,
) -> Result<Vec<PnlObservation>, clickhouse::error::Error> {
    let query = format!(
        "SELECT
            toUnixTimestamp(observed_at) AS observed_at,
            toFloat64(total_pnl) AS total_pnl
        FROM poly_folio.pnl_observations
        WHERE trader = ?
          AND observed_at >= now() - INTERVAL '{}'
        ORDER BY observed_at",
        window.interval()
    );

    let rows = client
        .query(&query)
        .bind(trader)
        .fetch_all::<ObservationRow>()
        .await?;

    Ok(rows
        .into_iter()
        .map(|row| PnlObservation {
            trader: trader.to_string(),
            observed_at: DateTime::from_timestamp(row.observed_at, 0).unwrap_or_default(),
            total_pnl: row.total_pnl,
        })
        .collect())
}
