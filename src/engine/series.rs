use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};

/// A point-in-time cumulative P&L reading for one trader.
#[derive(Clone, Debug)]
pub struct PnlObservation {
    pub trader: String,
    pub observed_at: DateTime<Utc>,
    pub total_pnl: f64,
}

/// One value per UTC calendar day, day-ordered ascending, no duplicates.
pub type DailySeries = Vec<(NaiveDate, f64)>;

/// Collapse raw observations to one cumulative P&L value per UTC day.
///
/// When a day has several readings the last by wall-clock time wins. Days
/// with no reading are simply absent; no interpolation. Different traders
/// therefore produce different day-sets and must be joined by day key.
pub fn daily_closes(observations: &[PnlObservation]) -> DailySeries {
    let mut by_day: BTreeMap<NaiveDate, (DateTime<Utc>, f64)> = BTreeMap::new();
    for obs in observations {
        let day = obs.observed_at.date_naive();
        match by_day.get(&day) {
            Some((seen_at, _)) if *seen_at > obs.observed_at => {}
            _ => {
                by_day.insert(day, (obs.observed_at, obs.total_pnl));
            }
        }
    }
    by_day
        .into_iter()
        .map(|(day, (_, total_pnl))| (day, total_pnl))
        .collect()
}

/// Day-over-day P&L deltas, lagged by one *present* day (across gaps, the
/// previous tracked day is the reference). The first present day has no
/// prior reading and is excluded.
pub fn daily_deltas(closes: &DailySeries) -> DailySeries {
    closes
        .windows(2)
        .map(|pair| (pair[1].0, pair[1].1 - pair[0].1))
        .collect()
}
