//! Fetches every configured rate series, tolerating per-series failures.
use super::rate::Rate;
use super::series::RateSeries;
use super::source::SeriesSource;
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Series that were fetched, and the error message of those that were not.
#[derive(Debug, Default)]
pub struct FetchOutcome {
    pub series: BTreeMap<Rate, RateSeries>,
    pub failures: BTreeMap<Rate, String>,
}

impl FetchOutcome {
    pub fn failed(&self, rate: Rate) -> bool {
        self.failures.contains_key(&rate)
    }
}

/// Fetches each `(rate, series key)` pair in turn.
///
/// A failing series is logged and recorded in [`FetchOutcome::failures`]; the
/// remaining series are still fetched. Progress is reported through
/// `update_callback` once per series.
pub async fn fetch_all(
    source: &(dyn SeriesSource + Send + Sync),
    series_keys: &BTreeMap<Rate, String>,
    start_period: &str,
    update_callback: &(dyn Fn()),
) -> FetchOutcome {
    let mut outcome = FetchOutcome::default();

    for (rate, key) in series_keys {
        match source.fetch_series(key, start_period).await {
            Ok(series) => {
                debug!(rate = %rate, observations = series.len(), "Fetched series");
                outcome.series.insert(*rate, series);
            }
            Err(e) => {
                warn!(rate = %rate, series_key = %key, error = %e, "Error fetching series");
                outcome.failures.insert(*rate, e.to_string());
            }
        }
        update_callback();
    }

    outcome
}
