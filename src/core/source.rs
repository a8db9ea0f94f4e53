//! Time-series source abstraction

use super::series::RateSeries;
use anyhow::Result;
use async_trait::async_trait;

#[async_trait]
pub trait SeriesSource: Send + Sync {
    /// Fetches the observations published for `series_key` from `start_period`
    /// (`YYYY-MM`) onwards.
    async fn fetch_series(&self, series_key: &str, start_period: &str) -> Result<RateSeries>;
}
