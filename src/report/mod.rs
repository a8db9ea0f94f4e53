//! HTML report combining the latest-rates summary and the chart.

pub mod chart;
pub mod summary;

use crate::core::RateTable;
use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use std::path::{Path, PathBuf};
use tracing::info;

pub use summary::{LatestRate, latest_rates};

/// Writes the summary block followed by the chart to `output`, creating any
/// missing parent directories. `generated_at` is printed as the
/// "Last updated" stamp.
pub fn render(table: &RateTable, output: &Path, generated_at: NaiveDateTime) -> Result<PathBuf> {
    let mut html = summary::summary_html(table, generated_at);
    html.push_str(&chart::chart_html(table)?);

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    std::fs::write(output, html)
        .with_context(|| format!("Failed to write report to {}", output.display()))?;

    info!("Rates visualization has been saved to {}", output.display());
    Ok(output.to_path_buf())
}
