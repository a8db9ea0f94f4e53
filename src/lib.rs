pub mod cli;
pub mod core;
pub mod providers;
pub mod report;

use crate::core::config::AppConfig;
use anyhow::Result;
use std::path::PathBuf;
use tracing::{debug, info};

pub const DEFAULT_START_DATE: &str = "1999-01";
pub const DEFAULT_OUTPUT: &str = "static/html/ecb_rates.html";

/// Options for one fetch-and-render run.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// First period to fetch, `YYYY-MM`. Forwarded to the API unchecked.
    pub start_date: String,
    pub output: PathBuf,
    pub config_path: Option<String>,
}

impl Default for RunOptions {
    fn default() -> Self {
        RunOptions {
            start_date: DEFAULT_START_DATE.to_string(),
            output: PathBuf::from(DEFAULT_OUTPUT),
            config_path: None,
        }
    }
}

/// Fetches the configured series, merges them and writes the HTML report.
/// Returns the path of the written file.
pub async fn run(options: &RunOptions) -> Result<PathBuf> {
    info!("ECB rates visualization starting...");

    let config = match options.config_path.as_deref() {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let source = providers::EcbDataProvider::new(config.ecb_base_url())?;

    let pb = cli::ui::new_progress_bar(config.series.len() as u64, "Fetching rate series...");
    let outcome =
        crate::core::fetch_all(&source, &config.series, &options.start_date, &|| pb.inc(1)).await;
    pb.finish_and_clear();

    let table = crate::core::RateTable::merge(&outcome.series);
    debug!(
        dates = table.len(),
        columns = table.rates().count(),
        "Merged rate table"
    );

    let generated_at = chrono::Local::now().naive_local();
    let written = report::render(&table, &options.output, generated_at)?;

    println!("{}", cli::summary::display_latest_rates(&table, &outcome));
    println!(
        "\nECB rates visualization has been saved to {}",
        cli::ui::style_text(&written.display().to_string(), cli::ui::StyleType::Success)
    );

    Ok(written)
}
