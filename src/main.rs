use anyhow::Result;
use clap::Parser;
use ecbrates::core::log::init_logging;
use std::path::PathBuf;

#[derive(Parser)]
#[command(version, about = "Generate ECB rates visualization")]
struct Cli {
    /// Start date in YYYY-MM format
    #[arg(long, default_value = ecbrates::DEFAULT_START_DATE)]
    start_date: String,

    /// Output HTML file path
    #[arg(long, default_value = ecbrates::DEFAULT_OUTPUT)]
    output: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long)]
    config_path: Option<String>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let options = ecbrates::RunOptions {
        start_date: cli.start_date,
        output: cli.output,
        config_path: cli.config_path,
    };

    let result = ecbrates::run(&options).await;
    if let Err(e) = &result {
        tracing::error!(error = %e, "Error generating visualization");
    }
    result.map(|_| ())
}
