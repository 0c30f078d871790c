use anyhow::{Context, Result};
use clap::Parser;

use decorated_chart::{Cli, run_cli};

fn main() -> Result<()> {
    // A. Init Logging
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    // B. Parse Args
    let args = Cli::parse();
    #[cfg(debug_assertions)]
    log::info!("Parsed arguments: {:?}", args);

    // C. Build the chart and export it
    let table = run_cli(&args)?;
    let json = serde_json::to_string_pretty(&table).context("Failed to encode table")?;
    println!("{}", json);
    Ok(())
}
