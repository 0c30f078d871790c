#![allow(clippy::collapsible_if)]
#![allow(clippy::collapsible_else_if)]

// Core modules
pub mod chart;
pub mod config;
pub mod data;
pub mod domain;
pub mod models;
pub mod utils;

// The engine
pub mod engine;

// Re-export commonly used types
pub use chart::{Chart, MemoryChart};
pub use data::{DataSource, DemoDataSource, SessionFile};
pub use domain::{Attribute, DateRange, MarketIndex, Security, SecurityId};
pub use engine::{ChartEngine, ChartError, ChartNotification, FetchStatus};
pub use models::{SeriesKey, SeriesRecord, TableModel};
pub use utils::app_time;

use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::data::demo::{demo_attributes, demo_securities};

// CLI argument parsing
use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Securities as `id:label`, comma separated (defaults to the demo set)
    #[arg(long, value_delimiter = ',')]
    pub securities: Vec<String>,

    /// Extra attribute tags to plot for every security (e.g. volume,return)
    #[arg(long, value_delimiter = ',')]
    pub attrs: Vec<String>,

    /// Market indicators as `tag:label`, comma separated
    #[arg(long = "index", value_delimiter = ',')]
    pub indices: Vec<String>,

    /// Range start (YYYY-MM-DD, RFC 3339 or epoch ms)
    #[arg(long, requires = "end")]
    pub start: Option<String>,

    /// Range end
    #[arg(long, requires = "start")]
    pub end: Option<String>,

    /// Preset look-back window instead of explicit dates (1M, 3M, 1Y, ...)
    #[arg(long, conflicts_with = "start")]
    pub period: Option<String>,

    /// Add an N-day simple moving average of each default-attribute series
    #[arg(long)]
    pub sma: Option<usize>,

    /// Add the basis of the first security against the second
    #[arg(long, default_value_t = false)]
    pub basis: bool,

    /// Resolve fetches on background threads
    #[arg(long = "async", default_value_t = false)]
    pub threaded: bool,

    #[arg(long)]
    pub title: Option<String>,

    /// Save the session under this name when done
    #[arg(long)]
    pub save_session: Option<String>,

    /// Start from a saved session instead of the arguments above
    #[arg(long)]
    pub load_session: Option<String>,
}

fn split_pair(text: &str) -> (String, String) {
    match text.split_once(':') {
        Some((id, label)) => (id.trim().to_string(), label.trim().to_string()),
        None => (text.trim().to_string(), text.trim().to_string()),
    }
}

fn attribute_for_tag(tag: &str) -> Attribute {
    demo_attributes()
        .into_iter()
        .find(|a| a.tag == tag)
        .unwrap_or_else(|| Attribute::new(tag, tag))
}

/// Build a chart from the command line against the demo source, wait for every
/// fetch, and return the exported table.
pub fn run_cli(args: &Cli) -> Result<TableModel> {
    let source = DemoDataSource::new(args.threaded);
    let default_attribute = attribute_for_tag("price");
    let mut engine = ChartEngine::new(MemoryChart::new(), Box::new(source), default_attribute);

    if let Some(name) = &args.load_session {
        let path = SessionFile::default_session_path(name);
        let file = SessionFile::load_from_path(&path)
            .with_context(|| format!("Could not load session '{}'", name))?;
        for e in engine.restore(file.session) {
            log::warn!("{}", e);
        }
    } else {
        populate_from_args(&mut engine, args)?;
    }

    // Apply everything that resolved off-thread
    while engine.update() {
        std::thread::sleep(std::time::Duration::from_millis(5));
    }
    apply_derived_curves(&mut engine, args);

    for notification in engine.drain_notifications() {
        log::info!("{:?}", notification);
    }
    if let Some(warning) = &engine.alerts().general_warning {
        log::warn!("{}", warning);
    }

    if let Some(name) = &args.save_session {
        let path: PathBuf = SessionFile::default_session_path(name);
        SessionFile::new(engine.snapshot()).save_to_path(&path)?;
        log::info!("Session saved to {}", path.display());
    }

    Ok(engine.export_table())
}

fn populate_from_args(engine: &mut ChartEngine, args: &Cli) -> Result<()> {
    if let Some(title) = &args.title {
        engine.set_title(title);
    }

    if let (Some(start), Some(end)) = (&args.start, &args.end) {
        engine
            .change_date_range(start, end)
            .context("Rejected date range")?;
    } else if let Some(period) = &args.period {
        engine
            .select_time_period(period)
            .context("Rejected time period")?;
    }

    let securities: Vec<Security> = if args.securities.is_empty() {
        demo_securities()
    } else {
        args.securities
            .iter()
            .map(|s| {
                let (id, label) = split_pair(s);
                Security::new(id, label)
            })
            .collect()
    };

    for security in securities {
        let id = security.id.clone();
        if let Err(e) = engine.add_security(security) {
            log::warn!("Security {}: {}", id, e);
            continue;
        }
        for tag in &args.attrs {
            if let Err(e) = engine.add_attr(attribute_for_tag(tag), &id) {
                log::warn!("Attribute {} of {}: {}", tag, id, e);
            }
        }
    }

    for index in &args.indices {
        let (tag, label) = split_pair(index);
        if let Err(e) = engine.add_market_indicator(MarketIndex::new(tag, label)) {
            log::warn!("Market index {}: {}", index, e);
        }
    }
    Ok(())
}

fn apply_derived_curves(engine: &mut ChartEngine, args: &Cli) {
    let default_tag = engine.state().default_attribute.tag.clone();
    let plotted: Vec<SeriesKey> = engine
        .state()
        .bindings
        .iter()
        .map(|b| SeriesKey::security(&b.security.id, &default_tag))
        .filter(|key| engine.chart().get_series(key).is_some())
        .collect();

    if let Some(window) = args.sma {
        for key in &plotted {
            if let Err(e) = engine.add_simple_ma(key, window) {
                log::warn!("SMA of {}: {}", key, e);
            }
        }
    }

    if args.basis {
        if let [first, second, ..] = plotted.as_slice() {
            if let Err(e) = engine.add_basis(first, second) {
                log::warn!("Basis of {} vs {}: {}", first, second, e);
            }
        } else {
            log::warn!("Basis needs at least two plotted securities");
        }
    }
}
