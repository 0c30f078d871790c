//! Synthetic data source for the CLI and for headless runs.
//!
//! Values depend only on (source, calendar day), so refreshing with a new date
//! range yields the same numbers on overlapping days.

use chrono::{DateTime, Days, Utc};
use poll_promise::Promise;

use crate::config::DEMO;
use crate::data::source::{DataSource, FetchError, FetchOptions, FetchResult, FetchedSeries};
use crate::domain::{
    Attribute, CdxIndex, ClientBenchmark, CustomBenchmark, DateRange, MarketIndex, Security,
};
use crate::models::DataPoint;
use crate::utils::TimeUtils;

#[derive(Debug, Clone, Default)]
pub struct DemoDataSource {
    /// Resolve on a background thread after `DEMO.latency_ms` instead of immediately
    pub threaded: bool,
}

/// Demo attributes as the engine expects them.
pub fn demo_attributes() -> Vec<Attribute> {
    DEMO.resources
        .attributes
        .iter()
        .map(|(tag, label, unit)| Attribute::new(*tag, *label).with_unit(*unit))
        .collect()
}

pub fn demo_securities() -> Vec<Security> {
    DEMO.resources
        .securities
        .iter()
        .map(|(id, label)| Security::new(*id, *label))
        .collect()
}

impl DemoDataSource {
    pub fn new(threaded: bool) -> Self {
        Self { threaded }
    }

    fn respond(&self, result: FetchResult) -> Promise<FetchResult> {
        #[cfg(not(target_arch = "wasm32"))]
        if self.threaded {
            let latency = std::time::Duration::from_millis(DEMO.latency_ms);
            return Promise::spawn_thread("demo_fetch", move || {
                std::thread::sleep(latency);
                result
            });
        }

        Promise::from_ready(result)
    }
}

impl DataSource for DemoDataSource {
    fn fetch_attribute_series(
        &self,
        attribute: &Attribute,
        security: &Security,
        options: &FetchOptions,
    ) -> Promise<FetchResult> {
        let seed = seed_of(&[security.id.as_str(), &attribute.tag]);
        let shape = Shape::for_tag(&attribute.tag);
        let series = FetchedSeries {
            name: Some(format!("{} {}", security.label, attribute.label)),
            ..FetchedSeries::from_points(synthesize(seed, shape, options.date_range))
        };
        self.respond(Ok(series))
    }

    fn fetch_market_index_series(
        &self,
        index: &MarketIndex,
        options: &FetchOptions,
    ) -> Promise<FetchResult> {
        let seed = seed_of(&[&index.tag]);
        let series = FetchedSeries {
            name: Some(index.label.clone()),
            ..FetchedSeries::from_points(synthesize(seed, Shape::Level, options.date_range))
        };
        self.respond(Ok(series))
    }

    fn fetch_custom_benchmark_series(
        &self,
        benchmark: &CustomBenchmark,
        options: &FetchOptions,
    ) -> Promise<FetchResult> {
        let wal = benchmark.wal.as_deref().unwrap_or_default();
        if wal.trim().parse::<f64>().is_err() {
            return self.respond(Err(FetchError::Validation(vec![format!(
                "WAL must be numeric, got '{}'",
                wal
            )])));
        }
        let sector = benchmark.sector.as_deref().unwrap_or_default();
        let rating = benchmark.rating.as_deref().unwrap_or_default();
        let tag = benchmark.analytic.as_ref().map(|a| a.tag.as_str()).unwrap_or_default();
        let seed = seed_of(&[sector, rating, wal, tag]);
        self.respond(Ok(FetchedSeries::from_points(synthesize(
            seed,
            Shape::Spread,
            options.date_range,
        ))))
    }

    fn fetch_client_benchmark_series(
        &self,
        benchmark: &ClientBenchmark,
        options: &FetchOptions,
    ) -> Promise<FetchResult> {
        let id = benchmark.id.as_deref().unwrap_or_default();
        let tag = benchmark.analytic.as_ref().map(|a| a.tag.as_str()).unwrap_or_default();
        let seed = seed_of(&[id, tag]);
        self.respond(Ok(FetchedSeries::from_points(synthesize(
            seed,
            Shape::Spread,
            options.date_range,
        ))))
    }

    fn fetch_cdx_index_series(&self, index: &CdxIndex, options: &FetchOptions) -> Promise<FetchResult> {
        let name = index.index.as_deref().unwrap_or_default();
        let tenor = index.tenor.as_deref().unwrap_or_default();
        let seed = seed_of(&[name, tenor]);
        self.respond(Ok(FetchedSeries::from_points(synthesize(
            seed,
            Shape::Spread,
            options.date_range,
        ))))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Shape {
    /// Prices and index levels
    Level,
    /// Spreads in basis points
    Spread,
    Volume,
    /// Whole notches, 1..=10
    Notch,
}

impl Shape {
    fn for_tag(tag: &str) -> Self {
        match tag {
            "volume" => Shape::Volume,
            "rating" => Shape::Notch,
            "return" | "oas" | "spread" => Shape::Spread,
            _ => Shape::Level,
        }
    }

    fn value(self, seed: u64, day: i64) -> f64 {
        let phase = (seed % 360) as f64;
        let wave = ((day as f64) / 9.0 + phase).sin();
        let drift = ((day as f64) / 53.0 + phase / 2.0).cos();
        match self {
            Shape::Level => 50.0 + (seed % 150) as f64 + 4.0 * wave + 6.0 * drift,
            Shape::Spread => 120.0 + (seed % 80) as f64 + 15.0 * wave + 10.0 * drift,
            Shape::Volume => 1.0e6 * (2.0 + wave + 0.5 * drift),
            Shape::Notch => (5.5 + 4.5 * drift).round(),
        }
    }
}

fn seed_of(parts: &[&str]) -> u64 {
    parts.iter().flat_map(|p| p.bytes().chain(std::iter::once(0))).fold(
        0xcbf2_9ce4_8422_2325u64,
        |hash, byte| (hash ^ byte as u64).wrapping_mul(0x0100_0000_01b3),
    )
}

/// One point per UTC midnight inside the range (or the last `DEMO.default_days`).
fn synthesize(seed: u64, shape: Shape, range: Option<DateRange>) -> Vec<DataPoint> {
    let (start, end) = match range.and_then(|r| Some((r.start()?, r.end()?))) {
        Some(bounds) => bounds,
        None => {
            let end = Utc::now();
            let start = end - chrono::Duration::days(DEMO.default_days);
            (start, end)
        }
    };

    let mut points = Vec::new();
    let mut day = first_midnight_at_or_after(start);
    while let Some(current) = day {
        if current > end {
            break;
        }
        let ms = current.timestamp_millis();
        points.push(DataPoint {
            timestamp_ms: ms,
            value: shape.value(seed, ms / TimeUtils::MS_IN_D),
        });
        day = current.checked_add_days(Days::new(1));
    }
    points
}

fn first_midnight_at_or_after(instant: DateTime<Utc>) -> Option<DateTime<Utc>> {
    let midnight = instant.date_naive().and_hms_opt(0, 0, 0)?.and_utc();
    if midnight < instant {
        midnight.checked_add_days(Days::new(1))
    } else {
        Some(midnight)
    }
}
