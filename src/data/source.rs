//! The host's data callbacks.
//!
//! Every fetch hands back a `poll_promise::Promise`. A host that already has the
//! numbers returns `Promise::from_ready`; one that has to go to the network
//! returns a pending promise and the engine picks the result up in `update()`.

use std::fmt;

use poll_promise::Promise;

use crate::domain::{Attribute, CdxIndex, ClientBenchmark, CustomBenchmark, DateRange, MarketIndex, Security};
use crate::models::{ChartType, DataPoint};

/// What the host knows about the request besides the source itself.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FetchOptions {
    /// `None` means "whatever the chart currently shows"
    pub date_range: Option<DateRange>,
}

/// A series as the host returns it. The engine fills in identity, axis and color.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FetchedSeries {
    /// Legend name. The engine falls back to a name built from the source.
    pub name: Option<String>,
    pub data: Vec<DataPoint>,
    /// Overrides the axis type derived from the attribute
    pub axis_type: Option<String>,
    pub color: Option<String>,
    pub chart_type: Option<ChartType>,
}

impl FetchedSeries {
    pub fn from_points(points: Vec<DataPoint>) -> Self {
        Self {
            data: points,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FetchError {
    /// The host could not produce the series
    Rejected(String),
    /// The host refused the inputs; messages are shown to the user as-is
    Validation(Vec<String>),
    /// This source kind is not wired up on the host
    Unsupported,
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::Rejected(msg) => write!(f, "{}", msg),
            FetchError::Validation(msgs) => write!(f, "{}", msgs.join("; ")),
            FetchError::Unsupported => write!(f, "Source not supported by this host"),
        }
    }
}

impl std::error::Error for FetchError {}

pub type FetchResult = Result<FetchedSeries, FetchError>;

pub trait DataSource {
    fn fetch_attribute_series(
        &self,
        attribute: &Attribute,
        security: &Security,
        options: &FetchOptions,
    ) -> Promise<FetchResult>;

    fn fetch_market_index_series(
        &self,
        _index: &MarketIndex,
        _options: &FetchOptions,
    ) -> Promise<FetchResult> {
        Promise::from_ready(Err(FetchError::Unsupported))
    }

    fn fetch_custom_benchmark_series(
        &self,
        _benchmark: &CustomBenchmark,
        _options: &FetchOptions,
    ) -> Promise<FetchResult> {
        Promise::from_ready(Err(FetchError::Unsupported))
    }

    fn fetch_client_benchmark_series(
        &self,
        _benchmark: &ClientBenchmark,
        _options: &FetchOptions,
    ) -> Promise<FetchResult> {
        Promise::from_ready(Err(FetchError::Unsupported))
    }

    fn fetch_cdx_index_series(
        &self,
        _index: &CdxIndex,
        _options: &FetchOptions,
    ) -> Promise<FetchResult> {
        Promise::from_ready(Err(FetchError::Unsupported))
    }
}
