//! Shared fixtures for the engine tests.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};

use poll_promise::{Promise, Sender};

use crate::chart::MemoryChart;
use crate::config::{CHART, ChartConfig};
use crate::data::source::{DataSource, FetchError, FetchOptions, FetchResult, FetchedSeries};
use crate::domain::{
    Attribute, CdxIndex, ClientBenchmark, CustomBenchmark, DateRange, MarketIndex, Security,
    SecurityId,
};
use crate::models::{DataPoint, SeriesKey, SeriesRecord};
use crate::utils::TimeUtils;
use crate::utils::time_utils::parse_date_input;

use super::core::ChartEngine;

/// Knobs and a request log shared between a test and the engine's source.
#[derive(Default)]
pub(crate) struct Script {
    /// Every request as (label, date range), in order
    pub requests: Vec<(String, Option<DateRange>)>,
    /// Answer with pending promises instead of ready ones
    pub hold: bool,
    pub held: Vec<Held>,
    /// Labels answered with `FetchError::Rejected`
    pub reject: HashSet<String>,
    /// Labels answered with zero points
    pub empty: HashSet<String>,
    /// Labels answered with `FetchError::Validation`
    pub invalid: HashSet<String>,
}

/// A fetch the test has not answered yet, with the answer it would normally get.
pub(crate) struct Held {
    pub label: String,
    sender: Sender<FetchResult>,
    result: FetchResult,
}

#[derive(Clone, Default)]
pub(crate) struct ScriptHandle(Arc<Mutex<Script>>);

impl ScriptHandle {
    pub fn lock(&self) -> MutexGuard<'_, Script> {
        match self.0.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    pub fn labels(&self) -> Vec<String> {
        self.lock().requests.iter().map(|(l, _)| l.clone()).collect()
    }

    pub fn held_labels(&self) -> Vec<String> {
        self.lock().held.iter().map(|h| h.label.clone()).collect()
    }

    /// Answer every held fetch with what it would have got unheld.
    pub fn release_all(&self) {
        let held: Vec<Held> = self.lock().held.drain(..).collect();
        for h in held {
            h.sender.send(h.result);
        }
    }

    /// Answer one held fetch with `result`. Returns false when nothing was held for `label`.
    pub fn release(&self, label: &str, result: FetchResult) -> bool {
        let mut script = self.lock();
        let Some(pos) = script.held.iter().position(|h| h.label == label) else {
            return false;
        };
        let held = script.held.remove(pos);
        drop(script);
        held.sender.send(result);
        true
    }
}

pub(crate) struct ScriptedSource {
    script: ScriptHandle,
}

impl ScriptedSource {
    fn answer(&self, label: String, options: &FetchOptions) -> Promise<FetchResult> {
        let mut script = self.script.lock();
        script.requests.push((label.clone(), options.date_range));

        let result = if script.reject.contains(&label) {
            Err(FetchError::Rejected(format!("no data for {}", label)))
        } else if script.invalid.contains(&label) {
            Err(FetchError::Validation(vec![format!("{} is not a benchmark", label)]))
        } else if script.empty.contains(&label) {
            Ok(FetchedSeries::default())
        } else {
            Ok(points_for(options.date_range))
        };

        if script.hold {
            let (sender, promise) = Promise::new();
            script.held.push(Held {
                label,
                sender,
                result,
            });
            promise
        } else {
            Promise::from_ready(result)
        }
    }
}

impl DataSource for ScriptedSource {
    fn fetch_attribute_series(
        &self,
        attribute: &Attribute,
        security: &Security,
        options: &FetchOptions,
    ) -> Promise<FetchResult> {
        self.answer(format!("attr:{}:{}", security.id, attribute.tag), options)
    }

    fn fetch_market_index_series(
        &self,
        index: &MarketIndex,
        options: &FetchOptions,
    ) -> Promise<FetchResult> {
        self.answer(format!("index:{}", index.tag), options)
    }

    fn fetch_custom_benchmark_series(
        &self,
        benchmark: &CustomBenchmark,
        options: &FetchOptions,
    ) -> Promise<FetchResult> {
        self.answer(
            format!("custom:{}", SeriesKey::custom_benchmark(benchmark)),
            options,
        )
    }

    fn fetch_client_benchmark_series(
        &self,
        benchmark: &ClientBenchmark,
        options: &FetchOptions,
    ) -> Promise<FetchResult> {
        self.answer(
            format!("client:{}", benchmark.id.as_deref().unwrap_or_default()),
            options,
        )
    }

    fn fetch_cdx_index_series(&self, index: &CdxIndex, options: &FetchOptions) -> Promise<FetchResult> {
        self.answer(
            format!("cdx:{}", index.index.as_deref().unwrap_or_default()),
            options,
        )
    }
}

/// Four daily points valued 1, 2, 3, 4, starting at the range start (or 2024-01-01).
pub(crate) fn points_for(range: Option<DateRange>) -> FetchedSeries {
    let start = range
        .map(|r| r.start_ms())
        .or_else(|| parse_date_input("2024-01-01").map(|d| d.timestamp_millis()))
        .unwrap_or_default();
    FetchedSeries::from_points(
        (0..4)
            .map(|i| DataPoint::from((start + i * TimeUtils::MS_IN_D, (i + 1) as f64)))
            .collect(),
    )
}

pub(crate) fn default_attribute() -> Attribute {
    Attribute::new("price", "Price")
}

pub(crate) fn scripted_engine_with_config(
    config: ChartConfig,
) -> (ChartEngine<MemoryChart>, ScriptHandle) {
    let script = ScriptHandle::default();
    let source = ScriptedSource {
        script: script.clone(),
    };
    let engine =
        ChartEngine::with_config(MemoryChart::new(), Box::new(source), default_attribute(), config);
    (engine, script)
}

pub(crate) fn scripted_engine() -> (ChartEngine<MemoryChart>, ScriptHandle) {
    scripted_engine_with_config(CHART)
}

pub(crate) fn engine() -> ChartEngine<MemoryChart> {
    scripted_engine().0
}

pub(crate) fn engine_with_config(config: ChartConfig) -> ChartEngine<MemoryChart> {
    scripted_engine_with_config(config).0
}

pub(crate) fn series_key(security: &str, tag: &str) -> SeriesKey {
    SeriesKey::security(&SecurityId::from(security), tag)
}

pub(crate) fn typed_record(security: &str, tag: &str, axis_type: &str) -> SeriesRecord {
    SeriesRecord::new(series_key(security, tag), tag, vec![(0, 1.0).into()])
        .with_axis_type(axis_type)
        .with_security(SecurityId::from(security))
}
