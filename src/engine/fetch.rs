//! Fetch pipeline: submit requests to the data source, apply their results.
//!
//! Ready promises are applied on the spot. Pending ones are parked and picked
//! up by `update()`, which the host calls every frame (or in a loop) while it
//! returns `true`.

#[cfg(debug_assertions)]
use crate::config::DEBUG_FLAGS;

use crate::chart::Chart;
use crate::data::source::{FetchError, FetchOptions, FetchResult};
use crate::domain::SecurityId;
use crate::models::{SeriesKey, SeriesRecord};
use crate::utils::app_time;

use super::core::ChartEngine;
use super::error::ChartError;
use super::messages::{FetchReason, FetchStatus, FetchTarget, PendingFetch};

impl<C: Chart> ChartEngine<C> {
    /// THE POLL LOOP.
    /// Applies every fetch that has resolved since the last call.
    /// Returns TRUE while fetches are still outstanding.
    pub fn update(&mut self) -> bool {
        // 1. Split resolved from waiting (submission order is kept)
        let mut resolved = Vec::new();
        let mut waiting = Vec::with_capacity(self.pending.len());
        for fetch in std::mem::take(&mut self.pending) {
            match fetch.promise.try_take() {
                Ok(result) => resolved.push((fetch.target, fetch.reason, result, fetch.started)),
                Err(promise) => waiting.push(PendingFetch { promise, ..fetch }),
            }
        }
        self.pending = waiting;

        // 2. Apply
        for (target, reason, result, started) in resolved {
            let key = target.key();
            match self.complete_fetch(target, reason, result) {
                Ok(_status) => {
                    #[cfg(debug_assertions)]
                    if DEBUG_FLAGS.print_fetch_events {
                        log::debug!(
                            "Fetch for {} applied after {} ms ({:?})",
                            key,
                            app_time::elapsed_ms(started),
                            _status
                        );
                    }
                }
                Err(e) => {
                    log::warn!(
                        "Fetch for {} failed after {} ms: {}",
                        key,
                        app_time::elapsed_ms(started),
                        e
                    );
                    self.state.last_error = Some(e);
                }
            }
        }

        // 3. Busy status
        self.is_processing()
    }

    /// Any fetch still outstanding?
    pub fn is_processing(&self) -> bool {
        !self.pending.is_empty()
    }

    pub fn is_pending(&self, key: &SeriesKey) -> bool {
        self.pending.iter().any(|p| &p.key == key)
    }

    pub(crate) fn is_security_pending(&self, security_id: &SecurityId) -> bool {
        self.pending
            .iter()
            .any(|p| p.target.security_id() == Some(security_id))
    }

    /// Drop the outstanding fetch for `key`; its result will never be applied.
    pub(crate) fn cancel_pending(&mut self, key: &SeriesKey) {
        self.pending.retain(|p| &p.key != key);
    }

    pub(crate) fn cancel_pending_for_security(&mut self, security_id: &SecurityId) {
        self.pending
            .retain(|p| p.target.security_id() != Some(security_id));
    }

    /// Ask the data source for `target`. A refresh replaces any fetch already in
    /// flight for the same series.
    pub(crate) fn submit(
        &mut self,
        target: FetchTarget,
        reason: FetchReason,
    ) -> Result<FetchStatus, ChartError> {
        let key = target.key();
        if reason == FetchReason::Refresh && self.is_pending(&key) {
            #[cfg(debug_assertions)]
            if DEBUG_FLAGS.print_fetch_events {
                log::debug!("Superseding in-flight fetch for {}", key);
            }
            self.cancel_pending(&key);
        }

        let options = FetchOptions {
            date_range: self.state.date_range,
        };
        let promise = match &target {
            FetchTarget::Attribute {
                security,
                attribute,
            } => self
                .source
                .fetch_attribute_series(attribute, security, &options),
            FetchTarget::MarketIndex(index) => {
                self.source.fetch_market_index_series(index, &options)
            }
            FetchTarget::CustomBenchmark(b) => {
                self.source.fetch_custom_benchmark_series(b, &options)
            }
            FetchTarget::ClientBenchmark(b) => {
                self.source.fetch_client_benchmark_series(b, &options)
            }
            FetchTarget::CdxIndex(i) => self.source.fetch_cdx_index_series(i, &options),
        };

        match promise.try_take() {
            Ok(result) => self.complete_fetch(target, reason, result),
            Err(promise) => {
                #[cfg(debug_assertions)]
                if DEBUG_FLAGS.print_fetch_events {
                    log::debug!("Fetch for {} pending ({:?})", key, reason);
                }
                self.pending.push(PendingFetch {
                    key,
                    target,
                    reason,
                    promise,
                    started: app_time::now(),
                });
                Ok(FetchStatus::Pending)
            }
        }
    }

    /// Apply one fetch result.
    fn complete_fetch(
        &mut self,
        target: FetchTarget,
        reason: FetchReason,
        result: FetchResult,
    ) -> Result<FetchStatus, ChartError> {
        // 1. Stale? (target removed while the fetch was in flight)
        if !self.is_wanted(&target, reason) {
            log::info!("Dropping result for {}: no longer on the chart", target.key());
            return Ok(FetchStatus::Ignored);
        }

        // 2. Source-side failure
        let fetched = match result {
            Ok(fetched) => fetched,
            Err(err) => {
                let error = self.fetch_error(err);
                self.after_failed_fetch(&target);
                return Err(error);
            }
        };

        // 3. Nothing to plot
        let record = self.build_record(&target, fetched);
        if record.data.is_empty() {
            log::warn!("Fetch for {} returned no data", record.id);
            self.state.alerts.general_warning = Some(self.config.messages.empty_series.to_string());
            self.after_failed_fetch(&target);
            return Err(ChartError::EmptySeriesData(record.name));
        }

        // 4. Plot, then record the source as tracked
        let status = self.upsert(record)?;
        self.track(target);
        Ok(status)
    }

    /// Is the target of a finished fetch still something the user wants to see?
    fn is_wanted(&self, target: &FetchTarget, reason: FetchReason) -> bool {
        let key = target.key();
        match (target, reason) {
            (FetchTarget::Attribute { security, .. }, FetchReason::Add) => {
                self.state.is_active(&security.id)
            }
            (
                FetchTarget::Attribute {
                    security,
                    attribute,
                },
                FetchReason::Refresh,
            ) => self
                .state
                .binding(&security.id)
                .is_some_and(|b| b.attribute(&attribute.tag).is_some()),
            (_, FetchReason::Add) => true,
            (FetchTarget::MarketIndex(index), FetchReason::Refresh) => {
                self.state.market_indices.iter().any(|m| m.tag == index.tag)
            }
            (FetchTarget::CustomBenchmark(_), FetchReason::Refresh) => self
                .state
                .custom_benchmarks
                .iter()
                .any(|b| SeriesKey::custom_benchmark(b) == key),
            (FetchTarget::ClientBenchmark(_), FetchReason::Refresh) => self
                .state
                .client_benchmarks
                .iter()
                .any(|b| SeriesKey::client_benchmark(b) == key),
            (FetchTarget::CdxIndex(_), FetchReason::Refresh) => self
                .state
                .cdx_indices
                .iter()
                .any(|i| SeriesKey::cdx_index(i) == key),
        }
    }

    fn fetch_error(&mut self, err: FetchError) -> ChartError {
        match err {
            FetchError::Validation(messages) => {
                self.state.alerts.benchmark_messages = messages.clone();
                ChartError::ValidationFailure(messages)
            }
            FetchError::Rejected(msg) => ChartError::Fetch(msg),
            FetchError::Unsupported => ChartError::Fetch(err.to_string()),
        }
    }

    /// Cleanup after a fetch that produced nothing.
    ///
    /// A security whose very first fetch failed is dropped without a trace. A
    /// security that was plotted but is now left with no series goes through
    /// the normal removal path.
    fn after_failed_fetch(&mut self, target: &FetchTarget) {
        let Some(security_id) = target.security_id() else {
            return;
        };
        if self.is_security_pending(security_id) {
            return;
        }
        let Some(plotted) = self.state.binding(security_id).map(|b| b.plotted) else {
            return;
        };
        let has_series = self
            .chart
            .list_series()
            .iter()
            .any(|s| s.security_id.as_ref() == Some(security_id));

        if !plotted {
            log::info!("Dropping security {}: first fetch failed", security_id);
            self.state.take_binding(security_id);
        } else if !has_series {
            let security_id = security_id.clone();
            self.remove_security(&security_id);
        }
    }

    fn build_record(&self, target: &FetchTarget, fetched: crate::data::source::FetchedSeries) -> SeriesRecord {
        let mut record = SeriesRecord::new(
            target.key(),
            fetched.name.unwrap_or_else(|| target.fallback_name()),
            fetched.data,
        );
        record.axis_type = fetched.axis_type.or_else(|| target.fallback_axis_type());
        record.security_id = target.security_id().cloned();
        record.axis_bounds = target.axis_bounds();
        record.color = fetched.color;
        record.chart_type = fetched.chart_type.unwrap_or_default();
        record
    }

    /// Remember a source whose series is now on the chart.
    fn track(&mut self, target: FetchTarget) {
        match target {
            FetchTarget::Attribute {
                security,
                attribute,
            } => {
                if let Some(binding) = self.state.binding_mut(&security.id) {
                    binding.put_attribute(attribute);
                    binding.plotted = true;
                }
            }
            FetchTarget::MarketIndex(index) => {
                match self.state.market_indices.iter_mut().find(|m| m.tag == index.tag) {
                    Some(existing) => *existing = index,
                    None => self.state.market_indices.push(index),
                }
            }
            FetchTarget::CustomBenchmark(b) => {
                let key = SeriesKey::custom_benchmark(&b);
                if !self.state.custom_benchmarks.iter().any(|x| SeriesKey::custom_benchmark(x) == key) {
                    self.state.custom_benchmarks.push(b);
                }
            }
            FetchTarget::ClientBenchmark(b) => {
                let key = SeriesKey::client_benchmark(&b);
                if !self.state.client_benchmarks.iter().any(|x| SeriesKey::client_benchmark(x) == key) {
                    self.state.client_benchmarks.push(b);
                }
            }
            FetchTarget::CdxIndex(i) => {
                let key = SeriesKey::cdx_index(&i);
                if !self.state.cdx_indices.iter().any(|x| SeriesKey::cdx_index(x) == key) {
                    self.state.cdx_indices.push(i);
                }
            }
        }
    }
}
