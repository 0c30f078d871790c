use chrono::{DateTime, Utc};

#[cfg(debug_assertions)]
use crate::config::DEBUG_FLAGS;

use crate::chart::Chart;
use crate::domain::{DateRange, DateRangeError, TimePeriod};

use super::core::ChartEngine;
use super::error::ChartError;
use super::messages::{FetchReason, FetchTarget};

impl<C: Chart> ChartEngine<C> {
    /// Validate and apply a user-entered date range, then re-fetch everything.
    ///
    /// Bounds may be a year, epoch milliseconds, RFC 3339, or `YYYY-MM-DD`. On error the
    /// message is shown in `alerts.date_change_error` and nothing else changes.
    pub fn change_date_range(&mut self, start: &str, end: &str) -> Result<(), ChartError> {
        match DateRange::parse(start, end) {
            Ok(range) => self.apply_date_range(range),
            Err(e) => self.reject_date_range(e),
        }
    }

    /// Numeric variant, for zoom gestures and the like.
    pub fn change_date_range_ms(&mut self, start_ms: i64, end_ms: i64) -> Result<(), ChartError> {
        match DateRange::new(start_ms, end_ms) {
            Ok(range) => self.apply_date_range(range),
            Err(e) => self.reject_date_range(e),
        }
    }

    /// Apply a preset look-back window ("1M", "3M", "1Y", ...) ending now.
    pub fn select_time_period(&mut self, period: &str) -> Result<(), ChartError> {
        self.select_time_period_at(period, Utc::now())
    }

    pub fn select_time_period_at(
        &mut self,
        period: &str,
        now: DateTime<Utc>,
    ) -> Result<(), ChartError> {
        let range = TimePeriod::parse(period)
            .and_then(|p| p.range_ending_at(now))
            .ok_or_else(|| ChartError::InvalidDateRange(format!("Unknown time period: {}", period)))?;
        self.apply_date_range(range)
    }

    /// Presets offered next to the date inputs.
    pub fn time_periods(&self) -> &'static [&'static str] {
        self.config.default_time_periods
    }

    fn reject_date_range(&mut self, error: DateRangeError) -> Result<(), ChartError> {
        let message = error.message().to_string();
        log::warn!("Date range rejected: {}", message);
        self.state.alerts.date_change_error = Some(message.clone());
        Err(ChartError::InvalidDateRange(message))
    }

    fn apply_date_range(&mut self, range: DateRange) -> Result<(), ChartError> {
        self.state.alerts.date_change_error = None;
        self.state.date_range = Some(range);
        self.refresh_all();
        Ok(())
    }

    /// Re-fetch every tracked source against the current range, in insertion order.
    /// One failure never blocks the rest.
    pub(crate) fn refresh_all(&mut self) {
        // 1. Plan
        let mut plan: Vec<(FetchTarget, FetchReason)> = Vec::new();
        for binding in &self.state.bindings {
            for attribute in &binding.attributes {
                plan.push((
                    FetchTarget::Attribute {
                        security: binding.security.clone(),
                        attribute: attribute.clone(),
                    },
                    FetchReason::Refresh,
                ));
            }
        }
        let tracked = self
            .state
            .market_indices
            .iter()
            .cloned()
            .map(FetchTarget::MarketIndex)
            .chain(self.state.custom_benchmarks.iter().cloned().map(FetchTarget::CustomBenchmark))
            .chain(self.state.client_benchmarks.iter().cloned().map(FetchTarget::ClientBenchmark))
            .chain(self.state.cdx_indices.iter().cloned().map(FetchTarget::CdxIndex));
        plan.extend(tracked.map(|t| (t, FetchReason::Refresh)));

        // In-flight fetches were asked for the old range. Their target wins over
        // the stored one: it may carry a replacement attribute not yet applied.
        for fetch in &self.pending {
            match plan.iter_mut().find(|(t, _)| t.key() == fetch.key) {
                Some(entry) => entry.0 = fetch.target.clone(),
                None => plan.push((fetch.target.clone(), fetch.reason)),
            }
        }

        #[cfg(debug_assertions)]
        if DEBUG_FLAGS.print_date_range_refresh {
            log::info!(
                "Date range {:?}: refreshing {} sources",
                self.state.date_range,
                plan.len()
            );
        }

        // 2. Fetch
        for (target, reason) in plan {
            let key = target.key();
            // An in-flight first fetch is superseded the same way a refresh is
            self.cancel_pending(&key);
            if let Err(e) = self.submit(target, reason) {
                log::warn!("Refresh of {} failed: {}", key, e);
                self.state.last_error = Some(e);
            }
        }
    }
}
