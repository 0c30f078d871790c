use serde::{Deserialize, Serialize};

use crate::chart::Chart;
use crate::domain::{
    Attribute, CdxIndex, ClientBenchmark, CustomBenchmark, DateRange, MarketIndex, Security,
};

use super::core::ChartEngine;
use super::error::ChartError;
use super::state::SecurityBinding;

/// Everything needed to rebuild a chart: what was asked for, not what was drawn.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ChartSession {
    pub title: String,
    pub default_attribute: Attribute,
    pub date_range: Option<DateRange>,
    pub securities: Vec<(Security, Vec<Attribute>)>,
    pub market_indices: Vec<MarketIndex>,
    pub custom_benchmarks: Vec<CustomBenchmark>,
    pub client_benchmarks: Vec<ClientBenchmark>,
    pub cdx_indices: Vec<CdxIndex>,
}

impl<C: Chart> ChartEngine<C> {
    pub fn snapshot(&self) -> ChartSession {
        ChartSession {
            title: self.chart.title().to_string(),
            default_attribute: self.state.default_attribute.clone(),
            date_range: self.state.date_range,
            securities: self
                .state
                .bindings
                .iter()
                .map(|b| (b.security.clone(), b.attributes.clone()))
                .collect(),
            market_indices: self.state.market_indices.clone(),
            custom_benchmarks: self.state.custom_benchmarks.clone(),
            client_benchmarks: self.state.client_benchmarks.clone(),
            cdx_indices: self.state.cdx_indices.clone(),
        }
    }

    /// Rebuild a saved session through the normal add pipeline (fresh fetches,
    /// fresh axes). Meant for a new engine; anything already on the chart is
    /// kept and duplicates are ignored.
    ///
    /// Returns the errors hit along the way. None of them stop the restore.
    pub fn restore(&mut self, session: ChartSession) -> Vec<ChartError> {
        let mut errors = Vec::new();

        // 1. Chart-level settings
        self.set_title(&session.title);
        self.change_default_attribute(session.default_attribute);
        if let Some(saved) = session.date_range {
            match DateRange::new(saved.start_ms(), saved.end_ms()) {
                Ok(range) => self.state.date_range = Some(range),
                Err(e) => errors.push(ChartError::InvalidDateRange(e.message().to_string())),
            }
        }

        // 2. Securities, with exactly the attributes they had
        for (security, attributes) in session.securities {
            if attributes.is_empty() {
                continue;
            }
            let id = security.id.clone();
            if !self.state.is_active(&id) {
                self.state.bindings.push(SecurityBinding::new(security));
            }
            for attribute in attributes {
                errors.extend(self.add_attr(attribute, &id).err());
            }
        }

        // 3. Everything else
        for index in session.market_indices {
            errors.extend(self.add_market_indicator(index).err());
        }
        for benchmark in session.custom_benchmarks {
            errors.extend(self.add_custom_benchmark(benchmark).err());
        }
        for benchmark in session.client_benchmarks {
            errors.extend(self.add_client_benchmark(benchmark).err());
        }
        for index in session.cdx_indices {
            errors.extend(self.add_cdx_index(index).err());
        }

        for e in &errors {
            log::warn!("Session restore: {}", e);
        }
        errors
    }
}
