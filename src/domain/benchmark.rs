//! Non-security sources of time series: market indices, benchmarks, CDX indices.

use serde::{Deserialize, Serialize};

use crate::config::CHART;
use crate::domain::security::Attribute;

/// A market indicator picked from the host's typeahead ({label, tag}).
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct MarketIndex {
    pub tag: String,
    pub label: String,
}

impl MarketIndex {
    pub fn new(tag: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            label: label.into(),
        }
    }
}

/// A benchmark constructed by the user from sector / WAL / rating / analytic.
/// Every dimension is required before the host is asked for data.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct CustomBenchmark {
    pub sector: Option<String>,
    pub wal: Option<String>,
    pub rating: Option<String>,
    pub analytic: Option<Attribute>,
}

/// A benchmark the client already maintains on the host side.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct ClientBenchmark {
    pub id: Option<String>,
    pub label: String,
    pub analytic: Option<Attribute>,
}

/// A CDX credit index series (e.g. "CDX.NA.IG" at a given tenor).
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct CdxIndex {
    pub index: Option<String>,
    pub tenor: Option<String>,
    pub analytic: Option<Attribute>,
}

fn present(field: &Option<String>) -> bool {
    field.as_deref().is_some_and(|s| !s.trim().is_empty())
}

fn missing_fields() -> Vec<String> {
    vec![CHART.messages.missing_benchmark_fields.to_string()]
}

impl CustomBenchmark {
    pub fn validate(&self) -> Result<(), Vec<String>> {
        if present(&self.sector)
            && present(&self.wal)
            && present(&self.rating)
            && self.analytic.is_some()
        {
            Ok(())
        } else {
            Err(missing_fields())
        }
    }
}

impl ClientBenchmark {
    pub fn validate(&self) -> Result<(), Vec<String>> {
        if present(&self.id) && self.analytic.is_some() {
            Ok(())
        } else {
            Err(missing_fields())
        }
    }
}

impl CdxIndex {
    pub fn validate(&self) -> Result<(), Vec<String>> {
        if present(&self.index) && present(&self.tenor) && self.analytic.is_some() {
            Ok(())
        } else {
            Err(missing_fields())
        }
    }
}
