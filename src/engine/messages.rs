use poll_promise::Promise;

use crate::data::source::FetchResult;
use crate::domain::{
    Attribute, CdxIndex, ClientBenchmark, CustomBenchmark, MarketIndex, Security, SecurityId,
};
use crate::models::SeriesKey;
use crate::utils::app_time::AppInstant;

/// Outbound events for the host. Drained with `ChartEngine::drain_notifications`.
#[derive(Debug, Clone, PartialEq)]
pub enum ChartNotification {
    SecurityRemoved(SecurityId),
    DefaultAttributeChanged(Attribute),
}

/// What happened to a request that may involve a fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchStatus {
    /// Data is on the chart
    Applied,
    /// Waiting on the data source; `update()` will apply it
    Pending,
    /// Nothing to do (duplicate, redundant, or already in flight)
    Ignored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FetchReason {
    /// First time this source is plotted
    Add,
    /// Source already tracked; replaces data in place
    Refresh,
}

/// The thing a fetch is for.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum FetchTarget {
    Attribute {
        security: Security,
        attribute: Attribute,
    },
    MarketIndex(MarketIndex),
    CustomBenchmark(CustomBenchmark),
    ClientBenchmark(ClientBenchmark),
    CdxIndex(CdxIndex),
}

impl FetchTarget {
    /// Series id the result will be stored under.
    pub(crate) fn key(&self) -> SeriesKey {
        match self {
            FetchTarget::Attribute {
                security,
                attribute,
            } => SeriesKey::security(&security.id, &attribute.tag),
            FetchTarget::MarketIndex(index) => SeriesKey::market_index(&index.tag),
            FetchTarget::CustomBenchmark(b) => SeriesKey::custom_benchmark(b),
            FetchTarget::ClientBenchmark(b) => SeriesKey::client_benchmark(b),
            FetchTarget::CdxIndex(i) => SeriesKey::cdx_index(i),
        }
    }

    pub(crate) fn security_id(&self) -> Option<&SecurityId> {
        match self {
            FetchTarget::Attribute { security, .. } => Some(&security.id),
            _ => None,
        }
    }

    /// Legend name used when the source does not supply one.
    pub(crate) fn fallback_name(&self) -> String {
        fn analytic_label(analytic: &Option<Attribute>) -> &str {
            analytic.as_ref().map(|a| a.label.as_str()).unwrap_or_default()
        }
        match self {
            FetchTarget::Attribute {
                security,
                attribute,
            } => format!("{} {}", security.label, attribute.label),
            FetchTarget::MarketIndex(index) => index.label.clone(),
            FetchTarget::CustomBenchmark(b) => format!(
                "{} {} {}Y {}",
                b.sector.as_deref().unwrap_or_default(),
                b.rating.as_deref().unwrap_or_default(),
                b.wal.as_deref().unwrap_or_default(),
                analytic_label(&b.analytic)
            ),
            FetchTarget::ClientBenchmark(b) => {
                format!("{} {}", b.label, analytic_label(&b.analytic))
            }
            FetchTarget::CdxIndex(i) => format!(
                "{} {} {}",
                i.index.as_deref().unwrap_or_default(),
                i.tenor.as_deref().unwrap_or_default(),
                analytic_label(&i.analytic)
            ),
        }
    }

    /// Axis type used when the source does not supply one.
    pub(crate) fn fallback_axis_type(&self) -> Option<String> {
        let analytic = match self {
            FetchTarget::Attribute { attribute, .. } => Some(attribute),
            FetchTarget::MarketIndex(_) => None,
            FetchTarget::CustomBenchmark(b) => b.analytic.as_ref(),
            FetchTarget::ClientBenchmark(b) => b.analytic.as_ref(),
            FetchTarget::CdxIndex(i) => i.analytic.as_ref(),
        };
        analytic.map(|a| a.axis_type().to_string())
    }

    pub(crate) fn axis_bounds(&self) -> Option<crate::domain::AxisBounds> {
        match self {
            FetchTarget::Attribute { attribute, .. } => attribute.y_axis,
            FetchTarget::CustomBenchmark(b) => b.analytic.as_ref().and_then(|a| a.y_axis),
            FetchTarget::ClientBenchmark(b) => b.analytic.as_ref().and_then(|a| a.y_axis),
            FetchTarget::CdxIndex(i) => i.analytic.as_ref().and_then(|a| a.y_axis),
            FetchTarget::MarketIndex(_) => None,
        }
    }
}

/// A fetch the data source has not answered yet.
pub(crate) struct PendingFetch {
    pub key: SeriesKey,
    pub target: FetchTarget,
    pub reason: FetchReason,
    pub promise: Promise<FetchResult>,
    pub started: AppInstant,
}
