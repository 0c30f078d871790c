use crate::domain::{
    Attribute, CdxIndex, ClientBenchmark, CustomBenchmark, DateRange, MarketIndex, Security,
    SecurityId,
};
use crate::models::AxisId;

use super::error::ChartError;

/// One security on the chart and the attributes plotted for it.
#[derive(Debug, Clone, PartialEq)]
pub struct SecurityBinding {
    pub security: Security,
    /// At most one per tag
    pub attributes: Vec<Attribute>,
    /// Set once the first series for this security lands on the chart.
    /// A binding that never got plotted is dropped quietly if its first fetch fails.
    pub plotted: bool,
}

impl SecurityBinding {
    pub fn new(security: Security) -> Self {
        Self {
            security,
            attributes: Vec::new(),
            plotted: false,
        }
    }

    pub fn attribute(&self, tag: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.tag == tag)
    }

    /// Insert or replace by tag, keeping the original position.
    pub fn put_attribute(&mut self, attribute: Attribute) {
        match self.attributes.iter_mut().find(|a| a.tag == attribute.tag) {
            Some(existing) => *existing = attribute,
            None => self.attributes.push(attribute),
        }
    }
}

/// Inline messages the host shows next to the relevant controls.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Alerts {
    pub benchmark_messages: Vec<String>,
    pub general_warning: Option<String>,
    pub date_change_error: Option<String>,
}

/// Everything the user has asked to see, independent of what is drawn.
#[derive(Debug, Clone)]
pub struct ChartState {
    /// In insertion order (date-range refreshes follow it)
    pub bindings: Vec<SecurityBinding>,
    pub market_indices: Vec<MarketIndex>,
    pub custom_benchmarks: Vec<CustomBenchmark>,
    pub client_benchmarks: Vec<ClientBenchmark>,
    pub cdx_indices: Vec<CdxIndex>,

    pub date_range: Option<DateRange>,
    pub default_attribute: Attribute,
    pub primary_axis: Option<AxisId>,

    pub alerts: Alerts,
    pub last_error: Option<ChartError>,
}

impl ChartState {
    pub fn new(default_attribute: Attribute) -> Self {
        Self {
            bindings: Vec::new(),
            market_indices: Vec::new(),
            custom_benchmarks: Vec::new(),
            client_benchmarks: Vec::new(),
            cdx_indices: Vec::new(),
            date_range: None,
            default_attribute,
            primary_axis: None,
            alerts: Alerts::default(),
            last_error: None,
        }
    }

    pub fn binding(&self, id: &SecurityId) -> Option<&SecurityBinding> {
        self.bindings.iter().find(|b| &b.security.id == id)
    }

    pub fn binding_mut(&mut self, id: &SecurityId) -> Option<&mut SecurityBinding> {
        self.bindings.iter_mut().find(|b| &b.security.id == id)
    }

    pub fn is_active(&self, id: &SecurityId) -> bool {
        self.binding(id).is_some()
    }

    /// Drop a binding without any further bookkeeping.
    pub(crate) fn take_binding(&mut self, id: &SecurityId) -> Option<SecurityBinding> {
        let pos = self.bindings.iter().position(|b| &b.security.id == id)?;
        Some(self.bindings.remove(pos))
    }
}
