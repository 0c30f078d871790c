use std::collections::VecDeque;

use crate::chart::{Chart, MemoryChart};
use crate::config::{CHART, ChartConfig};
use crate::data::source::DataSource;
use crate::domain::Attribute;
use crate::models::AxisSpec;

use super::messages::{ChartNotification, PendingFetch};
use super::state::{Alerts, ChartState};

/// The chart's brain: keeps the `Chart` collaborator in sync with what the
/// user asked to see.
///
/// All mutation goes through `&mut self` on the owning thread. Data sources may
/// answer from other threads, but their results are only applied by `update()`.
pub struct ChartEngine<C: Chart = MemoryChart> {
    /// Only written through the registry / allocator
    pub(crate) chart: C,

    /// What the user asked for (securities, attributes, benchmarks, range)
    pub(crate) state: ChartState,

    /// Host data callbacks
    pub(crate) source: Box<dyn DataSource>,

    /// The live configuration
    pub(crate) config: ChartConfig,

    /// Fetches the data source has not answered yet, in submission order
    pub(crate) pending: Vec<PendingFetch>,

    notifications: VecDeque<ChartNotification>,

    /// Next palette slot for series without an explicit color
    pub(crate) color_cursor: usize,
}

impl<C: Chart> ChartEngine<C> {
    pub fn new(chart: C, source: Box<dyn DataSource>, default_attribute: Attribute) -> Self {
        Self::with_config(chart, source, default_attribute, CHART)
    }

    /// Create the engine and its primary axis (typed after the default attribute).
    pub fn with_config(
        mut chart: C,
        source: Box<dyn DataSource>,
        default_attribute: Attribute,
        config: ChartConfig,
    ) -> Self {
        let primary = chart.add_axis(AxisSpec {
            title: default_attribute.label.clone(),
            axis_type: Some(default_attribute.axis_type().to_string()),
            bounds: default_attribute.y_axis,
            opposite: false,
        });

        let mut state = ChartState::new(default_attribute);
        state.primary_axis = Some(primary);

        Self {
            chart,
            state,
            source,
            config,
            pending: Vec::new(),
            notifications: VecDeque::new(),
            color_cursor: 0,
        }
    }

    // --- ACCESSORS ---

    pub fn chart(&self) -> &C {
        &self.chart
    }

    pub fn state(&self) -> &ChartState {
        &self.state
    }

    pub fn alerts(&self) -> &Alerts {
        &self.state.alerts
    }

    pub fn config(&self) -> &ChartConfig {
        &self.config
    }

    pub fn update_config(&mut self, new_config: ChartConfig) {
        self.config = new_config;
    }

    /// Dismiss every inline message.
    pub fn clear_alerts(&mut self) {
        self.state.alerts = Alerts::default();
    }

    // --- NOTIFICATIONS ---

    pub(crate) fn notify(&mut self, notification: ChartNotification) {
        log::info!("Notify host: {:?}", notification);
        self.notifications.push_back(notification);
    }

    /// Everything emitted since the last drain, oldest first.
    pub fn drain_notifications(&mut self) -> Vec<ChartNotification> {
        self.notifications.drain(..).collect()
    }
}
