//! The rendering collaborator. The engine never draws anything: it keeps a
//! `Chart` in sync and lets the host paint whatever the chart holds.

mod memory;

pub use memory::MemoryChart;

use crate::models::{Axis, AxisId, AxisSpec, ChartType, DataPoint, SeriesKey, SeriesRecord};

pub trait Chart {
    fn title(&self) -> &str;
    fn set_title(&mut self, title: &str);

    /// Series in insertion order.
    fn list_series(&self) -> &[SeriesRecord];
    /// Axes in creation order.
    fn list_axes(&self) -> &[Axis];

    fn get_series(&self, id: &SeriesKey) -> Option<&SeriesRecord>;

    /// Insert a series. `record.y_axis` must name an existing axis.
    fn add_series(&mut self, record: SeriesRecord);
    /// Returns false when the series is unknown.
    fn set_series_data(&mut self, id: &SeriesKey, data: Vec<DataPoint>) -> bool;
    fn set_series_chart_type(&mut self, id: &SeriesKey, chart_type: ChartType) -> bool;
    fn remove_series(&mut self, id: &SeriesKey) -> Option<SeriesRecord>;

    fn add_axis(&mut self, spec: AxisSpec) -> AxisId;
    /// Removes the axis only. Callers move or drop its series first.
    fn remove_axis(&mut self, id: AxisId) -> Option<Axis>;
    fn set_axis_title(&mut self, id: AxisId, title: &str) -> bool;
    fn set_axis_type(&mut self, id: AxisId, axis_type: Option<String>) -> bool;

    // --- Provided ---

    fn get_axis(&self, id: AxisId) -> Option<&Axis> {
        self.list_axes().iter().find(|a| a.id == id)
    }

    fn series_on_axis(&self, id: AxisId) -> Vec<&SeriesRecord> {
        self.list_series()
            .iter()
            .filter(|s| s.y_axis == Some(id))
            .collect()
    }

    fn is_axis_empty(&self, id: AxisId) -> bool {
        !self.list_series().iter().any(|s| s.y_axis == Some(id))
    }
}
