use crate::chart::Chart;
use crate::config::CHART;
use crate::models::{Axis, AxisId, AxisSpec, ChartType, DataPoint, SeriesKey, SeriesRecord};

/// Plain in-memory chart. Used by the CLI, by headless hosts and by tests.
#[derive(Debug, Clone)]
pub struct MemoryChart {
    title: String,
    series: Vec<SeriesRecord>,
    axes: Vec<Axis>,
    next_axis_id: u64,
}

impl Default for MemoryChart {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryChart {
    pub fn new() -> Self {
        Self {
            title: CHART.default_title.to_string(),
            series: Vec::new(),
            axes: Vec::new(),
            next_axis_id: 0,
        }
    }

    fn series_mut(&mut self, id: &SeriesKey) -> Option<&mut SeriesRecord> {
        self.series.iter_mut().find(|s| &s.id == id)
    }

    fn axis_mut(&mut self, id: AxisId) -> Option<&mut Axis> {
        self.axes.iter_mut().find(|a| a.id == id)
    }
}

impl Chart for MemoryChart {
    fn title(&self) -> &str {
        &self.title
    }

    fn set_title(&mut self, title: &str) {
        self.title = title.to_string();
    }

    fn list_series(&self) -> &[SeriesRecord] {
        &self.series
    }

    fn list_axes(&self) -> &[Axis] {
        &self.axes
    }

    fn get_series(&self, id: &SeriesKey) -> Option<&SeriesRecord> {
        self.series.iter().find(|s| &s.id == id)
    }

    fn add_series(&mut self, record: SeriesRecord) {
        match self.series_mut(&record.id) {
            Some(existing) => *existing = record,
            None => self.series.push(record),
        }
    }

    fn set_series_data(&mut self, id: &SeriesKey, data: Vec<DataPoint>) -> bool {
        match self.series_mut(id) {
            Some(series) => {
                series.data = data;
                true
            }
            None => false,
        }
    }

    fn set_series_chart_type(&mut self, id: &SeriesKey, chart_type: ChartType) -> bool {
        match self.series_mut(id) {
            Some(series) => {
                series.chart_type = chart_type;
                true
            }
            None => false,
        }
    }

    fn remove_series(&mut self, id: &SeriesKey) -> Option<SeriesRecord> {
        let pos = self.series.iter().position(|s| &s.id == id)?;
        Some(self.series.remove(pos))
    }

    fn add_axis(&mut self, spec: AxisSpec) -> AxisId {
        let id = AxisId(self.next_axis_id);
        self.next_axis_id += 1;
        self.axes.push(Axis::from_spec(id, spec));
        id
    }

    fn remove_axis(&mut self, id: AxisId) -> Option<Axis> {
        let pos = self.axes.iter().position(|a| a.id == id)?;
        Some(self.axes.remove(pos))
    }

    fn set_axis_title(&mut self, id: AxisId, title: &str) -> bool {
        match self.axis_mut(id) {
            Some(axis) => {
                axis.title = title.to_string();
                true
            }
            None => false,
        }
    }

    fn set_axis_type(&mut self, id: AxisId, axis_type: Option<String>) -> bool {
        match self.axis_mut(id) {
            Some(axis) => {
                axis.axis_type = axis_type;
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SecurityId;

    fn record(tag: &str, axis: AxisId) -> SeriesRecord {
        let mut r = SeriesRecord::new(
            SeriesKey::security(&SecurityId::from("1"), tag),
            tag,
            vec![(0, 1.0).into()],
        );
        r.y_axis = Some(axis);
        r
    }

    #[test]
    fn axis_ids_are_not_reused() {
        let mut chart = MemoryChart::new();
        let a = chart.add_axis(AxisSpec::new("A"));
        chart.remove_axis(a);
        let b = chart.add_axis(AxisSpec::new("B"));
        assert_ne!(a, b);
        assert_eq!(chart.list_axes().len(), 1);
    }

    #[test]
    fn axis_membership_follows_series() {
        let mut chart = MemoryChart::new();
        let axis = chart.add_axis(AxisSpec::new("Price"));
        assert!(chart.is_axis_empty(axis));

        chart.add_series(record("price", axis));
        chart.add_series(record("volume", axis));
        assert_eq!(chart.series_on_axis(axis).len(), 2);

        let removed = chart.remove_series(&SeriesKey::security(&SecurityId::from("1"), "price"));
        assert!(removed.is_some());
        assert!(!chart.is_axis_empty(axis));
        assert_eq!(chart.title(), "Untitled");
    }
}
