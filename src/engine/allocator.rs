//! Value-axis placement.
//!
//! Series share an axis only when they share an axis type. An axis whose series
//! all have type `T` accepts another `T`; an empty axis accepts `T` only when it
//! was declared with `T`.

#[cfg(debug_assertions)]
use crate::config::DEBUG_FLAGS;

use crate::chart::Chart;
use crate::models::{AxisId, AxisSpec, SeriesKey, SeriesRecord};
use crate::utils::maths_utils::{clamp_extent, finite_min_max};

use super::core::ChartEngine;
use super::error::ChartError;

/// The existing axis `candidate` should land on, or `None` when it needs a new one.
pub fn resolve_preferred_axis<C: Chart + ?Sized>(
    chart: &C,
    candidate: &SeriesRecord,
) -> Option<AxisId> {
    let axes = chart.list_axes();
    let Some(axis_type) = candidate.axis_type.as_deref() else {
        return axes.first().map(|axis| axis.id);
    };

    axes.iter()
        .find(|axis| {
            let members = chart.series_on_axis(axis.id);
            if members.is_empty() {
                axis.axis_type.as_deref() == Some(axis_type)
            } else {
                members
                    .iter()
                    .all(|s| s.axis_type.as_deref() == Some(axis_type))
            }
        })
        .map(|axis| axis.id)
}

impl<C: Chart> ChartEngine<C> {
    /// Pick (or create) the axis for a series about to be inserted.
    pub(crate) fn allocate_axis(&mut self, candidate: &SeriesRecord) -> AxisId {
        // 1. Explicit placement (axis moves)
        if let Some(preset) = candidate.y_axis {
            if self.chart.get_axis(preset).is_some() {
                return preset;
            }
        }

        // 2. Share an existing axis
        if let Some(found) = resolve_preferred_axis(&self.chart, candidate) {
            return found;
        }

        // 3. New axis, alternating sides
        let spec = AxisSpec {
            title: candidate
                .axis_type
                .clone()
                .unwrap_or_else(|| candidate.name.clone()),
            axis_type: candidate.axis_type.clone(),
            bounds: candidate.axis_bounds,
            opposite: self.chart.list_axes().len() % 2 == 1,
        };
        let axis = self.chart.add_axis(spec);

        #[cfg(debug_assertions)]
        if DEBUG_FLAGS.print_axis_events {
            log::debug!("Created {} for {}", axis, candidate.id);
        }

        axis
    }

    /// Remove `axis` if nothing is plotted on it any more.
    pub(crate) fn cascade_axis(&mut self, axis: Option<AxisId>) {
        let Some(axis) = axis else {
            return;
        };
        if self.chart.get_axis(axis).is_none() || !self.chart.is_axis_empty(axis) {
            return;
        }
        if self.config.keep_primary_axis && self.state.primary_axis == Some(axis) {
            return;
        }
        self.drop_axis(axis);
    }

    fn drop_axis(&mut self, axis: AxisId) {
        self.chart.remove_axis(axis);
        if self.state.primary_axis == Some(axis) {
            self.state.primary_axis = None;
        }

        #[cfg(debug_assertions)]
        if DEBUG_FLAGS.print_axis_events {
            log::debug!("Removed empty {}", axis);
        }
    }

    /// Re-home a series onto `target`. Keeps its color; an emptied origin axis goes away.
    pub fn move_series(&mut self, id: &SeriesKey, target: AxisId) -> Result<(), ChartError> {
        if self.chart.get_axis(target).is_none() {
            return Err(ChartError::UnknownAxis(target));
        }
        let Some(mut record) = self.chart.remove_series(id) else {
            return Err(ChartError::UnknownSeries(id.to_string()));
        };

        let origin = record.y_axis;
        record.y_axis = Some(target);
        self.upsert(record)?;

        if origin != Some(target) {
            self.cascade_axis(origin);
        }
        Ok(())
    }

    /// Give a series an axis of its own, titled after the series.
    pub fn move_series_to_new_axis(&mut self, id: &SeriesKey) -> Result<AxisId, ChartError> {
        let record = self
            .chart
            .get_series(id)
            .ok_or_else(|| ChartError::UnknownSeries(id.to_string()))?;

        let spec = AxisSpec {
            title: record.name.clone(),
            axis_type: record.axis_type.clone(),
            bounds: record.axis_bounds,
            opposite: self.chart.list_axes().len() % 2 == 1,
        };
        let axis = self.chart.add_axis(spec);
        self.move_series(id, axis)?;
        Ok(axis)
    }

    /// Remove an axis together with every series on it (with the usual removal hooks).
    pub fn remove_axis_cascade(&mut self, axis: AxisId) -> Result<(), ChartError> {
        if self.chart.get_axis(axis).is_none() {
            return Err(ChartError::UnknownAxis(axis));
        }
        if self.config.keep_primary_axis && self.state.primary_axis == Some(axis) {
            return Err(ChartError::PrimaryAxis);
        }

        // Snapshot first: removal mutates the chart
        let ids: Vec<SeriesKey> = self
            .chart
            .series_on_axis(axis)
            .iter()
            .map(|s| s.id.clone())
            .collect();
        for id in ids {
            self.remove_by_id(&id);
        }

        if self.chart.get_axis(axis).is_some() {
            self.drop_axis(axis);
        }
        Ok(())
    }

    pub fn rename_axis(&mut self, axis: AxisId, title: &str) -> Result<(), ChartError> {
        if self.chart.set_axis_title(axis, title) {
            Ok(())
        } else {
            Err(ChartError::UnknownAxis(axis))
        }
    }

    /// (min, max) over the finite values on `axis`, clamped to its floor / ceiling.
    pub fn axis_extent(&self, axis: AxisId) -> Option<(f64, f64)> {
        let bounds = self.chart.get_axis(axis)?.bounds.unwrap_or_default();
        let values: Vec<f64> = self
            .chart
            .series_on_axis(axis)
            .iter()
            .flat_map(|s| s.data.iter().map(|p| p.value))
            .collect();
        let extent = finite_min_max(&values)?;
        Some(clamp_extent(extent, bounds.floor, bounds.ceiling))
    }
}
