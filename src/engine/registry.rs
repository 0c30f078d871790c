//! The only way series get onto (and off) the chart.

#[cfg(debug_assertions)]
use crate::config::DEBUG_FLAGS;

use colorgrad::Gradient;

use crate::chart::Chart;
use crate::domain::SecurityId;
use crate::models::{ChartType, SeriesKey, SeriesRecord};

use super::core::ChartEngine;
use super::error::ChartError;
use super::messages::FetchStatus;

/// Golden-ratio stride so consecutive overflow colors land far apart on the gradient.
const GOLDEN_STRIDE: f32 = 0.618_034;

/// Color for the `index`-th series: the palette itself, then points sampled
/// along a gradient through it.
pub fn palette_color(palette: &[&str], index: usize) -> Option<String> {
    if palette.is_empty() {
        return None;
    }
    if let Some(color) = palette.get(index) {
        return Some(color.to_string());
    }
    let gradient = colorgrad::GradientBuilder::new()
        .html_colors(palette)
        .build::<colorgrad::CatmullRomGradient>()
        .ok()?;
    let t = (index as f32 * GOLDEN_STRIDE).fract();
    Some(gradient.at(t).to_hex_string())
}

impl<C: Chart> ChartEngine<C> {
    /// Insert a new series or replace the data of an existing one.
    ///
    /// Existing ids keep their axis and color. New series must carry data; they
    /// get an axis from the allocator and a palette color if they have none.
    pub(crate) fn upsert(&mut self, mut record: SeriesRecord) -> Result<FetchStatus, ChartError> {
        if self.chart.get_series(&record.id).is_some() {
            #[cfg(debug_assertions)]
            if DEBUG_FLAGS.print_series_events {
                log::debug!("Replacing data of {} ({} points)", record.id, record.data.len());
            }
            self.chart.set_series_data(&record.id, record.data);
            return Ok(FetchStatus::Applied);
        }

        if record.data.is_empty() {
            log::warn!("Refusing empty series {}", record.id);
            self.state.alerts.general_warning = Some(self.config.messages.empty_series.to_string());
            return Err(ChartError::EmptySeriesData(record.name));
        }

        let axis = self.allocate_axis(&record);
        record.y_axis = Some(axis);
        if record.color.is_none() {
            record.color = self.next_color();
        }

        #[cfg(debug_assertions)]
        if DEBUG_FLAGS.print_series_events {
            log::debug!("Adding {} on {}", record.id, axis);
        }

        self.chart.add_series(record);
        Ok(FetchStatus::Applied)
    }

    fn next_color(&mut self) -> Option<String> {
        let color = palette_color(self.config.series_palette, self.color_cursor);
        self.color_cursor += 1;
        color
    }

    /// Remove a series and whatever it was holding up. Unknown ids are ignored.
    pub fn remove_by_id(&mut self, id: &SeriesKey) {
        if self.chart.get_series(id).is_none() {
            return;
        }

        match id {
            SeriesKey::Security {
                security_id,
                attr_tag,
            } => {
                // remove_attr takes the series off and runs the cascades itself
                self.remove_attr(attr_tag, security_id);
                return;
            }
            SeriesKey::MarketIndex { tag } => {
                self.state.market_indices.retain(|m| &m.tag != tag);
            }
            SeriesKey::CustomBenchmark { .. } => {
                self.state
                    .custom_benchmarks
                    .retain(|b| &SeriesKey::custom_benchmark(b) != id);
            }
            SeriesKey::ClientBenchmark { .. } => {
                self.state
                    .client_benchmarks
                    .retain(|b| &SeriesKey::client_benchmark(b) != id);
            }
            SeriesKey::CdxIndex { .. } => {
                self.state
                    .cdx_indices
                    .retain(|i| &SeriesKey::cdx_index(i) != id);
            }
            SeriesKey::SimpleMovingAverage { .. } | SeriesKey::Basis { .. } => {}
        }

        self.cancel_pending(id);
        if let Some(removed) = self.chart.remove_series(id) {
            self.after_series_remove(&removed);
        }
    }

    /// Axis and security cascades after `removed` left the chart.
    pub(crate) fn after_series_remove(&mut self, removed: &SeriesRecord) {
        #[cfg(debug_assertions)]
        if DEBUG_FLAGS.print_series_events {
            log::debug!("Removed {}", removed.id);
        }

        self.cascade_axis(removed.y_axis);
        if let Some(security_id) = &removed.security_id {
            self.cascade_security(security_id);
        }
    }

    /// A security with nothing plotted and nothing on the way is removed.
    fn cascade_security(&mut self, security_id: &SecurityId) {
        if !self.state.is_active(security_id) {
            return;
        }
        let has_series = self
            .chart
            .list_series()
            .iter()
            .any(|s| s.security_id.as_ref() == Some(security_id));
        if has_series || self.is_security_pending(security_id) {
            return;
        }
        self.remove_security(security_id);
    }

    /// UI-level removal ("Remove" in the series menu).
    pub fn remove_series(&mut self, id: &SeriesKey) {
        self.remove_by_id(id);
    }

    /// Remove every SMA and basis curve, leaving their sources alone.
    pub fn clear_derived_curves(&mut self) {
        let derived: Vec<SeriesKey> = self
            .chart
            .list_series()
            .iter()
            .filter(|s| s.id.is_derived())
            .map(|s| s.id.clone())
            .collect();
        for id in derived {
            self.remove_by_id(&id);
        }
    }

    pub fn change_chart_type(&mut self, id: &SeriesKey, chart_type: ChartType) -> Result<(), ChartError> {
        if self.chart.set_series_chart_type(id, chart_type) {
            Ok(())
        } else {
            Err(ChartError::UnknownSeries(id.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{MarketIndex, Security};
    use crate::engine::testing::{engine, series_key, typed_record};
    use crate::models::DataPoint;

    #[test]
    fn palette_then_gradient() {
        let palette = ["#ff0000", "#00ff00", "#0000ff"];
        assert_eq!(palette_color(&palette, 1).as_deref(), Some("#00ff00"));

        let overflow = palette_color(&palette, 7).unwrap();
        assert!(overflow.starts_with('#'));
        assert_eq!(palette_color(&palette, 7), Some(overflow));
        assert_eq!(palette_color(&[], 0), None);
    }

    #[test]
    fn upsert_same_id_twice_keeps_one_series() {
        let mut engine = engine();
        let record = typed_record("1", "price", "Price");
        engine.upsert(record.clone()).unwrap();

        let mut newer = record;
        newer.data = vec![DataPoint::from((10, 42.0))];
        engine.upsert(newer).unwrap();

        let series = engine.chart().list_series();
        assert_eq!(series.len(), 1);
        assert_eq!(series[0].data, vec![DataPoint::from((10, 42.0))]);
    }

    #[test]
    fn empty_new_series_is_refused_with_warning() {
        let mut engine = engine();
        let mut record = typed_record("1", "price", "Price");
        record.data.clear();

        assert_eq!(
            engine.upsert(record),
            Err(ChartError::EmptySeriesData("price".into()))
        );
        assert!(engine.chart().list_series().is_empty());
        assert_eq!(
            engine.alerts().general_warning.as_deref(),
            Some("Added series contains no data!")
        );
    }

    #[test]
    fn new_series_get_distinct_colors() {
        let mut engine = engine();
        engine.upsert(typed_record("1", "price", "Price")).unwrap();
        engine.upsert(typed_record("2", "price", "Price")).unwrap();
        let colors: Vec<_> = engine
            .chart()
            .list_series()
            .iter()
            .map(|s| s.color.clone())
            .collect();
        assert!(colors.iter().all(Option::is_some));
        assert_ne!(colors[0], colors[1]);
    }

    #[test]
    fn removing_unknown_id_is_a_no_op() {
        let mut engine = engine();
        engine.add_security(Security::new("1", "T")).unwrap();
        engine.remove_by_id(&series_key("9", "price"));
        assert_eq!(engine.chart().list_series().len(), 1);
        assert!(engine.drain_notifications().is_empty());
    }

    #[test]
    fn removing_market_index_untracks_it() {
        let mut engine = engine();
        engine
            .add_market_indicator(MarketIndex::new("SPX", "S&P 500"))
            .unwrap();
        assert_eq!(engine.state().market_indices.len(), 1);

        engine.remove_series(&SeriesKey::market_index("SPX"));
        assert!(engine.state().market_indices.is_empty());
        assert!(engine.chart().list_series().is_empty());
    }

    #[test]
    fn clear_derived_leaves_sources() {
        let mut engine = engine();
        engine.add_security(Security::new("1", "T")).unwrap();
        engine.add_security(Security::new("2", "VZ")).unwrap();
        let a = series_key("1", "price");
        let b = series_key("2", "price");
        engine.add_simple_ma(&a, 2).unwrap();
        engine.add_basis(&a, &b).unwrap();
        assert_eq!(engine.chart().list_series().len(), 4);

        engine.clear_derived_curves();

        let ids: Vec<SeriesKey> = engine
            .chart()
            .list_series()
            .iter()
            .map(|s| s.id.clone())
            .collect();
        assert_eq!(ids, vec![a, b]);
        assert_eq!(engine.state().bindings.len(), 2);
    }

    #[test]
    fn chart_type_change_targets_known_series() {
        let mut engine = engine();
        engine.add_security(Security::new("1", "T")).unwrap();
        let id = series_key("1", "price");

        engine.change_chart_type(&id, ChartType::Column).unwrap();
        assert_eq!(
            engine.chart().get_series(&id).map(|s| s.chart_type),
            Some(ChartType::Column)
        );
        assert!(engine.change_chart_type(&series_key("2", "price"), ChartType::Area).is_err());
    }
}
