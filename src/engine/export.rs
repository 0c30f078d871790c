//! Export of the plotted series as a date-indexed table.

use std::collections::HashMap;

use itertools::Itertools;
#[cfg(not(target_arch = "wasm32"))]
use rayon::prelude::*;

use crate::chart::Chart;
use crate::config::CHART;
use crate::models::{SeriesRecord, TableModel, TableRow};
use crate::utils::time_utils::epoch_ms_to_utc_with;

use super::core::ChartEngine;

/// One row per distinct timestamp across `series` (ascending), one cell per series.
pub fn to_table(series: &[SeriesRecord]) -> TableModel {
    to_table_with(series, CHART.export_date_format)
}

pub fn to_table_with(series: &[SeriesRecord], date_format: &str) -> TableModel {
    let headers = series.iter().map(|s| s.name.clone()).collect();

    let timestamps: Vec<i64> = series
        .iter()
        .flat_map(|s| s.data.iter().map(|p| p.timestamp_ms))
        .sorted_unstable()
        .dedup()
        .collect();

    #[cfg(not(target_arch = "wasm32"))]
    let columns: Vec<HashMap<i64, f64>> = series.par_iter().map(column_lookup).collect();
    #[cfg(target_arch = "wasm32")]
    let columns: Vec<HashMap<i64, f64>> = series.iter().map(column_lookup).collect();

    let rows = timestamps
        .into_iter()
        .map(|timestamp_ms| TableRow {
            timestamp_ms,
            date: epoch_ms_to_utc_with(timestamp_ms, date_format),
            cells: columns
                .iter()
                .map(|column| column.get(&timestamp_ms).copied())
                .collect(),
        })
        .collect();

    TableModel { headers, rows }
}

/// Finite values only: NaN and infinities export as blanks, zero stays zero.
fn column_lookup(series: &SeriesRecord) -> HashMap<i64, f64> {
    series
        .data
        .iter()
        .filter(|p| p.value.is_finite())
        .map(|p| (p.timestamp_ms, p.value))
        .collect()
}

impl<C: Chart> ChartEngine<C> {
    /// The chart's current series as a table.
    pub fn export_table(&self) -> TableModel {
        to_table_with(self.chart.list_series(), self.config.export_date_format)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{MarketIndex, Security};
    use crate::engine::testing::{engine, series_key};
    use crate::models::{DataPoint, SeriesKey};
    use crate::utils::TimeUtils;

    fn record(name: &str, points: &[(i64, f64)]) -> SeriesRecord {
        SeriesRecord::new(
            SeriesKey::market_index(name),
            name,
            points.iter().copied().map(DataPoint::from).collect(),
        )
    }

    #[test]
    fn rows_are_the_sorted_union_of_timestamps() {
        let day = TimeUtils::MS_IN_D;
        let a = record("A", &[(2 * day, 0.0), (0, 1.0)]);
        let b = record("B", &[(day, 5.0), (2 * day, f64::NAN)]);

        let table = to_table(&[a, b]);

        assert_eq!(table.headers, vec!["A", "B"]);
        let stamps: Vec<i64> = table.rows.iter().map(|r| r.timestamp_ms).collect();
        assert_eq!(stamps, vec![0, day, 2 * day]);
        assert_eq!(table.rows[0].date, "1970-01-01");
        assert_eq!(table.rows[0].cells, vec![Some(1.0), None]);
        assert_eq!(table.rows[1].cells, vec![None, Some(5.0)]);
        // Zero is a value, NaN is a blank.
        assert_eq!(table.rows[2].cells, vec![Some(0.0), None]);
    }

    #[test]
    fn empty_input_gives_empty_table() {
        let table = to_table(&[]);
        assert!(table.headers.is_empty());
        assert!(table.is_empty());
    }

    #[test]
    fn engine_exports_current_series() {
        let mut engine = engine();
        engine.add_security(Security::new("1", "T")).unwrap();
        engine
            .add_market_indicator(MarketIndex::new("SPX", "S&P 500"))
            .unwrap();

        let table = engine.export_table();
        assert_eq!(table.headers, vec!["T Price", "S&P 500"]);
        assert_eq!(table.rows.len(), 4);
        assert_eq!(
            table.column("T Price"),
            Some(vec![Some(1.0), Some(2.0), Some(3.0), Some(4.0)])
        );
        assert!(engine.chart().get_series(&series_key("1", "price")).is_some());
    }
}
