//! Derived series. Pure functions: nothing here touches the chart.

use std::collections::{HashMap, VecDeque};

use chrono::NaiveDate;

use crate::models::{DataPoint, SeriesKey, SeriesRecord};
use crate::utils::maths_utils::mean;
use crate::utils::time_utils::day_of;

/// Trailing simple moving average over `window` samples.
///
/// The first `window - 1` points average whatever is available so far, so the
/// output has exactly as many points as the input. `None` for a zero window.
pub fn to_simple_ma(series: &SeriesRecord, window: usize) -> Option<SeriesRecord> {
    if window == 0 {
        return None;
    }

    let mut trailing: VecDeque<f64> = VecDeque::with_capacity(window.min(series.data.len()));
    let mut data = Vec::with_capacity(series.data.len());
    for point in &series.data {
        if trailing.len() == window {
            trailing.pop_front();
        }
        trailing.push_back(point.value);
        data.push(DataPoint {
            timestamp_ms: point.timestamp_ms,
            value: mean(trailing.make_contiguous()),
        });
    }

    let mut sma = derived_record(
        SeriesKey::SimpleMovingAverage {
            source: Box::new(series.id.clone()),
            window,
        },
        format!("{} {} Day SMA", series.name, window),
        data,
        series,
    );
    sma.disable_further_transformation = true;
    Some(sma)
}

/// `series - other`, matched on UTC calendar day.
///
/// Only days on which `other` has a sample are kept: no interpolation, no
/// lookback. A zero in `other` is a real sample. When `other` has several
/// samples on one day the last one wins.
pub fn to_basis(series: &SeriesRecord, other: &SeriesRecord) -> SeriesRecord {
    let by_day: HashMap<NaiveDate, f64> = other
        .data
        .iter()
        .filter_map(|p| Some((day_of(p.timestamp_ms)?, p.value)))
        .collect();

    let data: Vec<DataPoint> = series
        .data
        .iter()
        .filter_map(|p| {
            let other_value = by_day.get(&day_of(p.timestamp_ms)?)?;
            Some(DataPoint {
                timestamp_ms: p.timestamp_ms,
                value: p.value - other_value,
            })
        })
        .collect();

    derived_record(
        SeriesKey::Basis {
            source: Box::new(series.id.clone()),
            other: Box::new(other.id.clone()),
        },
        format!("Basis of {} - {}", series.name, other.name),
        data,
        series,
    )
}

/// Derived series keep the source's axis type and security, nothing else.
fn derived_record(
    id: SeriesKey,
    name: String,
    data: Vec<DataPoint>,
    source: &SeriesRecord,
) -> SeriesRecord {
    let mut record = SeriesRecord::new(id, name, data);
    record.axis_type = source.axis_type.clone();
    record.security_id = source.security_id.clone();
    record
}
