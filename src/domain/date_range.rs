use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::CHART;
use crate::utils::time_utils::{months_before, parse_date_input};

/// Global x-axis window, in epoch milliseconds. `start_ms < end_ms` always holds.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DateRange {
    start_ms: i64,
    end_ms: i64,
}

/// Why a requested date range was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateRangeError {
    InvalidStart,
    InvalidEnd,
    StartNotBeforeEnd,
}

impl DateRangeError {
    /// The inline message shown next to the date control.
    pub fn message(&self) -> &'static str {
        match self {
            DateRangeError::InvalidStart => CHART.messages.invalid_start_date,
            DateRangeError::InvalidEnd => CHART.messages.invalid_end_date,
            DateRangeError::StartNotBeforeEnd => CHART.messages.inverted_date_range,
        }
    }
}

impl DateRange {
    pub fn new(start_ms: i64, end_ms: i64) -> Result<Self, DateRangeError> {
        if DateTime::from_timestamp_millis(start_ms).is_none() {
            return Err(DateRangeError::InvalidStart);
        }
        if DateTime::from_timestamp_millis(end_ms).is_none() {
            return Err(DateRangeError::InvalidEnd);
        }
        if start_ms >= end_ms {
            return Err(DateRangeError::StartNotBeforeEnd);
        }
        Ok(Self { start_ms, end_ms })
    }

    /// Parse both bounds from user text. The start is checked first, so a range
    /// with two bad bounds reports the start.
    pub fn parse(start: &str, end: &str) -> Result<Self, DateRangeError> {
        let start = parse_date_input(start).ok_or(DateRangeError::InvalidStart)?;
        let end = parse_date_input(end).ok_or(DateRangeError::InvalidEnd)?;
        Self::new(start.timestamp_millis(), end.timestamp_millis())
    }

    pub fn start_ms(&self) -> i64 {
        self.start_ms
    }

    pub fn end_ms(&self) -> i64 {
        self.end_ms
    }

    pub fn start(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.start_ms)
    }

    pub fn end(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.end_ms)
    }

    pub fn contains(&self, epoch_ms: i64) -> bool {
        epoch_ms >= self.start_ms && epoch_ms <= self.end_ms
    }
}

/// A preset look-back window such as "3M" or "2Y".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimePeriod {
    months: u32,
}

impl TimePeriod {
    /// `<n>M` or `<n>Y`, case-insensitive, `n > 0`.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        let unit = text.chars().last()?;
        let count: u32 = text[..text.len() - unit.len_utf8()].parse().ok()?;
        if count == 0 {
            return None;
        }
        let months = match unit.to_ascii_uppercase() {
            'M' => count,
            'Y' => count.checked_mul(12)?,
            _ => return None,
        };
        Some(Self { months })
    }

    pub fn months(&self) -> u32 {
        self.months
    }

    /// The window `[now - period, now]`.
    pub fn range_ending_at(&self, now: DateTime<Utc>) -> Option<DateRange> {
        let start = months_before(now, self.months)?;
        DateRange::new(start.timestamp_millis(), now.timestamp_millis()).ok()
    }
}
