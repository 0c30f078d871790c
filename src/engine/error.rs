use std::fmt;

use crate::domain::SecurityId;
use crate::models::AxisId;

/// Everything an engine operation can refuse. None of these are fatal: the
/// engine state is left as it was before the call.
#[derive(Debug, Clone, PartialEq)]
pub enum ChartError {
    /// User-supplied dates failed validation (carries the inline message)
    InvalidDateRange(String),
    /// A fetched or derived series had no points (carries the series name)
    EmptySeriesData(String),
    /// Benchmark inputs incomplete, or the data source rejected them
    ValidationFailure(Vec<String>),
    /// The data source failed
    Fetch(String),
    UnknownSeries(String),
    UnknownSecurity(SecurityId),
    UnknownAxis(AxisId),
    InvalidWindow(usize),
    /// The series is itself derived and cannot be transformed again
    TransformationDisabled(String),
    /// The primary axis is pinned and cannot be removed
    PrimaryAxis,
}

impl fmt::Display for ChartError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChartError::InvalidDateRange(msg) => write!(f, "Invalid date range: {}", msg),
            ChartError::EmptySeriesData(name) => write!(f, "Series '{}' has no data", name),
            ChartError::ValidationFailure(msgs) => {
                write!(f, "Validation failed: {}", msgs.join("; "))
            }
            ChartError::Fetch(msg) => write!(f, "Fetch failed: {}", msg),
            ChartError::UnknownSeries(id) => write!(f, "Unknown series: {}", id),
            ChartError::UnknownSecurity(id) => write!(f, "Unknown security: {}", id),
            ChartError::UnknownAxis(id) => write!(f, "Unknown axis: {}", id),
            ChartError::InvalidWindow(n) => write!(f, "Invalid moving average window: {}", n),
            ChartError::TransformationDisabled(id) => {
                write!(f, "Series {} cannot be transformed further", id)
            }
            ChartError::PrimaryAxis => write!(f, "The primary axis cannot be removed"),
        }
    }
}

impl std::error::Error for ChartError {}
