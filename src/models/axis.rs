use serde::{Deserialize, Serialize};

use crate::domain::AxisBounds;

/// Handle of a value axis inside a chart. Never reused within one chart.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AxisId(pub u64);

impl std::fmt::Display for AxisId {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "axis#{}", self.0)
    }
}

/// What the engine asks the chart for when it needs a new axis.
#[derive(Debug, Clone, PartialEq)]
pub struct AxisSpec {
    pub title: String,
    pub axis_type: Option<String>,
    pub bounds: Option<AxisBounds>,
    /// Drawn on the right-hand side
    pub opposite: bool,
}

impl AxisSpec {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            axis_type: None,
            bounds: None,
            opposite: false,
        }
    }
}

/// A value axis as stored by the chart.
#[derive(Debug, Clone, PartialEq)]
pub struct Axis {
    pub id: AxisId,
    pub title: String,
    pub axis_type: Option<String>,
    pub bounds: Option<AxisBounds>,
    pub opposite: bool,
}

impl Axis {
    pub fn from_spec(id: AxisId, spec: AxisSpec) -> Self {
        Self {
            id,
            title: spec.title,
            axis_type: spec.axis_type,
            bounds: spec.bounds,
            opposite: spec.opposite,
        }
    }
}
