use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Identity of a security, as handed to us by the host.
#[derive(Serialize, Deserialize, Debug, Clone, Hash, Eq, PartialEq, PartialOrd, Ord)]
pub struct SecurityId(pub String);

impl SecurityId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SecurityId {
    fn from(id: &str) -> Self {
        SecurityId(id.to_string())
    }
}

impl From<String> for SecurityId {
    fn from(id: String) -> Self {
        SecurityId(id)
    }
}

impl std::fmt::Display for SecurityId {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A tradable entity (bond, stock) that can have attributes plotted.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Security {
    pub id: SecurityId,
    pub label: String,
    /// Host domain fields we carry around but never interpret
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
}

impl Security {
    pub fn new(id: impl Into<SecurityId>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            metadata: BTreeMap::new(),
        }
    }
}

/// Optional hard limits for the value axis an attribute lands on.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Default)]
pub struct AxisBounds {
    pub floor: Option<f64>,
    pub ceiling: Option<f64>,
}

/// A named observable quantity of a security (price, volume, return, rating...).
///
/// Two attributes are the same *plot* when their tags match, but duplicate
/// detection compares every field: hosts attach per-call metadata and a changed
/// attribute with a known tag is treated as a refresh, not a no-op.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Attribute {
    pub tag: String,
    pub label: String,
    pub unit: Option<String>,
    pub y_axis: Option<AxisBounds>,
    /// Maps numeric rating notches back to labels (1 -> "AAA", ...)
    pub num_to_rating: Option<BTreeMap<i64, String>>,
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
}

impl Attribute {
    pub fn new(tag: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            label: label.into(),
            unit: None,
            y_axis: None,
            num_to_rating: None,
            metadata: BTreeMap::new(),
        }
    }

    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    pub fn with_bounds(mut self, floor: Option<f64>, ceiling: Option<f64>) -> Self {
        self.y_axis = Some(AxisBounds { floor, ceiling });
        self
    }

    /// The label used to group series onto a shared value axis.
    pub fn axis_type(&self) -> &str {
        self.unit.as_deref().unwrap_or(&self.label)
    }

    /// Rating label for a plotted value, when this attribute carries a rating scale.
    pub fn rating_for(&self, value: f64) -> Option<&str> {
        let scale = self.num_to_rating.as_ref()?;
        if !value.is_finite() {
            return None;
        }
        scale.get(&(value.round() as i64)).map(String::as_str)
    }
}
