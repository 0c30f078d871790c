use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;

use crate::domain::{
    Attribute, AxisBounds, CdxIndex, ClientBenchmark, CustomBenchmark, SecurityId,
};
use crate::models::axis::AxisId;

/// A single plotted sample.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct DataPoint {
    /// Unix timestamp in milliseconds.
    pub timestamp_ms: i64,
    pub value: f64,
}

impl From<(i64, f64)> for DataPoint {
    fn from((timestamp_ms, value): (i64, f64)) -> Self {
        Self {
            timestamp_ms,
            value,
        }
    }
}

/// Where a series comes from. Drives removal bookkeeping.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, strum_macros::Display, strum_macros::EnumIter,
)]
pub enum SourceKind {
    Security,
    MarketIndex,
    CustomBenchmark,
    ClientBenchmark,
    CdxIndex,
    Derived,
}

/// How the collaborator should draw a series.
#[derive(
    Serialize,
    Deserialize,
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    strum_macros::Display,
    strum_macros::EnumIter,
)]
pub enum ChartType {
    #[default]
    Line,
    Area,
    Column,
}

impl ChartType {
    /// The types a user can switch to from this one.
    pub fn alternatives(self) -> Vec<ChartType> {
        ChartType::iter().filter(|t| *t != self).collect()
    }
}

/// Structured identity of a plotted series.
///
/// Compared and hashed by value. `Display` renders the dotted legacy form
/// (`Security.<id>.<tag>`) for logs and legends only; two keys whose dotted
/// forms collide are still different series.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SeriesKey {
    Security {
        security_id: SecurityId,
        attr_tag: String,
    },
    MarketIndex {
        tag: String,
    },
    CustomBenchmark {
        sector: String,
        rating: String,
        wal: String,
        analytic_tag: String,
    },
    ClientBenchmark {
        benchmark_id: String,
        analytic_tag: String,
    },
    CdxIndex {
        index: String,
        tenor: String,
        analytic_tag: String,
    },
    SimpleMovingAverage {
        source: Box<SeriesKey>,
        window: usize,
    },
    Basis {
        source: Box<SeriesKey>,
        other: Box<SeriesKey>,
    },
}

impl SeriesKey {
    pub fn security(security_id: &SecurityId, attr_tag: &str) -> Self {
        SeriesKey::Security {
            security_id: security_id.clone(),
            attr_tag: attr_tag.to_string(),
        }
    }

    pub fn market_index(tag: &str) -> Self {
        SeriesKey::MarketIndex {
            tag: tag.to_string(),
        }
    }

    pub fn custom_benchmark(benchmark: &CustomBenchmark) -> Self {
        SeriesKey::CustomBenchmark {
            sector: field(&benchmark.sector),
            rating: field(&benchmark.rating),
            wal: field(&benchmark.wal),
            analytic_tag: analytic_tag(&benchmark.analytic),
        }
    }

    pub fn client_benchmark(benchmark: &ClientBenchmark) -> Self {
        SeriesKey::ClientBenchmark {
            benchmark_id: field(&benchmark.id),
            analytic_tag: analytic_tag(&benchmark.analytic),
        }
    }

    pub fn cdx_index(index: &CdxIndex) -> Self {
        SeriesKey::CdxIndex {
            index: field(&index.index),
            tenor: field(&index.tenor),
            analytic_tag: analytic_tag(&index.analytic),
        }
    }

    /// Build a source key from its kind and ordered key fields.
    /// Returns `None` for derived kinds or when the field count is wrong.
    pub fn from_parts(kind: SourceKind, parts: &[&str]) -> Option<Self> {
        let owned: Vec<String> = parts.iter().map(|p| p.to_string()).collect();
        match (kind, owned.as_slice()) {
            (SourceKind::Security, [security_id, attr_tag]) => Some(SeriesKey::Security {
                security_id: SecurityId(security_id.clone()),
                attr_tag: attr_tag.clone(),
            }),
            (SourceKind::MarketIndex, [tag]) => Some(SeriesKey::MarketIndex { tag: tag.clone() }),
            (SourceKind::CustomBenchmark, [sector, rating, wal, analytic_tag]) => {
                Some(SeriesKey::CustomBenchmark {
                    sector: sector.clone(),
                    rating: rating.clone(),
                    wal: wal.clone(),
                    analytic_tag: analytic_tag.clone(),
                })
            }
            (SourceKind::ClientBenchmark, [benchmark_id, analytic_tag]) => {
                Some(SeriesKey::ClientBenchmark {
                    benchmark_id: benchmark_id.clone(),
                    analytic_tag: analytic_tag.clone(),
                })
            }
            (SourceKind::CdxIndex, [index, tenor, analytic_tag]) => Some(SeriesKey::CdxIndex {
                index: index.clone(),
                tenor: tenor.clone(),
                analytic_tag: analytic_tag.clone(),
            }),
            _ => None,
        }
    }

    pub fn source_kind(&self) -> SourceKind {
        match self {
            SeriesKey::Security { .. } => SourceKind::Security,
            SeriesKey::MarketIndex { .. } => SourceKind::MarketIndex,
            SeriesKey::CustomBenchmark { .. } => SourceKind::CustomBenchmark,
            SeriesKey::ClientBenchmark { .. } => SourceKind::ClientBenchmark,
            SeriesKey::CdxIndex { .. } => SourceKind::CdxIndex,
            SeriesKey::SimpleMovingAverage { .. } | SeriesKey::Basis { .. } => SourceKind::Derived,
        }
    }

    pub fn is_derived(&self) -> bool {
        self.source_kind() == SourceKind::Derived
    }

    /// Ordered key fields, without the kind tag.
    pub fn parts(&self) -> Vec<String> {
        match self {
            SeriesKey::Security {
                security_id,
                attr_tag,
            } => vec![security_id.to_string(), attr_tag.clone()],
            SeriesKey::MarketIndex { tag } => vec![tag.clone()],
            SeriesKey::CustomBenchmark {
                sector,
                rating,
                wal,
                analytic_tag,
            } => vec![
                sector.clone(),
                rating.clone(),
                wal.clone(),
                analytic_tag.clone(),
            ],
            SeriesKey::ClientBenchmark {
                benchmark_id,
                analytic_tag,
            } => vec![benchmark_id.clone(), analytic_tag.clone()],
            SeriesKey::CdxIndex {
                index,
                tenor,
                analytic_tag,
            } => vec![index.clone(), tenor.clone(), analytic_tag.clone()],
            SeriesKey::SimpleMovingAverage { source, window } => {
                vec![source.to_string(), format!("{}DaySMA", window)]
            }
            SeriesKey::Basis { source, other } => {
                vec![source.to_string(), "basisVs".to_string(), other.to_string()]
            }
        }
    }
}

fn field(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

fn analytic_tag(analytic: &Option<Attribute>) -> String {
    analytic.as_ref().map(|a| a.tag.clone()).unwrap_or_default()
}

impl std::fmt::Display for SeriesKey {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        if self.is_derived() {
            write!(f, "{}", self.parts().join("."))
        } else {
            write!(f, "{}.{}", self.source_kind(), self.parts().join("."))
        }
    }
}

/// One plotted line, as handed to the chart collaborator.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesRecord {
    pub id: SeriesKey,
    pub name: String,
    pub data: Vec<DataPoint>,
    /// Label used to group series onto a shared axis
    pub axis_type: Option<String>,
    pub security_id: Option<SecurityId>,
    /// Limits applied when this series has to open a new axis
    pub axis_bounds: Option<AxisBounds>,
    pub color: Option<String>,
    pub chart_type: ChartType,
    /// Set on derived series: no SMA of an SMA.
    pub disable_further_transformation: bool,
    /// Axis the series sits on. Pre-set to force placement (axis moves).
    pub y_axis: Option<AxisId>,
}

impl SeriesRecord {
    pub fn new(id: SeriesKey, name: impl Into<String>, data: Vec<DataPoint>) -> Self {
        Self {
            id,
            name: name.into(),
            data,
            axis_type: None,
            security_id: None,
            axis_bounds: None,
            color: None,
            chart_type: ChartType::default(),
            disable_further_transformation: false,
            y_axis: None,
        }
    }

    pub fn with_axis_type(mut self, axis_type: impl Into<String>) -> Self {
        self.axis_type = Some(axis_type.into());
        self
    }

    pub fn with_security(mut self, security_id: SecurityId) -> Self {
        self.security_id = Some(security_id);
        self
    }

    pub fn source_kind(&self) -> SourceKind {
        self.id.source_kind()
    }

    pub fn values(&self) -> Vec<f64> {
        self.data.iter().map(|p| p.value).collect()
    }
}
