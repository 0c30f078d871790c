// Plain data handed between the engine and the chart collaborator

pub mod axis;
pub mod series;
pub mod table;

// Re-export key types for convenience
pub use axis::{Axis, AxisId, AxisSpec};
pub use series::{ChartType, DataPoint, SeriesKey, SeriesRecord, SourceKind};
pub use table::{TableModel, TableRow};
