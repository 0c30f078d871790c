//! Date-indexed tabular view of the plotted series, for spreadsheet-style export.

use serde::Serialize;

/// One row per distinct timestamp, one cell per series.
#[derive(Serialize, Debug, Clone, PartialEq, Default)]
pub struct TableModel {
    /// Series names, in chart order
    pub headers: Vec<String>,
    pub rows: Vec<TableRow>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct TableRow {
    pub timestamp_ms: i64,
    /// `YYYY-MM-DD` (UTC)
    pub date: String,
    /// `None` where the series has no (finite) value at this timestamp
    pub cells: Vec<Option<f64>>,
}

impl TableModel {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The column for a header, if present.
    pub fn column(&self, header: &str) -> Option<Vec<Option<f64>>> {
        let idx = self.headers.iter().position(|h| h == header)?;
        Some(
            self.rows
                .iter()
                .map(|r| r.cells.get(idx).copied().flatten())
                .collect(),
        )
    }
}
