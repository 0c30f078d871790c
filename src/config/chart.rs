//! Chart behaviour configuration

/// User-facing messages surfaced through `Alerts`
#[derive(Debug, Clone, Copy)]
pub struct ChartMessages {
    pub empty_series: &'static str,
    pub missing_benchmark_fields: &'static str,
    pub invalid_start_date: &'static str,
    pub invalid_end_date: &'static str,
    pub inverted_date_range: &'static str,
}

/// The Master Chart Configuration
#[derive(Debug, Clone, Copy)]
pub struct ChartConfig {
    /// Title used when the host does not provide one
    pub default_title: &'static str,
    /// Presets offered in the date control (e.g. 3M, 2Y, 10M)
    pub default_time_periods: &'static [&'static str],
    /// Keep the axis created with the chart even when it runs out of series.
    /// When `false` every empty axis is removed, the primary one included.
    pub keep_primary_axis: bool,
    /// Anchor colors for the series palette (sampled along a gradient)
    pub series_palette: &'static [&'static str],
    /// Date label format for exported rows
    pub export_date_format: &'static str,
    pub messages: ChartMessages,
}

pub const CHART: ChartConfig = ChartConfig {
    default_title: "Untitled",
    default_time_periods: &["1M", "3M", "6M", "1Y", "2Y"],
    keep_primary_axis: false,
    series_palette: &[
        "#7cb5ec", // Light blue
        "#434348", // Charcoal
        "#90ed7d", // Light green
        "#f7a35c", // Orange
        "#8085e9", // Periwinkle
        "#f15c80", // Pink
        "#e4d354", // Mustard
        "#2b908f", // Teal
    ],
    export_date_format: "%Y-%m-%d",
    messages: ChartMessages {
        empty_series: "Added series contains no data!",
        missing_benchmark_fields: "Some fields are missing!",
        invalid_start_date: "Invalid start date",
        invalid_end_date: "Invalid end date",
        inverted_date_range: "Start date later than end date",
    },
};
