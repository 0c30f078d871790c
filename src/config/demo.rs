//! config/demo.rs Demo data source configuration knobs.
//!
//! The demo source synthesizes deterministic daily series so the CLI and the
//! tests can drive the engine without a real market data backend.

/// Static inputs for the demo session
pub struct DemoResources {
    /// Securities added when the CLI is run without `--securities`
    pub securities: &'static [(&'static str, &'static str)],
    /// Attribute tags understood by the demo source: (tag, label, unit)
    pub attributes: &'static [(&'static str, &'static str, &'static str)],
}

/// The Master Demo Configuration
pub struct DemoConfig {
    /// Days generated when no date range is active
    pub default_days: i64,
    /// Simulated latency for threaded fetches
    pub latency_ms: u64,
    pub resources: DemoResources,
}

pub const DEMO: DemoConfig = DemoConfig {
    default_days: 30,
    latency_ms: 25,

    resources: DemoResources {
        securities: &[("1", "T"), ("2", "VZ"), ("3", "GS")],
        attributes: &[
            ("price", "Price", "USD"),
            ("volume", "Volume", "Shares"),
            ("return", "Return", "%"),
            ("rating", "Rating", "Notch"),
        ],
    },
};
