//! Configuration module for the chart engine.

pub mod chart;

mod debug; // Private: files use crate::config::DEBUG_FLAGS
pub use debug::DEBUG_FLAGS;

pub mod demo;
pub mod persistence;

// Re-export commonly used items
pub use chart::{CHART, ChartConfig, ChartMessages};
pub use demo::DEMO;
pub use persistence::{
    SESSION_FILENAME_WITHOUT_EXT, SESSION_PATH, SESSION_VERSION, session_filename,
};
