pub mod allocator;
mod controller;
pub mod core;
mod date_range;
pub mod error;
pub mod export;
mod fetch;
pub mod messages;
mod registry;
pub mod session;
pub mod state;
pub mod transformer;

#[cfg(test)]
pub(crate) mod testing;

// Re-export key components
pub use self::core::ChartEngine;
pub use error::ChartError;
pub use messages::{ChartNotification, FetchStatus};
pub use registry::palette_color;
pub use session::ChartSession;
pub use state::{Alerts, ChartState, SecurityBinding};
