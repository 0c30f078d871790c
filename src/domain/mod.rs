// Domain types and value objects
pub mod benchmark;
pub mod date_range;
pub mod security;

// Re-export commonly used types
pub use benchmark::{CdxIndex, ClientBenchmark, CustomBenchmark, MarketIndex};
pub use date_range::{DateRange, DateRangeError, TimePeriod};
pub use security::{Attribute, AxisBounds, Security, SecurityId};
