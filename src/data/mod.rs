// Data sources and session persistence
pub mod demo;
pub mod session_file;
pub mod source;

// Re-export commonly used types
pub use demo::DemoDataSource;
pub use session_file::SessionFile;
pub use source::{DataSource, FetchError, FetchOptions, FetchResult, FetchedSeries};
