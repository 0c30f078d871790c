//! File persistence and serialization configuration

/// Directory path for storing saved chart sessions
pub const SESSION_PATH: &str = "chart_sessions";

/// Base filename for session files (without extension)
pub const SESSION_FILENAME_WITHOUT_EXT: &str = "session";

/// Current version of the session serialization format
pub const SESSION_VERSION: f64 = 1.0;

/// Generate a session filename for a named session
/// Example: "session_rates_v1.bin"
pub fn session_filename(name: &str) -> String {
    format!(
        "{}_{}_v{}.bin",
        SESSION_FILENAME_WITHOUT_EXT, name, SESSION_VERSION
    )
}
