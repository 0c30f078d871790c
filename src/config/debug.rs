//! Debugging feature flags.
//!
//! Toggle individual diagnostics here; keep them `false` by default so release
//! builds remain quiet. All of them are further gated by `cfg(debug_assertions)`.

pub struct DebugFlags {
    /// Emit a line for every series inserted, updated or removed.
    pub print_series_events: bool,

    /// Emit axis creation / removal / move diagnostics.
    pub print_axis_events: bool,

    /// Emit fetch submission and completion details (including superseded fetches).
    pub print_fetch_events: bool,

    /// Emit the fan-out plan when the date range changes.
    pub print_date_range_refresh: bool,

    /// Emit session save/load details.
    pub print_session_serde: bool,
}

pub const DEBUG_FLAGS: DebugFlags = DebugFlags {
    print_series_events: false,
    print_axis_events: false,
    print_fetch_events: false,
    print_date_range_refresh: false,
    print_session_serde: false,
};
