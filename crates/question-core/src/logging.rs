//! Logging targets.
//!
//! The question crates use the `tracing` crate for instrumentation and never
//! install a subscriber themselves. To see logs, install one in the host
//! application:
//!
//! ```ignore
//! tracing_subscriber::fmt()
//!     .with_env_filter("question_ui::buttons=debug,question_core=trace")
//!     .init();
//! ```
//!
//! Per-tick detail is logged at `trace`, visibility state changes at `debug`,
//! and internal inconsistencies that were skipped rather than propagated at
//! `warn`.

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Core crate target.
    pub const CORE: &str = "question_core";
    /// Element tree target.
    pub const ELEMENT: &str = "question_core::element";
    /// Timer queue and clock target.
    pub const TIMER: &str = "question_core::timer";
    /// Signal/slot target.
    pub const SIGNAL: &str = "question_core::signal";
}
