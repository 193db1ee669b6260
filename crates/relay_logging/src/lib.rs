#![deny(missing_docs)]
//! Shared logging utilities for the relay workspace.
//!
//! Every job logs through the `relay_*` macros. Each line is tagged with the
//! label of the job running on the current thread, so the four jobs can share
//! one log file and stay apart.

use std::cell::Cell;

thread_local! {
    /// Label of the job currently running on this thread.
    static JOB_LABEL: Cell<&'static str> = const { Cell::new("relay") };
}

/// Sets the job label for the current thread.
/// The app calls this once per job before any work starts.
pub fn set_job_label(label: &'static str) {
    JOB_LABEL.with(|v| v.set(label));
}

/// Returns the job label for the current thread, `"relay"` if unset.
pub fn job_label() -> &'static str {
    JOB_LABEL.with(|v| v.get())
}

/// Logs a trace-level message tagged with the current job label.
#[macro_export]
macro_rules! relay_trace {
    ($($arg:tt)*) => {{
        log::trace!("[{}] {}", $crate::job_label(), format_args!($($arg)*));
    }};
}

/// Logs a debug-level message tagged with the current job label.
#[macro_export]
macro_rules! relay_debug {
    ($($arg:tt)*) => {{
        log::debug!("[{}] {}", $crate::job_label(), format_args!($($arg)*));
    }};
}

/// Logs an info-level message tagged with the current job label.
#[macro_export]
macro_rules! relay_info {
    ($($arg:tt)*) => {{
        log::info!("[{}] {}", $crate::job_label(), format_args!($($arg)*));
    }};
}

/// Logs a warn-level message tagged with the current job label.
#[macro_export]
macro_rules! relay_warn {
    ($($arg:tt)*) => {{
        log::warn!("[{}] {}", $crate::job_label(), format_args!($($arg)*));
    }};
}

/// Logs an error-level message tagged with the current job label.
#[macro_export]
macro_rules! relay_error {
    ($($arg:tt)*) => {{
        log::error!("[{}] {}", $crate::job_label(), format_args!($($arg)*));
    }};
}

/// Initializes a terminal logger for tests.
///
/// Safe to call from every test; later calls are no-ops.
pub fn initialize_for_tests() {
    use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};

    let level = if cfg!(debug_assertions) {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    // Another test may already own the global logger.
    let _ = TermLogger::init(level, Config::default(), TerminalMode::Mixed, ColorChoice::Auto);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn job_label_defaults_and_can_be_replaced() {
        assert_eq!(job_label(), "relay");
        set_job_label("ticker");
        assert_eq!(job_label(), "ticker");
        relay_info!("label check {}", 1);
    }
}
