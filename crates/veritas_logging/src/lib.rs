#![deny(missing_docs)]
//! Shared logging utilities for the Veritas workspace.
//!
//! This crate provides the `veritas_*` logging macros used across the codebase
//! and a minimal test initializer for the global logger. Messages logged from a
//! thread that has a job context set are prefixed with `[job N]`.

use std::cell::Cell;

#[doc(hidden)]
pub use log;

thread_local! {
    /// Thread-local storage for the job key the current thread is working on.
    static JOB_CONTEXT: Cell<Option<u64>> = const { Cell::new(None) };
}

/// Sets (or clears) the job key used to prefix log lines on the current thread.
///
/// The app dispatch loop calls this after every state update so controller
/// logs can be correlated with engine logs for the same job.
pub fn set_job_context(key: Option<u64>) {
    JOB_CONTEXT.with(|v| v.set(key));
}

/// Retrieves the job key for the current thread, if one has been set.
pub fn job_context() -> Option<u64> {
    JOB_CONTEXT.with(|v| v.get())
}

/// Renders the prefix for the current thread's job context.
#[doc(hidden)]
pub fn context_prefix() -> String {
    match job_context() {
        Some(key) => format!("[job {key}] "),
        None => String::new(),
    }
}

/// Logs a trace-level message using the global logging facade.
#[macro_export]
macro_rules! veritas_trace {
    ($($arg:tt)*) => {{
        $crate::log::trace!("{}{}", $crate::context_prefix(), format_args!($($arg)*));
    }};
}

/// Logs an info-level message using the global logging facade.
#[macro_export]
macro_rules! veritas_info {
    ($($arg:tt)*) => {{
        $crate::log::info!("{}{}", $crate::context_prefix(), format_args!($($arg)*));
    }};
}

/// Logs a debug-level message using the global logging facade.
#[macro_export]
macro_rules! veritas_debug {
    ($($arg:tt)*) => {{
        $crate::log::debug!("{}{}", $crate::context_prefix(), format_args!($($arg)*));
    }};
}

/// Logs a warn-level message using the global logging facade.
#[macro_export]
macro_rules! veritas_warn {
    ($($arg:tt)*) => {{
        $crate::log::warn!("{}{}", $crate::context_prefix(), format_args!($($arg)*));
    }};
}

/// Logs an error-level message using the global logging facade.
#[macro_export]
macro_rules! veritas_error {
    ($($arg:tt)*) => {{
        $crate::log::error!("{}{}", $crate::context_prefix(), format_args!($($arg)*));
    }};
}

/// Initializes a simple terminal logger for use in tests.
///
/// This safely no-ops if another logger has already been initialized.
pub fn initialize_for_tests() {
    use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};

    let level = if cfg!(debug_assertions) {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    // Another test in the same binary may have won the race.
    let _ = TermLogger::init(level, Config::default(), TerminalMode::Mixed, ColorChoice::Auto);
}
