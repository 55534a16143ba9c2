//! Logger setup and search-tracing macros.
//!
//! Diagnostics go to stderr through `env_logger`; results go to stdout and are
//! never mixed in. The tracing macros sit inside the recursive search, so they
//! compile to nothing in release builds.

use env_logger::Env;

/// Installs the global logger. `RUST_LOG` takes precedence over `verbose`.
///
/// # Panics
/// If a logger is already installed.
pub fn init(verbose: bool) {
    builder(verbose).init();
}

fn builder(verbose: bool) -> env_logger::Builder {
    let default_level = if verbose { "debug" } else { "info" };
    let mut builder = env_logger::Builder::from_env(Env::default().default_filter_or(default_level));
    builder.format_timestamp(None).format_target(false);
    builder
}

#[cfg(debug_assertions)]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        log::debug!($($arg)*);
    };
}

#[cfg(not(debug_assertions))]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {{}};
}

#[cfg(debug_assertions)]
#[macro_export]
macro_rules! trace_log {
    ($($arg:tt)*) => {
        log::trace!($($arg)*);
    };
}

#[cfg(not(debug_assertions))]
#[macro_export]
macro_rules! trace_log {
    ($($arg:tt)*) => {{}};
}
