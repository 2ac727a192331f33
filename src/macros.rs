//! Logging macros for variadic argument lists.
//!
//! Every argument is converted with [`Arg::from`](crate::Arg), so strings,
//! numbers, booleans, options and JSON values can be mixed freely. An
//! optional vars expression before a `;` supplies the context and fields.
//!
//! # Examples
//!
//! ```
//! use logpipe::prelude::*;
//! use logpipe::{info, warning};
//!
//! let logger = Logger::new(NullSink);
//!
//! info!(logger, "server listening on port", 8080);
//! warning!(logger, "db"; "pool exhausted, waiting", 3, "ms");
//! ```

/// Build an [`Args`](crate::Args) list from heterogeneous values.
///
/// ```
/// let args = logpipe::args!("retry", 2, "of", 5, true);
/// assert_eq!(args.cook(), "retry 2 of 5 true");
/// ```
#[macro_export]
macro_rules! args {
    () => {
        $crate::Args::new()
    };
    ($($arg:expr),+ $(,)?) => {
        $crate::Args::from(vec![$($crate::Arg::from($arg)),+])
    };
}

/// Log at an explicit level.
///
/// ```
/// # use logpipe::prelude::*;
/// # let logger = Logger::new(NullSink);
/// use logpipe::log;
/// log!(logger, Level::Info, "simple message");
/// log!(logger, Level::Error, Vars::with_context("http"); "status", 500);
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $vars:expr; $($arg:expr),+ $(,)?) => {
        $crate::Log::log(&$logger, $level, $crate::Vars::from($vars), $crate::args!($($arg),+))
    };
    ($logger:expr, $level:expr, $($arg:expr),+ $(,)?) => {
        $crate::Log::log(&$logger, $level, $crate::Vars::new(), $crate::args!($($arg),+))
    };
}

/// Log an error-level record.
#[macro_export]
macro_rules! error {
    ($logger:expr, $vars:expr; $($arg:expr),+ $(,)?) => {
        $crate::log!($logger, $crate::Level::Error, $vars; $($arg),+)
    };
    ($logger:expr, $($arg:expr),+ $(,)?) => {
        $crate::log!($logger, $crate::Level::Error, $($arg),+)
    };
}

/// Log a warning-level record.
#[macro_export]
macro_rules! warning {
    ($logger:expr, $vars:expr; $($arg:expr),+ $(,)?) => {
        $crate::log!($logger, $crate::Level::Warning, $vars; $($arg),+)
    };
    ($logger:expr, $($arg:expr),+ $(,)?) => {
        $crate::log!($logger, $crate::Level::Warning, $($arg),+)
    };
}

/// Log an info-level record.
#[macro_export]
macro_rules! info {
    ($logger:expr, $vars:expr; $($arg:expr),+ $(,)?) => {
        $crate::log!($logger, $crate::Level::Info, $vars; $($arg),+)
    };
    ($logger:expr, $($arg:expr),+ $(,)?) => {
        $crate::log!($logger, $crate::Level::Info, $($arg),+)
    };
}

/// Log a debug-level record.
#[macro_export]
macro_rules! debug {
    ($logger:expr, $vars:expr; $($arg:expr),+ $(,)?) => {
        $crate::log!($logger, $crate::Level::Debug, $vars; $($arg),+)
    };
    ($logger:expr, $($arg:expr),+ $(,)?) => {
        $crate::log!($logger, $crate::Level::Debug, $($arg),+)
    };
}

/// Log a trace-level record.
#[macro_export]
macro_rules! trace {
    ($logger:expr, $vars:expr; $($arg:expr),+ $(,)?) => {
        $crate::log!($logger, $crate::Level::Trace, $vars; $($arg),+)
    };
    ($logger:expr, $($arg:expr),+ $(,)?) => {
        $crate::log!($logger, $crate::Level::Trace, $($arg),+)
    };
}
