//! # logpipe
//!
//! Queued, context-aware logging with pluggable sinks.
//!
//! A [`Logger`] accepts records from any thread, filters them, and drains
//! them in FIFO order into exactly one [`Sink`](core::Sink), never more than
//! one record in flight at a time. Sinks signal completion through a
//! [`Completion`](core::Completion) handle, so slow outputs such as files
//! never block the caller.
//!
//! ## Features
//!
//! - **Ordered delivery**: a per-logger queue drained one record at a time
//! - **Contexts**: decorators that stamp or append a context on every record
//! - **Sinks**: console, colored console, dated files, fan-out and null
//! - **Failure isolation**: sink errors and panics are reported, never raised
//!
//! ## Example
//!
//! ```
//! use logpipe::prelude::*;
//! use std::time::Duration;
//!
//! let logger = Logger::builder()
//!     .context("app")
//!     .min_level(Level::Info)
//!     .sink(ConsoleSink::new())
//!     .build();
//!
//! logger.info("service started");
//! logger.debug("filtered out");
//!
//! let db = logger.contextualize("db", true);
//! db.warning(vec![Arg::from("slow query"), Arg::from(1250)]);
//!
//! assert!(logger.flush_blocking(Duration::from_secs(5)));
//! ```

pub mod core;
pub mod macros;
pub mod sinks;

pub mod prelude {
    pub use crate::core::{
        Arg, Args, Completion, Contextualized, Dispatcher, ErrorHandler, Filter, Level, Log,
        LogRecord, Logger, LoggerBuilder, LoggerError, LoggerMetrics, ManualScheduler, MinLevel,
        Outcome, Result, Scheduler, Sink, TimestampFormat, Vars, DEFAULT_SHUTDOWN_TIMEOUT,
    };
    #[cfg(feature = "console")]
    pub use crate::sinks::ColoredConsoleSink;
    #[cfg(feature = "file")]
    pub use crate::sinks::{FileSink, FileSinkOptions};
    pub use crate::sinks::{ConsoleSink, NullLogger, NullSink, TeeSink};
}

pub use crate::core::{
    Arg, Args, Completion, Contextualized, Level, Log, LogRecord, Logger, LoggerBuilder,
    LoggerError, LoggerMetrics, Outcome, Result, Sink, TimestampFormat, Vars,
};
