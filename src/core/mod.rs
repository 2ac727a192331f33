//! Core pipeline types and traits

pub mod arg;
pub mod contextualized;
pub mod error;
pub mod filter;
pub mod format;
pub mod level;
pub mod logger;
pub mod metrics;
pub mod record;
pub mod scheduler;
pub mod sink;
pub mod time;
pub mod vars;

pub use arg::{cook_args, Arg, Args};
pub use contextualized::Contextualized;
pub use error::{stderr_handler, ErrorHandler, LoggerError, Result};
pub use filter::{AcceptAll, Filter, MinLevel};
pub use format::{escape_line, DefaultFormatter, Formatter};
pub use level::Level;
pub use logger::{FlushCallback, Log, Logger, LoggerBuilder};
pub use metrics::LoggerMetrics;
pub use record::LogRecord;
pub use scheduler::{Dispatcher, ManualScheduler, Scheduler, Task, DEFAULT_SHUTDOWN_TIMEOUT};
pub use sink::{Completion, Outcome, Sink};
pub use time::{DatePattern, TimestampFormat};
pub use vars::{FieldValue, Vars};
