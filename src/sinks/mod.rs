//! Sink implementations

#[cfg(feature = "console")]
pub mod colored;
pub mod console;
#[cfg(feature = "file")]
pub mod file;
pub mod null;
pub mod tee;

#[cfg(feature = "console")]
pub use self::colored::ColoredConsoleSink;
pub use console::ConsoleSink;
#[cfg(feature = "file")]
pub use file::{FileSink, FileSinkOptions};
pub use null::{NullLogger, NullSink};
pub use tee::TeeSink;

// Re-export the capability for convenience
pub use crate::core::Sink;
