//! Colored console sink implementation

use super::console::ConsoleStreams;
use crate::core::{Completion, Level, LogRecord, Result, Sink, TimestampFormat};
use colored::{Color, Colorize};
use std::io::Write;

/// Width the upper-cased level label is padded to (`WARNING` is the longest).
pub const LEVEL_WIDTH: usize = 7;

/// Display color of a level.
pub fn level_color(level: Level) -> Color {
    match level {
        Level::Error => Color::Red,
        Level::Warning => Color::Yellow,
        Level::Info => Color::Green,
        Level::Debug => Color::Cyan,
        Level::Trace => Color::BrightBlack,
    }
}

/// Console sink that renders timestamp, level, context and message as
/// separately styled segments. Structured fields, if any, trail the message.
pub struct ColoredConsoleSink {
    timestamp_format: TimestampFormat,
    streams: ConsoleStreams,
}

impl ColoredConsoleSink {
    pub fn new() -> Self {
        Self {
            timestamp_format: TimestampFormat::default(),
            streams: ConsoleStreams::stdio(),
        }
    }

    pub fn with_writers(out: Box<dyn Write + Send>, err: Box<dyn Write + Send>) -> Self {
        Self {
            timestamp_format: TimestampFormat::default(),
            streams: ConsoleStreams::new(out, err),
        }
    }

    /// Set the timestamp format for this sink
    ///
    /// # Examples
    ///
    /// ```
    /// use logpipe::sinks::ColoredConsoleSink;
    /// use logpipe::TimestampFormat;
    ///
    /// let sink = ColoredConsoleSink::new()
    ///     .with_timestamp_format(TimestampFormat::Custom("%H:%M:%S".to_string()));
    /// ```
    #[must_use]
    pub fn with_timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.timestamp_format = format;
        self
    }

    fn render(&self, record: &LogRecord) -> String {
        let timestamp = self.timestamp_format.format(&record.timestamp);
        let label = format!("{:<width$}", record.level.label(), width = LEVEL_WIDTH);

        let mut line = format!(
            "{} [{}] ",
            timestamp.dimmed(),
            label.color(level_color(record.level))
        );
        if !record.context.is_empty() {
            line.push_str(&format!("{} ", record.context.bold()));
        }
        line.push_str(&record.args.cook());
        if !record.vars.fields().is_empty() {
            line.push_str(&format!(" {}", record.vars.render_fields().dimmed()));
        }
        line.push('\n');
        line
    }
}

impl Default for ColoredConsoleSink {
    fn default() -> Self {
        Self::new()
    }
}

impl Sink for ColoredConsoleSink {
    fn deliver(&self, record: LogRecord, done: Completion) -> Result<()> {
        let line = self.render(&record);
        self.streams.write_line(record.level, &line)?;
        done.complete();
        Ok(())
    }

    fn name(&self) -> &str {
        "colored-console"
    }
}
