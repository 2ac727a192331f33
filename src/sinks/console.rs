//! Console sink implementation

use crate::core::{
    Completion, DefaultFormatter, Formatter, Level, LogRecord, LoggerError, Result, Sink,
};
use parking_lot::Mutex;
use std::io::{self, Write};
use std::sync::Arc;

/// The pair of streams console sinks write to.
///
/// Error and warning records go to the error stream, everything else to
/// the standard stream.
pub(crate) struct ConsoleStreams {
    out: Mutex<Box<dyn Write + Send>>,
    err: Mutex<Box<dyn Write + Send>>,
}

impl ConsoleStreams {
    pub(crate) fn stdio() -> Self {
        Self::new(Box::new(io::stdout()), Box::new(io::stderr()))
    }

    pub(crate) fn new(out: Box<dyn Write + Send>, err: Box<dyn Write + Send>) -> Self {
        Self {
            out: Mutex::new(out),
            err: Mutex::new(err),
        }
    }

    pub(crate) fn write_line(&self, level: Level, line: &str) -> Result<()> {
        let stream = if level.is_diagnostic() {
            &self.err
        } else {
            &self.out
        };
        let mut writer = stream.lock();
        writer
            .write_all(line.as_bytes())
            .and_then(|()| writer.flush())
            .map_err(|e| LoggerError::io_operation("writing to console", "console write failed", e))
    }
}

/// Prints each record as one formatted line and completes synchronously.
pub struct ConsoleSink {
    formatter: Arc<dyn Formatter>,
    streams: ConsoleStreams,
}

impl ConsoleSink {
    pub fn new() -> Self {
        Self {
            formatter: Arc::new(DefaultFormatter),
            streams: ConsoleStreams::stdio(),
        }
    }

    /// Write to arbitrary streams instead of stdout/stderr.
    ///
    /// # Example
    ///
    /// ```
    /// use logpipe::sinks::ConsoleSink;
    ///
    /// let sink = ConsoleSink::with_writers(Box::new(std::io::sink()), Box::new(std::io::sink()));
    /// ```
    pub fn with_writers(out: Box<dyn Write + Send>, err: Box<dyn Write + Send>) -> Self {
        Self {
            formatter: Arc::new(DefaultFormatter),
            streams: ConsoleStreams::new(out, err),
        }
    }

    /// Replace the line formatter
    #[must_use]
    pub fn with_formatter<F: Formatter + 'static>(mut self, formatter: F) -> Self {
        self.formatter = Arc::new(formatter);
        self
    }
}

impl Default for ConsoleSink {
    fn default() -> Self {
        Self::new()
    }
}

impl Sink for ConsoleSink {
    fn deliver(&self, record: LogRecord, done: Completion) -> Result<()> {
        let mut line = self.formatter.format(&record);
        line.push('\n');
        self.streams.write_line(record.level, &line)?;
        done.complete();
        Ok(())
    }

    fn name(&self) -> &str {
        "console"
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::core::{Arg, Args, Vars};

    #[derive(Clone, Default)]
    pub(crate) struct SharedBuffer(pub(crate) Arc<Mutex<Vec<u8>>>);

    impl SharedBuffer {
        pub(crate) fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock()).into_owned()
        }
    }

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn capture() -> (ConsoleSink, SharedBuffer, SharedBuffer) {
        let (out, err) = (SharedBuffer::default(), SharedBuffer::default());
        let sink = ConsoleSink::with_writers(Box::new(out.clone()), Box::new(err.clone()));
        (sink, out, err)
    }

    fn record(level: Level, args: Args) -> LogRecord {
        LogRecord::new(level, Vars::new(), args, "main")
    }

    #[test]
    fn test_routes_by_level() {
        let (sink, out, err) = capture();

        sink.deliver(record(Level::Info, "i".into()), Completion::noop()).unwrap();
        sink.deliver(record(Level::Debug, "d".into()), Completion::noop()).unwrap();
        sink.deliver(record(Level::Warning, "w".into()), Completion::noop()).unwrap();
        sink.deliver(record(Level::Error, "e".into()), Completion::noop()).unwrap();

        assert_eq!(out.contents(), "[info] (main) i\n[debug] (main) d\n");
        assert_eq!(err.contents(), "[warning] (main) w\n[error] (main) e\n");
    }

    #[test]
    fn test_completes_synchronously() {
        let (sink, _out, _err) = capture();
        let fired = Arc::new(Mutex::new(false));
        let f = Arc::clone(&fired);

        let args: Args = vec![Arg::from("x"), Arg::from(1)].into();
        sink.deliver(record(Level::Info, args), Completion::new(move || *f.lock() = true))
            .unwrap();

        assert!(*fired.lock());
    }

    #[test]
    fn test_custom_formatter() {
        let (sink, out, _err) = capture();
        let sink = sink.with_formatter(|r: &LogRecord| format!("{}|{}", r.context, r.message()));

        sink.deliver(record(Level::Trace, "t".into()), Completion::noop()).unwrap();

        assert_eq!(out.contents(), "main|t\n");
    }
}
