//! File sink implementation
//!
//! Each record becomes one tab-separated line appended to a file whose name
//! is resolved per record from a template:
//!
//! ```text
//! <ISO-8601 timestamp>\t<level>\t<escaped context>\t<escaped message>\r\n
//! ```
//!
//! Appends run on the sink's I/O scheduler; the completion fires after each
//! append whether or not it succeeded. A failed append completes with
//! [`Outcome::Failed`](crate::core::Outcome), which the owning logger counts
//! and reports; nothing is raised back to the caller.

use crate::core::{
    escape_line, Completion, DatePattern, Dispatcher, ErrorHandler, LogRecord, LoggerError,
    Result, Scheduler, Sink, TimestampFormat,
};
use chrono::{DateTime, Utc};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub const DATE_TOKEN: &str = "__DATE__";
pub const PREFIX_TOKEN: &str = "__PREFIX__";

/// Construction options, deserializable from `{"filename": ..., "filenameDateFormat": ...,
/// "prefix": ..., "encoding": ...}`. Missing keys take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FileSinkOptions {
    /// Target file name; may contain `__DATE__` and `__PREFIX__`
    pub filename: String,
    /// Pattern used to render `__DATE__`
    pub filename_date_format: String,
    /// Value substituted for `__PREFIX__`
    pub prefix: String,
    /// Advisory; lines are always written as UTF-8
    pub encoding: String,
}

impl Default for FileSinkOptions {
    fn default() -> Self {
        Self {
            filename: "output.log".to_string(),
            filename_date_format: "yyyymmdd".to_string(),
            prefix: String::new(),
            encoding: "UTF-8".to_string(),
        }
    }
}

impl FileSinkOptions {
    #[must_use]
    pub fn filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = filename.into();
        self
    }

    #[must_use]
    pub fn date_format(mut self, pattern: impl Into<String>) -> Self {
        self.filename_date_format = pattern.into();
        self
    }

    #[must_use]
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }
}

pub struct FileSink {
    filename: String,
    date_pattern: DatePattern,
    prefix: String,
    encoding: String,
    io: Arc<dyn Scheduler>,
    on_error: Option<ErrorHandler>,
}

impl FileSink {
    /// Build from validated options. Appends run on a dedicated I/O thread.
    pub fn new(options: FileSinkOptions) -> Result<Self> {
        if options.filename.is_empty() {
            return Err(LoggerError::config("FileSink", "filename must not be empty"));
        }
        let date_pattern = DatePattern::parse(&options.filename_date_format)?;

        Ok(Self {
            filename: options.filename,
            date_pattern,
            prefix: options.prefix,
            encoding: options.encoding,
            io: Arc::new(Dispatcher::new()),
            on_error: None,
        })
    }

    /// Options are required; `None` is a configuration error.
    pub fn from_options(options: Option<FileSinkOptions>) -> Result<Self> {
        match options {
            Some(options) => Self::new(options),
            None => Err(LoggerError::config("FileSink", "options are required")),
        }
    }

    /// Build from a JSON options object.
    ///
    /// # Example
    ///
    /// ```
    /// use logpipe::sinks::FileSink;
    /// use serde_json::json;
    ///
    /// let sink = FileSink::from_json(json!({"filename": "app-__DATE__.log"})).unwrap();
    /// assert_eq!(sink.date_pattern(), "yyyymmdd");
    /// assert!(FileSink::from_json(json!(null)).is_err());
    /// ```
    pub fn from_json(value: serde_json::Value) -> Result<Self> {
        if !value.is_object() {
            return Err(LoggerError::config("FileSink", "options must be a JSON object"));
        }
        let options: FileSinkOptions = serde_json::from_value(value)
            .map_err(|e| LoggerError::config("FileSink", e.to_string()))?;
        Self::new(options)
    }

    /// Run appends on `io` instead of the sink's own thread
    #[must_use]
    pub fn with_scheduler(mut self, io: Arc<dyn Scheduler>) -> Self {
        self.io = io;
        self
    }

    /// Extra observer for append failures, called before the completion
    /// hands the error to the owning logger
    #[must_use]
    pub fn with_error_handler(mut self, handler: ErrorHandler) -> Self {
        self.on_error = Some(handler);
        self
    }

    pub fn date_pattern(&self) -> &str {
        self.date_pattern.as_str()
    }

    pub fn encoding(&self) -> &str {
        &self.encoding
    }

    /// Substitute `__DATE__` and `__PREFIX__` in the filename template.
    pub fn resolve_path(&self, timestamp: &DateTime<Utc>) -> PathBuf {
        let name = self
            .filename
            .replace(DATE_TOKEN, &self.date_pattern.format(timestamp))
            .replace(PREFIX_TOKEN, &self.prefix);
        PathBuf::from(name)
    }

    pub fn format_line(record: &LogRecord) -> String {
        format!(
            "{}\t{}\t{}\t{}\r\n",
            TimestampFormat::Iso8601.format(&record.timestamp),
            record.level.as_str(),
            escape_line(&record.context),
            escape_line(&record.args.cook())
        )
    }
}

fn append_line(path: &Path, line: &str) -> Result<()> {
    let display = path.display().to_string();
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| {
            LoggerError::io_operation(format!("opening '{}'", display), "cannot open log file", e)
        })?;

    FileExt::lock_exclusive(&file)
        .map_err(|_| LoggerError::file_lock(display.as_str()))?;

    let written = file.write_all(line.as_bytes()).map_err(|e| {
        LoggerError::io_operation(format!("appending to '{}'", display), "write failed", e)
    });

    // Lock is released when the file closes even if this fails
    let _ = FileExt::unlock(&file);
    written
}

impl Sink for FileSink {
    fn deliver(&self, record: LogRecord, done: Completion) -> Result<()> {
        let path = self.resolve_path(&record.timestamp);
        let line = Self::format_line(&record);
        let on_error = self.on_error.clone();

        self.io.defer(Box::new(move || match append_line(&path, &line) {
            Ok(()) => done.complete(),
            Err(e) => {
                if let Some(on_error) = on_error {
                    on_error(&e);
                }
                done.fail(e);
            }
        }));
        Ok(())
    }

    fn name(&self) -> &str {
        "file"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Arg, Args, Level, ManualScheduler, Outcome, Vars};
    use chrono::TimeZone;
    use parking_lot::Mutex;
    use tempfile::TempDir;

    fn new_year() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 8, 30, 0)
            .single()
            .expect("valid datetime")
    }

    #[test]
    fn test_missing_options_is_configuration_error() {
        let err = FileSink::from_options(None).err().expect("must fail");
        assert!(err.is_configuration());
        assert!(FileSink::from_json(serde_json::Value::Null).is_err());
        assert!(FileSink::new(FileSinkOptions::default().filename("")).is_err());
        assert!(FileSink::new(FileSinkOptions::default().date_format("")).is_err());
    }

    #[test]
    fn test_defaults() {
        let options: FileSinkOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(options, FileSinkOptions::default());
        let sink = FileSink::new(options).unwrap();
        assert_eq!(sink.encoding(), "UTF-8");
        assert_eq!(sink.resolve_path(&new_year()), PathBuf::from("output.log"));
    }

    #[test]
    fn test_resolves_template_tokens() {
        let sink = FileSink::from_json(serde_json::json!({
            "filename": "log-__DATE__-__PREFIX__.txt",
            "prefix": "svc"
        }))
        .unwrap();

        assert_eq!(
            sink.resolve_path(&new_year()),
            PathBuf::from("log-20240101-svc.txt")
        );
    }

    #[test]
    fn test_line_layout() {
        let args: Args = vec![Arg::from("a\tb"), Arg::from("c\nd\\e")].into();
        let record = LogRecord::at(new_year(), Level::Warning, Vars::new(), args, "db");

        assert_eq!(
            FileSink::format_line(&record),
            "2024-01-01T08:30:00.000Z\twarning\tdb\ta\\tb c\\nd\\\\e\r\n"
        );
    }

    #[test]
    fn test_context_cannot_forge_fields_or_lines() {
        let vars = Vars::with_context("evil\tctx\r\nforged");
        let record = LogRecord::at(new_year(), Level::Info, vars, "msg".into(), "");

        let line = FileSink::format_line(&record);
        assert_eq!(
            line,
            "2024-01-01T08:30:00.000Z\tinfo\tevil\\tctx\\r\\nforged\tmsg\r\n"
        );
        assert_eq!(line.matches('\t').count(), 3);
        assert_eq!(line.matches('\n').count(), 1);
    }

    #[test]
    fn test_append_is_deferred_and_completes() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let template = dir.path().join("app-__PREFIX__.log");
        let io = Arc::new(ManualScheduler::new());
        let sink = FileSink::new(
            FileSinkOptions::default()
                .filename(template.to_string_lossy())
                .prefix("x"),
        )
        .unwrap()
        .with_scheduler(io.clone());

        let fired = Arc::new(Mutex::new(false));
        let f = Arc::clone(&fired);
        let record = LogRecord::new(Level::Info, Vars::new(), "hello".into(), "");
        sink.deliver(record, Completion::new(move || *f.lock() = true))
            .unwrap();

        let target = dir.path().join("app-x.log");
        assert!(!*fired.lock());
        assert!(!target.exists());

        io.run_until_idle();
        assert!(*fired.lock());
        let content = std::fs::read_to_string(&target).unwrap();
        assert!(content.ends_with("\tinfo\t\thello\r\n"));
    }

    #[test]
    fn test_append_failure_is_reported_and_still_completes() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let missing = dir.path().join("no-such-dir").join("out.log");
        let io = Arc::new(ManualScheduler::new());
        let errors = Arc::new(Mutex::new(Vec::new()));
        let errors_clone = Arc::clone(&errors);

        let sink = FileSink::new(FileSinkOptions::default().filename(missing.to_string_lossy()))
            .unwrap()
            .with_scheduler(io.clone())
            .with_error_handler(Arc::new(move |e: &LoggerError| {
                errors_clone.lock().push(e.to_string())
            }));

        let outcome = Arc::new(Mutex::new(None));
        let o = Arc::clone(&outcome);
        let record = LogRecord::new(Level::Error, Vars::new(), "lost".into(), "");
        assert!(sink
            .deliver(record, Completion::with_outcome(move |r| *o.lock() = Some(r)))
            .is_ok());

        io.run_until_idle();
        assert!(matches!(
            outcome.lock().take(),
            Some(Outcome::Failed(e)) if e.to_string().contains("cannot open log file")
        ));
        assert_eq!(errors.lock().len(), 1);
        assert!(errors.lock()[0].contains("cannot open log file"));
    }
}
