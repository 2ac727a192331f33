//! Error types for the log pipeline

use std::sync::Arc;

pub type Result<T> = std::result::Result<T, LoggerError>;

/// Fallback diagnostic channel for failures that must never reach the caller of `log`.
pub type ErrorHandler = Arc<dyn Fn(&LoggerError) + Send + Sync>;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// IO error with context
    #[error("IO error while {operation}: {message}")]
    IoOperation {
        operation: String,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Invalid configuration with details
    #[error("Invalid configuration for {component}: {message}")]
    InvalidConfiguration { component: String, message: String },

    /// A sink failed synchronously while a record was being delivered
    #[error("Delivery to sink '{sink}' failed: {message}")]
    Delivery { sink: String, message: String },

    /// File lock error
    #[error("Failed to acquire file lock on '{path}'")]
    FileLockError { path: String },

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl LoggerError {
    /// Create an IO operation error with context
    pub fn io_operation(
        operation: impl Into<String>,
        message: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        LoggerError::IoOperation {
            operation: operation.into(),
            message: message.into(),
            source,
        }
    }

    /// Create an invalid configuration error
    pub fn config(component: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::InvalidConfiguration {
            component: component.into(),
            message: message.into(),
        }
    }

    /// Create a delivery error
    pub fn delivery(sink: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::Delivery {
            sink: sink.into(),
            message: message.into(),
        }
    }

    /// Create a file lock error
    pub fn file_lock(path: impl Into<String>) -> Self {
        LoggerError::FileLockError { path: path.into() }
    }

    /// Create a generic error
    pub fn other<S: Into<String>>(msg: S) -> Self {
        LoggerError::Other(msg.into())
    }

    /// Whether this error was raised while building a sink rather than while delivering
    pub fn is_configuration(&self) -> bool {
        matches!(self, LoggerError::InvalidConfiguration { .. })
    }
}

/// The default fallback channel: one line on stderr per failure.
pub fn stderr_handler() -> ErrorHandler {
    Arc::new(|err: &LoggerError| {
        eprintln!("[LOGGER ERROR] {}", err);
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = LoggerError::config("FileSink", "missing options");
        assert!(matches!(err, LoggerError::InvalidConfiguration { .. }));
        assert!(err.is_configuration());

        let err = LoggerError::delivery("console", "broken pipe");
        assert!(matches!(err, LoggerError::Delivery { .. }));
        assert!(!err.is_configuration());

        let err = LoggerError::file_lock("/var/log/app.log");
        assert!(matches!(err, LoggerError::FileLockError { .. }));
    }

    #[test]
    fn test_error_display() {
        let err = LoggerError::config("FileSink", "filename must not be empty");
        assert_eq!(
            err.to_string(),
            "Invalid configuration for FileSink: filename must not be empty"
        );

        let err = LoggerError::delivery("tee", "child vanished");
        assert_eq!(err.to_string(), "Delivery to sink 'tee' failed: child vanished");

        let err = LoggerError::file_lock("out.log");
        assert_eq!(err.to_string(), "Failed to acquire file lock on 'out.log'");
    }

    #[test]
    fn test_io_operation_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err = LoggerError::io_operation("appending log line", "cannot write to file", io_err);

        assert!(matches!(err, LoggerError::IoOperation { .. }));
        let source = std::error::Error::source(&err).expect("io source kept");
        assert_eq!(source.to_string(), "access denied");
        assert!(err.to_string().contains("appending log line"));
        assert!(err.to_string().contains("cannot write to file"));
    }
}
