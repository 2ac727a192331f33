//! Discarding sink and logger

use crate::core::{Args, Completion, FlushCallback, Level, Log, LogRecord, Result, Sink, Vars};

/// Completes every delivery without doing anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl Sink for NullSink {
    #[inline]
    fn deliver(&self, _record: LogRecord, done: Completion) -> Result<()> {
        done.complete();
        Ok(())
    }

    fn name(&self) -> &str {
        "null"
    }
}

/// A logger whose every operation is a no-op: no queue, no filter, no output.
#[derive(Debug, Clone, Default)]
pub struct NullLogger {
    context: String,
}

impl NullLogger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_context(context: impl Into<String>) -> Self {
        Self {
            context: context.into(),
        }
    }
}

impl Log for NullLogger {
    #[inline]
    fn log(&self, _level: Level, _vars: Vars, _args: Args) {}

    fn default_context(&self) -> &str {
        &self.context
    }

    #[inline]
    fn ping(&self) {}

    fn flush(&self, done: FlushCallback) {
        done();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_null_sink_completes() {
        let fired = Arc::new(AtomicBool::new(false));
        let f = Arc::clone(&fired);
        let record = LogRecord::new(Level::Error, Vars::new(), "x".into(), "");
        NullSink
            .deliver(record, Completion::new(move || f.store(true, Ordering::SeqCst)))
            .unwrap();
        assert!(fired.load(Ordering::SeqCst));
    }

    #[test]
    fn test_null_logger_accepts_everything_silently() {
        let logger = NullLogger::with_context("quiet");
        logger.error("e");
        logger.warning("w");
        logger.info("i");
        logger.debug("d");
        logger.trace("t");
        logger.ping();

        let child = logger.contextualize("child", true);
        assert_eq!(child.context(), "quiet: child");
        child.info("still nothing");
        assert!(child.flush_blocking(std::time::Duration::from_millis(10)));
    }
}
