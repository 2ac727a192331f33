//! The sink capability and its completion handle

use super::error::{LoggerError, Result};
use super::record::LogRecord;
use std::fmt;
use std::sync::Arc;

/// Performs the observable side effect of delivering one record.
///
/// A logger never has more than one `deliver` outstanding on its sink: the
/// next record is handed over only after `done` has fired. Sinks may fire
/// it before returning or later from another thread.
///
/// Returning an error drops the record; the logger reports it on its
/// fallback channel and keeps draining. Failures found after `deliver`
/// returns go through [`Completion::fail`].
pub trait Sink: Send + Sync {
    fn deliver(&self, record: LogRecord, done: Completion) -> Result<()>;

    fn name(&self) -> &str;
}

impl<S: Sink + ?Sized> Sink for Arc<S> {
    fn deliver(&self, record: LogRecord, done: Completion) -> Result<()> {
        (**self).deliver(record, done)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

impl<S: Sink + ?Sized> Sink for Box<S> {
    fn deliver(&self, record: LogRecord, done: Completion) -> Result<()> {
        (**self).deliver(record, done)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// How a delivery ended.
#[derive(Debug)]
pub enum Outcome {
    /// The sink performed its side effect.
    Delivered,
    /// The sink tried and failed; the error goes to the logger's error handler.
    Failed(LoggerError),
    /// The handle was dropped unfired: the sink errored out, panicked or
    /// simply let go of it.
    Abandoned,
}

impl Outcome {
    pub fn is_delivered(&self) -> bool {
        matches!(self, Outcome::Delivered)
    }
}

type OnDone = Box<dyn FnOnce(Outcome) + Send>;

/// One-shot completion signal for a single delivery.
///
/// Fires at most once. Dropping an unfired handle fires it with
/// [`Outcome::Abandoned`], so a sink that errors out or panics still
/// releases its logger's queue.
pub struct Completion {
    on_done: Option<OnDone>,
}

impl Completion {
    /// A handle whose callback does not care how the delivery ended.
    pub fn new<F>(on_done: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        Self::with_outcome(move |_| on_done())
    }

    pub fn with_outcome<F>(on_done: F) -> Self
    where
        F: FnOnce(Outcome) + Send + 'static,
    {
        Self {
            on_done: Some(Box::new(on_done)),
        }
    }

    /// A handle that does nothing when fired.
    pub fn noop() -> Self {
        Self { on_done: None }
    }

    pub fn complete(mut self) {
        self.fire(Outcome::Delivered);
    }

    /// Signal that the record was attempted and lost.
    pub fn fail(mut self, error: LoggerError) {
        self.fire(Outcome::Failed(error));
    }

    fn fire(&mut self, outcome: Outcome) {
        if let Some(on_done) = self.on_done.take() {
            on_done(outcome);
        }
    }
}

impl fmt::Debug for Completion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Completion")
            .field("pending", &self.on_done.is_some())
            .finish()
    }
}

impl Drop for Completion {
    fn drop(&mut self) {
        self.fire(Outcome::Abandoned);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_complete_fires_once() {
        let count = Arc::new(AtomicUsize::new(0));
        let c = Arc::clone(&count);
        let done = Completion::new(move || {
            c.fetch_add(1, Ordering::SeqCst);
        });
        done.complete();
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_drop_fires() {
        let count = Arc::new(AtomicUsize::new(0));
        let c = Arc::clone(&count);
        drop(Completion::new(move || {
            c.fetch_add(1, Ordering::SeqCst);
        }));
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_outcome_reaches_callback() {
        let seen = Arc::new(parking_lot::Mutex::new(Vec::new()));

        for i in 0..3 {
            let s = Arc::clone(&seen);
            let done = Completion::with_outcome(move |outcome| s.lock().push(outcome));
            match i {
                0 => done.complete(),
                1 => done.fail(LoggerError::other("disk full")),
                _ => drop(done),
            }
        }

        let seen = seen.lock();
        assert!(seen[0].is_delivered());
        assert!(matches!(&seen[1], Outcome::Failed(e) if e.to_string() == "disk full"));
        assert!(matches!(seen[2], Outcome::Abandoned));
    }

    #[test]
    fn test_noop_is_harmless() {
        Completion::noop().complete();
    }
}
