//! Main logger implementation
//!
//! A [`Logger`] owns a FIFO queue of records and drains it into exactly one
//! [`Sink`], one record at a time. The drain loop is a small state machine:
//!
//! - **Idle**: nothing in flight. `ping` pops the head of the queue, marks the
//!   logger busy and hands the record to the sink.
//! - **Busy**: one record is in flight. New records wait in the queue. When
//!   the sink's [`Completion`] fires, the logger turns idle again and, if
//!   records remain, defers the next pass to its [`Scheduler`].
//!
//! The next pass is never started on the stack that fired the completion,
//! which keeps stack depth bounded for sinks that complete synchronously.

use super::{
    arg::Args,
    contextualized::Contextualized,
    error::{stderr_handler, ErrorHandler, LoggerError},
    filter::{AcceptAll, Filter, MinLevel},
    level::Level,
    metrics::LoggerMetrics,
    record::LogRecord,
    scheduler::{describe_panic, Dispatcher, Scheduler},
    sink::{Completion, Outcome, Sink},
    vars::Vars,
};
use crossbeam_channel::bounded;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

pub type FlushCallback = Box<dyn FnOnce() + Send + 'static>;

/// The logging entry points shared by queued loggers, decorators and the null logger.
pub trait Log: Send + Sync {
    /// Submit one record. Never fails and never panics under normal operation.
    fn log(&self, level: Level, vars: Vars, args: Args);

    /// Context used for records whose vars carry none.
    fn default_context(&self) -> &str;

    /// Resume draining. Idempotent.
    fn ping(&self) {}

    /// Run `done` once everything queued so far has been handed off.
    fn flush(&self, done: FlushCallback) {
        done();
    }

    /// Block until [`flush`](Log::flush) fires or `timeout` elapses.
    ///
    /// Must not be called from the thread that drives this logger's scheduler.
    fn flush_blocking(&self, timeout: Duration) -> bool {
        let (tx, rx) = bounded(1);
        self.flush(Box::new(move || {
            let _ = tx.send(());
        }));
        rx.recv_timeout(timeout).is_ok()
    }

    #[inline]
    fn error<A: Into<Args>>(&self, args: A)
    where
        Self: Sized,
    {
        self.log(Level::Error, Vars::new(), args.into());
    }

    #[inline]
    fn warning<A: Into<Args>>(&self, args: A)
    where
        Self: Sized,
    {
        self.log(Level::Warning, Vars::new(), args.into());
    }

    #[inline]
    fn info<A: Into<Args>>(&self, args: A)
    where
        Self: Sized,
    {
        self.log(Level::Info, Vars::new(), args.into());
    }

    #[inline]
    fn debug<A: Into<Args>>(&self, args: A)
    where
        Self: Sized,
    {
        self.log(Level::Debug, Vars::new(), args.into());
    }

    #[inline]
    fn trace<A: Into<Args>>(&self, args: A)
    where
        Self: Sized,
    {
        self.log(Level::Trace, Vars::new(), args.into());
    }

    /// A decorator that stamps `context` on every record and forwards to `self`.
    ///
    /// With `append`, a non-empty default context of `self` is kept as a
    /// prefix: `"parent: context"`.
    fn contextualize(&self, context: &str, append: bool) -> Contextualized
    where
        Self: Clone + Sized + 'static,
    {
        Contextualized::new(Arc::new(self.clone()), context, append)
    }
}

impl<L: Log + ?Sized> Log for Arc<L> {
    fn log(&self, level: Level, vars: Vars, args: Args) {
        (**self).log(level, vars, args)
    }

    fn default_context(&self) -> &str {
        (**self).default_context()
    }

    fn ping(&self) {
        (**self).ping()
    }

    fn flush(&self, done: FlushCallback) {
        (**self).flush(done)
    }
}

impl<L: Log + ?Sized> Log for &L {
    fn log(&self, level: Level, vars: Vars, args: Args) {
        (**self).log(level, vars, args)
    }

    fn default_context(&self) -> &str {
        (**self).default_context()
    }

    fn ping(&self) {
        (**self).ping()
    }

    fn flush(&self, done: FlushCallback) {
        (**self).flush(done)
    }
}

#[derive(Default)]
struct DrainState {
    queue: VecDeque<LogRecord>,
    busy: bool,
    flush_waiters: Vec<FlushCallback>,
}

struct LoggerCore {
    default_context: String,
    sink: Box<dyn Sink>,
    filter: Box<dyn Filter>,
    use_queue: bool,
    scheduler: Arc<dyn Scheduler>,
    on_error: ErrorHandler,
    metrics: LoggerMetrics,
    state: Mutex<DrainState>,
}

impl LoggerCore {
    fn ping(core: &Arc<LoggerCore>) {
        let record = {
            let mut state = core.state.lock();
            if state.busy {
                return;
            }
            match state.queue.pop_front() {
                Some(record) => {
                    state.busy = true;
                    record
                }
                None => return,
            }
        };

        core.dispatch(record, LoggerCore::completion(core, true));
    }

    /// The handle given to the sink. Metrics follow its outcome; queued
    /// deliveries also release the drain loop when it fires.
    fn completion(core: &Arc<LoggerCore>, queued: bool) -> Completion {
        let owner = Arc::clone(core);
        Completion::with_outcome(move |outcome| {
            owner.account(outcome);
            if queued {
                LoggerCore::finish(&owner);
            }
        })
    }

    fn account(&self, outcome: Outcome) {
        match outcome {
            Outcome::Delivered => {
                self.metrics.record_delivered();
            }
            Outcome::Failed(e) => {
                self.metrics.record_failed();
                (self.on_error)(&e);
            }
            // Whatever made the sink let go was reported by `dispatch`
            Outcome::Abandoned => {
                self.metrics.record_failed();
            }
        }
    }

    /// Completion path: Busy -> Idle, then schedule the next pass if needed.
    fn finish(core: &Arc<LoggerCore>) {
        let (more, waiters) = {
            let mut state = core.state.lock();
            state.busy = false;
            if state.queue.is_empty() {
                (false, std::mem::take(&mut state.flush_waiters))
            } else {
                (true, Vec::new())
            }
        };

        for waiter in waiters {
            waiter();
        }

        if more {
            let owner = Arc::clone(core);
            core.scheduler
                .defer(Box::new(move || LoggerCore::ping(&owner)));
        }
    }

    /// Hand one record to the sink. Errors and panics drop the record and
    /// are reported here; the dropped completion handle does the counting.
    fn dispatch(&self, record: LogRecord, done: Completion) {
        let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            self.sink.deliver(record, done)
        }));

        match outcome {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                (self.on_error)(&e);
            }
            Err(panic_info) => {
                let err = LoggerError::delivery(
                    self.sink.name(),
                    format!("sink panicked: {}", describe_panic(panic_info)),
                );
                (self.on_error)(&err);
            }
        }
    }
}

/// A queued logger bound to one sink. Cloning yields another handle to the
/// same queue.
#[derive(Clone)]
pub struct Logger {
    core: Arc<LoggerCore>,
}

impl Logger {
    /// A queued logger with an empty default context and no filter.
    pub fn new<S: Sink + 'static>(sink: S) -> Self {
        Self::builder().sink(sink).build()
    }

    /// Create a builder for Logger
    ///
    /// # Example
    /// ```
    /// use logpipe::prelude::*;
    ///
    /// let logger = Logger::builder()
    ///     .context("api")
    ///     .min_level(Level::Debug)
    ///     .sink(NullSink)
    ///     .build();
    /// logger.info("ready");
    /// ```
    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }

    /// Filter and enqueue one record. Rejected records leave no trace but a metric.
    pub fn log(&self, level: Level, vars: impl Into<Vars>, args: impl Into<Args>) {
        Log::log(self, level, vars.into(), args.into());
    }

    /// Queue a record that already passed filtering. Without a queue the
    /// record goes straight to the sink on the caller's thread.
    pub fn enqueue(&self, record: LogRecord) {
        self.core.metrics.record_enqueued();

        if !self.core.use_queue {
            self.core
                .dispatch(record, LoggerCore::completion(&self.core, false));
            return;
        }

        self.core.state.lock().queue.push_back(record);
        LoggerCore::ping(&self.core);
    }

    /// Start draining anything already queued. Construction never does this.
    pub fn start(&self) {
        LoggerCore::ping(&self.core);
    }

    pub fn metrics(&self) -> &LoggerMetrics {
        &self.core.metrics
    }

    /// Records waiting behind the one in flight.
    pub fn queue_len(&self) -> usize {
        self.core.state.lock().queue.len()
    }

    pub fn is_busy(&self) -> bool {
        self.core.state.lock().busy
    }

    pub fn is_queued(&self) -> bool {
        self.core.use_queue
    }

    pub fn sink_name(&self) -> &str {
        self.core.sink.name()
    }
}

impl Log for Logger {
    fn log(&self, level: Level, vars: Vars, args: Args) {
        let core = &self.core;
        let record = LogRecord::new(level, vars, args, &core.default_context);

        let accepted = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            core.filter.accept(record.level, &record.vars, &record.args)
        }));
        match accepted {
            Ok(true) => {}
            Ok(false) => {
                core.metrics.record_filtered();
                return;
            }
            Err(panic_info) => {
                // A broken filter rejects the record rather than the caller
                core.metrics.record_filtered();
                let err =
                    LoggerError::other(format!("filter panicked: {}", describe_panic(panic_info)));
                (core.on_error)(&err);
                return;
            }
        }

        self.enqueue(record);
    }

    fn default_context(&self) -> &str {
        &self.core.default_context
    }

    fn ping(&self) {
        LoggerCore::ping(&self.core);
    }

    fn flush(&self, done: FlushCallback) {
        {
            let mut state = self.core.state.lock();
            if state.busy || !state.queue.is_empty() {
                state.flush_waiters.push(done);
                return;
            }
        }
        done();
    }
}

/// Builder for constructing Logger with a fluent API
///
/// # Example
/// ```
/// use logpipe::prelude::*;
/// use std::sync::Arc;
///
/// let logger = Logger::builder()
///     .context("worker")
///     .sink(ConsoleSink::new())
///     .filter(|level: Level, _: &Vars, _: &Args| level != Level::Trace)
///     .scheduler(Arc::new(ManualScheduler::new()))
///     .on_error(Arc::new(|err: &LoggerError| eprintln!("log failure: {}", err)))
///     .build();
/// ```
pub struct LoggerBuilder {
    context: String,
    sink: Option<Box<dyn Sink>>,
    filter: Box<dyn Filter>,
    use_queue: bool,
    scheduler: Option<Arc<dyn Scheduler>>,
    on_error: Option<ErrorHandler>,
}

impl LoggerBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self {
            context: String::new(),
            sink: None,
            filter: Box::new(AcceptAll),
            use_queue: true,
            scheduler: None,
            on_error: None,
        }
    }

    /// Set the default context
    #[must_use = "builder methods return a new value"]
    pub fn context(mut self, context: impl Into<String>) -> Self {
        self.context = context.into();
        self
    }

    /// Set the sink; defaults to [`NullSink`](crate::sinks::NullSink)
    #[must_use = "builder methods return a new value"]
    pub fn sink<S: Sink + 'static>(mut self, sink: S) -> Self {
        self.sink = Some(Box::new(sink));
        self
    }

    /// Replace the filter predicate
    #[must_use = "builder methods return a new value"]
    pub fn filter<F: Filter + 'static>(mut self, filter: F) -> Self {
        self.filter = Box::new(filter);
        self
    }

    /// Shorthand for a [`MinLevel`] filter
    #[must_use = "builder methods return a new value"]
    pub fn min_level(self, level: Level) -> Self {
        self.filter(MinLevel(level))
    }

    /// Bypass the queue: every accepted record is delivered on the caller's thread
    #[must_use = "builder methods return a new value"]
    pub fn synchronous(mut self) -> Self {
        self.use_queue = false;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn use_queue(mut self, use_queue: bool) -> Self {
        self.use_queue = use_queue;
        self
    }

    /// Run loop for deferred drain passes; defaults to [`Dispatcher::global`]
    #[must_use = "builder methods return a new value"]
    pub fn scheduler(mut self, scheduler: Arc<dyn Scheduler>) -> Self {
        self.scheduler = Some(scheduler);
        self
    }

    /// Fallback channel for failed deliveries; defaults to stderr
    #[must_use = "builder methods return a new value"]
    pub fn on_error(mut self, handler: ErrorHandler) -> Self {
        self.on_error = Some(handler);
        self
    }

    /// Build the Logger. Nothing is delivered until the first record arrives.
    pub fn build(self) -> Logger {
        let sink = self
            .sink
            .unwrap_or_else(|| Box::new(crate::sinks::NullSink));
        let scheduler = self.scheduler.unwrap_or_else(|| {
            let global: Arc<dyn Scheduler> = Dispatcher::global();
            global
        });

        Logger {
            core: Arc::new(LoggerCore {
                default_context: self.context,
                sink,
                filter: self.filter,
                use_queue: self.use_queue,
                scheduler,
                on_error: self.on_error.unwrap_or_else(stderr_handler),
                metrics: LoggerMetrics::new(),
                state: Mutex::new(DrainState::default()),
            }),
        }
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
