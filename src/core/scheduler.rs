//! Deferred execution for drain passes and sink I/O
//!
//! Loggers never re-enter their drain loop on the stack that completed a
//! delivery; they hand the next pass to a [`Scheduler`] instead. Two run
//! loops are provided:
//!
//! - [`Dispatcher`]: a single worker thread fed by a channel. Tasks run one
//!   at a time, in submission order.
//! - [`ManualScheduler`]: tasks wait until the owner calls `run_pending`,
//!   for deterministic tests and for embedding in a host event loop.

use crossbeam_channel::{unbounded, Sender};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::{Arc, OnceLock};
use std::thread::{self, JoinHandle, ThreadId};
use std::time::{Duration, Instant};

/// Default shutdown timeout for dispatcher cleanup (5 seconds)
pub const DEFAULT_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

pub type Task = Box<dyn FnOnce() + Send + 'static>;

pub trait Scheduler: Send + Sync {
    /// Run `task` on a later tick, never on the caller's stack.
    fn defer(&self, task: Task);
}

impl<S: Scheduler + ?Sized> Scheduler for Arc<S> {
    fn defer(&self, task: Task) {
        (**self).defer(task)
    }
}

fn panic_message(panic_info: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic_info.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic_info.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}

pub(crate) fn describe_panic(panic_info: Box<dyn std::any::Any + Send>) -> String {
    panic_message(panic_info.as_ref())
}

/// Single-thread run loop backed by a crossbeam channel.
pub struct Dispatcher {
    sender: Mutex<Option<Sender<Task>>>,
    handle: Mutex<Option<JoinHandle<()>>>,
    worker: ThreadId,
}

static GLOBAL: OnceLock<Arc<Dispatcher>> = OnceLock::new();

impl Dispatcher {
    #[must_use]
    pub fn new() -> Self {
        let (sender, receiver) = unbounded::<Task>();

        let handle = thread::spawn(move || {
            // Runs until every sender is gone and the channel is drained
            while let Ok(task) = receiver.recv() {
                if let Err(panic_info) =
                    std::panic::catch_unwind(std::panic::AssertUnwindSafe(task))
                {
                    eprintln!(
                        "[LOGGER CRITICAL] Deferred task panicked: {}. Dispatcher continues.",
                        describe_panic(panic_info)
                    );
                }
            }
        });
        let worker = handle.thread().id();

        Self {
            sender: Mutex::new(Some(sender)),
            handle: Mutex::new(Some(handle)),
            worker,
        }
    }

    /// The process-wide dispatcher shared by loggers built without an explicit scheduler.
    pub fn global() -> Arc<Dispatcher> {
        Arc::clone(GLOBAL.get_or_init(|| Arc::new(Dispatcher::new())))
    }

    /// Whether the current thread is this dispatcher's worker.
    pub fn is_worker_thread(&self) -> bool {
        thread::current().id() == self.worker
    }

    /// Stop accepting tasks and wait for the queued ones to finish.
    ///
    /// Returns `true` if the worker drained and exited within `timeout`.
    pub fn shutdown(&self, timeout: Duration) -> bool {
        drop(self.sender.lock().take());

        let Some(handle) = self.handle.lock().take() else {
            return true;
        };

        // The worker cannot wait for itself; it exits once its current task returns
        if self.is_worker_thread() {
            return true;
        }

        let start = Instant::now();
        loop {
            if handle.is_finished() {
                if let Err(e) = handle.join() {
                    eprintln!("[LOGGER ERROR] Dispatcher thread panicked during shutdown: {:?}", e);
                    return false;
                }
                return true;
            }

            if start.elapsed() >= timeout {
                eprintln!(
                    "[LOGGER WARNING] Dispatcher thread did not finish within {:?}. \
                     Some logs may be lost.",
                    timeout
                );
                return false;
            }

            thread::sleep(Duration::from_millis(10));
        }
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler for Dispatcher {
    fn defer(&self, task: Task) {
        let sender = self.sender.lock();
        match sender.as_ref() {
            Some(sender) => {
                if sender.send(task).is_err() {
                    eprintln!("[LOGGER WARNING] Dispatcher worker is gone, task dropped");
                }
            }
            None => {
                eprintln!("[LOGGER WARNING] Dispatcher already shut down, task dropped");
            }
        }
    }
}

impl Drop for Dispatcher {
    fn drop(&mut self) {
        self.shutdown(DEFAULT_SHUTDOWN_TIMEOUT);
    }
}

/// Run loop driven by its owner.
#[derive(Default)]
pub struct ManualScheduler {
    tasks: Mutex<VecDeque<Task>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending(&self) -> usize {
        self.tasks.lock().len()
    }

    /// Run one tick: the tasks queued at the time of the call. Tasks they
    /// defer wait for the next tick. Returns how many tasks ran.
    pub fn run_pending(&self) -> usize {
        let batch: Vec<Task> = self.tasks.lock().drain(..).collect();
        let ran = batch.len();
        for task in batch {
            task();
        }
        ran
    }

    /// Run ticks until no task is left. Returns how many tasks ran.
    pub fn run_until_idle(&self) -> usize {
        let mut total = 0;
        loop {
            let ran = self.run_pending();
            if ran == 0 {
                return total;
            }
            total += ran;
        }
    }
}

impl Scheduler for ManualScheduler {
    fn defer(&self, task: Task) {
        self.tasks.lock().push_back(task);
    }
}
