//! Fan-out sink

use crate::core::{Completion, Log, LogRecord, Result, Sink};
use std::sync::Arc;

/// Forwards each record to a fixed list of child loggers.
///
/// Children receive the caller's level, vars and arguments through
/// their `log` entry point, so each applies its own filter, context and
/// queue. The tee completes as soon as every child has accepted the call;
/// it does not wait for their deliveries. Children are shared, not owned.
pub struct TeeSink {
    children: Vec<Arc<dyn Log>>,
}

impl TeeSink {
    pub fn new(children: Vec<Arc<dyn Log>>) -> Self {
        Self { children }
    }

    pub fn children(&self) -> &[Arc<dyn Log>] {
        &self.children
    }
}

impl Sink for TeeSink {
    fn deliver(&self, record: LogRecord, done: Completion) -> Result<()> {
        for child in &self.children {
            child.log(record.level, record.vars.clone(), record.args.clone());
        }
        done.complete();
        Ok(())
    }

    fn name(&self) -> &str {
        "tee"
    }
}
