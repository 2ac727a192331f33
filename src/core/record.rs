//! Log record structure

use super::arg::Args;
use super::level::Level;
use super::vars::Vars;
use chrono::{DateTime, Utc};

/// The unit of data flowing through the pipeline.
///
/// `context` is the effective context: the one carried by `vars` when the
/// caller gave one, otherwise the logger's default context. `vars` is kept
/// as the caller passed it so fan-out sinks can forward the caller's request unchanged.
#[derive(Debug, Clone, PartialEq)]
pub struct LogRecord {
    pub level: Level,
    pub context: String,
    pub timestamp: DateTime<Utc>,
    pub vars: Vars,
    pub args: Args,
}

impl LogRecord {
    pub fn new(level: Level, vars: Vars, args: Args, default_context: &str) -> Self {
        Self::at(Utc::now(), level, vars, args, default_context)
    }

    /// Build a record with an explicit timestamp
    pub fn at(
        timestamp: DateTime<Utc>,
        level: Level,
        vars: Vars,
        args: Args,
        default_context: &str,
    ) -> Self {
        let context = vars.context().unwrap_or(default_context).to_string();
        Self {
            level,
            context,
            timestamp,
            vars,
            args,
        }
    }

    /// The cooked argument text.
    pub fn message(&self) -> String {
        self.args.cook()
    }
}
