//! Record filters
//!
//! A filter runs synchronously on the caller's thread before a record is
//! queued, so it must be a pure test with no I/O. A filter that panics
//! rejects the record; the panic is reported, not propagated.

use super::arg::Args;
use super::level::Level;
use super::vars::Vars;

pub trait Filter: Send + Sync {
    fn accept(&self, level: Level, vars: &Vars, args: &Args) -> bool;
}

impl<F> Filter for F
where
    F: Fn(Level, &Vars, &Args) -> bool + Send + Sync,
{
    fn accept(&self, level: Level, vars: &Vars, args: &Args) -> bool {
        self(level, vars, args)
    }
}

/// Accepts every record.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAll;

impl Filter for AcceptAll {
    #[inline]
    fn accept(&self, _level: Level, _vars: &Vars, _args: &Args) -> bool {
        true
    }
}

/// Accepts records at or above a severity threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MinLevel(pub Level);

impl Filter for MinLevel {
    #[inline]
    fn accept(&self, level: Level, _vars: &Vars, _args: &Args) -> bool {
        level >= self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_min_level_threshold() {
        let f = MinLevel(Level::Warning);
        let (vars, args) = (Vars::new(), Args::new());
        assert!(f.accept(Level::Error, &vars, &args));
        assert!(f.accept(Level::Warning, &vars, &args));
        assert!(!f.accept(Level::Info, &vars, &args));
        assert!(!f.accept(Level::Trace, &vars, &args));
    }

    #[test]
    fn test_closure_filter_sees_vars() {
        let only_db = |_: Level, vars: &Vars, _: &Args| vars.context() == Some("db");
        assert!(only_db.accept(Level::Info, &"db".into(), &Args::new()));
        assert!(!only_db.accept(Level::Info, &"web".into(), &Args::new()));
    }
}
