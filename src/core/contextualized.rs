//! Context-stamping decorator

use super::arg::Args;
use super::level::Level;
use super::logger::{FlushCallback, Log};
use super::vars::Vars;
use std::fmt;
use std::sync::Arc;

/// Stamps a context on records and forwards them to a parent logger.
///
/// The decorator has no queue of its own: each call re-enters the parent's
/// full filter/enqueue path on the caller's thread. An explicit context in
/// the caller's vars is left untouched.
#[derive(Clone)]
pub struct Contextualized {
    parent: Arc<dyn Log>,
    context: String,
}

impl Contextualized {
    pub fn new(parent: Arc<dyn Log>, context: &str, append: bool) -> Self {
        let inherited = parent.default_context();
        let context = if append && !inherited.is_empty() {
            format!("{}: {}", inherited, context)
        } else {
            context.to_string()
        };
        Self { parent, context }
    }

    pub fn context(&self) -> &str {
        &self.context
    }

    pub fn parent(&self) -> &Arc<dyn Log> {
        &self.parent
    }
}

impl fmt::Debug for Contextualized {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Contextualized")
            .field("context", &self.context)
            .finish_non_exhaustive()
    }
}

impl Log for Contextualized {
    fn log(&self, level: Level, mut vars: Vars, args: Args) {
        if !vars.has_context() {
            vars.set_context(self.context.as_str());
        }
        self.parent.log(level, vars, args);
    }

    fn default_context(&self) -> &str {
        &self.context
    }

    fn ping(&self) {
        self.parent.ping();
    }

    fn flush(&self, done: FlushCallback) {
        self.parent.flush(done);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    /// Captures forwarded calls without any queue.
    #[derive(Clone, Default)]
    struct Capture {
        context: String,
        calls: Arc<Mutex<Vec<(Level, Vars, Args)>>>,
    }

    impl Log for Capture {
        fn log(&self, level: Level, vars: Vars, args: Args) {
            self.calls.lock().push((level, vars, args));
        }

        fn default_context(&self) -> &str {
            &self.context
        }
    }

    fn parent(context: &str) -> Capture {
        Capture {
            context: context.to_string(),
            ..Capture::default()
        }
    }

    #[test]
    fn test_replace_context() {
        assert_eq!(parent("A").contextualize("B", false).context(), "B");
    }

    #[test]
    fn test_append_context() {
        assert_eq!(parent("A").contextualize("B", true).context(), "A: B");
    }

    #[test]
    fn test_append_to_empty_context() {
        assert_eq!(parent("").contextualize("B", true).context(), "B");
    }

    #[test]
    fn test_nested_append() {
        let nested = parent("A")
            .contextualize("B", true)
            .contextualize("C", true);
        assert_eq!(nested.context(), "A: B: C");
    }

    #[test]
    fn test_injects_context_only_when_missing() {
        let root = parent("root");
        let child = root.contextualize("child", false);

        child.info("plain");
        child.log(Level::Warning, "explicit".into(), "kept".into());

        let calls = root.calls.lock();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].0, Level::Info);
        assert_eq!(calls[0].1.context(), Some("child"));
        assert_eq!(calls[1].1.context(), Some("explicit"));
    }

    #[test]
    fn test_keeps_existing_fields() {
        let root = parent("");
        let child = root.contextualize("req", false);

        child.log(Level::Debug, Vars::new().with_field("id", 9), Args::new());

        let calls = root.calls.lock();
        assert_eq!(calls[0].1.context(), Some("req"));
        assert_eq!(calls[0].1.fields().len(), 1);
    }
}
