//! Record formatting

use super::record::LogRecord;

/// Turns a record into one display line (without the line terminator).
pub trait Formatter: Send + Sync {
    fn format(&self, record: &LogRecord) -> String;
}

/// `[level] (context) <cooked args>`
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultFormatter;

impl Formatter for DefaultFormatter {
    fn format(&self, record: &LogRecord) -> String {
        format!(
            "[{}] ({}) {}",
            record.level.as_str(),
            record.context,
            record.args.cook()
        )
    }
}

impl<F> Formatter for F
where
    F: Fn(&LogRecord) -> String + Send + Sync,
{
    fn format(&self, record: &LogRecord) -> String {
        self(record)
    }
}

/// Escape backslash, tab, newline and carriage return so a message stays on
/// one tab-separated line. Every occurrence is replaced.
pub fn escape_line(message: &str) -> String {
    let mut out = String::with_capacity(message.len());
    for c in message.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\t' => out.push_str("\\t"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            other => out.push(other),
        }
    }
    out
}
