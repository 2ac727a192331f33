//! Log level definitions

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The fixed set of record levels.
///
/// Levels are compared by severity (`Trace` lowest, `Error` highest) only so
/// that threshold filters such as [`MinLevel`](crate::core::MinLevel) can be
/// expressed; the pipeline itself never orders records by level.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Trace = 0,
    Debug = 1,
    #[default]
    Info = 2,
    Warning = 3,
    Error = 4,
}

impl Level {
    pub const ALL: [Level; 5] = [
        Level::Error,
        Level::Warning,
        Level::Info,
        Level::Debug,
        Level::Trace,
    ];

    /// The wire token: `error`, `warning`, `info`, `debug` or `trace`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Trace => "trace",
            Level::Debug => "debug",
            Level::Info => "info",
            Level::Warning => "warning",
            Level::Error => "error",
        }
    }

    /// Upper-cased display label.
    pub fn label(&self) -> &'static str {
        match self {
            Level::Trace => "TRACE",
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warning => "WARNING",
            Level::Error => "ERROR",
        }
    }

    /// Error and warning records belong on the error stream.
    #[inline]
    pub fn is_diagnostic(&self) -> bool {
        matches!(self, Level::Error | Level::Warning)
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "trace" => Ok(Level::Trace),
            "debug" => Ok(Level::Debug),
            "info" => Ok(Level::Info),
            "warning" => Ok(Level::Warning),
            "error" => Ok(Level::Error),
            _ => Err(format!("Invalid log level: '{}'", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokens_round_trip() {
        for level in Level::ALL {
            assert_eq!(level.as_str().parse::<Level>(), Ok(level));
        }
    }

    #[test]
    fn test_tokens_are_case_sensitive() {
        assert!("ERROR".parse::<Level>().is_err());
        assert!("Warning".parse::<Level>().is_err());
        assert!("warn".parse::<Level>().is_err());
    }

    #[test]
    fn test_severity_order() {
        assert!(Level::Trace < Level::Debug);
        assert!(Level::Info < Level::Warning);
        assert!(Level::Warning < Level::Error);
    }

    #[test]
    fn test_label() {
        assert_eq!(Level::Warning.label(), "WARNING");
        assert_eq!(Level::Info.to_string(), "info");
    }
}
