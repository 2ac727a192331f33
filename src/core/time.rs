//! Timestamp and date-pattern formatting
//!
//! [`TimestampFormat`] renders record timestamps for console and file lines.
//! [`DatePattern`] compiles the `yyyymmdd`-style patterns used in file names.

use chrono::{DateTime, Datelike, Timelike, Utc};
use serde::{Deserialize, Serialize};

use super::error::{LoggerError, Result};

/// Standardized timestamp format options
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimestampFormat {
    /// ISO 8601 with milliseconds: `2025-01-08T10:30:45.123Z`
    #[default]
    Iso8601,

    /// ISO 8601 with microseconds: `2025-01-08T10:30:45.123456Z`
    Iso8601Micros,

    /// RFC 3339 format: `2025-01-08T10:30:45+00:00`
    Rfc3339,

    /// Unix timestamp in seconds: `1736332245`
    Unix,

    /// Unix timestamp in milliseconds: `1736332245123`
    UnixMillis,

    /// Custom strftime format
    Custom(String),
}

impl TimestampFormat {
    #[must_use]
    pub fn format(&self, datetime: &DateTime<Utc>) -> String {
        match self {
            TimestampFormat::Iso8601 => datetime.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string(),
            TimestampFormat::Iso8601Micros => datetime.format("%Y-%m-%dT%H:%M:%S%.6fZ").to_string(),
            TimestampFormat::Rfc3339 => datetime.to_rfc3339(),
            TimestampFormat::Unix => datetime.timestamp().to_string(),
            TimestampFormat::UnixMillis => datetime.timestamp_millis().to_string(),
            TimestampFormat::Custom(format_str) => datetime.format(format_str).to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum DateToken {
    Literal(String),
    Year4,
    Year2,
    MonthName,
    MonthAbbrev,
    Month2,
    Month,
    DayName,
    DayAbbrev,
    Day2,
    Day,
    Hour24Padded,
    Hour24,
    Hour12Padded,
    Hour12,
    Minute2,
    Minute,
    Second2,
    Second,
    Millis,
    Centis,
    MeridiemUpper,
    MeridiemLower,
}

const MONTHS: [&str; 12] = [
    "January", "February", "March", "April", "May", "June", "July", "August", "September",
    "October", "November", "December",
];

const DAYS: [&str; 7] = [
    "Sunday", "Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday",
];

/// A compiled date pattern such as `yyyymmdd` or `yyyy-mm-dd'T'HH`.
///
/// Letter runs are tokens (`mm` month, `MM` minutes, `HH` 24h hour, `l`
/// milliseconds, ...); anything inside single quotes and any non-letter
/// character is copied literally. Rendering is done in UTC.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatePattern {
    source: String,
    tokens: Vec<DateToken>,
}

impl DatePattern {
    pub fn parse(pattern: &str) -> Result<Self> {
        if pattern.is_empty() {
            return Err(LoggerError::config("DatePattern", "pattern must not be empty"));
        }

        let chars: Vec<char> = pattern.chars().collect();
        let mut tokens = Vec::new();
        let mut literal = String::new();
        let mut i = 0;

        while i < chars.len() {
            let c = chars[i];

            if c == '\'' {
                let close = chars[i + 1..]
                    .iter()
                    .position(|&q| q == '\'')
                    .ok_or_else(|| {
                        LoggerError::config("DatePattern", format!("unterminated quote in '{}'", pattern))
                    })?;
                literal.extend(&chars[i + 1..i + 1 + close]);
                i += close + 2;
                continue;
            }

            let run = chars[i..].iter().take_while(|&&r| r == c).count();
            let token = match (c, run) {
                ('y', 4) => Some(DateToken::Year4),
                ('y', 2) => Some(DateToken::Year2),
                ('m', 4) => Some(DateToken::MonthName),
                ('m', 3) => Some(DateToken::MonthAbbrev),
                ('m', 2) => Some(DateToken::Month2),
                ('m', 1) => Some(DateToken::Month),
                ('d', 4) => Some(DateToken::DayName),
                ('d', 3) => Some(DateToken::DayAbbrev),
                ('d', 2) => Some(DateToken::Day2),
                ('d', 1) => Some(DateToken::Day),
                ('H', 2) => Some(DateToken::Hour24Padded),
                ('H', 1) => Some(DateToken::Hour24),
                ('h', 2) => Some(DateToken::Hour12Padded),
                ('h', 1) => Some(DateToken::Hour12),
                ('M', 2) => Some(DateToken::Minute2),
                ('M', 1) => Some(DateToken::Minute),
                ('s', 2) => Some(DateToken::Second2),
                ('s', 1) => Some(DateToken::Second),
                ('l', 1) => Some(DateToken::Millis),
                ('L', 1) => Some(DateToken::Centis),
                ('T', 2) => Some(DateToken::MeridiemUpper),
                ('t', 2) => Some(DateToken::MeridiemLower),
                _ => None,
            };

            match token {
                Some(token) => {
                    if !literal.is_empty() {
                        tokens.push(DateToken::Literal(std::mem::take(&mut literal)));
                    }
                    tokens.push(token);
                }
                None if c.is_ascii_alphabetic() => {
                    return Err(LoggerError::config(
                        "DatePattern",
                        format!("unsupported token '{}' in '{}'", c.to_string().repeat(run), pattern),
                    ));
                }
                None => literal.extend(std::iter::repeat(c).take(run)),
            }
            i += run;
        }

        if !literal.is_empty() {
            tokens.push(DateToken::Literal(literal));
        }

        Ok(Self {
            source: pattern.to_string(),
            tokens,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn format(&self, dt: &DateTime<Utc>) -> String {
        let mut out = String::with_capacity(self.source.len() + 8);
        let hour12 = match dt.hour() % 12 {
            0 => 12,
            h => h,
        };
        let pm = dt.hour() >= 12;
        let millis = dt.timestamp_subsec_millis();

        for token in &self.tokens {
            match token {
                DateToken::Literal(s) => out.push_str(s),
                DateToken::Year4 => out.push_str(&format!("{:04}", dt.year())),
                DateToken::Year2 => out.push_str(&format!("{:02}", dt.year().rem_euclid(100))),
                DateToken::MonthName => out.push_str(MONTHS[dt.month0() as usize]),
                DateToken::MonthAbbrev => out.push_str(&MONTHS[dt.month0() as usize][..3]),
                DateToken::Month2 => out.push_str(&format!("{:02}", dt.month())),
                DateToken::Month => out.push_str(&dt.month().to_string()),
                DateToken::DayName => {
                    out.push_str(DAYS[dt.weekday().num_days_from_sunday() as usize])
                }
                DateToken::DayAbbrev => {
                    out.push_str(&DAYS[dt.weekday().num_days_from_sunday() as usize][..3])
                }
                DateToken::Day2 => out.push_str(&format!("{:02}", dt.day())),
                DateToken::Day => out.push_str(&dt.day().to_string()),
                DateToken::Hour24Padded => out.push_str(&format!("{:02}", dt.hour())),
                DateToken::Hour24 => out.push_str(&dt.hour().to_string()),
                DateToken::Hour12Padded => out.push_str(&format!("{:02}", hour12)),
                DateToken::Hour12 => out.push_str(&hour12.to_string()),
                DateToken::Minute2 => out.push_str(&format!("{:02}", dt.minute())),
                DateToken::Minute => out.push_str(&dt.minute().to_string()),
                DateToken::Second2 => out.push_str(&format!("{:02}", dt.second())),
                DateToken::Second => out.push_str(&dt.second().to_string()),
                DateToken::Millis => out.push_str(&format!("{:03}", millis.min(999))),
                DateToken::Centis => out.push_str(&format!("{:02}", millis.min(999) / 10)),
                DateToken::MeridiemUpper => out.push_str(if pm { "PM" } else { "AM" }),
                DateToken::MeridiemLower => out.push_str(if pm { "pm" } else { "am" }),
            }
        }

        out
    }
}
