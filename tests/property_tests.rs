//! Property-based tests for logpipe using proptest

use logpipe::core::{cook_args, escape_line, DatePattern};
use logpipe::prelude::*;
use parking_lot::Mutex;
use proptest::prelude::*;
use std::sync::Arc;

fn any_level() -> impl Strategy<Value = Level> {
    prop_oneof![
        Just(Level::Trace),
        Just(Level::Debug),
        Just(Level::Info),
        Just(Level::Warning),
        Just(Level::Error),
    ]
}

fn unescape(escaped: &str) -> String {
    let mut out = String::new();
    let mut chars = escaped.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('\\') => out.push('\\'),
            Some('t') => out.push('\t'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            other => panic!("dangling escape followed by {:?}", other),
        }
    }
    out
}

#[derive(Clone, Default)]
struct Collect {
    records: Arc<Mutex<Vec<LogRecord>>>,
}

impl Sink for Collect {
    fn deliver(&self, record: LogRecord, done: Completion) -> Result<()> {
        self.records.lock().push(record);
        done.complete();
        Ok(())
    }

    fn name(&self) -> &str {
        "collect"
    }
}

// ============================================================================
// Level Tests
// ============================================================================

proptest! {
    /// Level tokens roundtrip through Display/FromStr
    #[test]
    fn test_level_token_roundtrip(level in any_level()) {
        let parsed: Level = level.as_str().parse().unwrap();
        prop_assert_eq!(level, parsed);
        prop_assert_eq!(format!("{}", level), level.as_str());
    }

    /// Ordering follows severity
    #[test]
    fn test_level_ordering(a in any_level(), b in any_level()) {
        prop_assert_eq!(a <= b, (a as u8) <= (b as u8));
        prop_assert_eq!(MinLevel(a).accept(b, &Vars::new(), &Args::new()), b >= a);
    }

    /// Anything other than the five lowercase tokens is rejected
    #[test]
    fn test_level_rejects_unknown_tokens(s in "[A-Za-z]{1,8}") {
        let known = Level::ALL.iter().any(|level| level.as_str() == s);
        prop_assert_eq!(s.parse::<Level>().is_ok(), known);
    }
}

// ============================================================================
// Argument and Escaping Tests
// ============================================================================

proptest! {
    /// Cooking primitives is a single-space join of their renderings
    #[test]
    fn test_cook_joins_with_spaces(
        words in prop::collection::vec("[a-z0-9]{0,6}", 0..8),
        numbers in prop::collection::vec(any::<i64>(), 0..4)
    ) {
        let mut args: Vec<Arg> = words.iter().map(|w| Arg::from(w.as_str())).collect();
        args.extend(numbers.iter().map(|n| Arg::from(*n)));

        let mut expected: Vec<String> = words.clone();
        expected.extend(numbers.iter().map(|n| n.to_string()));

        prop_assert_eq!(cook_args(&args), expected.join(" "));
    }

    /// Escaped text never contains raw line breaks or tabs and unescapes back
    #[test]
    fn test_escape_line_is_single_field(s in "[ -~\t\r\n\\\\]{0,64}") {
        let escaped = escape_line(&s);
        prop_assert!(!escaped.contains('\n'));
        prop_assert!(!escaped.contains('\r'));
        prop_assert!(!escaped.contains('\t'));
        prop_assert_eq!(unescape(&escaped), s);
    }

    /// Text without special characters passes through unchanged
    #[test]
    fn test_escape_line_identity_on_plain_text(s in "[a-zA-Z0-9 .,:;!?-]{0,64}") {
        prop_assert_eq!(escape_line(&s), s);
    }
}

// ============================================================================
// Queue Tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Records reach the sink in submission order, minus filtered ones
    #[test]
    fn test_fifo_order_with_filter(
        levels in prop::collection::vec(any_level(), 1..40),
        threshold in any_level()
    ) {
        let collect = Collect::default();
        let scheduler = Arc::new(ManualScheduler::new());
        let logger = Logger::builder()
            .min_level(threshold)
            .sink(collect.clone())
            .scheduler(scheduler.clone())
            .build();

        for (i, level) in levels.iter().enumerate() {
            logger.log(*level, Vars::new(), Args::from(i.to_string()));
        }
        scheduler.run_until_idle();

        let expected: Vec<String> = levels
            .iter()
            .enumerate()
            .filter(|(_, level)| **level >= threshold)
            .map(|(i, _)| i.to_string())
            .collect();
        let delivered: Vec<String> = collect.records.lock().iter().map(LogRecord::message).collect();

        prop_assert_eq!(&delivered, &expected);
        prop_assert_eq!(logger.metrics().filtered() as usize, levels.len() - expected.len());
    }
}

// ============================================================================
// Date Pattern Tests
// ============================================================================

proptest! {
    /// Numeric date tokens render with their fixed widths
    #[test]
    fn test_date_pattern_widths(secs in 0i64..4_102_444_800) {
        let ts = chrono::DateTime::from_timestamp(secs, 0).unwrap();
        let rendered = DatePattern::parse("yyyymmddHHMMss").unwrap().format(&ts);
        prop_assert_eq!(rendered.len(), 14);
        prop_assert_eq!(rendered, ts.format("%Y%m%d%H%M%S").to_string());
    }
}
