//! Message arguments and their coercion to text ("cooking")

use serde::Serialize;
use serde_json::Value;
use std::fmt;

/// One message argument.
///
/// Primitives are kept as they are; structured values hold a JSON tree and
/// error-like values keep their name and message.
#[derive(Debug, Clone, PartialEq)]
pub enum Arg {
    Str(String),
    Int(i64),
    UInt(u64),
    Float(f64),
    Bool(bool),
    Null,
    Json(Value),
    Error { name: String, message: String },
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    name: &'a str,
    message: &'a str,
}

#[derive(Serialize)]
struct ErrorPayload<'a> {
    err: ErrorBody<'a>,
}

impl Arg {
    /// Wrap an error; its name is the unqualified type name.
    pub fn error<E: std::error::Error + ?Sized>(err: &E) -> Self {
        let full = std::any::type_name::<E>();
        let name = full
            .split('<')
            .next()
            .and_then(|path| path.rsplit("::").next())
            .unwrap_or(full);
        Arg::Error {
            name: name.to_string(),
            message: err.to_string(),
        }
    }

    pub fn error_named(name: impl Into<String>, message: impl Into<String>) -> Self {
        Arg::Error {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Serialize any value; objects and arrays stay structured, scalars become primitives.
    pub fn json<T: Serialize + ?Sized>(value: &T) -> Self {
        match serde_json::to_value(value) {
            Ok(v) => Arg::from(v),
            Err(e) => Arg::error_named("SerializationError", e.to_string()),
        }
    }

    pub fn is_primitive(&self) -> bool {
        !matches!(self, Arg::Json(_) | Arg::Error { .. })
    }

    /// Coerce to text: errors become `{"err":{"name":..,"message":..}}`,
    /// structured values are JSON-serialized, primitives print as they are.
    pub fn cook(&self) -> String {
        match self {
            Arg::Str(s) => s.clone(),
            Arg::Int(i) => i.to_string(),
            Arg::UInt(u) => u.to_string(),
            Arg::Float(f) => f.to_string(),
            Arg::Bool(b) => b.to_string(),
            Arg::Null => "null".to_string(),
            Arg::Json(v) => v.to_string(),
            Arg::Error { name, message } => {
                let payload = ErrorPayload {
                    err: ErrorBody { name, message },
                };
                // Two borrowed strings cannot fail to serialize
                serde_json::to_string(&payload).unwrap_or_default()
            }
        }
    }
}

impl fmt::Display for Arg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.cook())
    }
}

impl From<Value> for Arg {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Arg::Null,
            Value::Bool(b) => Arg::Bool(b),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Arg::Int(i)
                } else if let Some(u) = n.as_u64() {
                    Arg::UInt(u)
                } else {
                    Arg::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            Value::String(s) => Arg::Str(s),
            structured @ (Value::Array(_) | Value::Object(_)) => Arg::Json(structured),
        }
    }
}

impl From<&str> for Arg {
    fn from(s: &str) -> Self {
        Arg::Str(s.to_string())
    }
}

impl From<String> for Arg {
    fn from(s: String) -> Self {
        Arg::Str(s)
    }
}

impl From<&String> for Arg {
    fn from(s: &String) -> Self {
        Arg::Str(s.clone())
    }
}

macro_rules! arg_from_signed {
    ($($t:ty),*) => {
        $(impl From<$t> for Arg {
            fn from(v: $t) -> Self {
                Arg::Int(v as i64)
            }
        })*
    };
}

macro_rules! arg_from_unsigned {
    ($($t:ty),*) => {
        $(impl From<$t> for Arg {
            fn from(v: $t) -> Self {
                Arg::UInt(v as u64)
            }
        })*
    };
}

arg_from_signed!(i8, i16, i32, i64, isize);
arg_from_unsigned!(u8, u16, u32, u64, usize);

impl From<f32> for Arg {
    fn from(v: f32) -> Self {
        Arg::Float(v as f64)
    }
}

impl From<f64> for Arg {
    fn from(v: f64) -> Self {
        Arg::Float(v)
    }
}

impl From<bool> for Arg {
    fn from(v: bool) -> Self {
        Arg::Bool(v)
    }
}

impl<T: Into<Arg>> From<Option<T>> for Arg {
    fn from(v: Option<T>) -> Self {
        v.map_or(Arg::Null, Into::into)
    }
}

impl From<&crate::core::LoggerError> for Arg {
    fn from(err: &crate::core::LoggerError) -> Self {
        Arg::error(err)
    }
}

impl From<&std::io::Error> for Arg {
    fn from(err: &std::io::Error) -> Self {
        Arg::error(err)
    }
}

/// The ordered argument list of one record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Args(Vec<Arg>);

impl Args {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn push(&mut self, arg: impl Into<Arg>) {
        self.0.push(arg.into());
    }

    pub fn as_slice(&self) -> &[Arg] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Arg> {
        self.0.iter()
    }

    /// Cook every element and join the results with single spaces.
    pub fn cook(&self) -> String {
        cook_args(&self.0)
    }
}

pub fn cook_args(args: &[Arg]) -> String {
    args.iter().map(Arg::cook).collect::<Vec<_>>().join(" ")
}

impl From<Vec<Arg>> for Args {
    fn from(v: Vec<Arg>) -> Self {
        Args(v)
    }
}

impl From<Arg> for Args {
    fn from(a: Arg) -> Self {
        Args(vec![a])
    }
}

impl From<&str> for Args {
    fn from(s: &str) -> Self {
        Args(vec![Arg::from(s)])
    }
}

impl From<String> for Args {
    fn from(s: String) -> Self {
        Args(vec![Arg::from(s)])
    }
}

impl FromIterator<Arg> for Args {
    fn from_iter<I: IntoIterator<Item = Arg>>(iter: I) -> Self {
        Args(iter.into_iter().collect())
    }
}

impl IntoIterator for Args {
    type Item = Arg;
    type IntoIter = std::vec::IntoIter<Arg>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Args {
    type Item = &'a Arg;
    type IntoIter = std::slice::Iter<'a, Arg>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
