//! Per-record variables: the optional context string plus free-form fields
//!
//! `log` accepts anything convertible into [`Vars`]. A bare string is the
//! non-structured form and becomes `{context: value}`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Value type for structured fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    String(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Null,
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::String(s) => f.write_str(s),
            FieldValue::Int(i) => i.fmt(f),
            FieldValue::Float(x) => x.fmt(f),
            FieldValue::Bool(b) => b.fmt(f),
            FieldValue::Null => f.write_str("null"),
        }
    }
}

macro_rules! field_value_from {
    ($($t:ty => $variant:ident),* $(,)?) => {
        $(impl From<$t> for FieldValue {
            fn from(v: $t) -> Self {
                FieldValue::$variant(v.into())
            }
        })*
    };
}

field_value_from!(
    String => String,
    &str => String,
    i64 => Int,
    i32 => Int,
    u32 => Int,
    f64 => Float,
    bool => Bool,
);

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Vars {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    context: Option<String>,
    #[serde(flatten)]
    fields: BTreeMap<String, FieldValue>,
}

impl Vars {
    pub fn new() -> Self {
        Self::default()
    }

    /// Vars carrying only a context.
    pub fn with_context(context: impl Into<String>) -> Self {
        Self {
            context: Some(context.into()),
            fields: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.add_field(key, value);
        self
    }

    pub fn add_field(&mut self, key: impl Into<String>, value: impl Into<FieldValue>) {
        self.fields.insert(key.into(), value.into());
    }

    pub fn field(&self, key: &str) -> Option<&FieldValue> {
        self.fields.get(key)
    }

    pub fn context(&self) -> Option<&str> {
        self.context.as_deref()
    }

    pub fn has_context(&self) -> bool {
        self.context.is_some()
    }

    pub fn set_context(&mut self, context: impl Into<String>) {
        self.context = Some(context.into());
    }

    pub fn fields(&self) -> &BTreeMap<String, FieldValue> {
        &self.fields
    }

    /// `key=value` pairs in key order, space separated.
    pub fn render_fields(&self) -> String {
        let mut out = String::new();
        for (key, value) in &self.fields {
            if !out.is_empty() {
                out.push(' ');
            }
            out.push_str(&format!("{}={}", key, value));
        }
        out
    }
}

impl From<&str> for Vars {
    fn from(context: &str) -> Self {
        Vars::with_context(context)
    }
}

impl From<String> for Vars {
    fn from(context: String) -> Self {
        Vars::with_context(context)
    }
}

impl From<Option<&str>> for Vars {
    fn from(context: Option<&str>) -> Self {
        match context {
            Some(c) => Vars::with_context(c),
            None => Vars::new(),
        }
    }
}

impl From<()> for Vars {
    fn from(_: ()) -> Self {
        Vars::new()
    }
}
