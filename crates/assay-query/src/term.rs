//! Query terms: comparisons, values, and connectors.

use std::{fmt, str::FromStr};

use serde::Serialize;

use crate::{
    error::ParseErrorKind,
    field::{Field, FieldKind},
};

/// AND/OR connector joining two adjacent query terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Connector {
    /// Both terms must match.
    And,
    /// Either term may match.
    Or,
}

impl fmt::Display for Connector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::And => "AND",
            Self::Or => "OR",
        })
    }
}

impl FromStr for Connector {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "AND" => Ok(Self::And),
            "OR" => Ok(Self::Or),
            _ => Err(()),
        }
    }
}

/// A comparison operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Comparison {
    /// Exact (case-insensitive for strings) equality.
    Eq,
    /// Substring match; string fields only.
    Contains,
    /// Negated substring match; string fields only.
    NotContains,
    /// Less than.
    Lt,
    /// Less than or equal.
    Lte,
    /// Greater than.
    Gt,
    /// Greater than or equal.
    Gte,
}

impl Comparison {
    /// Human phrase table, most specific first. Order matters for parsing:
    /// "is less than" would otherwise match before
    /// "is less than or equal to".
    pub const HUMAN_PHRASES: [(&'static str, Self); 7] = [
        ("is less than or equal to", Self::Lte),
        ("is greater than or equal to", Self::Gte),
        ("equals", Self::Eq),
        ("contains", Self::Contains),
        ("does not contain", Self::NotContains),
        ("is less than", Self::Lt),
        ("is greater than", Self::Gt),
    ];

    /// The phrase used for this comparison in human query strings.
    pub fn human_phrase(self) -> &'static str {
        match self {
            Self::Eq => "equals",
            Self::Contains => "contains",
            Self::NotContains => "does not contain",
            Self::Lt => "is less than",
            Self::Lte => "is less than or equal to",
            Self::Gt => "is greater than",
            Self::Gte => "is greater than or equal to",
        }
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.human_phrase())
    }
}

impl FromStr for Comparison {
    type Err = ParseErrorKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::HUMAN_PHRASES
            .iter()
            .find(|(phrase, _)| *phrase == s)
            .map(|(_, comparison)| *comparison)
            .ok_or_else(|| ParseErrorKind::UnknownComparison(s.to_string()))
    }
}

/// A numeric query value.
///
/// Integers and floats are kept apart so that a query round-trips through
/// its human form unchanged: `5` stays `5` and `5.0` stays `5.0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Number {
    /// A value written without a decimal point.
    Int(i64),
    /// A value written with a decimal point.
    Float(f64),
}

impl Number {
    /// The value as a float, for comparison purposes.
    pub fn as_f64(self) -> f64 {
        match self {
            Self::Int(i) => i as f64,
            Self::Float(f) => f,
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(i) => write!(f, "{i}"),
            // A float that happens to be whole still renders with a decimal
            // point, so it parses back as a float.
            Self::Float(v) if v.fract() == 0.0 && v.is_finite() => write!(f, "{v:.1}"),
            Self::Float(v) => write!(f, "{v}"),
        }
    }
}

/// A term's value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// A single string (also used for raw date strings).
    Str(String),
    /// A list of alternative strings, from synonym expansion or the
    /// bracketed list syntax.
    List(Vec<String>),
    /// A number, for the numeric field.
    Num(Number),
}

impl Value {
    /// Parses a value's text form according to a field kind.
    ///
    /// String kinds accept the bracketed list syntax `["a", "b"]` (falling
    /// back to a plain string), numeric kinds require a number (a decimal
    /// point makes it a float), and date kinds keep the raw string for
    /// validation to check. Returns `None` only for unparseable numbers.
    pub fn parse(kind: FieldKind, text: &str) -> Option<Self> {
        match kind {
            FieldKind::Text | FieldKind::String => Some(Self::decode_list(text)),
            FieldKind::Numeric => {
                let text = text.trim();
                let number = if text.contains('.') {
                    Number::Float(text.parse().ok()?)
                } else {
                    Number::Int(text.parse().ok()?)
                };
                Some(Self::Num(number))
            }
            FieldKind::Date => Some(Self::Str(text.trim().to_string())),
        }
    }

    /// Decodes the bracketed list syntax, or passes the text through as a
    /// plain string.
    fn decode_list(text: &str) -> Self {
        match text
            .strip_prefix("[\"")
            .and_then(|inner| inner.strip_suffix("\"]"))
        {
            Some(inner) => Self::List(inner.split("\", \"").map(String::from).collect()),
            None => Self::Str(text.to_string()),
        }
    }

    /// Whether this is the empty string (the match-all marker under `all`).
    pub fn is_empty_str(&self) -> bool {
        matches!(self, Self::Str(s) if s.is_empty())
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl From<Vec<String>> for Value {
    fn from(list: Vec<String>) -> Self {
        Self::List(list)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Self::Num(Number::Int(i))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Self::Num(Number::Float(f))
    }
}

/// One field/comparison/value triple of a query.
///
/// Terms are only ever constructed through [`Query::append`], which
/// validates them first, so a `Term` held by a query is always legal for
/// its field.
///
/// [`Query::append`]: crate::Query::append
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Term {
    /// The field being compared.
    pub field: Field,
    /// How the value is compared.
    pub comparison: Comparison,
    /// The value compared against.
    pub value: Value,
}
