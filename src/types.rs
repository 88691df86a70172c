use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// A scalar cell or literal. Loaded CSV fields are always `Text`; numeric
/// interpretation happens only when a value is compared.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Integer(i64),
    Float(f64),
    Text(String),
}

/// Numeric reading of a value, produced by [`Value::coerce`].
#[derive(Debug, Clone, Copy, PartialEq)]
enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    fn as_f64(self) -> f64 {
        match self {
            Number::Int(i) => i as f64,
            Number::Float(f) => f,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(i) => write!(f, "{}", i),
            // Integral floats keep their decimal point so "3.0" prints as it was written
            Value::Float(x) if x.is_finite() && x.fract() == 0.0 => write!(f, "{:.1}", x),
            Value::Float(x) => write!(f, "{}", x),
            Value::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl Value {
    /// Numeric coercion of raw text: a token containing `.` is read as a float,
    /// anything else as an integer. Tokens that fail stay text. Integers past
    /// the `i64` range are still numbers and fall back to a float reading.
    pub fn coerce(raw: &str) -> Value {
        let token = raw.trim();
        if token.contains('.') {
            match token.parse::<f64>() {
                Ok(x) => Value::Float(x),
                Err(_) => Value::Text(raw.to_string()),
            }
        } else {
            match token.parse::<i64>() {
                Ok(i) => Value::Integer(i),
                Err(_) if is_integer_text(token) => match token.parse::<f64>() {
                    Ok(x) => Value::Float(x),
                    Err(_) => Value::Text(raw.to_string()),
                },
                Err(_) => Value::Text(raw.to_string()),
            }
        }
    }

    /// Reads a WHERE literal. Text wrapped in matching `'` or `"` loses its
    /// quotes and stays text; bare text goes through [`Value::coerce`].
    pub fn literal(raw: &str) -> Value {
        match unquote(raw) {
            Some(inner) => Value::Text(inner.to_string()),
            None => Value::coerce(raw),
        }
    }

    /// Only the empty string counts as absent.
    pub fn is_empty(&self) -> bool {
        matches!(self, Value::Text(s) if s.is_empty())
    }

    fn number(&self) -> Option<Number> {
        match self {
            Value::Integer(i) => Some(Number::Int(*i)),
            Value::Float(x) => Some(Number::Float(*x)),
            Value::Text(s) => match Value::coerce(s) {
                Value::Integer(i) => Some(Number::Int(i)),
                Value::Float(x) => Some(Number::Float(x)),
                Value::Text(_) => None,
            },
        }
    }
}

// Optional sign, then one or more ASCII digits
fn is_integer_text(token: &str) -> bool {
    let digits = token.strip_prefix(['+', '-']).unwrap_or(token);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

/// Inner text of a literal wrapped in matching `'` or `"`. A lone quote
/// character opens and closes itself, leaving the empty string.
pub fn unquote(raw: &str) -> Option<&str> {
    let bytes = raw.as_bytes();
    let (first, last) = match (bytes.first(), bytes.last()) {
        (Some(&first), Some(&last)) => (first, last),
        _ => return None,
    };
    if first != last || (first != b'\'' && first != b'"') {
        return None;
    }
    if bytes.len() == 1 {
        Some("")
    } else {
        Some(&raw[1..raw.len() - 1])
    }
}

/// Orders a stored value against a literal. Both sides are coerced
/// independently; when both are numeric they compare as numbers. Otherwise
/// the stored text compares against `literal_text`, the literal as written
/// (quotes stripped), so `007` stays `007`. `None` means the numbers are
/// unordered (NaN).
pub fn compare(stored: &Value, literal: &Value, literal_text: &str) -> Option<Ordering> {
    match (stored.number(), literal.number()) {
        (Some(Number::Int(a)), Some(Number::Int(b))) => Some(a.cmp(&b)),
        (Some(a), Some(b)) => a.as_f64().partial_cmp(&b.as_f64()),
        _ => Some(stored.to_string().as_str().cmp(literal_text)),
    }
}
