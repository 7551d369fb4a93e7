//! Type Coercion Codec - attribute strings <-> typed property values.
//!
//! Attributes are always strings; properties are [`serde_json::Value`]s.
//!
//! # Decoding precedence
//!
//! 1. `"true"` / `"false"` become booleans
//! 2. anything that reads as a finite number becomes a number
//! 3. anything that parses as JSON becomes that structure
//! 4. otherwise the string is returned unchanged
//!
//! Boolean and numeric literals always win: `"1"` is the number 1, never the
//! one-character string. A numeric-looking string property therefore does not
//! round-trip as a string. That ambiguity is load-bearing and kept as is.
//!
//! # Encoding
//!
//! Booleans become `"true"` / `"false"`, numbers and strings that read as a
//! number are written in numeric form, everything else is serialized as JSON
//! (plain strings come out quoted). Neither direction ever fails.

use serde_json::{Number, Value};

// =============================================================================
// Decode
// =============================================================================

/// Decode an attribute string into a property value.
pub fn decode(raw: &str) -> Value {
    match raw {
        "true" => return Value::Bool(true),
        "false" => return Value::Bool(false),
        _ => {}
    }

    // Blank strings would read as 0; they stay strings
    if !raw.trim().is_empty() {
        if let Some(n) = coerce_number(raw).filter(|n| n.is_finite()) {
            return number_value(n);
        }
    }

    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

/// Decode an attribute that may be absent. A missing attribute is `Null`.
pub fn decode_optional(raw: Option<&str>) -> Value {
    raw.map(decode).unwrap_or(Value::Null)
}

// =============================================================================
// Encode
// =============================================================================

/// Encode a property value into its attribute string.
pub fn encode(value: &Value) -> String {
    match value {
        Value::Bool(true) => "true".to_string(),
        Value::Bool(false) => "false".to_string(),
        Value::Number(n) => format_json_number(n),
        Value::String(s) if coerce_number(s).is_some() => s.clone(),
        _ => serde_json::to_string(value).unwrap_or_else(|err| {
            log::warn!("attribute serialization failed, passing value through: {err}");
            match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            }
        }),
    }
}

// =============================================================================
// Numbers
// =============================================================================

/// Read a string the way a numeric attribute is read.
///
/// Surrounding whitespace is ignored and a blank string reads as 0.
/// Accepts decimal and exponent forms, `0x`/`0o`/`0b` prefixed integers and
/// `Infinity`. Returns `None` when the text is not a number at all.
pub(crate) fn coerce_number(raw: &str) -> Option<f64> {
    let text = raw.trim();
    if text.is_empty() {
        return Some(0.0);
    }

    match text {
        "Infinity" | "+Infinity" => return Some(f64::INFINITY),
        "-Infinity" => return Some(f64::NEG_INFINITY),
        _ => {}
    }

    for (prefix, radix) in [("0x", 16), ("0X", 16), ("0o", 8), ("0O", 8), ("0b", 2), ("0B", 2)] {
        if let Some(digits) = text.strip_prefix(prefix) {
            return u64::from_str_radix(digits, radix).ok().map(|v| v as f64);
        }
    }

    // f64::from_str also takes "inf" and "NaN", which are not numbers here
    let plain = text
        .bytes()
        .all(|b| b.is_ascii_digit() || matches!(b, b'.' | b'e' | b'E' | b'+' | b'-'));
    if !plain {
        return None;
    }
    text.parse::<f64>().ok()
}

/// Integral values within the exact range become JSON integers.
fn number_value(n: f64) -> Value {
    const MAX_EXACT: f64 = 9_007_199_254_740_992.0;

    if n.fract() == 0.0 && n.abs() <= MAX_EXACT {
        return Value::from(n as i64);
    }
    Number::from_f64(n).map(Value::Number).unwrap_or(Value::Null)
}

fn format_json_number(n: &Number) -> String {
    if let Some(i) = n.as_i64() {
        return i.to_string();
    }
    if let Some(u) = n.as_u64() {
        return u.to_string();
    }
    n.as_f64().map(format_float).unwrap_or_else(|| n.to_string())
}

/// Shortest numeric text: integral floats drop the fraction, -0 prints as 0.
fn format_float(f: f64) -> String {
    if f == 0.0 {
        return "0".to_string();
    }
    if f.fract() == 0.0 && f.abs() < 1e21 {
        return format!("{f:.0}");
    }
    format!("{f}")
}
