//! Numeric interpretation of scanned text.
//!
//! The scanner is purely lexical and reports every non-empty field as
//! `Text`. Callers that want numbers run this on top of it.

use crate::value::{Value, ValueKind};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Integer(i64),
    Float(f64),
}

#[inline]
pub fn is_digit(byte: u8) -> bool {
    byte.is_ascii_digit()
}

/// True for bytes a numeric literal may begin with: a digit, a sign or `.`.
#[inline]
pub fn is_number_start(byte: u8) -> bool {
    is_digit(byte) || matches!(byte, b'-' | b'+' | b'.')
}

/// Parses `bytes` as an integer, or failing that as a float.
///
/// Returns `None` unless the first byte passes [`is_number_start`], which
/// keeps words like `inf` and `NaN` as text.
pub fn parse_number(bytes: &[u8]) -> Option<Number> {
    let first = *bytes.first()?;
    if !is_number_start(first) {
        return None;
    }

    let text = std::str::from_utf8(bytes).ok()?;
    if let Ok(n) = text.parse::<i64>() {
        return Some(Number::Integer(n));
    }

    // `-inf` and `+nan` start with a sign but are not numerals.
    if !bytes.iter().any(|&b| is_digit(b)) {
        return None;
    }
    text.parse::<f64>().ok().map(Number::Float)
}

impl Value<'_> {
    /// Reads a `Text` value as a number. Fields holding escaped quotes
    /// never qualify.
    pub fn to_number(&self) -> Option<Number> {
        if self.kind() != ValueKind::Text || self.has_escapes() {
            return None;
        }
        parse_number(self.content())
    }
}
