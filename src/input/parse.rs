//! Raw value coercion at the input boundary.
//!
//! Coders hand back numbers, numeric strings, blanks, booleans and the
//! occasional free-text answer. Only the first two become ratings. Nothing
//! that fails to parse is ever turned into a zero.

use crate::core::{Rating, RatingValue};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq)]
pub enum ParsedRating {
    Parsed(RatingValue),
    /// Blank cell, `null` or absent key
    Empty,
    /// Present but not numeric; keeps the raw text for diagnostics
    Invalid(String),
}

impl ParsedRating {
    pub fn into_rating(self) -> Rating {
        match self {
            ParsedRating::Parsed(v) => Some(v),
            ParsedRating::Empty | ParsedRating::Invalid(_) => None,
        }
    }

    pub fn is_invalid(&self) -> bool {
        matches!(self, ParsedRating::Invalid(_))
    }
}

pub fn parse_rating(value: &Value) -> ParsedRating {
    match value {
        Value::Null => ParsedRating::Empty,
        Value::Bool(b) => ParsedRating::Parsed(bool_rating(*b)),
        Value::Number(n) => n
            .as_f64()
            .and_then(RatingValue::new)
            .map(ParsedRating::Parsed)
            .unwrap_or_else(|| ParsedRating::Invalid(n.to_string())),
        Value::String(s) => parse_rating_str(s),
        other => ParsedRating::Invalid(other.to_string()),
    }
}

/// CSV cells and string-typed JSON values. `nan` counts as blank since
/// spreadsheet exports write it for empty cells.
pub fn parse_rating_str(raw: &str) -> ParsedRating {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("nan") {
        return ParsedRating::Empty;
    }
    match trimmed.to_ascii_lowercase().as_str() {
        "true" => return ParsedRating::Parsed(bool_rating(true)),
        "false" => return ParsedRating::Parsed(bool_rating(false)),
        _ => {}
    }
    trimmed
        .parse::<f64>()
        .ok()
        .and_then(RatingValue::new)
        .map(ParsedRating::Parsed)
        .unwrap_or_else(|| ParsedRating::Invalid(raw.to_string()))
}

fn bool_rating(b: bool) -> RatingValue {
    if b {
        RatingValue::ONE
    } else {
        RatingValue::ZERO
    }
}
