//! Condition matching and row location
//!
//! Cells are untyped text. A condition compares numerically by default: the
//! cell and the expected value are both coerced to numbers the way a
//! JavaScript `Number()` call would, and compared for equality. Text that is
//! not a number coerces to NaN, which equals nothing, so a numeric condition
//! on a text cell never matches. Callers that need text equality opt in per
//! condition with [`Comparison::Text`].

use log::warn;
use serde_json::Value;
use std::collections::HashMap;

use super::models::{Comparison, Condition, Row, cell_text};

/// Column name -> position, resolved by first occurrence in the header row
#[derive(Debug, Clone)]
pub struct HeaderIndex<'a> {
    positions: HashMap<&'a str, usize>,
}

impl<'a> HeaderIndex<'a> {
    pub fn new(header: &'a [String]) -> Self {
        let mut positions = HashMap::with_capacity(header.len());
        for (i, name) in header.iter().enumerate() {
            positions.entry(name.as_str()).or_insert(i);
        }
        Self { positions }
    }

    pub fn position(&self, column: &str) -> Option<usize> {
        self.positions.get(column).copied()
    }
}

/// Whether `row` satisfies every condition (an empty set matches any row)
pub fn matches(header: &HeaderIndex<'_>, row: &[String], conditions: &[Condition]) -> bool {
    conditions
        .iter()
        .all(|condition| condition_holds(header, row, condition))
}

fn condition_holds(header: &HeaderIndex<'_>, row: &[String], condition: &Condition) -> bool {
    let Some(position) = header.position(&condition.column) else {
        warn!(
            "Condition column '{}' not found in header row",
            condition.column
        );
        return false;
    };

    let cell = row.get(position).map(|c| c.trim());

    match condition.compare {
        Comparison::Numeric => {
            let actual = cell.map(coerce_number).unwrap_or(f64::NAN);
            actual == value_to_number(&condition.value)
        }
        Comparison::Text => cell == Some(cell_text(&condition.value).trim()),
    }
}

/// Index of the first row in `grid` satisfying `conditions`
///
/// The header row takes part in the scan like any other row.
pub fn locate(grid: &[Row], header: &HeaderIndex<'_>, conditions: &[Condition]) -> Option<usize> {
    grid.iter().position(|row| matches(header, row, conditions))
}

/// Numeric value of a JSON value: numbers as-is, text coerced, booleans 1/0, null 0
pub fn value_to_number(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().unwrap_or(f64::NAN),
        Value::String(s) => coerce_number(s),
        Value::Bool(b) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
        Value::Null => 0.0,
        Value::Array(_) | Value::Object(_) => f64::NAN,
    }
}

/// Coerce text to a number
///
/// Surrounding whitespace is ignored, empty text is 0, `Infinity` is
/// accepted with an optional sign, and `0x`/`0o`/`0b` prefixes read unsigned
/// integers. Anything else that is not a decimal literal is NaN.
pub fn coerce_number(text: &str) -> f64 {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return 0.0;
    }

    match trimmed {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }

    if let Some(value) = parse_prefixed_integer(trimmed) {
        return value;
    }

    // `str::parse` also accepts "inf" and "nan"; decimal literals use only these bytes
    let decimal_bytes = trimmed
        .bytes()
        .all(|b| b.is_ascii_digit() || matches!(b, b'+' | b'-' | b'.' | b'e' | b'E'));
    if !decimal_bytes {
        return f64::NAN;
    }

    trimmed.parse::<f64>().unwrap_or(f64::NAN)
}

fn parse_prefixed_integer(text: &str) -> Option<f64> {
    let radix = match text.get(..2)? {
        "0x" | "0X" => 16,
        "0o" | "0O" => 8,
        "0b" | "0B" => 2,
        _ => return None,
    };

    let digits = &text[2..];
    if digits.is_empty() {
        return Some(f64::NAN);
    }

    let value = digits.chars().try_fold(0.0_f64, |acc, c| {
        c.to_digit(radix)
            .map(|d| acc * f64::from(radix) + f64::from(d))
    });
    Some(value.unwrap_or(f64::NAN))
}
