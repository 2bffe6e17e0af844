//! Text-to-value coercion for exchange table cells.
//!
//! Exchange pages render numbers with comma-grouped thousands and a dot
//! decimal (`20,000.78`), and use placeholder tokens when a value is not
//! available. Every numeric column goes through this module so the rules
//! live in one place:
//!
//! | Input | [`to_float`] | [`to_integer`] |
//! |-------|--------------|----------------|
//! | `20,000.78` | `20000.78` | error |
//! | `1 234` | error | `1234` |
//! | `--`, `N/A` | `NaN` | error |
//! | `abc` | error | error |
//!
//! Sentinel tokens are matched exactly as published, after trimming.

use crate::error::NormalizeError;

/// Thousands separator used by both exchanges.
const THOUSANDS_SEPARATOR: char = ',';

/// Placeholders the exchanges print for unavailable values.
pub const MISSING_VALUE_SENTINELS: [&str; 2] = ["--", "N/A"];

/// Removes thousands separators. Decimal points are left untouched.
pub fn strip_separators(text: &str) -> String {
    text.chars().filter(|ch| *ch != THOUSANDS_SEPARATOR).collect()
}

/// Trims and collapses internal whitespace runs into a single space.
pub fn clean_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Returns `true` when the trimmed text is one of the missing-value tokens.
pub fn is_missing_sentinel(text: &str) -> bool {
    let trimmed = text.trim();
    MISSING_VALUE_SENTINELS.contains(&trimmed)
}

/// Parses a decimal cell. Missing-value sentinels become `f64::NAN`.
pub fn to_float(text: &str) -> Result<f64, NormalizeError> {
    let cleaned = clean_text(text);
    if is_missing_sentinel(&cleaned) {
        return Ok(f64::NAN);
    }

    let digits = strip_separators(&cleaned);
    let is_numeric = !digits.is_empty()
        && digits
            .chars()
            .all(|ch| ch.is_ascii_digit() || matches!(ch, '.' | '+' | '-' | 'e' | 'E'));
    if !is_numeric {
        return Err(NormalizeError::InvalidFloat {
            value: text.to_owned(),
        });
    }

    digits.parse::<f64>().map_err(|_| NormalizeError::InvalidFloat {
        value: text.to_owned(),
    })
}

/// Parses a percentage cell such as `4.39%`; the sign is optional.
pub fn to_percent(text: &str) -> Result<f64, NormalizeError> {
    let cleaned = clean_text(text);
    let number = cleaned.strip_suffix('%').map(str::trim_end).unwrap_or(&cleaned);
    to_float(number).map_err(|_| NormalizeError::InvalidFloat {
        value: text.to_owned(),
    })
}

/// Parses a 32-bit integer cell, ignoring separators and embedded whitespace.
pub fn to_integer(text: &str) -> Result<i32, NormalizeError> {
    integer_digits(text)
        .parse::<i32>()
        .map_err(|_| NormalizeError::InvalidInteger {
            value: text.to_owned(),
        })
}

/// Parses a 64-bit integer cell, ignoring separators and embedded whitespace.
pub fn to_wide_integer(text: &str) -> Result<i64, NormalizeError> {
    integer_digits(text)
        .parse::<i64>()
        .map_err(|_| NormalizeError::InvalidInteger {
            value: text.to_owned(),
        })
}

fn integer_digits(text: &str) -> String {
    text.chars()
        .filter(|ch| !ch.is_whitespace() && *ch != THOUSANDS_SEPARATOR)
        .collect()
}
