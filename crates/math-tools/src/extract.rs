//! Number Extraction
//!
//! Three policies for pulling numbers out of free-form text. They disagree
//! on signs and fractions and are not interchangeable:
//!
//! | Policy | `"-10, -20, 2.5, 30"` |
//! |---|---|
//! | [`integer_tokens`] | `[30]` |
//! | [`decimal_numbers`] | `[-10.0, -20.0, 2.5, 30.0]` |
//! | [`digit_runs`] | `[10, 20, 2, 5, 30]` |

use std::num::ParseFloatError;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{MathError, Result};

/// Optional minus, digits, optional fraction
static DECIMAL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"-?\d+(?:\.\d+)?").expect("decimal pattern compiles"));

static DIGIT_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[0-9]+").expect("digit pattern compiles"));

/// Whitespace tokens made only of ASCII digits, after dropping commas.
///
/// Signed (`-30`), fractional (`2.5`) and punctuated (`4.`) tokens are
/// skipped entirely, so negative numbers never reach the arithmetic tools.
pub fn integer_tokens(text: &str) -> Result<Vec<i64>> {
    text.replace(',', "")
        .split_whitespace()
        .filter(|token| token.bytes().all(|b| b.is_ascii_digit()))
        .map(|token| token.parse::<i64>().map_err(|_| MathError::Overflow("extraction")))
        .collect()
}

/// Every signed, optionally fractional number in order of appearance.
pub fn decimal_numbers(text: &str) -> std::result::Result<Vec<f64>, ParseFloatError> {
    DECIMAL_PATTERN
        .find_iter(text)
        .map(|m| m.as_str().parse::<f64>())
        .collect()
}

/// Every run of ASCII digits, read as a non-negative integer.
pub fn digit_runs(text: &str) -> Result<Vec<i64>> {
    DIGIT_RUN
        .find_iter(text)
        .map(|m| m.as_str().parse::<i64>().map_err(|_| MathError::Overflow("extraction")))
        .collect()
}
