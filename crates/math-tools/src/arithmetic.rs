//! Arithmetic Reductions
//!
//! Pure text-in, result-out operations. Each one extracts a number sequence
//! and reduces it; order of appearance is operand order.

use agent_core::StructuredResult;

use crate::error::{MathError, Result};
use crate::extract::{decimal_numbers, digit_runs, integer_tokens};

/// Reply of the decimal sum when nothing matched
pub const NO_NUMBERS_FOUND: &str = "No numbers found in input.";

/// Sum of integer tokens, as text: `"The sum is 6"`.
pub fn add_numbers(text: &str) -> Result<String> {
    let total = checked_sum(&integer_tokens(text)?)?;
    Ok(format!("The sum is {total}"))
}

/// Sum of signed decimals, as text.
///
/// Parse failures are reported in the returned text, never as an error.
pub fn sum_decimal_numbers(text: &str) -> String {
    match decimal_numbers(text) {
        Ok(numbers) if numbers.is_empty() => NO_NUMBERS_FOUND.to_string(),
        Ok(numbers) => {
            let total = numbers.iter().fold(0.0_f64, |acc, n| acc + n);
            format!("The sum is {total:?}")
        }
        Err(e) => format!("Error during summation: {e}"),
    }
}

/// Sum of every digit run as a bare number. Minus signs are ignored.
pub fn sum_numbers_from_text(text: &str) -> Result<i64> {
    checked_sum(&digit_runs(text)?)
}

/// `-n0 - n1 - ... - nk`; zero when no numbers are found.
pub fn subtract_numbers(text: &str) -> Result<StructuredResult> {
    let numbers = integer_tokens(text)?;
    let Some((first, rest)) = numbers.split_first() else {
        return Ok(StructuredResult::new(0));
    };

    // tokens are unsigned, so the negation cannot overflow
    let result = rest
        .iter()
        .try_fold(-first, |acc, n| acc.checked_sub(*n))
        .ok_or(MathError::Overflow("subtraction"))?;

    Ok(StructuredResult::new(result))
}

/// Product of all numbers; one when no numbers are found.
pub fn multiply_numbers(text: &str) -> Result<StructuredResult> {
    let product = integer_tokens(text)?
        .iter()
        .try_fold(1_i64, |acc, n| acc.checked_mul(*n))
        .ok_or(MathError::Overflow("multiplication"))?;

    Ok(StructuredResult::new(product))
}

/// First number divided by each following number in turn.
///
/// A lone number is returned unchanged as an integer; any division yields a
/// float. A zero divisor is an error.
#[allow(clippy::cast_precision_loss)]
pub fn divide_numbers(text: &str) -> Result<StructuredResult> {
    let numbers = integer_tokens(text)?;
    let Some((&first, rest)) = numbers.split_first() else {
        return Ok(StructuredResult::new(0));
    };

    if rest.is_empty() {
        return Ok(StructuredResult::new(first));
    }
    if rest.contains(&0) {
        return Err(MathError::DivisionByZero);
    }

    let quotient = rest.iter().fold(first as f64, |acc, &n| acc / n as f64);
    Ok(StructuredResult::new(quotient))
}

/// First number raised to the second; later numbers are ignored.
///
/// Zero when no numbers are found. A single number is an error since there
/// is no exponent.
pub fn calculate_power(text: &str) -> Result<StructuredResult> {
    let numbers = integer_tokens(text)?;
    match numbers.as_slice() {
        [] => Ok(StructuredResult::new(0)),
        [_] => Err(MathError::MissingOperand {
            operation: "power",
            needed: 2,
            found: 1,
        }),
        [base, exponent, ..] => checked_power(*base, *exponent).map(StructuredResult::new),
    }
}

fn checked_power(base: i64, exponent: i64) -> Result<i64> {
    match (base, exponent) {
        (_, 0) | (1, _) => Ok(1),
        (0, _) => Ok(0),
        _ => u32::try_from(exponent)
            .ok()
            .and_then(|exp| base.checked_pow(exp))
            .ok_or(MathError::Overflow("power")),
    }
}

fn checked_sum(numbers: &[i64]) -> Result<i64> {
    numbers
        .iter()
        .try_fold(0_i64, |acc, n| acc.checked_add(*n))
        .ok_or(MathError::Overflow("addition"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use agent_core::Number;

    #[test]
    fn test_add_numbers() {
        assert_eq!(add_numbers("1, 2, 3").unwrap(), "The sum is 6");
        assert_eq!(add_numbers("nothing to add").unwrap(), "The sum is 0");
        assert_eq!(add_numbers("-10, -20, -30").unwrap(), "The sum is 0");
    }

    #[test]
    fn test_sum_decimal_numbers() {
        assert_eq!(sum_decimal_numbers("-10, -20, -30"), "The sum is -60.0");
        assert_eq!(sum_decimal_numbers("1.5 plus 2.25"), "The sum is 3.75");
        assert_eq!(sum_decimal_numbers("no digits"), NO_NUMBERS_FOUND);
    }

    #[test]
    fn test_sum_decimal_numbers_reports_parse_error() {
        let reply = sum_decimal_numbers("4 and \u{0665}");
        assert!(reply.starts_with("Error during summation: "), "{reply}");
    }

    #[test]
    fn test_sign_policies_diverge() {
        let text = "-10, -20, -30";
        assert_eq!(sum_decimal_numbers(text), "The sum is -60.0");
        assert_eq!(sum_numbers_from_text(text).unwrap(), 60);
    }

    #[test]
    fn test_sum_numbers_from_text() {
        assert_eq!(sum_numbers_from_text("4, 5 and 6").unwrap(), 15);
        assert_eq!(sum_numbers_from_text("").unwrap(), 0);
    }

    #[test]
    fn test_subtract_numbers() {
        assert_eq!(subtract_numbers("100, 20, 10").unwrap(), StructuredResult::new(-130));
        assert_eq!(subtract_numbers("7").unwrap(), StructuredResult::new(-7));
        assert_eq!(subtract_numbers("none").unwrap(), StructuredResult::new(0));
        // signed tokens are dropped, not negated twice
        assert_eq!(subtract_numbers("-30, 5").unwrap(), StructuredResult::new(-5));
    }

    #[test]
    fn test_multiply_numbers() {
        assert_eq!(multiply_numbers("2, 3, 4").unwrap(), StructuredResult::new(24));
        assert_eq!(multiply_numbers("").unwrap(), StructuredResult::new(1));
        assert_eq!(
            multiply_numbers("4294967296 4294967296").unwrap_err(),
            MathError::Overflow("multiplication")
        );
    }

    #[test]
    fn test_divide_numbers() {
        let result = divide_numbers("100, 5, 2").unwrap();
        assert_eq!(result, StructuredResult::new(10.0));
        assert!(!result.result.is_integer());

        assert_eq!(divide_numbers("1 4").unwrap().result, Number::Float(0.25));
        assert_eq!(divide_numbers("42").unwrap().result, Number::Int(42));
        assert_eq!(divide_numbers("no input").unwrap(), StructuredResult::new(0));
    }

    #[test]
    fn test_divide_by_zero_is_an_error() {
        assert_eq!(divide_numbers("10, 0").unwrap_err(), MathError::DivisionByZero);
        assert_eq!(divide_numbers("10 0 5").unwrap_err(), MathError::DivisionByZero);
        assert_eq!(divide_numbers("0 5").unwrap(), StructuredResult::new(0.0));
    }

    #[test]
    fn test_calculate_power() {
        assert_eq!(calculate_power("2, 3").unwrap(), StructuredResult::new(8));
        assert_eq!(calculate_power("2 to the 10").unwrap(), StructuredResult::new(1024));
        assert_eq!(calculate_power("2 3 4").unwrap(), StructuredResult::new(8));
        assert_eq!(calculate_power("").unwrap(), StructuredResult::new(0));
        assert_eq!(calculate_power("5 0").unwrap(), StructuredResult::new(1));
        assert_eq!(calculate_power("1 99999999999").unwrap(), StructuredResult::new(1));
    }

    #[test]
    fn test_calculate_power_errors() {
        assert_eq!(
            calculate_power("7").unwrap_err(),
            MathError::MissingOperand {
                operation: "power",
                needed: 2,
                found: 1
            }
        );
        assert_eq!(calculate_power("10 30").unwrap_err(), MathError::Overflow("power"));
    }

    #[test]
    fn test_empty_input_defaults() {
        for text in ["", "   ", "no digits at all", "-5 -6"] {
            assert_eq!(subtract_numbers(text).unwrap(), StructuredResult::new(0));
            assert_eq!(multiply_numbers(text).unwrap(), StructuredResult::new(1));
            assert_eq!(divide_numbers(text).unwrap(), StructuredResult::new(0));
        }
    }

    #[test]
    fn test_repeat_calls_agree() {
        let text = "100, 5, 2";
        assert_eq!(divide_numbers(text).unwrap(), divide_numbers(text).unwrap());
        assert_eq!(sum_decimal_numbers(text), sum_decimal_numbers(text));
    }
}
