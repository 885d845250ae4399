//! Permissive numeric input coercion.
//!
//! Planner inputs arrive as free text from whatever front end is driving the
//! store. Anything that doesn't start with a number becomes zero.

use std::str::FromStr;

use rust_decimal::Decimal;

/// Parse a raw field value into a quantity.
///
/// - Empty or whitespace-only input is `0`.
/// - The longest leading `[+-]digits[.digits][e[+-]digits]` literal is used,
///   so `"12 packs"` is `12` and `"1e3"` is `1000`.
/// - A literal beyond the `Decimal` range saturates at `Decimal::MAX` or
///   `Decimal::MIN`; one too small to represent is `0`.
/// - Input with no numeric prefix is `0`.
///
/// Never fails; values are not range checked.
///
/// ```
/// use rust_decimal::Decimal;
/// use stock_planner_core::parse_quantity;
///
/// assert_eq!(parse_quantity("42"), Decimal::from(42));
/// assert_eq!(parse_quantity("-1.5"), Decimal::new(-15, 1));
/// assert_eq!(parse_quantity("12 packs"), Decimal::from(12));
/// assert_eq!(parse_quantity("1e30"), Decimal::MAX);
/// assert_eq!(parse_quantity("lots"), Decimal::ZERO);
/// assert_eq!(parse_quantity(""), Decimal::ZERO);
/// ```
#[must_use]
pub fn parse_quantity(raw: &str) -> Decimal {
    numeric_prefix(raw.trim()).map_or(Decimal::ZERO, parse_literal)
}

/// Parse a well-formed numeric literal, saturating when it is out of range.
fn parse_literal(literal: &str) -> Decimal {
    let unsigned = literal.strip_prefix('+').unwrap_or(literal);
    Decimal::from_str(unsigned)
        .or_else(|_| Decimal::from_scientific(unsigned))
        .unwrap_or_else(|_| saturate(unsigned))
}

/// Nearest representable value for a literal `Decimal` can't hold.
fn saturate(literal: &str) -> Decimal {
    let (negative, magnitude) = literal
        .strip_prefix('-')
        .map_or((false, literal), |rest| (true, rest));
    let (mantissa, exponent) = magnitude.split_once(['e', 'E']).unwrap_or((magnitude, "0"));
    let exponent = exponent.parse::<i64>().unwrap_or(if exponent.starts_with('-') {
        i64::MIN
    } else {
        i64::MAX
    });

    let (whole, fraction) = mantissa.split_once('.').unwrap_or((mantissa, ""));
    let whole = whole.trim_start_matches('0');
    let leading = if whole.is_empty() {
        let zeros = fraction.len() - fraction.trim_start_matches('0').len();
        if zeros == fraction.len() {
            return Decimal::ZERO;
        }
        i64::try_from(zeros).map_or(i64::MIN, |zeros| -zeros)
    } else {
        i64::try_from(whole.len()).unwrap_or(i64::MAX)
    };

    // Position of the first significant digit relative to the decimal point.
    if leading.saturating_add(exponent) > 0 {
        if negative { Decimal::MIN } else { Decimal::MAX }
    } else {
        Decimal::ZERO
    }
}

/// Longest leading numeric literal, if it has a digit.
///
/// An exponent is only taken directly after a digit and when at least one
/// digit follows the `e`.
fn numeric_prefix(s: &str) -> Option<&str> {
    let bytes = s.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }

    let mut digits = 0;
    let mut seen_dot = false;
    while let Some(&byte) = bytes.get(end) {
        match byte {
            b'0'..=b'9' => digits += 1,
            b'.' if !seen_dot => seen_dot = true,
            _ => break,
        }
        end += 1;
    }

    if digits == 0 {
        return None;
    }

    let after_digit = end
        .checked_sub(1)
        .and_then(|last| bytes.get(last))
        .is_some_and(u8::is_ascii_digit);
    if after_digit && matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut cursor = end + 1;
        if matches!(bytes.get(cursor), Some(b'+' | b'-')) {
            cursor += 1;
        }
        let exponent_digits = bytes
            .get(cursor..)
            .map_or(0, |rest| rest.iter().take_while(|b| b.is_ascii_digit()).count());
        if exponent_digits > 0 {
            end = cursor + exponent_digits;
        }
    }

    s.get(..end).map(|prefix| prefix.trim_end_matches('.'))
}
