//! Conversions between text, `f64` and `Decimal`.

use std::convert::TryFrom;
use std::str::FromStr;

use rust_decimal::prelude::*;
use rust_decimal::RoundingStrategy;

use crate::error::EvalError;

/// Most significant digits a `Decimal` mantissa can carry.
const MAX_DIGITS: usize = 29;

/// Decimal exponents at or beyond these bounds render in scientific notation.
const EXPONENT_AT_LEAST: i64 = 21;
const EXPONENT_AT_MOST: i64 = -7;

/// Parses a literal such as `1.5`, `.5`, `1.2e-5` or `3p4`, keeping every digit.
///
/// The `e` suffix scales by powers of ten, the `p` suffix by powers of two.
/// Literals a `Decimal` cannot hold exactly are rejected, never rounded.
pub fn parse_literal(raw: &str) -> Result<Decimal, EvalError> {
    let invalid = || EvalError::InvalidLiteral(String::from(raw));

    let (rest, binary_exponent) = split_suffix(raw, 'p').ok_or_else(invalid)?;
    let (mantissa, decimal_exponent) = split_suffix(rest, 'e').ok_or_else(invalid)?;

    let value = scale_by_ten(mantissa, decimal_exponent).ok_or_else(invalid)?;
    scale_by_two(value, binary_exponent).ok_or_else(invalid)
}

/// Splits `raw` at `marker` into the part before it and the signed exponent after it.
fn split_suffix(raw: &str, marker: char) -> Option<(&str, i64)> {
    match raw.find(marker) {
        Some(index) => {
            let exponent = raw[index + 1..].parse::<i64>().ok()?;
            Some((&raw[..index], exponent))
        }
        None => Some((raw, 0)),
    }
}

/// `mantissa × 10^exponent` for a digit string with an optional `.`.
fn scale_by_ten(mantissa: &str, exponent: i64) -> Option<Decimal> {
    let (integer, fraction) = match mantissa.find('.') {
        Some(index) => (&mantissa[..index], &mantissa[index + 1..]),
        None => (mantissa, ""),
    };
    if integer.is_empty() && fraction.is_empty() {
        return None;
    }
    if !integer.chars().chain(fraction.chars()).all(|chr| chr.is_ascii_digit()) {
        return None;
    }

    let digits = format!("{}{}", integer, fraction);
    let significant = digits.trim_start_matches('0');
    let kept = significant.trim_end_matches('0');
    if kept.is_empty() {
        return Some(Decimal::ZERO);
    }
    if kept.len() > MAX_DIGITS {
        return None;
    }

    // value = kept × 10^power
    let dropped_zeros = (significant.len() - kept.len()) as i64;
    let power = exponent
        .checked_add(dropped_zeros)?
        .checked_sub(fraction.len() as i64)?;
    let mantissa = kept.parse::<i128>().ok()?;

    if power >= 0 {
        let factor = 10i128.checked_pow(u32::try_from(power).ok()?)?;
        exact(mantissa.checked_mul(factor)?, 0)
    } else {
        exact(mantissa, u32::try_from(-power).ok()?)
    }
}

/// `value × 2^exponent`, computed as `value × 5^-exponent / 10^-exponent`
/// for negative exponents so no digit is lost.
fn scale_by_two(value: Decimal, exponent: i64) -> Option<Decimal> {
    if exponent == 0 || value.is_zero() {
        return Some(value);
    }
    let value = value.normalize();
    let shift = u32::try_from(exponent.checked_abs()?).ok()?;

    if exponent > 0 {
        exact(value.mantissa().checked_mul(2i128.checked_pow(shift)?)?, value.scale())
    } else {
        exact(
            value.mantissa().checked_mul(5i128.checked_pow(shift)?)?,
            value.scale().checked_add(shift)?,
        )
    }
}

/// `mantissa / 10^scale`, if a `Decimal` holds it without rounding.
fn exact(mut mantissa: i128, mut scale: u32) -> Option<Decimal> {
    while scale > 0 && mantissa % 10 == 0 {
        mantissa /= 10;
        scale -= 1;
    }
    Decimal::try_from_i128_with_scale(mantissa, scale).ok()
}

/// Rounds an operation result to `precision` significant digits.
pub fn round_significant(value: Decimal, precision: u32) -> Decimal {
    value
        .round_sf_with_strategy(precision, RoundingStrategy::MidpointAwayFromZero)
        .unwrap_or(value)
}

/// Converts through the shortest decimal text that round-trips the `f64`.
pub fn from_f64(value: f64, function: &'static str) -> Result<Decimal, EvalError> {
    if !value.is_finite() {
        return Err(EvalError::Domain {
            function,
            input: value.to_string(),
        });
    }
    Decimal::from_str(&value.to_string())
        .ok()
        .or_else(|| Decimal::from_f64(value))
        .ok_or(EvalError::Overflow(function))
}

pub fn to_f64(value: Decimal, function: &'static str) -> Result<f64, EvalError> {
    value.to_f64().ok_or(EvalError::Overflow(function))
}

/// Renders `value` with every digit it carries and no superfluous zeros.
pub fn to_canonical_string(value: Decimal) -> String {
    if value.is_zero() {
        return String::from("0");
    }

    let normalized = value.normalize();

    let digits = normalized.mantissa().unsigned_abs().to_string();
    let exponent = digits.len() as i64 - 1 - i64::from(normalized.scale());

    if exponent < EXPONENT_AT_LEAST && exponent > EXPONENT_AT_MOST {
        return normalized.to_string();
    }

    let significant = digits.trim_end_matches('0');
    let sign = if normalized.is_sign_negative() { "-" } else { "" };
    let (first, rest) = significant.split_at(1);
    let fraction = if rest.is_empty() {
        String::new()
    } else {
        format!(".{}", rest)
    };
    let exponent_sign = if exponent < 0 { "-" } else { "+" };

    format!(
        "{}{}{}e{}{}",
        sign,
        first,
        fraction,
        exponent_sign,
        exponent.abs()
    )
}
