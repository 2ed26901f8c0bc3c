//! SUI / MIST conversions.
//!
//! Amounts in SUI arrive as JSON numbers. They are converted from their
//! decimal text form rather than through floating point multiplication, so
//! `0.1` SUI is exactly `100000000` MIST. Fractions of a MIST are truncated.

use thiserror::Error;

pub const MIST_PER_SUI: u64 = 1_000_000_000;
const SUI_DECIMALS: i64 = 9;
/// u64::MAX has 20 digits; anything longer cannot fit after scaling.
const MAX_SIGNIFICANT_DIGITS: usize = 20;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum UnitError {
    #[error("invalid MIST amount '{0}': expected an unsigned integer")]
    InvalidMist(String),
    #[error("invalid SUI amount '{0}'")]
    InvalidSui(String),
    #[error("amount must not be negative")]
    Negative,
    #[error("amount is too large")]
    Overflow,
}

/// Parses a MIST amount given as a base-10 unsigned integer string.
pub fn parse_mist(input: &str) -> Result<u64, UnitError> {
    let trimmed = input.trim();
    if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return Err(UnitError::InvalidMist(input.to_string()));
    }
    trimmed.parse().map_err(|_| UnitError::Overflow)
}

/// Nearest floating point SUI value of a MIST amount.
pub fn mist_to_sui(mist: u64) -> f64 {
    mist as f64 / MIST_PER_SUI as f64
}

/// Exact nine-decimal rendering, e.g. `1.500000000`.
pub fn format_sui(mist: u64) -> String {
    format!("{}.{:09}", mist / MIST_PER_SUI, mist % MIST_PER_SUI)
}

/// Converts a decimal SUI amount (plain or exponent notation) to MIST,
/// truncating anything below one MIST.
pub fn sui_to_mist(input: &str) -> Result<u64, UnitError> {
    let invalid = || UnitError::InvalidSui(input.to_string());
    let text = input.trim();

    let (negative, unsigned) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text.strip_prefix('+').unwrap_or(text)),
    };

    let (mantissa, exponent) = match unsigned.find(|c: char| c == 'e' || c == 'E') {
        Some(idx) => {
            let exponent: i64 = unsigned[idx + 1..].parse().map_err(|_| invalid())?;
            (&unsigned[..idx], exponent)
        }
        None => (unsigned, 0),
    };

    let (int_part, frac_part) = mantissa.split_once('.').unwrap_or((mantissa, ""));
    if int_part.is_empty() && frac_part.is_empty() {
        return Err(invalid());
    }
    if !int_part
        .bytes()
        .chain(frac_part.bytes())
        .all(|b| b.is_ascii_digit())
    {
        return Err(invalid());
    }

    let digits = format!("{}{}", int_part, frac_part);
    let digits = digits.trim_start_matches('0');
    if digits.is_empty() {
        return Ok(0);
    }
    if negative {
        return Err(UnitError::Negative);
    }

    // value = digits * 10^scale MIST
    let scale = exponent
        .checked_add(SUI_DECIMALS)
        .and_then(|s| s.checked_sub(frac_part.len() as i64))
        .ok_or(UnitError::Overflow)?;

    let kept = if scale < 0 {
        let drop = usize::try_from(scale.unsigned_abs()).unwrap_or(usize::MAX);
        if drop >= digits.len() {
            return Ok(0);
        }
        &digits[..digits.len() - drop]
    } else {
        digits
    };

    if kept.len() > MAX_SIGNIFICANT_DIGITS {
        return Err(UnitError::Overflow);
    }
    let mut value: u128 = kept.parse().map_err(|_| invalid())?;
    for _ in 0..scale.max(0) {
        value = value.checked_mul(10).ok_or(UnitError::Overflow)?;
        if value > u64::MAX as u128 {
            return Err(UnitError::Overflow);
        }
    }
    u64::try_from(value).map_err(|_| UnitError::Overflow)
}
