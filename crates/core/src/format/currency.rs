use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};

const THOUSANDS_SEPARATOR: char = '.';
const DECIMAL_SEPARATOR: char = ',';

/// Formats an amount with two fraction digits under `id-ID` rules.
pub fn format_currency(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let plain = format!("{:.2}", rounded.abs());
    let (integer, fraction) = plain.split_once('.').unwrap_or((plain.as_str(), "00"));

    let mut output = String::with_capacity(plain.len() + integer.len() / 3 + 1);
    if rounded.is_sign_negative() && !rounded.is_zero() {
        output.push('-');
    }
    output.push_str(&group_thousands(integer));
    output.push(DECIMAL_SEPARATOR);
    output.push_str(fraction);
    output
}

pub fn format_currency_with_code(amount: Decimal, currency_code: &str) -> String {
    format!("{} {}", currency_code.trim().to_ascii_uppercase(), format_currency(amount))
}

/// Inverse of [`format_currency`]. Anything unparseable reads as zero.
///
/// `.` is always treated as a thousands separator, so plain dotted decimals
/// such as `1234.5` are ambiguous and do not round-trip.
pub fn parse_currency(formatted: &str) -> Decimal {
    let normalized: String = formatted
        .chars()
        .filter(|ch| ch.is_ascii_digit() || matches!(ch, '-' | ',' | '.'))
        .filter(|ch| *ch != THOUSANDS_SEPARATOR)
        .map(|ch| if ch == DECIMAL_SEPARATOR { '.' } else { ch })
        .collect();

    if normalized.is_empty() {
        return Decimal::ZERO;
    }
    Decimal::from_str(&normalized).unwrap_or(Decimal::ZERO)
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(THOUSANDS_SEPARATOR);
        }
        grouped.push(digit);
    }
    grouped
}
