use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

const ONES: [&str; 10] = ["", "One", "Two", "Three", "Four", "Five", "Six", "Seven", "Eight", "Nine"];
const TEENS: [&str; 10] = [
    "Ten",
    "Eleven",
    "Twelve",
    "Thirteen",
    "Fourteen",
    "Fifteen",
    "Sixteen",
    "Seventeen",
    "Eighteen",
    "Nineteen",
];
const TENS: [&str; 10] =
    ["", "", "Twenty", "Thirty", "Forty", "Fifty", "Sixty", "Seventy", "Eighty", "Ninety"];
const SCALES: [(u128, &str); 4] = [
    (1_000_000_000_000, "Trillion"),
    (1_000_000_000, "Billion"),
    (1_000_000, "Million"),
    (1_000, "Thousand"),
];

/// Spells an amount the way payment vouchers print it, e.g.
/// `One Million Two Hundred and Ten Thousand Rupiah`.
pub fn number_to_words(amount: Decimal) -> String {
    // Round to cents before splitting so 1.999 carries into the whole part.
    let absolute = amount.abs().round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let whole = absolute.trunc();
    let cents = ((absolute - whole) * Decimal::ONE_HUNDRED).trunc().to_u128().unwrap_or(0);
    let whole = whole.to_u128().unwrap_or(0);

    let mut words = String::new();
    if amount.is_sign_negative() && (whole > 0 || cents > 0) {
        words.push_str("Minus ");
    }
    words.push_str(&convert(whole));
    words.push_str(" Rupiah");
    if cents > 0 {
        words.push_str(" and ");
        words.push_str(&convert(cents));
        words.push_str(" Cents");
    }
    words
}

fn convert(value: u128) -> String {
    if value == 0 {
        return "Zero".to_string();
    }

    let mut parts: Vec<String> = Vec::new();
    let mut remaining = value;
    for (scale, name) in SCALES {
        let count = remaining / scale;
        if count == 0 {
            continue;
        }
        // Counts above 999 only occur at the top scale.
        let count_words =
            if count >= 1_000 { convert(count) } else { below_one_thousand(count as u16) };
        parts.push(format!("{count_words} {name}"));
        remaining %= scale;
    }
    if remaining > 0 {
        parts.push(below_one_thousand(remaining as u16));
    }
    parts.join(" ")
}

fn below_one_thousand(value: u16) -> String {
    let value = usize::from(value);
    match value {
        0 => String::new(),
        1..=9 => ONES[value].to_string(),
        10..=19 => TEENS[value - 10].to_string(),
        20..=99 => {
            let ones = value % 10;
            if ones == 0 {
                TENS[value / 10].to_string()
            } else {
                format!("{} {}", TENS[value / 10], ONES[ones])
            }
        }
        _ => {
            let rest = value % 100;
            if rest == 0 {
                format!("{} Hundred", ONES[value / 100])
            } else {
                format!("{} Hundred and {}", ONES[value / 100], below_one_thousand(rest as u16))
            }
        }
    }
}
