use std::str::FromStr;

use docflow_core::format::{format_currency, number_to_words};
use rust_decimal::Decimal;

use crate::commands::{invalid_argument, CommandResult};

fn parse_amount(command: &str, raw: &str) -> Result<Decimal, CommandResult> {
    let trimmed = raw.trim();
    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .map_err(|_| invalid_argument(command, format!("`{raw}` is not a number")))
}

/// Spells the amount out the way vouchers print it.
pub fn words(raw: &str) -> CommandResult {
    match parse_amount("words", raw) {
        Ok(amount) => CommandResult::success("words", number_to_words(amount)),
        Err(result) => result,
    }
}

pub fn currency(raw: &str) -> CommandResult {
    match parse_amount("currency", raw) {
        Ok(amount) => CommandResult::success("currency", format_currency(amount)),
        Err(result) => result,
    }
}
