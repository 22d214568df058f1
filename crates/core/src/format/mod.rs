//! Locale-fixed display helpers shared by dashboards, forms and print views.
//!
//! Amounts follow `id-ID` conventions (`.` thousands, `,` decimals) and are
//! spelled out in English with a `Rupiah` suffix, as the printed vouchers do.

pub mod currency;
pub mod dates;
pub mod words;

pub use currency::{format_currency, format_currency_with_code, parse_currency};
pub use dates::{display_date, iso_date, iso_date_of, parse_flexible_timestamp};
pub use words::number_to_words;
