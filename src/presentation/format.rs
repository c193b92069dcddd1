//! Ghanaian (`en-GH`) money and date formatting.

use bigdecimal::{BigDecimal, RoundingMode};
use chrono::{DateTime, NaiveDate, Utc};

pub const LOCALE: &str = "en-GH";
pub const CURRENCY: &str = "GHS";

const CEDI_SIGN: &str = "GH₵";

/// Formats an amount as Ghanaian cedis, e.g. `GH₵1,234.50`.
pub fn format_cedis(amount: &BigDecimal) -> String {
    let (cents, _) = amount
        .with_scale_round(2, RoundingMode::HalfUp)
        .into_bigint_and_exponent();
    let cents = cents.to_string();
    let (sign, digits) = match cents.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", cents.as_str()),
    };
    let digits = format!("{digits:0>3}");
    let (whole, fraction) = digits.split_at(digits.len() - 2);

    format!("{sign}{CEDI_SIGN}{}.{fraction}", group_thousands(whole))
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// `Monday, 1 January 2024`
pub fn format_long_date(at: DateTime<Utc>) -> String {
    at.format("%A, %-d %B %Y").to_string()
}

/// `14:05`
pub fn format_time(at: DateTime<Utc>) -> String {
    at.format("%H:%M").to_string()
}

/// `Monday, 8 January`
pub fn format_day_and_month(date: NaiveDate) -> String {
    date.format("%A, %-d %B").to_string()
}
