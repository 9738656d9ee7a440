//! Display formatting for amounts in the selected currency. Amounts are
//! never converted; only the symbol changes.

use crate::domain::Currency;

const GROUPING_SEPARATOR: char = ',';
const DECIMAL_PRECISION: usize = 2;

/// Symbol, grouped integer part and two decimals, e.g. `₹1,234.50`.
/// Negative values carry the sign before the symbol.
pub fn format_amount(currency: &Currency, amount: f64) -> String {
    let body = format_number(amount.abs());
    if amount < 0.0 && body.bytes().any(|b| matches!(b, b'1'..=b'9')) {
        format!("-{}{}", currency.symbol, body)
    } else {
        format!("{}{}", currency.symbol, body)
    }
}

/// Formats a non-negative value with grouping and fixed precision.
pub fn format_number(value: f64) -> String {
    let body = format!("{:.*}", DECIMAL_PRECISION, value);
    match body.split_once('.') {
        Some((int_part, fraction)) => {
            format!("{}.{}", group_digits(int_part, GROUPING_SEPARATOR), fraction)
        }
        None => group_digits(&body, GROUPING_SEPARATOR),
    }
}

fn group_digits(digits: &str, separator: char) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (count, ch) in digits.chars().rev().enumerate() {
        if count != 0 && count % 3 == 0 {
            grouped.push(separator);
        }
        grouped.push(ch);
    }
    grouped.chars().rev().collect()
}
