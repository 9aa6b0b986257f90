//! Display formatting for quoted amounts.
//!
//! Both currencies render as whole units: prices in the catalog are
//! integer rupees/dollars and the front end shows no decimal places even
//! for USD. That integer-only USD rendering is a fixed display contract,
//! not a precision bug.

use crate::models::Currency;

/// Format an amount with its currency symbol and locale digit grouping.
/// INR uses the Indian system (`₹1,23,456`), USD plain thousands
/// (`$1,200`).
pub fn format_amount(amount: i64, currency: Currency) -> String {
    let grouped = match currency {
        Currency::Inr => group_indian(amount.unsigned_abs()),
        Currency::Usd => group_thousands(amount.unsigned_abs()),
    };
    let sign = if amount < 0 { "-" } else { "" };
    format!("{}{}{}", sign, currency.symbol(), grouped)
}

/// Indian numbering: last three digits, then groups of two.
fn group_indian(n: u64) -> String {
    let digits = n.to_string();
    if digits.len() <= 3 {
        return digits;
    }
    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut parts = Vec::new();
    let head_bytes = head.as_bytes();
    let mut idx = head_bytes.len();
    while idx > 2 {
        parts.push(&head[idx - 2..idx]);
        idx -= 2;
    }
    parts.push(&head[..idx]);
    parts.reverse();
    format!("{},{}", parts.join(","), tail)
}

fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
