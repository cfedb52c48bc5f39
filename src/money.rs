//! Currency display helpers.

use rust_decimal::Decimal;

/// Formats an amount with the currency's symbol and two decimal places.
/// Only BDT gets a dedicated symbol; other codes fall back to a prefix.
pub fn format_currency(amount: Decimal, currency: &str) -> String {
    let rounded = amount.round_dp(2);
    match currency {
        "BDT" => format!("\u{09f3}{:.2}", rounded),
        other => format!("{} {:.2}", other, rounded),
    }
}
