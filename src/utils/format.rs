//! Money formatting for display.

use bigdecimal::BigDecimal;

/// Rounds half-up to two decimal places.
pub fn round_cents(amount: &BigDecimal) -> BigDecimal {
    let (negative, cents) = to_cents(amount);
    let rounded = cents / BigDecimal::from(100);
    let rounded = rounded.with_scale(2);
    if negative {
        -rounded
    } else {
        rounded
    }
}

/// Returns the sign and the absolute amount in whole cents, rounded half-up.
fn to_cents(amount: &BigDecimal) -> (bool, BigDecimal) {
    let negative = *amount < BigDecimal::from(0);
    let half = BigDecimal::from(1) / BigDecimal::from(2);
    let cents = (amount.abs() * BigDecimal::from(100) + half).with_scale(0);
    (negative && cents != BigDecimal::from(0), cents)
}

/// Splits an amount into the grouped whole part and the two cent digits,
/// e.g. `1234.5` becomes `("1,234", "50")`. The sign, if any, stays on the
/// whole part.
pub fn split_amount(amount: &BigDecimal) -> (String, String) {
    let (negative, cents) = to_cents(amount);
    let digits = format!("{:0>3}", cents.with_scale(0).to_string());
    let (whole, fraction) = digits.split_at(digits.len() - 2);

    let mut grouped = group_thousands(whole);
    if negative {
        grouped.insert(0, '-');
    }
    (grouped, fraction.to_string())
}

fn group_thousands(digits: &str) -> String {
    let digits = digits.trim_start_matches('0');
    let digits = if digits.is_empty() { "0" } else { digits };
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Thousands separators and exactly two decimals: `1234.5` -> `"1,234.50"`.
pub fn format_amount(amount: &BigDecimal) -> String {
    let (whole, cents) = split_amount(amount);
    format!("{}.{}", whole, cents)
}

/// Same as [`format_amount`] for plain floats. Non-finite input renders as zero.
pub fn format_amount_f64(value: f64) -> String {
    if !value.is_finite() {
        return "0.00".to_string();
    }
    value
        .to_string()
        .parse::<BigDecimal>()
        .map(|amount| format_amount(&amount))
        .unwrap_or_else(|_| "0.00".to_string())
}

pub fn format_currency(amount: &BigDecimal, currency: &str) -> String {
    format!("{} {}", currency, format_amount(amount))
}
