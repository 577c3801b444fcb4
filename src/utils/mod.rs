//! Decimal rounding and display helpers
//!
//! Every monetary step in the tax calculation is rounded to cents, and the
//! tax shown to the user is rounded once more to a single fractional digit.
//! Both use round-half-to-even, which is `rust_decimal`'s default strategy.

use rust_decimal::Decimal;

/// Fractional digits kept after each arithmetic step.
pub const MONEY_DP: u32 = 2;

/// Fractional digits of the tax value written to the output.
pub const DISPLAY_DP: u32 = 1;

/// Round an intermediate monetary value to cents.
///
/// # Examples
/// ```
/// use capital_gain::utils::round_money;
/// use rust_decimal_macros::dec;
///
/// assert_eq!(round_money(dec!(8.3333)), dec!(8.33));
/// assert_eq!(round_money(dec!(0.125)), dec!(0.12));
/// ```
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp(MONEY_DP)
}

/// Round a tax value for presentation, always carrying exactly one
/// fractional digit (`10000` becomes `10000.0`).
///
/// # Examples
/// ```
/// use capital_gain::utils::round_display;
/// use rust_decimal_macros::dec;
///
/// assert_eq!(round_display(dec!(1399.40)).to_string(), "1399.4");
/// assert_eq!(round_display(dec!(0)).to_string(), "0.0");
/// ```
pub fn round_display(value: Decimal) -> Decimal {
    let mut rounded = value.round_dp(DISPLAY_DP);
    rounded.rescale(DISPLAY_DP);
    rounded
}

/// Format as Brazilian Real: "R$ 1.234,56"
///
/// # Examples
/// ```
/// use capital_gain::utils::format_currency;
/// use rust_decimal_macros::dec;
///
/// assert_eq!(format_currency(dec!(1234.56)), "R$ 1.234,56");
/// assert_eq!(format_currency(dec!(-500)), "R$ -500,00");
/// ```
pub fn format_currency(value: Decimal) -> String {
    format!("R$ {}", format_decimal_br(value))
}

/// Format number only (no symbol), thousands grouped with `.` and cents
/// after `,`: "1.234,56"
pub fn format_decimal_br(value: Decimal) -> String {
    let mut cents = round_money(value.abs());
    cents.rescale(MONEY_DP);
    let plain = cents.to_string();
    let (integer_part, fraction) = plain.split_once('.').unwrap_or((plain.as_str(), "00"));

    let digits: Vec<char> = integer_part.chars().collect();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(*c);
    }

    let sign = if value < Decimal::ZERO { "-" } else { "" };
    format!("{}{},{}", sign, grouped, fraction)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_round_money_half_to_even() {
        assert_eq!(round_money(dec!(2.345)), dec!(2.34));
        assert_eq!(round_money(dec!(2.355)), dec!(2.36));
        assert_eq!(round_money(dec!(2.3451)), dec!(2.35));
    }

    #[test]
    fn test_round_display_half_to_even() {
        assert_eq!(round_display(dec!(200.05)), dec!(200.0));
        assert_eq!(round_display(dec!(200.15)), dec!(200.2));
        assert_eq!(round_display(dec!(200.16)), dec!(200.2));
    }

    #[test]
    fn test_round_display_pads_scale() {
        assert_eq!(round_display(dec!(10000.00)).to_string(), "10000.0");
        assert_eq!(round_display(dec!(7)).to_string(), "7.0");
    }

    #[test]
    fn test_format_currency_grouping() {
        assert_eq!(format_currency(dec!(0)), "R$ 0,00");
        assert_eq!(format_currency(dec!(999.99)), "R$ 999,99");
        assert_eq!(format_currency(dec!(1000)), "R$ 1.000,00");
        assert_eq!(format_currency(dec!(123456)), "R$ 123.456,00");
        assert_eq!(format_currency(dec!(12345678.90)), "R$ 12.345.678,90");
    }

    #[test]
    fn test_format_currency_negative() {
        assert_eq!(format_currency(dec!(-1234.56)), "R$ -1.234,56");
        assert_eq!(format_currency(dec!(-0.01)), "R$ -0,01");
    }

    #[test]
    fn test_format_decimal_br_rounds_to_cents() {
        assert_eq!(format_decimal_br(dec!(1.234)), "1,23");
        assert_eq!(format_decimal_br(dec!(8.335)), "8,34");
    }
}
