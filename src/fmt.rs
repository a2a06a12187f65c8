use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// Format a decimal as a dollar amount with thousands separators: $1,234.56
pub fn money(val: Decimal) -> String {
    let rounded = val.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let cents = format!("{:.2}", rounded.abs());
    let (int_part, dec_part) = cents.split_once('.').unwrap_or((cents.as_str(), "00"));

    let mut with_commas = String::new();
    for (i, c) in int_part.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            with_commas.push(',');
        }
        with_commas.push(c);
    }
    let with_commas: String = with_commas.chars().rev().collect();

    if negative {
        format!("-${with_commas}.{dec_part}")
    } else {
        format!("${with_commas}.{dec_part}")
    }
}

/// Exact conversion from integer minor units.
pub fn cents(minor: i64) -> Decimal {
    Decimal::new(minor, 2)
}

/// Numeric value for a spreadsheet cell. The only place amounts become floats.
pub fn sheet_number(val: Decimal) -> f64 {
    val.to_f64().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_money_formatting() {
        assert_eq!(money(dec!(1234.56)), "$1,234.56");
        assert_eq!(money(dec!(-500.00)), "-$500.00");
        assert_eq!(money(Decimal::ZERO), "$0.00");
        assert_eq!(money(dec!(1000000.99)), "$1,000,000.99");
        assert_eq!(money(dec!(42.1)), "$42.10");
        assert_eq!(money(dec!(0.005)), "$0.01");
        assert_eq!(money(dec!(-0.001)), "$0.00");
    }

    #[test]
    fn test_cents_are_exact() {
        assert_eq!(cents(150050), dec!(1500.50));
        assert_eq!(cents(-10000), dec!(-100.00));
        assert_eq!(cents(10) + cents(20), dec!(0.30));
    }

    #[test]
    fn test_sheet_number() {
        assert_eq!(sheet_number(dec!(1100.25)), 1100.25);
        assert_eq!(sheet_number(Decimal::ZERO), 0.0);
    }
}
