use rust_decimal::{Decimal, RoundingStrategy};

/// Number of decimals amounts are rounded to when they are shown.
pub const CURRENCY_SCALE: u32 = 2;

/// Balances whose magnitude is at most this value count as settled.
///
/// Splitting an amount between three people leaves a residue in the last
/// digit of the quotient, so exact comparisons against zero can't be used.
pub const SETTLEMENT_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, CURRENCY_SCALE);

/// Largest magnitude a single amount may have (10^15). Sums of any realistic
/// number of such amounts stay far below `Decimal::MAX`.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(0xA4C6_8000, 0x0003_8D7E, 0, false, 0);

pub fn is_settled(amount: Decimal) -> bool {
    amount.abs() <= SETTLEMENT_TOLERANCE
}

pub fn round_currency(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(CURRENCY_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// Formats an amount as `$12.34`, rounding to cents.
pub fn format_currency(amount: Decimal) -> String {
    format!("${:.2}", round_currency(amount))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[rstest]
    #[case(dec!(0), true)]
    #[case(dec!(-0.009), true)]
    #[case(dec!(0.01), true)]
    #[case(dec!(-0.01), true)]
    #[case(dec!(-0.011), false)]
    #[case(dec!(0.011), false)]
    #[case(dec!(25), false)]
    fn tolerance_band(#[case] amount: Decimal, #[case] settled: bool) {
        assert_eq!(is_settled(amount), settled);
    }

    #[test]
    fn max_amount_is_a_quadrillion() {
        assert_eq!(MAX_AMOUNT, Decimal::from(1_000_000_000_000_000i64));
    }

    #[test]
    fn rounds_midpoint_away_from_zero() {
        assert_eq!(round_currency(dec!(2.345)), dec!(2.35));
        assert_eq!(round_currency(dec!(-2.345)), dec!(-2.35));
        assert_eq!(round_currency(dec!(2.344)), dec!(2.34));
    }

    #[test]
    fn formats_with_two_decimals() {
        assert_eq!(format_currency(dec!(30)), "$30.00");
        assert_eq!(format_currency(dec!(5.5)), "$5.50");
        assert_eq!(format_currency(dec!(100) / dec!(3)), "$33.33");
    }
}
