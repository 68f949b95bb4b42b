//! Normalisation of foreign-currency amounts into EUSD.

use crate::{CoreError, CoreResult};

/// Code of the common unit every ledger amount is expressed in.
pub const EUSD: &str = "EUSD";

/// Decimal places kept on EUSD amounts.
pub const EUSD_DECIMALS: u32 = 2;

/// Significant digits kept when snapping a scaled amount before the tie-break.
const SIGNIFICANT_DIGITS: i32 = 15;

/// Rounds to `decimals` places, sending ties toward positive infinity.
///
/// Ties are judged on the decimal value as written, so `1.005` rounds to `1.01`
/// even though its binary form sits just below the tie.
pub fn round_half_up(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (snap_to_significant(value * factor) + 0.5).floor() / factor
}

/// Drops binary representation noise below the 15th significant digit.
fn snap_to_significant(value: f64) -> f64 {
    if value == 0.0 || !value.is_finite() {
        return value;
    }
    let magnitude = value.abs().log10().floor() as i32;
    let scale = 10f64.powi(SIGNIFICANT_DIGITS - 1 - magnitude);
    if !scale.is_finite() {
        return value;
    }
    (value * scale).round() / scale
}

/// Converts `amount` expressed in `currency` to EUSD using `amount / exchange_rate`.
pub fn to_eusd(amount: f64, currency: &str, exchange_rate: f64) -> CoreResult<f64> {
    if !exchange_rate.is_finite() || exchange_rate <= 0.0 {
        return Err(CoreError::InvalidExchangeRate {
            currency: currency.to_string(),
            rate: exchange_rate,
        });
    }
    Ok(round_half_up(amount / exchange_rate, EUSD_DECIMALS))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ties_round_toward_positive_infinity() {
        assert_eq!(round_half_up(0.125, 2), 0.13);
        assert_eq!(round_half_up(-0.125, 2), -0.12);
        assert_eq!(round_half_up(2.5, 0), 3.0);
    }

    #[test]
    fn decimal_ties_without_exact_binary_form_round_up() {
        assert_eq!(round_half_up(1.005, 2), 1.01);
        assert_eq!(round_half_up(8.345, 2), 8.35);
        assert_eq!(round_half_up(2.675, 2), 2.68);
        assert_eq!(round_half_up(-1.005, 2), -1.0);
        assert_eq!(to_eusd(1.005, "USD", 1.0).unwrap(), 1.01);
        assert_eq!(round_half_up(1.004_999, 2), 1.0);
    }

    #[test]
    fn converts_with_division_by_rate() {
        assert_eq!(to_eusd(150_000.0, "MMK", 1_500.0).unwrap(), 100.0);
        assert_eq!(to_eusd(2_500.0, "THB", 3.0).unwrap(), 833.33);
        assert_eq!(to_eusd(42.0, EUSD, 1.0).unwrap(), 42.0);
    }

    #[test]
    fn rejects_unusable_rates() {
        for rate in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let err = to_eusd(10.0, "MMK", rate).expect_err("rate must be rejected");
            assert!(matches!(err, CoreError::InvalidExchangeRate { .. }));
        }
    }
}
