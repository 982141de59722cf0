//! Currency conversion arithmetic.
//!
//! Conversion is a single native floating-point multiplication. There is no
//! rounding or decimal-precision contract: results carry ordinary f64
//! representation error, matching the stored double-precision rates.

/// Converts an amount using the given direct exchange rate.
#[must_use]
pub fn convert_amount(amount: f64, rate: f64) -> f64 {
    amount * rate
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_convert_amount() {
        // 100 USD at 0.9 = 90 EUR
        let result = convert_amount(100.0, 0.9);
        assert_eq!(result, 90.0);
    }

    #[test]
    fn test_convert_large_rate() {
        // 2 USD at 155.51 = 311.02 JPY
        let result = convert_amount(2.0, 155.51);
        assert_eq!(result, 311.02);
    }

    proptest! {
        /// The result is exactly the native product - no hidden rounding.
        #[test]
        fn prop_exact_native_product(
            amount in 0.01f64..1_000_000.0,
            rate in 0.0001f64..10_000.0,
        ) {
            let result = convert_amount(amount, rate);
            prop_assert_eq!(result.to_bits(), (amount * rate).to_bits());
        }
    }
}
