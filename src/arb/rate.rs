//! WAD fixed-point exchange rates.
//!
//! Every rate in the engine is a 1e18-scaled multiplier over base units:
//! `amount_out = amount_in * rate / WAD`, truncated toward zero. The
//! controller sizes its legs and the converter realizes them with this same
//! [`Rate::apply`], so an expected output never disagrees with a realized
//! output about rounding.

use std::fmt::{self, Debug, Display};

use alloy::primitives::U256;

/// The fixed-point scale: 1e18, matching on-chain WAD arithmetic.
pub const WAD: U256 = U256::from_limbs([1_000_000_000_000_000_000, 0, 0, 0]);

/// The denominator used for basis-point fractions (10,000 = 100%).
pub const BPS_DENOMINATOR: u64 = 10_000;

/// A WAD-scaled exchange rate between two assets, expressed in output base
/// units per one input base unit.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Rate(U256);

impl Rate {
    /// A rate of zero. Applying it yields zero; the controller treats a
    /// zero quote as an invalid price, never as a free conversion.
    pub const ZERO: Self = Self(U256::ZERO);

    /// Creates a rate from a raw WAD-scaled value.
    #[must_use]
    pub const fn from_wad(wad: U256) -> Self {
        Self(wad)
    }

    /// Creates a rate from an output/input ratio of base-unit amounts.
    ///
    /// A zero `amount_in` yields [`Rate::ZERO`] rather than dividing by
    /// zero; callers validate rates before use.
    #[must_use]
    pub fn from_ratio(amount_out: U256, amount_in: U256) -> Self {
        if amount_in.is_zero() {
            return Self::ZERO;
        }
        Self(amount_out.saturating_mul(WAD) / amount_in)
    }

    /// Returns the raw WAD-scaled value of this rate.
    #[must_use]
    pub const fn wad(&self) -> U256 {
        self.0
    }

    /// Whether this rate is zero (unusable as a price).
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Applies this rate to an input amount, truncating toward zero.
    ///
    /// This is the single rounding rule of the engine. Small amounts can
    /// truncate to zero; the controller fails fast on such legs.
    #[must_use]
    pub fn apply(&self, amount_in: U256) -> U256 {
        amount_in.saturating_mul(self.0) / WAD
    }
}

impl Debug for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Rate({} wad)", self.0)
    }
}

impl Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Applies a basis-point fraction to an amount, truncating toward zero.
///
/// Used for loan fees (`amount * fee_bps / 10_000`) and slippage floors.
#[must_use]
pub fn bps_of(amount: U256, bps: u64) -> U256 {
    amount.saturating_mul(U256::from(bps)) / U256::from(BPS_DENOMINATOR)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_truncates_toward_zero() {
        for (rate_out, rate_in, amount_in, expected_out) in &[
            // out, in, amount, expected
            (1u64, 2u64, 10u64, 5u64),
            (1, 2, 11, 5),  // 5.5 truncates
            (2, 1, 7, 14),
            (1, 3, 2, 0),   // 0.66 truncates to a starved leg
            (2000, 1, 50, 100_000),
        ] {
            let rate = Rate::from_ratio(U256::from(*rate_out), U256::from(*rate_in));
            assert_eq!(rate.apply(U256::from(*amount_in)), U256::from(*expected_out));
        }
    }

    #[test]
    fn test_from_ratio_zero_input_is_zero_rate() {
        let rate = Rate::from_ratio(U256::from(100), U256::ZERO);
        assert!(rate.is_zero());
        assert_eq!(rate.apply(U256::from(1000)), U256::ZERO);
    }

    #[test]
    fn test_decimal_scaled_round_trip() {
        // 0.0005 WETH (18 decimals) per USDC (6 decimals):
        // 1e6 USDC units map to 5e14 wei.
        let forward = Rate::from_ratio(
            U256::from(500_000_000_000_000u64),
            U256::from(1_000_000u64),
        );
        // 2000 USDC per WETH: 1e18 wei map to 2e9 USDC units.
        let reverse = Rate::from_ratio(
            U256::from(2_000_000_000u64),
            WAD,
        );

        // 100,000 USDC -> 50 WETH -> 100,000 USDC.
        let usdc_in = U256::from(100_000_000_000u64);
        let weth = forward.apply(usdc_in);
        assert_eq!(weth, U256::from(50_000_000_000_000_000_000u128));
        assert_eq!(reverse.apply(weth), usdc_in);
    }

    #[test]
    fn test_bps_of() {
        // 9 bps of 100,000 USDC is 90 USDC.
        assert_eq!(
            bps_of(U256::from(100_000_000_000u64), 9),
            U256::from(90_000_000u64)
        );
        assert_eq!(bps_of(U256::from(10_000u64), 0), U256::ZERO);
        assert_eq!(bps_of(U256::from(1u64), 9), U256::ZERO); // truncates
    }
}
