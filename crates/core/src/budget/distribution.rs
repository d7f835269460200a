//! Amount distribution using the Largest Remainder Method.
//!
//! Splitting a parent total across children must keep the parent invariant:
//! the children's amounts sum to exactly the total, with no Rupiah lost.
//!
//! The Largest Remainder Method works by:
//! 1. Calculate exact shares
//! 2. Round each share down
//! 3. Calculate the remainder (total - sum of rounded)
//! 4. Hand remainder units to the shares with the largest fractional parts

use rust_decimal::Decimal;
use rust_decimal::prelude::*;

/// Distribution utility for splitting amounts.
pub struct DistributionUtil;

impl DistributionUtil {
    /// Split `total` equally across `count` recipients.
    ///
    /// Earlier recipients receive the leftover units.
    ///
    /// # Example
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use dompet_core::budget::DistributionUtil;
    ///
    /// let result = DistributionUtil::split_equal(dec!(100), 3, 0);
    /// assert_eq!(result, vec![dec!(34), dec!(33), dec!(33)]);
    /// ```
    #[must_use]
    pub fn split_equal(total: Decimal, count: usize, decimal_places: u32) -> Vec<Decimal> {
        if count == 0 {
            return vec![];
        }
        let weights = vec![Decimal::ONE; count];
        Self::split_by_weights(total, &weights, decimal_places)
    }

    /// Split `total` proportionally to `weights`.
    ///
    /// Negative weights count as zero. When every weight is zero the total
    /// is split equally. The result always sums to `total` rounded to
    /// `decimal_places`.
    ///
    /// # Example
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use dompet_core::budget::DistributionUtil;
    ///
    /// let weights = [dec!(1000000), dec!(500000)];
    /// let result = DistributionUtil::split_by_weights(dec!(1800000), &weights, 0);
    /// assert_eq!(result, vec![dec!(1200000), dec!(600000)]);
    /// ```
    #[must_use]
    pub fn split_by_weights(
        total: Decimal,
        weights: &[Decimal],
        decimal_places: u32,
    ) -> Vec<Decimal> {
        if weights.is_empty() {
            return vec![];
        }

        let mut weights: Vec<Decimal> =
            weights.iter().map(|w| (*w).max(Decimal::ZERO)).collect();
        let weight_sum = match Self::checked_sum(&weights) {
            Some(sum) => sum,
            None => {
                // Scaling keeps the proportions and bounds the sum below MAX.
                let n = Decimal::from(weights.len() + 1);
                for w in &mut weights {
                    *w /= n;
                }
                Self::checked_sum(&weights).unwrap_or(Decimal::MAX)
            }
        };
        if weight_sum.is_zero() {
            return Self::split_equal(total, weights.len(), decimal_places);
        }

        let unit = Decimal::new(1, decimal_places);

        // Round total to target precision first
        let total_rounded =
            total.round_dp_with_strategy(decimal_places, RoundingStrategy::MidpointAwayFromZero);

        // Calculate exact shares
        let exact: Vec<Decimal> = weights
            .iter()
            .map(|w| {
                total_rounded
                    .checked_mul(*w)
                    .map_or_else(|| total_rounded * (*w / weight_sum), |p| p / weight_sum)
            })
            .collect();

        // Round down each
        let mut rounded: Vec<Decimal> = exact
            .iter()
            .map(|a| a.round_dp_with_strategy(decimal_places, RoundingStrategy::ToZero))
            .collect();

        // Calculate remainder to distribute
        let sum_rounded: Decimal = rounded.iter().copied().sum();
        let remainder = total_rounded - sum_rounded;

        // How many units to distribute
        let units_to_distribute = (remainder / unit)
            .round_dp_with_strategy(0, RoundingStrategy::ToZero)
            .to_u64()
            .and_then(|units| usize::try_from(units).ok())
            .unwrap_or(0);

        if units_to_distribute == 0 {
            return rounded;
        }

        // Largest fractional remainder first; ties keep input order
        let mut remainders: Vec<(usize, Decimal)> = exact
            .iter()
            .zip(rounded.iter())
            .enumerate()
            .map(|(i, (e, r))| (i, *e - *r))
            .collect();
        remainders.sort_by(|a, b| b.1.cmp(&a.1));

        for (idx, _) in remainders.iter().take(units_to_distribute) {
            rounded[*idx] += unit;
        }

        rounded
    }

    fn checked_sum(values: &[Decimal]) -> Option<Decimal> {
        values
            .iter()
            .try_fold(Decimal::ZERO, |acc, v| acc.checked_add(*v))
    }
}
