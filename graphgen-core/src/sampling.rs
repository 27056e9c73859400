//! Randomised sampling primitives shared by the generation stages.

use rand::{Rng, seq::index};
use rand_distr::{Distribution, Normal};

use crate::{Result, error::GraphGenError};

/// Smallest edge count any drawn size is clamped to.
pub const MIN_TARGET_EDGES: usize = 2;

/// Picks `amount` distinct indices from `0..len` without replacement.
///
/// # Panics
/// Panics if `amount > len`.
pub fn sample_distinct<R: Rng + ?Sized>(rng: &mut R, len: usize, amount: usize) -> Vec<usize> {
    index::sample(rng, len, amount).into_vec()
}

/// Picks `amount` indices from `0..len` where no two adjacent picks are
/// equal. Non-adjacent repeats are allowed.
///
/// Used when the label space is too small for sampling without
/// replacement. Returns an empty vector when `len` is zero, and stops after
/// the first pick when `len` is one because no distinct neighbour exists.
///
/// # Examples
/// ```
/// use graphgen_core::sample_without_adjacent_repeats;
/// use rand::{SeedableRng, rngs::SmallRng};
///
/// let mut rng = SmallRng::seed_from_u64(3);
/// let picks = sample_without_adjacent_repeats(&mut rng, 2, 6);
/// assert_eq!(picks.len(), 6);
/// assert!(picks.windows(2).all(|pair| pair[0] != pair[1]));
/// ```
pub fn sample_without_adjacent_repeats<R: Rng + ?Sized>(
    rng: &mut R,
    len: usize,
    amount: usize,
) -> Vec<usize> {
    let mut picks = Vec::with_capacity(amount);
    if len == 0 || amount == 0 {
        return picks;
    }
    let mut last = rng.gen_range(0..len);
    picks.push(last);
    if len == 1 {
        return picks;
    }
    while picks.len() < amount {
        let choice = rng.gen_range(0..len);
        if choice != last {
            picks.push(choice);
            last = choice;
        }
    }
    picks
}

/// Number of `k`-element combinations of `n` items, saturating at
/// `u128::MAX`.
///
/// # Examples
/// ```
/// use graphgen_core::binomial;
///
/// assert_eq!(binomial(8, 4), 70);
/// assert_eq!(binomial(3, 5), 0);
/// assert_eq!(binomial(999, 40), u128::MAX);
/// ```
#[must_use]
pub fn binomial(n: usize, k: usize) -> u128 {
    if k > n {
        return 0;
    }
    let k = k.min(n - k);
    let mut result: u128 = 1;
    for step in 0..k {
        let numerator = (n - step) as u128;
        let Some(product) = result.checked_mul(numerator) else {
            return u128::MAX;
        };
        result = product / (step as u128 + 1);
    }
    result
}

/// Rounds half-way cases to the nearest even integer.
#[must_use]
pub fn round_half_even(value: f64) -> f64 {
    value.round_ties_even()
}

/// Normal distribution over target edge counts.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SizeDistribution {
    /// Mean edge count.
    pub mean: f64,
    /// Standard deviation; zero yields the mean every time.
    pub std_dev: f64,
}

impl SizeDistribution {
    /// Draws `count` target edge counts, each rounded and clamped to
    /// `[2, upper]` as `min(max(2, x), upper)`.
    ///
    /// # Errors
    /// Returns [`GraphGenError::InvalidSizeDistribution`] when the standard
    /// deviation is not finite.
    pub fn draw<R: Rng + ?Sized>(
        self,
        rng: &mut R,
        count: usize,
        upper: usize,
    ) -> Result<Vec<usize>> {
        let normal = Normal::new(self.mean, self.std_dev).map_err(|_| {
            GraphGenError::InvalidSizeDistribution {
                mean: self.mean,
                std_dev: self.std_dev,
            }
        })?;
        Ok((0..count)
            .map(|_| clamp_target(normal.sample(rng), upper))
            .collect())
    }
}

/// Rounds a drawn size and clamps it to `[2, upper]`.
///
/// When `upper < 2` the upper bound wins, matching `min(max(2, x), upper)`.
#[must_use]
pub fn clamp_target(draw: f64, upper: usize) -> usize {
    let rounded = round_half_even(draw);
    let lifted = if rounded < MIN_TARGET_EDGES as f64 {
        MIN_TARGET_EDGES
    } else {
        // Saturating float-to-int conversion; oversized draws hit `upper`.
        rounded as usize
    };
    lifted.min(upper)
}
