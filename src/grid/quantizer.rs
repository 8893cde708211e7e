//! Bucketing of continuous coordinates into bins.
//!
//! Each dimension covers the half-open interval `[lower_bound, upper_bound)`.
//! A value exactly on a bin edge may land in the neighbouring bin through
//! floating point rounding, this is not corrected.

use super::GridMetadata;
use crate::util::*;
use num_traits::ToPrimitive;

/// Bin of `value` in one dimension, `None` outside `[lower, upper)`.
/// NaN is always out of range.
#[inline]
pub fn quantize(
    value: f64,
    lower: f64,
    upper: f64,
    granularity: f64,
    size: usize,
) -> Option<usize> {
    if !(value >= lower && value < upper) {
        return None;
    }
    let bin = ((value - lower) / granularity).floor().to_usize()?;
    // Rounding just below `upper` can land one past the last bin.
    Some(bin.min(size - 1))
}

impl<const GRID_DIMENSION: usize> GridMetadata<GRID_DIMENSION> {
    #[inline]
    pub fn quantize(&self, value: f64, dim: usize) -> Option<usize> {
        quantize(
            value,
            self.lower_bound()[dim],
            self.upper_bound()[dim],
            self.granularity()[dim],
            self.size()[dim],
        )
    }

    /// Quantize every dimension in order, stopping at the first one
    /// that is out of range.
    #[inline]
    pub fn quantize_state(
        &self,
        state: &State<GRID_DIMENSION>,
    ) -> Option<Bins<GRID_DIMENSION>> {
        let mut bins = Bins::zeros();
        for d in 0..GRID_DIMENSION {
            bins[d] = self.quantize(state[d], d)?;
        }
        Some(bins)
    }
}
