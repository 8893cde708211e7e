//! Mixed-radix flattening between per-dimension bins and a linear offset.
//! Dimension 0 varies fastest, which is the layout grid generators write.

use crate::util::*;

/// Number of cells in a grid with the given bin counts,
/// `None` if the product overflows.
pub fn checked_total_cells<const GRID_DIMENSION: usize>(
    size: &Bins<GRID_DIMENSION>,
) -> Option<usize> {
    size.iter().try_fold(1usize, |accumulator, d| accumulator.checked_mul(*d))
}

pub fn total_cells<const GRID_DIMENSION: usize>(
    size: &Bins<GRID_DIMENSION>,
) -> usize {
    let mut accumulator = 1;
    for d in size {
        accumulator *= *d;
    }
    accumulator
}

/// Place value of each dimension in the linear ordering.
pub fn multipliers<const GRID_DIMENSION: usize>(
    size: &Bins<GRID_DIMENSION>,
) -> Bins<GRID_DIMENSION> {
    let mut result = Bins::zeros();
    let mut accumulator = 1;
    for d in 0..GRID_DIMENSION {
        result[d] = accumulator;
        accumulator *= size[d];
    }
    result
}

/// Caller guarantees `bins[d] < size[d]` for every dimension.
pub fn bins_to_linear<const GRID_DIMENSION: usize>(
    bins: &Bins<GRID_DIMENSION>,
    size: &Bins<GRID_DIMENSION>,
) -> usize {
    let mut accumulator = 0;
    let mut multiplier = 1;
    for d in 0..GRID_DIMENSION {
        debug_assert!(
            bins[d] < size[d],
            "bin {} out of bounds for dimension {d} of size {}",
            bins[d],
            size[d]
        );
        accumulator += bins[d] * multiplier;
        multiplier *= size[d];
    }
    accumulator
}

pub fn linear_to_bins<const GRID_DIMENSION: usize>(
    linear_index: usize,
    size: &Bins<GRID_DIMENSION>,
) -> Bins<GRID_DIMENSION> {
    debug_assert!(linear_index < total_cells(size));
    let mut result = Bins::zeros();
    let mut index_accumulator = linear_index;
    for d in 0..GRID_DIMENSION {
        result[d] = index_accumulator % size[d];
        index_accumulator /= size[d];
    }
    result
}
