use crate::error::{Result, ShieldError};
use crate::record::{ByteOrder, RecordWidth};
use crate::util::*;

/// Relative slack when checking that `size` bins of width `granularity`
/// cover `[lower_bound, upper_bound)`.
const COVERAGE_TOLERANCE: f64 = 1e-9;

/// Shape and coordinate mapping of a shield grid.
/// Validated on construction and immutable afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct GridMetadata<const GRID_DIMENSION: usize> {
    size: Bins<GRID_DIMENSION>,
    lower_bound: State<GRID_DIMENSION>,
    upper_bound: State<GRID_DIMENSION>,
    granularity: State<GRID_DIMENSION>,
    record_width: RecordWidth,
    byte_order: ByteOrder,
    total_cells: usize,
    buffer_len: usize,
}

fn invalid(message: String) -> ShieldError {
    ShieldError::InvalidMetadata(message)
}

impl<const GRID_DIMENSION: usize> GridMetadata<GRID_DIMENSION> {
    /// Records default to 8 bytes in host byte order.
    pub fn new(
        size: Bins<GRID_DIMENSION>,
        lower_bound: State<GRID_DIMENSION>,
        upper_bound: State<GRID_DIMENSION>,
        granularity: State<GRID_DIMENSION>,
    ) -> Result<Self> {
        if GRID_DIMENSION == 0 {
            return Err(invalid(
                "grid must have at least one dimension".to_string(),
            ));
        }

        for d in 0..GRID_DIMENSION {
            let (l, u, g) = (lower_bound[d], upper_bound[d], granularity[d]);
            if size[d] == 0 {
                return Err(invalid(format!("dimension {d}: size is 0")));
            }
            if !l.is_finite() || !u.is_finite() || l >= u {
                return Err(invalid(format!(
                    "dimension {d}: bounds [{l}, {u}) are not increasing"
                )));
            }
            if !g.is_finite() || g <= 0.0 {
                return Err(invalid(format!(
                    "dimension {d}: granularity {g} is not positive"
                )));
            }
            let covered_bins = (u - l) / g;
            let n = size[d] as f64;
            if covered_bins - n > COVERAGE_TOLERANCE * n {
                return Err(invalid(format!(
                    "dimension {d}: {} bins of width {g} miss [{l}, {u})",
                    size[d]
                )));
            }
        }

        let total_cells = checked_total_cells(&size).ok_or_else(|| {
            invalid(format!("cell count of {size:?} overflows"))
        })?;
        let record_width = RecordWidth::default();
        let buffer_len = Self::checked_buffer_len(total_cells, record_width)?;

        Ok(GridMetadata {
            size,
            lower_bound,
            upper_bound,
            granularity,
            record_width,
            byte_order: ByteOrder::default(),
            total_cells,
            buffer_len,
        })
    }

    /// Build metadata whose bins evenly divide each dimension,
    /// `granularity = (upper - lower) / size`.
    pub fn from_nominal(
        size: Bins<GRID_DIMENSION>,
        lower_bound: State<GRID_DIMENSION>,
        upper_bound: State<GRID_DIMENSION>,
    ) -> Result<Self> {
        let mut granularity = State::zeros();
        for d in 0..GRID_DIMENSION {
            granularity[d] =
                (upper_bound[d] - lower_bound[d]) / size[d] as f64;
        }
        Self::new(size, lower_bound, upper_bound, granularity)
    }

    fn checked_buffer_len(
        total_cells: usize,
        record_width: RecordWidth,
    ) -> Result<usize> {
        total_cells.checked_mul(record_width.bytes()).ok_or_else(|| {
            invalid(format!(
                "{total_cells} records of {} bytes overflow",
                record_width.bytes()
            ))
        })
    }

    pub fn with_record_width(
        mut self,
        record_width: RecordWidth,
    ) -> Result<Self> {
        self.buffer_len =
            Self::checked_buffer_len(self.total_cells, record_width)?;
        self.record_width = record_width;
        Ok(self)
    }

    pub fn with_byte_order(mut self, byte_order: ByteOrder) -> Self {
        self.byte_order = byte_order;
        self
    }

    #[inline]
    pub fn size(&self) -> &Bins<GRID_DIMENSION> {
        &self.size
    }

    #[inline]
    pub fn lower_bound(&self) -> &State<GRID_DIMENSION> {
        &self.lower_bound
    }

    #[inline]
    pub fn upper_bound(&self) -> &State<GRID_DIMENSION> {
        &self.upper_bound
    }

    #[inline]
    pub fn granularity(&self) -> &State<GRID_DIMENSION> {
        &self.granularity
    }

    #[inline]
    pub fn record_width(&self) -> RecordWidth {
        self.record_width
    }

    #[inline]
    pub fn byte_order(&self) -> ByteOrder {
        self.byte_order
    }

    /// Product of the per-dimension bin counts.
    #[inline]
    pub fn total_cells(&self) -> usize {
        self.total_cells
    }

    /// Exact byte length a grid buffer must have.
    #[inline]
    pub fn buffer_len(&self) -> usize {
        self.buffer_len
    }

    /// Check whether a state lies inside `[lower_bound, upper_bound)`.
    pub fn contains(&self, state: &State<GRID_DIMENSION>) -> bool {
        for d in 0..GRID_DIMENSION {
            let (l, u) = (self.lower_bound[d], self.upper_bound[d]);
            if !(state[d] >= l && state[d] < u) {
                return false;
            }
        }
        true
    }

    /// Lower and upper corner of a cell.
    /// The last bin of a dimension may be partial, its upper corner is
    /// clipped to `upper_bound`.
    pub fn cell_bounds(
        &self,
        bins: &Bins<GRID_DIMENSION>,
    ) -> (State<GRID_DIMENSION>, State<GRID_DIMENSION>) {
        let mut min = State::zeros();
        let mut max = State::zeros();
        for d in 0..GRID_DIMENSION {
            debug_assert!(bins[d] < self.size[d]);
            min[d] =
                self.lower_bound[d] + bins[d] as f64 * self.granularity[d];
            max[d] = (min[d] + self.granularity[d]).min(self.upper_bound[d]);
        }
        (min, max)
    }

    /// Return iterator over every cell's bins
    /// in buffer ordering.
    pub fn cell_iter(
        &self,
    ) -> impl Iterator<Item = Bins<GRID_DIMENSION>> + '_ {
        (0..self.total_cells).map(move |i| linear_to_bins(i, &self.size))
    }
}

impl<const GRID_DIMENSION: usize> std::fmt::Display
    for GridMetadata<GRID_DIMENSION>
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "dimensions: {GRID_DIMENSION}")?;
        for d in 0..GRID_DIMENSION {
            writeln!(
                f,
                "  dim {d}: [{}, {}) size {} granularity {}",
                self.lower_bound[d],
                self.upper_bound[d],
                self.size[d],
                self.granularity[d]
            )?;
        }
        write!(
            f,
            "cells: {}, record width: {} bytes, byte order: {}",
            self.total_cells,
            self.record_width.bytes(),
            self.byte_order
        )
    }
}

#[cfg(test)]
mod unit_tests {
    use super::*;
    use float_cmp::assert_approx_eq;
    use nalgebra::vector;

    fn unit_2d() -> GridMetadata<2> {
        GridMetadata::new(
            vector![2, 2],
            vector![0.0, 0.0],
            vector![2.0, 2.0],
            vector![1.0, 1.0],
        )
        .unwrap()
    }

    #[test]
    fn new_test() {
        let m = unit_2d();
        assert_eq!(m.total_cells(), 4);
        assert_eq!(m.buffer_len(), 32);
        assert_eq!(m.record_width(), RecordWidth::Eight);
        assert_eq!(m.byte_order(), ByteOrder::Native);
    }

    #[test]
    fn invalid_metadata_test() {
        let cases = [
            (vector![0, 2], vector![0.0, 0.0], vector![2.0, 2.0], vector![1.0, 1.0]),
            (vector![2, 2], vector![0.0, 2.0], vector![2.0, 2.0], vector![1.0, 1.0]),
            (vector![2, 2], vector![0.0, 3.0], vector![2.0, 2.0], vector![1.0, 1.0]),
            (vector![2, 2], vector![0.0, 0.0], vector![2.0, 2.0], vector![1.0, 0.0]),
            (vector![2, 2], vector![0.0, 0.0], vector![2.0, 2.0], vector![-1.0, 1.0]),
            (vector![2, 2], vector![0.0, f64::NAN], vector![2.0, 2.0], vector![1.0, 1.0]),
            (vector![2, 2], vector![0.0, 0.0], vector![2.0, 2.0], vector![0.5, 1.0]),
        ];
        for (size, lower, upper, granularity) in cases {
            let result = GridMetadata::<2>::new(size, lower, upper, granularity);
            assert!(
                matches!(result, Err(ShieldError::InvalidMetadata(_))),
                "{size:?} {lower:?} {upper:?} {granularity:?}"
            );
        }
    }

    #[test]
    fn zero_dimensions_test() {
        let result = GridMetadata::<0>::new(
            Bins::zeros(),
            State::zeros(),
            State::zeros(),
            State::zeros(),
        );
        assert!(matches!(result, Err(ShieldError::InvalidMetadata(_))));
    }

    #[test]
    fn partial_last_bin_test() {
        // 3 bins of 0.4 over [0, 1), the last one is 0.2 wide
        let m = GridMetadata::new(
            vector![3],
            vector![0.0],
            vector![1.0],
            vector![0.4],
        )
        .unwrap();
        let (min, max) = m.cell_bounds(&vector![2]);
        assert_approx_eq!(f64, min[0], 0.8, epsilon = 1e-12);
        assert_approx_eq!(f64, max[0], 1.0);
    }

    #[test]
    fn from_nominal_test() {
        let m = GridMetadata::from_nominal(
            vector![4, 10],
            vector![-1.0, 0.0],
            vector![1.0, 5.0],
        )
        .unwrap();
        assert_approx_eq!(f64, m.granularity()[0], 0.5);
        assert_approx_eq!(f64, m.granularity()[1], 0.5);
        assert_eq!(m.total_cells(), 40);
    }

    #[test]
    fn record_width_test() {
        let m = unit_2d().with_record_width(RecordWidth::Two).unwrap();
        assert_eq!(m.buffer_len(), 8);
        let m = m.with_byte_order(ByteOrder::Big);
        assert_eq!(m.byte_order(), ByteOrder::Big);
    }

    #[test]
    fn contains_test() {
        let m = unit_2d();
        assert!(m.contains(&vector![0.0, 0.0]));
        assert!(m.contains(&vector![1.99, 0.5]));
        assert!(!m.contains(&vector![2.0, 0.5]));
        assert!(!m.contains(&vector![-0.1, 0.5]));
        assert!(!m.contains(&vector![f64::NAN, 0.5]));
    }

    #[test]
    fn cell_bounds_test() {
        let m = unit_2d();
        let (min, max) = m.cell_bounds(&vector![1, 0]);
        assert_approx_eq!(f64, min[0], 1.0);
        assert_approx_eq!(f64, min[1], 0.0);
        assert_approx_eq!(f64, max[0], 2.0);
        assert_approx_eq!(f64, max[1], 1.0);
    }

    #[test]
    fn cell_iter_test() {
        let m = unit_2d();
        let cells: Vec<_> = m.cell_iter().collect();
        assert_eq!(
            cells,
            vec![vector![0, 0], vector![1, 0], vector![0, 1], vector![1, 1]]
        );
    }
}
