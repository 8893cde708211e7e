pub mod indexing;
pub use indexing::*;

/// Per-dimension bin indices of one grid cell.
pub type Bins<const GRID_DIMENSION: usize> =
    nalgebra::SVector<usize, { GRID_DIMENSION }>;

/// Continuous state vector, one coordinate per grid dimension.
pub type State<const GRID_DIMENSION: usize> =
    nalgebra::SVector<f64, { GRID_DIMENSION }>;
