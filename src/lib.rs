//! Read-only shield tables.
//!
//! A shield is a dense N-dimensional grid of precomputed records built
//! offline. At runtime a continuous state is quantized per dimension,
//! the bins are flattened into a linear offset (dimension 0 fastest),
//! and the record stored at that offset is decoded.

pub mod actions;
pub mod build_info;
pub mod config;
pub mod error;
pub mod grid;
pub mod lookup;
pub mod record;
pub mod util;

pub use actions::ActionSet;
pub use config::ShieldConfig;
pub use error::{Result, ShieldError};
pub use grid::GridMetadata;
pub use lookup::{GridBuffer, GridLookup};
pub use record::{ByteOrder, Record, RecordWidth, OUT_OF_RANGE};
pub use util::{Bins, State};
