//! Grid shape and the mapping from continuous states to cells.

mod metadata;
pub mod quantizer;

pub use metadata::*;
