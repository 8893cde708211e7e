//! Construction-time failures.
//!
//! Queries never fail: once a table is built, every in-range state maps to
//! a record and everything else maps to "out of range".

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ShieldError {
    /// Shape parameters are inconsistent (non-positive sizes or
    /// granularity, inverted bounds, zero dimensions).
    #[error("invalid grid metadata: {0}")]
    InvalidMetadata(String),

    /// The grid buffer length disagrees with the metadata.
    #[error(
        "grid buffer size mismatch: expected {expected} bytes, found {actual}"
    )]
    BufferSizeMismatch { expected: usize, actual: usize },

    /// A value sequence has the wrong number of entries for the grid.
    #[error("dimension mismatch: expected {expected}, found {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("unsupported record width: {0} bytes")]
    UnsupportedRecordWidth(usize),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, ShieldError>;
