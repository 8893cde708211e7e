//! TOML description of a shield grid.
//!
//! Grid generators write the raw grid file plus a sidecar like
//!
//! ```toml
//! dimensions = 2
//! size = [2, 2]
//! lower_bound = [0.0, 0.0]
//! upper_bound = [2.0, 2.0]
//! granularity = [1.0, 1.0]
//! record_width = 8
//! byte_order = "native"
//! grid = "shield.bin"
//! ```
//!
//! `granularity` defaults to `(upper_bound - lower_bound) / size`,
//! `record_width` to 8 and `byte_order` to `"native"`.
//! A relative `grid` path is resolved against the sidecar's directory.

use crate::error::{Result, ShieldError};
use crate::grid::GridMetadata;
use crate::lookup::{GridBuffer, GridLookup};
use crate::record::{ByteOrder, RecordWidth};
use crate::util::*;
use memmap2::Mmap;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShieldConfig {
    pub dimensions: usize,
    pub size: Vec<usize>,
    pub lower_bound: Vec<f64>,
    pub upper_bound: Vec<f64>,
    pub granularity: Option<Vec<f64>>,
    #[serde(default)]
    pub record_width: RecordWidth,
    #[serde(default)]
    pub byte_order: ByteOrder,
    pub grid: Option<PathBuf>,
    #[serde(skip)]
    base_dir: Option<PathBuf>,
}

fn check_len(name: &str, len: usize, dimensions: usize) -> Result<()> {
    if len != dimensions {
        return Err(ShieldError::InvalidMetadata(format!(
            "`{name}` has {len} entries, expected {dimensions}"
        )));
    }
    Ok(())
}

impl ShieldConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn from_file<P: AsRef<Path>>(path: &P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let mut config = Self::from_toml_str(&content)?;
        config.base_dir = path.parent().map(Path::to_path_buf);
        info!(
            path = ?path,
            dimensions = config.dimensions,
            "loaded shield config"
        );
        Ok(config)
    }

    /// Use `path` as the grid file, taken as given rather than relative
    /// to the sidecar.
    pub fn with_grid(mut self, path: PathBuf) -> Self {
        self.grid = Some(path);
        self.base_dir = None;
        self
    }

    /// Path of the raw grid file, if one is configured.
    pub fn grid_path(&self) -> Option<PathBuf> {
        let grid = self.grid.as_ref()?;
        match &self.base_dir {
            Some(base) if grid.is_relative() => Some(base.join(grid)),
            _ => Some(grid.clone()),
        }
    }

    /// Validate the arrays against `GRID_DIMENSION` and build the
    /// metadata.
    pub fn metadata<const GRID_DIMENSION: usize>(
        &self,
    ) -> Result<GridMetadata<GRID_DIMENSION>> {
        if self.dimensions != GRID_DIMENSION {
            return Err(ShieldError::DimensionMismatch {
                expected: GRID_DIMENSION,
                actual: self.dimensions,
            });
        }
        check_len("size", self.size.len(), self.dimensions)?;
        check_len("lower_bound", self.lower_bound.len(), self.dimensions)?;
        check_len("upper_bound", self.upper_bound.len(), self.dimensions)?;

        let size = Bins::from_column_slice(&self.size);
        let lower_bound = State::from_column_slice(&self.lower_bound);
        let upper_bound = State::from_column_slice(&self.upper_bound);
        let metadata = match &self.granularity {
            Some(granularity) => {
                check_len("granularity", granularity.len(), self.dimensions)?;
                GridMetadata::new(
                    size,
                    lower_bound,
                    upper_bound,
                    State::from_column_slice(granularity),
                )?
            }
            None => GridMetadata::from_nominal(size, lower_bound, upper_bound)?,
        };

        if self.byte_order == ByteOrder::Native {
            warn!(
                "grid uses host byte order, only portable between machines \
                 of the same endianness"
            );
        }
        Ok(metadata
            .with_record_width(self.record_width)?
            .with_byte_order(self.byte_order))
    }

    fn require_grid_path(&self) -> Result<PathBuf> {
        self.grid_path().ok_or_else(|| {
            ShieldError::Config("no `grid` file configured".to_string())
        })
    }

    /// Read the configured grid file and build a table over it.
    pub fn read_table<const GRID_DIMENSION: usize>(
        &self,
    ) -> Result<GridLookup<GRID_DIMENSION, Vec<u8>>> {
        let metadata = self.metadata()?;
        let buffer = GridBuffer::read(&self.require_grid_path()?)?;
        GridLookup::new(metadata, buffer)
    }

    /// Memory map the configured grid file and build a table over it.
    pub fn map_table<const GRID_DIMENSION: usize>(
        &self,
    ) -> Result<GridLookup<GRID_DIMENSION, Mmap>> {
        let metadata = self.metadata()?;
        let buffer = GridBuffer::map(&self.require_grid_path()?)?;
        GridLookup::new(metadata, buffer)
    }
}
