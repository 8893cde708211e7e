//! Read-only shield tables.
//!
//! A [`GridLookup`] pairs validated [`GridMetadata`] with a grid buffer and
//! answers "which record applies to the cell containing this state".
//! Tables hold no mutable state, a shared reference can be queried from
//! any number of threads at once.

mod buffer;

pub use buffer::*;

use crate::error::{Result, ShieldError};
use crate::grid::GridMetadata;
use crate::record::{decode, ByteOrder, Record, OUT_OF_RANGE};
use crate::util::*;
use rayon::prelude::*;
use tracing::debug;

pub struct GridLookup<const GRID_DIMENSION: usize, B> {
    metadata: GridMetadata<GRID_DIMENSION>,
    buffer: GridBuffer<B>,
}

impl<const GRID_DIMENSION: usize, B: AsRef<[u8]>>
    GridLookup<GRID_DIMENSION, B>
{
    /// Fails with `BufferSizeMismatch` unless the buffer holds exactly one
    /// record per cell.
    pub fn new(
        metadata: GridMetadata<GRID_DIMENSION>,
        buffer: GridBuffer<B>,
    ) -> Result<Self> {
        let expected = metadata.buffer_len();
        let actual = buffer.len();
        if expected != actual {
            return Err(ShieldError::BufferSizeMismatch { expected, actual });
        }
        debug!(
            dimensions = GRID_DIMENSION,
            cells = metadata.total_cells(),
            record_width = metadata.record_width().bytes(),
            native_order = metadata.byte_order() == ByteOrder::Native,
            "built grid lookup"
        );
        Ok(GridLookup { metadata, buffer })
    }

    #[inline]
    pub fn metadata(&self) -> &GridMetadata<GRID_DIMENSION> {
        &self.metadata
    }

    #[inline]
    pub fn buffer(&self) -> &GridBuffer<B> {
        &self.buffer
    }

    pub fn into_parts(self) -> (GridMetadata<GRID_DIMENSION>, GridBuffer<B>) {
        (self.metadata, self.buffer)
    }

    /// Record for the cell containing `state`, `None` if any coordinate is
    /// outside its `[lower_bound, upper_bound)`.
    #[inline]
    pub fn try_lookup_vector(
        &self,
        state: &State<GRID_DIMENSION>,
    ) -> Option<Record> {
        let bins = self.metadata.quantize_state(state)?;
        Some(self.read_record(&bins))
    }

    /// Like `try_lookup_vector`, but returns `OUT_OF_RANGE` (`-1`) for states
    /// outside the grid.
    /// A cell storing `-1` is indistinguishable from an out of range state.
    #[inline]
    pub fn lookup_vector(&self, state: &State<GRID_DIMENSION>) -> Record {
        self.try_lookup_vector(state).unwrap_or(OUT_OF_RANGE)
    }

    /// Lookup from an unsized slice, which must hold one value per
    /// dimension.
    pub fn try_lookup_slice(&self, state: &[f64]) -> Result<Option<Record>> {
        if state.len() != GRID_DIMENSION {
            return Err(ShieldError::DimensionMismatch {
                expected: GRID_DIMENSION,
                actual: state.len(),
            });
        }
        Ok(self.try_lookup_vector(&State::from_column_slice(state)))
    }

    /// Record stored for a cell, `None` if a bin is past its dimension's
    /// size.
    pub fn record_at(&self, bins: &Bins<GRID_DIMENSION>) -> Option<Record> {
        let size = self.metadata.size();
        for d in 0..GRID_DIMENSION {
            if bins[d] >= size[d] {
                return None;
            }
        }
        Some(self.read_record(bins))
    }

    /// Answer many queries in parallel.
    /// `chunk_size` is the number of states handled by each task.
    pub fn par_lookup(
        &self,
        states: &[State<GRID_DIMENSION>],
        chunk_size: usize,
    ) -> Vec<Option<Record>>
    where
        B: Sync,
    {
        profiling::scope!("grid_lookup: par_lookup");
        let mut result = vec![None; states.len()];
        result
            .par_chunks_mut(chunk_size)
            .zip(states.par_chunks(chunk_size))
            .for_each(|(result_chunk, state_chunk)| {
                for (r, s) in result_chunk.iter_mut().zip(state_chunk) {
                    *r = self.try_lookup_vector(s);
                }
            });
        result
    }

    #[inline]
    fn read_record(&self, bins: &Bins<GRID_DIMENSION>) -> Record {
        let offset = bins_to_linear(bins, self.metadata.size());
        let width = self.metadata.record_width();
        let start = offset * width.bytes();
        let bytes = &self.buffer.as_bytes()[start..start + width.bytes()];
        decode(bytes, width, self.metadata.byte_order())
    }
}

/// Two argument entry points, the call shape grid generators emit.
impl<B: AsRef<[u8]>> GridLookup<2, B> {
    #[inline]
    pub fn try_lookup_2d(&self, s1: f64, s2: f64) -> Option<Record> {
        self.try_lookup_vector(&nalgebra::vector![s1, s2])
    }

    /// Returns `OUT_OF_RANGE` outside the grid, see `lookup_vector`.
    #[inline]
    pub fn lookup_2d(&self, s1: f64, s2: f64) -> Record {
        self.lookup_vector(&nalgebra::vector![s1, s2])
    }
}
