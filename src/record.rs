//! Record layout inside the grid buffer.
//!
//! A grid buffer is a flat array of fixed width signed integers.
//! Narrow records are sign extended into a [`Record`] on decode, so a
//! stored `-1` reads back as `-1` at every width.

use crate::error::ShieldError;
use serde::{Deserialize, Serialize};

/// Decoded value of one grid cell.
pub type Record = i64;

/// Returned by sentinel-style lookups when the state is outside the grid.
/// A cell that legitimately stores `-1` reads the same, use the
/// `try_lookup_*` methods when the two must be told apart.
pub const OUT_OF_RANGE: Record = -1;

/// Width in bytes of one stored record.
#[derive(
    Debug, Copy, Clone, Default, Eq, PartialEq, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "usize", into = "usize")]
pub enum RecordWidth {
    One,
    Two,
    Four,
    #[default]
    Eight,
}

impl RecordWidth {
    #[inline]
    pub const fn bytes(self) -> usize {
        match self {
            RecordWidth::One => 1,
            RecordWidth::Two => 2,
            RecordWidth::Four => 4,
            RecordWidth::Eight => 8,
        }
    }
}

impl TryFrom<usize> for RecordWidth {
    type Error = ShieldError;

    fn try_from(bytes: usize) -> Result<Self, Self::Error> {
        match bytes {
            1 => Ok(RecordWidth::One),
            2 => Ok(RecordWidth::Two),
            4 => Ok(RecordWidth::Four),
            8 => Ok(RecordWidth::Eight),
            n => Err(ShieldError::UnsupportedRecordWidth(n)),
        }
    }
}

impl From<RecordWidth> for usize {
    fn from(width: RecordWidth) -> usize {
        width.bytes()
    }
}

/// Byte order of the stored records.
/// `Native` matches what existing grid generators emit, the buffer then
/// has to be produced on a machine with the same endianness.
#[derive(
    Debug, Copy, Clone, Default, Eq, PartialEq, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ByteOrder {
    #[default]
    Native,
    Little,
    Big,
}

impl std::fmt::Display for ByteOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ByteOrder::Native => "native",
            ByteOrder::Little => "little",
            ByteOrder::Big => "big",
        };
        write!(f, "{name}")
    }
}

macro_rules! read_record {
    ($ty:ty, $bytes:expr, $order:expr) => {{
        let raw: $ty = bytemuck::pod_read_unaligned($bytes);
        let value = match $order {
            ByteOrder::Native => raw,
            ByteOrder::Little => <$ty>::from_le(raw),
            ByteOrder::Big => <$ty>::from_be(raw),
        };
        Record::from(value)
    }};
}

/// Decode one record.
/// `bytes` must be exactly `width.bytes()` long.
#[inline]
pub fn decode(bytes: &[u8], width: RecordWidth, order: ByteOrder) -> Record {
    debug_assert_eq!(bytes.len(), width.bytes());
    match width {
        RecordWidth::One => read_record!(i8, bytes, order),
        RecordWidth::Two => read_record!(i16, bytes, order),
        RecordWidth::Four => read_record!(i32, bytes, order),
        RecordWidth::Eight => read_record!(i64, bytes, order),
    }
}
