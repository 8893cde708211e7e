use crate::error::Result;
use memmap2::Mmap;
use tracing::info;

/// Immutable bytes of a shield grid.
///
/// Any byte owner works: an embedded `&'static [u8]` from
/// `include_bytes!`, a `Vec<u8>`, an `Arc<[u8]>` shared between tables,
/// or a memory mapped file.
/// The length is checked against the metadata in `GridLookup::new`.
#[derive(Debug, Clone)]
pub struct GridBuffer<B> {
    bytes: B,
}

impl<B: AsRef<[u8]>> GridBuffer<B> {
    pub fn new(bytes: B) -> Self {
        GridBuffer { bytes }
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        self.bytes.as_ref()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn into_inner(self) -> B {
        self.bytes
    }
}

impl GridBuffer<&'static [u8]> {
    pub const fn embedded(bytes: &'static [u8]) -> Self {
        GridBuffer { bytes }
    }
}

impl GridBuffer<Vec<u8>> {
    /// Read a whole grid file into memory.
    pub fn read<P: AsRef<std::path::Path>>(path: &P) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        info!(path = ?path.as_ref(), len = bytes.len(), "read grid file");
        Ok(GridBuffer { bytes })
    }
}

impl GridBuffer<Mmap> {
    /// Memory map a grid file.
    /// The file must not be modified while the map is alive.
    pub fn map<P: AsRef<std::path::Path>>(path: &P) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        // SAFETY: the map is only ever read, and grid files are written once
        // by the generator before any table is opened on them.
        let bytes = unsafe { Mmap::map(&file)? };
        info!(path = ?path.as_ref(), len = bytes.len(), "mapped grid file");
        Ok(GridBuffer { bytes })
    }
}
