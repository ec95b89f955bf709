use core::ptr::NonNull;

use getset::CopyGetters;
use tinyalloc_extent::{
  Extent,
  ExtentError,
};
use tinyalloc_sys::{
  math::align_offset,
  prim::{
    BLK_BASE,
    KIB,
  },
  system::System,
};

#[derive(Debug)]
pub enum ChunkError {
  ExtentError(ExtentError),
  OutOfSpace,
  Overflow,
}

pub type ChunkResult<T> = Result<T, ChunkError>;

/// One coarse region plus the bump cursor blocks are carved at.
///
/// `start <= pos <= size()` always holds. `pos` only moves forward except on
/// [`Chunk::rewind`].
#[derive(CopyGetters)]
pub struct Chunk {
  extent: Extent,
  /// Offset of the first carve, padded so that the payload following a
  /// `metasize` header lands on a `BLK_BASE` boundary.
  #[getset(get_copy = "pub")]
  start: usize,
  /// Offset of the next free byte.
  #[getset(get_copy = "pub")]
  pos: usize,
}

impl Chunk {
  fn first_offset(addr: usize, metasize: usize) -> ChunkResult<usize> {
    let header_end = addr.checked_add(metasize).ok_or(ChunkError::Overflow)?;
    align_offset(header_end, BLK_BASE).ok_or(ChunkError::Overflow)
  }

  pub fn new(kb: usize, metasize: usize, system: &'static dyn System) -> ChunkResult<Self> {
    let bytes = kb.checked_mul(KIB).ok_or(ChunkError::Overflow)?;
    let extent = Extent::new(bytes, system).map_err(ChunkError::ExtentError)?;
    let start = Self::first_offset(extent.addr(), metasize)?;
    if start > extent.size() {
      return Err(ChunkError::OutOfSpace);
    }

    Ok(Self {
      extent,
      start,
      pos: start,
    })
  }

  /// Usable bytes of the region.
  pub fn size(&self) -> usize {
    self.extent.size()
  }

  pub fn remaining(&self) -> usize {
    self.size() - self.pos
  }

  pub fn used(&self) -> usize {
    self.pos - self.start
  }

  pub fn fits(&self, size: usize) -> bool {
    size <= self.remaining()
  }

  pub fn contains(&self, ptr: *const u8) -> bool {
    self.extent.contains(ptr)
  }

  /// Hands out `size` bytes at the cursor and advances it.
  pub fn carve(&mut self, size: usize) -> ChunkResult<NonNull<u8>> {
    if !self.fits(size) {
      return Err(ChunkError::OutOfSpace);
    }

    let ptr = self.extent.at(self.pos).map_err(ChunkError::ExtentError)?;
    self.pos += size;
    Ok(ptr)
  }

  /// Rewinds the cursor. Everything carved so far becomes invalid.
  pub fn rewind(&mut self) {
    self.pos = self.start;
  }
}
