use alloc::vec::Vec;
use core::cmp;

use getset::CopyGetters;
use tinyalloc_sys::{
  math::div_ceil,
  prim::{
    BLK_BASE,
    KIB,
  },
  system::System,
};
use tracing::{
  debug,
  trace,
  warn,
};

use crate::chunk::{
  Chunk,
  ChunkError,
};

#[derive(Debug)]
pub enum ArenaError {
  ChunkError(ChunkError),
  Bookkeeping,
  Overflow,
}

pub type ArenaResult<T> = Result<T, ArenaError>;

/// The chunk list shared by every allocation policy.
///
/// Chunks are kept most-recently-used first: a chunk that satisfies
/// [`Arena::pickup`] is moved to index 0 so the next lookup finds it without
/// scanning.
#[derive(CopyGetters)]
pub struct Arena {
  chunks: Vec<Chunk>,
  /// Minimum size of a fresh chunk, in KiB.
  #[getset(get_copy = "pub")]
  chunk_kb: usize,
  /// Header bytes the owning policy places in front of every payload.
  #[getset(get_copy = "pub")]
  metasize: usize,
  system: &'static dyn System,
}

impl Arena {
  pub const fn new(chunk_kb: usize, metasize: usize, system: &'static dyn System) -> Self {
    Self {
      chunks: Vec::new(),
      chunk_kb: if chunk_kb == 0 { 1 } else { chunk_kb },
      metasize,
      system,
    }
  }

  /// Returns a chunk with at least `size` free bytes at its cursor, growing a
  /// new one when none has room.
  pub fn pickup(&mut self, size: usize) -> ArenaResult<&mut Chunk> {
    match self.chunks.iter().position(|chunk| chunk.fits(size)) {
      Some(index) => {
        self.chunks[..=index].rotate_right(1);
      }
      None => self.grow(size)?,
    }

    Ok(&mut self.chunks[0])
  }

  fn kb_for(&self, size: usize) -> ArenaResult<usize> {
    // worst case start padding is BLK_BASE - 1
    let required = size.checked_add(BLK_BASE).ok_or(ArenaError::Overflow)?;
    let kb = div_ceil(required, KIB).ok_or(ArenaError::Overflow)?;
    Ok(cmp::max(self.chunk_kb, kb))
  }

  fn grow(&mut self, size: usize) -> ArenaResult<()> {
    let kb = self.kb_for(size)?;
    self
      .chunks
      .try_reserve(1)
      .map_err(|_| ArenaError::Bookkeeping)?;

    let chunk = Chunk::new(kb, self.metasize, self.system).map_err(|err| {
      warn!(kb, ?err, "coarse allocation refused");
      ArenaError::ChunkError(err)
    })?;
    self.chunks.insert(0, chunk);

    debug!(kb, chunks = self.chunks.len(), "arena grew");
    Ok(())
  }

  /// Rewinds every chunk. Chunk memory is kept for reuse.
  pub fn reset(&mut self) {
    for chunk in self.chunks.iter_mut() {
      chunk.rewind();
    }
    trace!(chunks = self.chunks.len(), "arena reset");
  }

  /// Releases every chunk back to the provider.
  pub fn destroy(&mut self) {
    let released = self.chunks.len();
    self.chunks.clear();
    self.chunks.shrink_to_fit();
    debug!(released, "arena destroyed");
  }

  pub fn chunks(&self) -> &[Chunk] {
    &self.chunks
  }

  pub fn chunk_count(&self) -> usize {
    self.chunks.len()
  }

  pub fn capacity(&self) -> usize {
    self.chunks.iter().map(Chunk::size).sum()
  }

  pub fn used(&self) -> usize {
    self.chunks.iter().map(Chunk::used).sum()
  }

  pub fn owns(&self, ptr: *const u8) -> bool {
    self.chunks.iter().any(|chunk| chunk.contains(ptr))
  }
}
