use core::ptr::NonNull;

use tinyalloc_arena::{
  Arena,
  ArenaError,
};

use crate::{
  block::Block,
  classes::round_unit,
  config::Config,
  error::{
    AllocError,
    AllocResult,
  },
};

/// Monotonic allocator. Blocks are only given back all at once, through
/// [`Bump::reset`] or [`Bump::destroy`].
pub struct Bump {
  arena: Arena,
}

impl Bump {
  pub fn new(chunk_kb: usize) -> Self {
    Self::with_config(Config::new(chunk_kb))
  }

  pub fn with_config(config: Config) -> Self {
    Self {
      arena: Arena::new(config.chunk_kb(), 0, config.system()),
    }
  }

  pub fn alloc(&mut self, size: usize) -> AllocResult<Block> {
    let size = round_unit(size).ok_or(AllocError::Overflow)?;
    let chunk = self.arena.pickup(size).map_err(AllocError::ArenaError)?;
    let ptr = chunk
      .carve(size)
      .map_err(|err| AllocError::ArenaError(ArenaError::ChunkError(err)))?;
    Ok(Block::new(ptr, size))
  }

  /// Copies `bytes` into a fresh block.
  pub fn alloc_copy(&mut self, bytes: &[u8]) -> AllocResult<Block> {
    let block = self.alloc(bytes.len())?;
    // SAFETY: the block was just carved with room for `bytes`
    unsafe {
      core::ptr::copy_nonoverlapping(bytes.as_ptr(), block.as_ptr(), bytes.len());
    }
    Ok(block)
  }

  pub fn alloc_zeroed(&mut self, size: usize) -> AllocResult<Block> {
    let block = self.alloc(size)?;
    // SAFETY: as above
    unsafe { block.as_ptr().write_bytes(0, block.size()) };
    Ok(block)
  }

  /// Typed convenience over [`Bump::alloc`]. `T` must not need more than
  /// `BLK_BASE` alignment.
  pub fn alloc_value<T>(&mut self, value: T) -> AllocResult<NonNull<T>> {
    if align_of::<T>() > tinyalloc_sys::prim::BLK_BASE {
      return Err(AllocError::Layout);
    }

    let slot = self.alloc(size_of::<T>())?.cast::<T>();
    // SAFETY: aligned, sized for `T` and not handed out before
    unsafe { slot.as_ptr().write(value) };
    Ok(slot)
  }

  /// Rewinds every chunk. All blocks become invalid.
  pub fn reset(&mut self) {
    self.arena.reset();
  }

  pub fn destroy(&mut self) {
    self.arena.destroy();
  }

  pub fn chunk_count(&self) -> usize {
    self.arena.chunk_count()
  }

  pub fn capacity(&self) -> usize {
    self.arena.capacity()
  }

  pub fn used(&self) -> usize {
    self.arena.used()
  }

  pub fn owns(&self, ptr: *const u8) -> bool {
    self.arena.owns(ptr)
  }
}

impl Default for Bump {
  fn default() -> Self {
    Self::with_config(Config::default())
  }
}
