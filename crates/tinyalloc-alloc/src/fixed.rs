//! Pool allocator for a single block size.
//!
//! Whenever the free list runs dry, one block is carved for the caller and up
//! to `PREALLOC_MAX` more are carved ahead from the same chunk, so most calls
//! never reach the arena.

use tinyalloc_arena::{
  Arena,
  ArenaError,
};
use tinyalloc_sys::{
  math::is_aligned,
  prim::BLK_BASE,
};
use tracing::trace;

use crate::{
  block::Block,
  config::{
    FixedConfig,
    PREALLOC_MAX,
  },
  error::{
    AllocError,
    AllocResult,
  },
  freelist::FreeList,
};

pub struct Fixed {
  arena: Arena,
  free: FreeList,
  block_size: usize,
}

impl Fixed {
  pub fn new(chunk_kb: usize, block_size: usize) -> Self {
    Self::with_config(FixedConfig::new(chunk_kb, block_size))
  }

  pub fn with_config(config: FixedConfig) -> Self {
    let base = config.config();
    Self {
      arena: Arena::new(base.chunk_kb(), 0, base.system()),
      free: FreeList::new(),
      block_size: config.block_size(),
    }
  }

  pub fn block_size(&self) -> usize {
    self.block_size
  }

  pub fn alloc(&mut self) -> AllocResult<Block> {
    let size = self.block_size;
    if let Some(slot) = self.free.pop() {
      return Ok(Block::new(slot, size));
    }

    let chunk = self.arena.pickup(size).map_err(AllocError::ArenaError)?;
    let chunk_err = |err| AllocError::ArenaError(ArenaError::ChunkError(err));
    let ptr = chunk.carve(size).map_err(chunk_err)?;

    let mut ahead = 0;
    while ahead < PREALLOC_MAX && chunk.fits(size) {
      let slot = chunk.carve(size).map_err(chunk_err)?;
      // SAFETY: a fresh slot of at least one aligned word
      unsafe { self.free.push(slot) };
      ahead += 1;
    }
    if ahead > 0 {
      trace!(ahead, block_size = size, "carved blocks ahead");
    }

    Ok(Block::new(ptr, size))
  }

  /// # Safety
  ///
  /// `block` must come from this root and predate its last `reset`/`destroy`.
  pub unsafe fn free(&mut self, block: Block) {
    unsafe { self.free_ptr(block.as_ptr()) }
  }

  /// Raw form of [`Fixed::free`]. A null or misaligned pointer is ignored.
  ///
  /// # Safety
  ///
  /// An aligned `ptr` must be a live block pointer from this root.
  pub unsafe fn free_ptr(&mut self, ptr: *mut u8) {
    let Some(slot) = core::ptr::NonNull::new(ptr) else {
      trace!("ignored null free");
      return;
    };
    if is_aligned(ptr as usize, BLK_BASE) != Some(true) {
      trace!(addr = ptr as usize, "ignored misaligned free");
      return;
    }
    debug_assert!(self.arena.owns(ptr), "freed pointer is not from this root");

    unsafe { self.free.push(slot) };
  }

  /// Rewinds every chunk and forgets the free list, including blocks carved
  /// ahead.
  pub fn reset(&mut self) {
    self.free.clear();
    self.arena.reset();
  }

  pub fn destroy(&mut self) {
    self.free.clear();
    self.arena.destroy();
  }

  /// Blocks ready to be handed out without touching the arena.
  pub fn free_count(&self) -> usize {
    self.free.len()
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

// SAFETY: a root exclusively owns its chunks and every slot its free list
// points to
unsafe impl Send for Fixed {}
