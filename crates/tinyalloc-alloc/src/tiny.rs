//! General purpose allocator: size-classed free lists over the shared arena.
//!
//! Every block carries a one-unit header holding its payload size:
//!
//! ```text
//!   | size | payload ........ | size | payload .... |
//!   ^      ^
//!   meta   pointer handed out (BLK_BASE aligned)
//! ```
//!
//! Freed blocks go to the bin of their full size and are reused whole, or, in
//! the catch-all bin, split when the leftover is large enough. Neighbouring
//! free blocks are never merged.

use core::ptr::NonNull;

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
  classes::{
    BinIndex,
    SizeClass,
    bin_for,
    class_for,
  },
  config::{
    BINS,
    Config,
    META_SIZE,
    SPLIT_MIN,
  },
  error::{
    AllocError,
    AllocResult,
  },
  freelist::{
    FreeList,
    Pick,
  },
};

unsafe fn meta(payload: NonNull<u8>) -> *mut usize {
  unsafe { payload.as_ptr().sub(META_SIZE) as *mut usize }
}

unsafe fn read_size(payload: NonNull<u8>) -> usize {
  unsafe { meta(payload).read() }
}

unsafe fn write_size(payload: NonNull<u8>, size: usize) {
  unsafe { meta(payload).write(size) }
}

pub struct Tiny {
  arena: Arena,
  bins: [FreeList; BINS],
}

impl Tiny {
  pub fn new(chunk_kb: usize) -> Self {
    Self::with_config(Config::new(chunk_kb))
  }

  pub fn with_config(config: Config) -> Self {
    Self {
      arena: Arena::new(config.chunk_kb(), META_SIZE, config.system()),
      bins: core::array::from_fn(|_| FreeList::new()),
    }
  }

  /// Allocates at least `size` usable bytes.
  pub fn alloc(&mut self, size: usize) -> AllocResult<Block> {
    let class = class_for(size).ok_or(AllocError::Overflow)?;
    let payload = match self.take_free(class) {
      Some(payload) => payload,
      None => self.carve(class)?,
    };

    // SAFETY: payload was just taken from a bin or carved with a header
    let usable = unsafe { read_size(payload) };
    Ok(Block::new(payload, usable))
  }

  fn take_free(&mut self, class: SizeClass) -> Option<NonNull<u8>> {
    let bin = bin_for(class);
    if !bin.is_catch_all() {
      return self.bins[bin.0].pop();
    }

    let want = class.0;
    let pick = |payload: NonNull<u8>| {
      // SAFETY: listed slots are free payloads with intact headers, and the
      // tail lies inside the found block
      unsafe {
        let full = read_size(payload) + META_SIZE;
        if full < want {
          return Pick::Skip;
        }

        let rest = full - want;
        if rest < SPLIT_MIN {
          return Pick::Take;
        }

        let tail = NonNull::new_unchecked(payload.as_ptr().add(want));
        write_size(payload, want - META_SIZE);
        write_size(tail, rest - META_SIZE);
        trace!(full, want, rest, "split catch-all block");
        Pick::Replace(tail)
      }
    };

    // SAFETY: a split tail is a free, aligned payload inside arena memory
    unsafe { self.bins[BinIndex::CATCH_ALL.0].take_first(pick) }
  }

  fn carve(&mut self, class: SizeClass) -> AllocResult<NonNull<u8>> {
    let chunk = self.arena.pickup(class.0).map_err(AllocError::ArenaError)?;
    let base = chunk
      .carve(class.0)
      .map_err(|err| AllocError::ArenaError(ArenaError::ChunkError(err)))?;

    // SAFETY: the chunk aligned `base + META_SIZE` and reserved `class.0`
    // bytes from `base`
    unsafe {
      let payload = NonNull::new_unchecked(base.as_ptr().add(META_SIZE));
      write_size(payload, class.payload());
      Ok(payload)
    }
  }

  /// Returns `block` to its size-class bin.
  ///
  /// # Safety
  ///
  /// `block` must come from this root and predate its last `reset`/`destroy`.
  pub unsafe fn free(&mut self, block: Block) {
    unsafe { self.free_ptr(block.as_ptr()) }
  }

  /// Raw form of [`Tiny::free`]. A null or misaligned pointer is ignored.
  ///
  /// # Safety
  ///
  /// An aligned `ptr` must be a live payload pointer from this root. Freeing a
  /// pointer twice, or one from elsewhere, is undefined behaviour.
  pub unsafe fn free_ptr(&mut self, ptr: *mut u8) {
    let Some(payload) = NonNull::new(ptr) else {
      trace!("ignored null free");
      return;
    };
    if is_aligned(ptr as usize, BLK_BASE) != Some(true) {
      trace!(addr = ptr as usize, "ignored misaligned free");
      return;
    }
    debug_assert!(self.arena.owns(ptr), "freed pointer is not from this root");

    let full = unsafe { read_size(payload) } + META_SIZE;
    let bin = bin_for(SizeClass(full));
    unsafe { self.bins[bin.0].push(payload) };
  }

  /// Invalidates every block and rewinds all chunks, keeping their memory.
  pub fn reset(&mut self) {
    self.clear_bins();
    self.arena.reset();
  }

  /// Invalidates every block and releases all chunks.
  pub fn destroy(&mut self) {
    self.clear_bins();
    self.arena.destroy();
  }

  fn clear_bins(&mut self) {
    for bin in self.bins.iter_mut() {
      bin.clear();
    }
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

  /// Free blocks waiting in `bin`.
  pub fn free_count(&self, bin: BinIndex) -> usize {
    self.bins.get(bin.0).map_or(0, FreeList::len)
  }

  /// Payload bytes held by free blocks across all bins.
  pub fn free_bytes(&self) -> usize {
    self
      .bins
      .iter()
      .flat_map(FreeList::iter)
      // SAFETY: listed slots are free payloads with intact headers
      .map(|payload| unsafe { read_size(payload) })
      .sum()
  }
}

impl Default for Tiny {
  fn default() -> Self {
    Self::with_config(Config::default())
  }
}

// SAFETY: a root exclusively owns its chunks and every slot its bins point to
unsafe impl Send for Tiny {}

#[cfg(test)]
mod tests;
