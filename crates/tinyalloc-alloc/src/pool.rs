use core::{
  marker::PhantomData,
  ptr::NonNull,
};

use tinyalloc_sys::prim::BLK_BASE;

use crate::{
  config::{
    Config,
    FixedConfig,
  },
  error::{
    AllocError,
    AllocResult,
  },
  fixed::Fixed,
};

/// Node pool for one type, backed by a [`Fixed`] root sized for `T`.
///
/// `reset`, `destroy` and dropping the pool release slots without running
/// destructors of values still live in them.
pub struct Pool<T> {
  fixed: Fixed,
  marker: PhantomData<T>,
}

impl<T> Pool<T> {
  pub fn new(chunk_kb: usize) -> Self {
    Self::with_config(Config::new(chunk_kb))
  }

  pub fn with_config(config: Config) -> Self {
    let fixed = FixedConfig::new(config.chunk_kb(), size_of::<T>()).with_system(config.system());
    Self {
      fixed: Fixed::with_config(fixed),
      marker: PhantomData,
    }
  }

  /// Moves `value` into a pooled slot.
  pub fn alloc(&mut self, value: T) -> AllocResult<NonNull<T>> {
    if align_of::<T>() > BLK_BASE {
      return Err(AllocError::Layout);
    }

    let slot = self.fixed.alloc()?.cast::<T>();
    // SAFETY: the slot is BLK_BASE aligned and at least `size_of::<T>()` long
    unsafe { slot.as_ptr().write(value) };
    Ok(slot)
  }

  /// Drops the value behind `ptr` and returns its slot to the pool.
  ///
  /// # Safety
  ///
  /// `ptr` must come from [`Pool::alloc`] on this pool, must not have been
  /// freed, and must predate the last `reset`/`destroy`.
  pub unsafe fn free(&mut self, ptr: NonNull<T>) {
    unsafe {
      ptr.as_ptr().drop_in_place();
      self.fixed.free_ptr(ptr.as_ptr().cast());
    }
  }

  pub fn reset(&mut self) {
    self.fixed.reset();
  }

  pub fn destroy(&mut self) {
    self.fixed.destroy();
  }

  pub fn free_count(&self) -> usize {
    self.fixed.free_count()
  }

  pub fn chunk_count(&self) -> usize {
    self.fixed.chunk_count()
  }

  pub fn capacity(&self) -> usize {
    self.fixed.capacity()
  }

  pub fn used(&self) -> usize {
    self.fixed.used()
  }

  pub fn owns(&self, ptr: NonNull<T>) -> bool {
    self.fixed.owns(ptr.as_ptr().cast())
  }
}
