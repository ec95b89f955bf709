use core::{
  ptr::NonNull,
  sync::atomic::{
    AtomicUsize,
    Ordering,
  },
};

use tinyalloc_sys::{
  GLOBAL_SYSTEM,
  system::{
    SysError,
    SysResult,
    System,
    UnsupportedSystem,
  },
};

/// Provider that forwards to the global one and tracks live regions.
pub(crate) struct CountingSystem {
  live: AtomicUsize,
}

impl CountingSystem {
  pub(crate) const fn new() -> Self {
    Self {
      live: AtomicUsize::new(0),
    }
  }

  pub(crate) fn live(&self) -> usize {
    self.live.load(Ordering::SeqCst)
  }
}

unsafe impl System for CountingSystem {
  unsafe fn alloc(&self, size: usize) -> SysResult<NonNull<[u8]>> {
    let mem = unsafe { GLOBAL_SYSTEM.alloc(size) }?;
    self.live.fetch_add(1, Ordering::SeqCst);
    Ok(mem)
  }

  unsafe fn dealloc(&self, mem: NonNull<[u8]>) -> SysResult<()> {
    self.live.fetch_sub(1, Ordering::SeqCst);
    unsafe { GLOBAL_SYSTEM.dealloc(mem) }
  }
}

/// Provider that serves a fixed number of regions, then reports `OutOfMemory`.
pub(crate) struct LimitedSystem {
  left: AtomicUsize,
}

impl LimitedSystem {
  pub(crate) const fn new(regions: usize) -> Self {
    Self {
      left: AtomicUsize::new(regions),
    }
  }
}

unsafe impl System for LimitedSystem {
  unsafe fn alloc(&self, size: usize) -> SysResult<NonNull<[u8]>> {
    self
      .left
      .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| left.checked_sub(1))
      .map_err(|_| SysError::OutOfMemory)?;
    unsafe { GLOBAL_SYSTEM.alloc(size) }
  }

  unsafe fn dealloc(&self, mem: NonNull<[u8]>) -> SysResult<()> {
    unsafe { GLOBAL_SYSTEM.dealloc(mem) }
  }
}

pub(crate) static UNSUPPORTED: UnsupportedSystem = UnsupportedSystem {};

/// True when no two `(addr, len)` ranges intersect.
pub(crate) fn disjoint(ranges: &mut [(usize, usize)]) -> bool {
  ranges.sort_unstable_by_key(|&(addr, _)| addr);
  ranges.windows(2).all(|pair| pair[0].0 + pair[0].1 <= pair[1].0)
}
