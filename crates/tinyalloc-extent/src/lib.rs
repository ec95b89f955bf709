#![cfg_attr(not(test), no_std)]

use core::ptr::NonNull;

use tinyalloc_sys::system::{
  SysError,
  System,
};

#[derive(Debug)]
pub enum ExtentError {
  SystemError(SysError),
  Overflow,
}

pub type ExtentResult<T> = Result<T, ExtentError>;

/// One coarse region owned until drop, when it goes back to its provider.
pub struct Extent {
  mem: NonNull<[u8]>,
  system: &'static dyn System,
}

impl Extent {
  pub fn new(size: usize, system: &'static dyn System) -> ExtentResult<Extent> {
    let mem = unsafe { system.alloc(size) }.map_err(ExtentError::SystemError)?;
    if mem.len() < size {
      let _ = unsafe { system.dealloc(mem) };
      return Err(ExtentError::SystemError(SysError::OutOfMemory));
    }

    Ok(Extent { mem, system })
  }

  /// Usable bytes of the region, at least the size requested.
  pub fn size(&self) -> usize {
    self.mem.len()
  }

  pub fn as_ptr(&self) -> *mut u8 {
    self.mem.as_ptr() as *mut u8
  }

  pub fn addr(&self) -> usize {
    self.as_ptr() as usize
  }

  /// Pointer `offset` bytes into the region, or `Overflow` past its end.
  pub fn at(&self, offset: usize) -> ExtentResult<NonNull<u8>> {
    if offset > self.size() {
      return Err(ExtentError::Overflow);
    }
    // SAFETY: offset is within (or one past) the region
    Ok(unsafe { NonNull::new_unchecked(self.as_ptr().add(offset)) })
  }

  pub fn contains(&self, ptr: *const u8) -> bool {
    let addr = ptr as usize;
    addr >= self.addr() && addr < self.addr() + self.size()
  }
}

// SAFETY: the region is exclusively owned and the provider is `Send + Sync`
unsafe impl Send for Extent {}

impl Drop for Extent {
  fn drop(&mut self) {
    let _ = unsafe { self.system.dealloc(self.mem) };
  }
}
