#[cfg(any(target_os = "linux", target_os = "macos"))]
use core::ptr::NonNull;

#[cfg(any(target_os = "linux", target_os = "macos"))]
use crate::{
  prim::page_align,
  system::{
    SysError,
    SysResult,
    System,
  },
};

/// Anonymous `mmap` provider. Requests are rounded up to whole pages and the
/// returned region reports the rounded length.
#[cfg(any(target_os = "linux", target_os = "macos"))]
pub struct MmapSystem {}

#[cfg(any(target_os = "linux", target_os = "macos"))]
pub static MMAP_SYSTEM: MmapSystem = MmapSystem {};

#[cfg(any(target_os = "linux", target_os = "macos"))]
impl MmapSystem {
  const fn prot() -> i32 {
    libc::PROT_READ | libc::PROT_WRITE
  }

  const fn flags() -> i32 {
    libc::MAP_PRIVATE | libc::MAP_ANONYMOUS
  }

  const fn as_c(mem: NonNull<[u8]>) -> *mut libc::c_void {
    mem.as_ptr() as *mut u8 as *mut libc::c_void
  }
}

#[cfg(any(target_os = "linux", target_os = "macos"))]
unsafe impl System for MmapSystem {
  unsafe fn alloc(&self, size: usize) -> SysResult<NonNull<[u8]>> {
    if size == 0 {
      return Err(SysError::InvalidArgument);
    }
    let size = page_align(size).ok_or(SysError::InvalidArgument)?;

    let ptr = unsafe { libc::mmap(core::ptr::null_mut(), size, Self::prot(), Self::flags(), -1, 0) };

    if ptr == libc::MAP_FAILED {
      return Err(SysError::OutOfMemory);
    }

    match NonNull::new(ptr as *mut u8) {
      Some(ptr) => Ok(NonNull::slice_from_raw_parts(ptr, size)),
      None => Err(SysError::OutOfMemory),
    }
  }

  unsafe fn dealloc(&self, mem: NonNull<[u8]>) -> SysResult<()> {
    let result = unsafe { libc::munmap(Self::as_c(mem), mem.len()) };
    if result == 0 {
      return Ok(());
    }

    Err(SysError::InvalidArgument)
  }
}
