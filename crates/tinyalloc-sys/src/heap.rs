use core::ptr::NonNull;

use crate::system::{
  SysError,
  SysResult,
  System,
};

/// `malloc`/`free` backed provider. This is the default for every root.
pub struct MallocSystem {}

pub static MALLOC_SYSTEM: MallocSystem = MallocSystem {};

unsafe impl System for MallocSystem {
  unsafe fn alloc(&self, size: usize) -> SysResult<NonNull<[u8]>> {
    if size == 0 {
      return Err(SysError::InvalidArgument);
    }

    let ptr = unsafe { libc::malloc(size) } as *mut u8;
    match NonNull::new(ptr) {
      Some(ptr) => Ok(NonNull::slice_from_raw_parts(ptr, size)),
      None => Err(SysError::OutOfMemory),
    }
  }

  unsafe fn dealloc(&self, mem: NonNull<[u8]>) -> SysResult<()> {
    unsafe { libc::free(mem.as_ptr() as *mut u8 as *mut libc::c_void) };
    Ok(())
  }
}
