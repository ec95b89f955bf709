//! C ABI over the allocator roots.
//!
//! Roots are heap boxed and handed out as opaque pointers. Every entry point
//! accepts a null root and does nothing (or returns null). Allocation failure
//! is reported as a null pointer.

pub use tinyalloc::prelude::*;
use core::ptr;
use libc::c_int;

fn chunk_kb(chksize: c_int) -> usize {
  usize::try_from(chksize).unwrap_or(0)
}

fn request(size: c_int) -> Option<usize> {
  usize::try_from(size).ok()
}

fn boxed<T>(root: T) -> *mut T {
  Box::into_raw(Box::new(root))
}

/// # Safety
///
/// `root` must be null or a pointer returned by the matching `*_new` that has
/// not been released.
unsafe fn release<T>(root: *mut T) {
  if !root.is_null() {
    drop(unsafe { Box::from_raw(root) });
  }
}

#[unsafe(no_mangle)]
pub extern "C" fn tinyalloc_new(chksize: c_int) -> *mut Tiny {
  boxed(Tiny::new(chunk_kb(chksize)))
}

/// # Safety
///
/// `root` must be null or a live pointer from [`tinyalloc_new`].
#[unsafe(no_mangle)]
pub unsafe extern "C" fn tinyalloc(root: *mut Tiny, size: c_int) -> *mut u8 {
  let (Some(tiny), Some(size)) = (unsafe { root.as_mut() }, request(size)) else {
    return ptr::null_mut();
  };
  tiny.alloc(size).map_or(ptr::null_mut(), |block| block.into_raw().as_ptr())
}

/// # Safety
///
/// `root` as for [`tinyalloc`]. An aligned `ptr` must be a live block from
/// the same root.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn tinyfree(root: *mut Tiny, ptr: *mut u8) {
  if let Some(tiny) = unsafe { root.as_mut() } {
    unsafe { tiny.free_ptr(ptr) };
  }
}

/// # Safety
///
/// `root` must be null or a live pointer from [`tinyalloc_new`].
#[unsafe(no_mangle)]
pub unsafe extern "C" fn tinyreset(root: *mut Tiny) {
  if let Some(tiny) = unsafe { root.as_mut() } {
    tiny.reset();
  }
}

/// # Safety
///
/// `root` must be null or a live pointer from [`tinyalloc_new`].
#[unsafe(no_mangle)]
pub unsafe extern "C" fn tinydestroy(root: *mut Tiny) {
  if let Some(tiny) = unsafe { root.as_mut() } {
    tiny.destroy();
  }
}

/// Destroys the root and frees the root itself.
///
/// # Safety
///
/// `root` must be null or a live pointer from [`tinyalloc_new`]. It is
/// dangling afterwards.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn tinyalloc_release(root: *mut Tiny) {
  unsafe { release(root) }
}

#[unsafe(no_mangle)]
pub extern "C" fn bumpalloc_new(chksize: c_int) -> *mut Bump {
  boxed(Bump::new(chunk_kb(chksize)))
}

/// # Safety
///
/// `root` must be null or a live pointer from [`bumpalloc_new`].
#[unsafe(no_mangle)]
pub unsafe extern "C" fn bumpalloc(root: *mut Bump, size: c_int) -> *mut u8 {
  let (Some(bump), Some(size)) = (unsafe { root.as_mut() }, request(size)) else {
    return ptr::null_mut();
  };
  bump.alloc(size).map_or(ptr::null_mut(), |block| block.into_raw().as_ptr())
}

/// # Safety
///
/// `root` must be null or a live pointer from [`bumpalloc_new`].
#[unsafe(no_mangle)]
pub unsafe extern "C" fn bumpreset(root: *mut Bump) {
  if let Some(bump) = unsafe { root.as_mut() } {
    bump.reset();
  }
}

/// # Safety
///
/// `root` must be null or a live pointer from [`bumpalloc_new`].
#[unsafe(no_mangle)]
pub unsafe extern "C" fn bumpdestroy(root: *mut Bump) {
  if let Some(bump) = unsafe { root.as_mut() } {
    bump.destroy();
  }
}

/// # Safety
///
/// `root` must be null or a live pointer from [`bumpalloc_new`]. It is
/// dangling afterwards.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn bumpalloc_release(root: *mut Bump) {
  unsafe { release(root) }
}

#[unsafe(no_mangle)]
pub extern "C" fn fixedalloc_new(chksize: c_int, size: c_int) -> *mut Fixed {
  boxed(Fixed::new(chunk_kb(chksize), request(size).unwrap_or(0)))
}

/// # Safety
///
/// `root` must be null or a live pointer from [`fixedalloc_new`].
#[unsafe(no_mangle)]
pub unsafe extern "C" fn fixedalloc(root: *mut Fixed) -> *mut u8 {
  let Some(fixed) = (unsafe { root.as_mut() }) else {
    return ptr::null_mut();
  };
  fixed.alloc().map_or(ptr::null_mut(), |block| block.into_raw().as_ptr())
}

/// # Safety
///
/// `root` as for [`fixedalloc`]. An aligned `ptr` must be a live block from
/// the same root.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn fixedfree(root: *mut Fixed, ptr: *mut u8) {
  if let Some(fixed) = unsafe { root.as_mut() } {
    unsafe { fixed.free_ptr(ptr) };
  }
}

/// # Safety
///
/// `root` must be null or a live pointer from [`fixedalloc_new`].
#[unsafe(no_mangle)]
pub unsafe extern "C" fn fixedreset(root: *mut Fixed) {
  if let Some(fixed) = unsafe { root.as_mut() } {
    fixed.reset();
  }
}

/// # Safety
///
/// `root` must be null or a live pointer from [`fixedalloc_new`].
#[unsafe(no_mangle)]
pub unsafe extern "C" fn fixeddestroy(root: *mut Fixed) {
  if let Some(fixed) = unsafe { root.as_mut() } {
    fixed.destroy();
  }
}

/// # Safety
///
/// `root` must be null or a live pointer from [`fixedalloc_new`]. It is
/// dangling afterwards.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn fixedalloc_release(root: *mut Fixed) {
  unsafe { release(root) }
}
