use core::{
  ptr::NonNull,
  slice,
};

/// A block handed out by one of the allocators: a `BLK_BASE`-aligned pointer
/// and the number of bytes usable behind it.
///
/// Handles are not `Clone`; giving one back to `free` consumes it.
#[derive(Debug, PartialEq, Eq)]
pub struct Block {
  ptr: NonNull<u8>,
  size: usize,
}

impl Block {
  pub(crate) const fn new(ptr: NonNull<u8>, size: usize) -> Self {
    Self { ptr, size }
  }

  pub const fn as_ptr(&self) -> *mut u8 {
    self.ptr.as_ptr()
  }

  pub const fn cast<T>(&self) -> NonNull<T> {
    self.ptr.cast()
  }

  pub const fn size(&self) -> usize {
    self.size
  }

  pub fn addr(&self) -> usize {
    self.ptr.as_ptr() as usize
  }

  /// Gives up the handle, keeping only the pointer.
  pub const fn into_raw(self) -> NonNull<u8> {
    self.ptr
  }

  /// # Safety
  ///
  /// The owning root must not have been reset or destroyed since this block
  /// was allocated.
  pub unsafe fn as_slice(&self) -> &[u8] {
    unsafe { slice::from_raw_parts(self.ptr.as_ptr(), self.size) }
  }

  /// # Safety
  ///
  /// Same as [`Block::as_slice`].
  pub unsafe fn as_mut_slice(&mut self) -> &mut [u8] {
    unsafe { slice::from_raw_parts_mut(self.ptr.as_ptr(), self.size) }
  }
}
