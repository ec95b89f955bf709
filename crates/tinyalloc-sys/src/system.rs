use core::ptr::NonNull;

use crate::heap::MALLOC_SYSTEM;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SysError {
  Unsupported,
  OutOfMemory,
  InvalidArgument,
}

pub type SysResult<T> = Result<T, SysError>;

/// Coarse memory provider every chunk is carved from.
///
/// # Safety
///
/// Implementors must ensure that:
/// - `alloc` returns writable memory of at least `size` bytes that stays valid
///   until it is handed back to `dealloc`
/// - the returned address is aligned to at least [`crate::prim::BLK_BASE`]
/// - the length of the returned slice is the usable length of the region
/// - `dealloc` accepts exactly the regions this provider returned
pub unsafe trait System
where
  Self: Send + Sync,
{
  /// Obtains a region of at least `size` bytes.
  ///
  /// # Safety
  ///
  /// The region must eventually be returned through [`System::dealloc`] of the
  /// same provider, and must not be accessed afterwards.
  unsafe fn alloc(&self, size: usize) -> SysResult<NonNull<[u8]>> {
    _ = size;
    Err(SysError::Unsupported)
  }

  /// Returns a region obtained from [`System::alloc`].
  ///
  /// # Safety
  ///
  /// `mem` must be a region returned by this provider that has not been
  /// released yet.
  unsafe fn dealloc(&self, mem: NonNull<[u8]>) -> SysResult<()> {
    _ = mem;
    Err(SysError::Unsupported)
  }
}

/// Provider that refuses every request.
pub struct UnsupportedSystem {}
unsafe impl System for UnsupportedSystem {}

pub static GLOBAL_SYSTEM: &dyn System = &MALLOC_SYSTEM;
