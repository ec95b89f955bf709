use crate::math::align_up;
use core::sync::atomic::{
  AtomicUsize,
  Ordering,
};

/// Granularity every block size and every returned address is rounded to.
pub const BLK_BASE: usize = 8;

/// Chunk sizes are configured in units of this many bytes.
pub const KIB: usize = 1024;

// a free block stores its successor in its first word
const _: () = assert!(BLK_BASE >= core::mem::size_of::<usize>());
const _: () = assert!(BLK_BASE.is_power_of_two());

#[cfg(not(any(target_os = "linux", target_os = "macos")))]
const COMMON_PAGE_SIZE: usize = 4096;

pub const fn word_width() -> usize {
  core::mem::size_of::<usize>()
}

#[cfg(any(target_os = "linux", target_os = "macos"))]
fn page_size_helper() -> usize {
  let size = unsafe { libc::sysconf(libc::_SC_PAGESIZE) };
  if size <= 0 { 4096 } else { size as usize }
}

#[cfg(not(any(target_os = "linux", target_os = "macos")))]
fn page_size_helper() -> usize {
  COMMON_PAGE_SIZE
}

pub fn page_size() -> usize {
  static PAGE_SIZE: AtomicUsize = AtomicUsize::new(0);

  match PAGE_SIZE.load(Ordering::Acquire) {
    0 => {
      let size = page_size_helper();
      PAGE_SIZE.store(size, Ordering::Release);
      size
    }
    size => size,
  }
}

pub fn page_align(value: usize) -> Option<usize> {
  align_up(value, page_size())
}
