#![cfg_attr(not(test), no_std)]

pub mod heap;
pub mod math;
pub mod prim;
pub mod system;
pub mod unix;

pub use system::GLOBAL_SYSTEM;

pub mod prelude {
  pub use super::{
    GLOBAL_SYSTEM,
    heap::MallocSystem,
    math::{
      align_offset,
      align_up,
      div_ceil,
      is_aligned,
    },
    prim::{
      BLK_BASE,
      KIB,
      page_align,
      page_size,
      word_width,
    },
    system::{
      SysError,
      SysResult,
      System,
      UnsupportedSystem,
    },
  };

  #[cfg(any(target_os = "linux", target_os = "macos"))]
  pub use super::unix::MmapSystem;
}
