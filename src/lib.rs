#![no_std]

pub use tinyalloc_alloc::{
  block,
  bump,
  classes,
  config,
  error,
  fixed,
  pool,
  tiny,
};
pub use tinyalloc_arena as arena;
pub use tinyalloc_sys as sys;

pub mod prelude {
  pub use tinyalloc_alloc::prelude::*;
  pub use tinyalloc_arena::{
    ArenaError,
    ChunkError,
  };
  pub use tinyalloc_sys::prelude::*;
}
