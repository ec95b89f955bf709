#![cfg_attr(not(test), no_std)]

extern crate alloc;

pub mod arena;
pub mod chunk;

pub use arena::{
  Arena,
  ArenaError,
  ArenaResult,
};
pub use chunk::{
  Chunk,
  ChunkError,
  ChunkResult,
};
