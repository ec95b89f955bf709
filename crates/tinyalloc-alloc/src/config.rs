use core::fmt;

use getset::CopyGetters;
use tinyalloc_sys::{
  GLOBAL_SYSTEM,
  prim::BLK_BASE,
  system::System,
};

use crate::classes::round_unit;

/// Number of exact size-class bins.
pub const FREELIST_MAX: usize = 16;
/// Exact bins plus the catch-all bin.
pub const BINS: usize = FREELIST_MAX + 1;
/// Bytes in front of every tiny payload.
pub const META_SIZE: usize = BLK_BASE;
/// Smallest tiny block, header included.
pub const MIN_BLOCK: usize = 2 * BLK_BASE;
/// Smallest leftover worth splitting off a catch-all block. Anything this
/// large lands back in the catch-all bin.
pub const SPLIT_MIN: usize = BLK_BASE * BINS;
/// Blocks the fixed allocator carves ahead per chunk pickup.
pub const PREALLOC_MAX: usize = 32;
pub const DEFAULT_CHUNK_KB: usize = 64;

#[derive(Clone, Copy, CopyGetters)]
pub struct Config {
  /// Minimum chunk size in KiB, never zero.
  #[getset(get_copy = "pub")]
  chunk_kb: usize,
  /// Provider chunks are obtained from.
  #[getset(get_copy = "pub")]
  system: &'static dyn System,
}

impl Config {
  pub fn new(chunk_kb: usize) -> Self {
    Self {
      chunk_kb: chunk_kb.max(1),
      system: GLOBAL_SYSTEM,
    }
  }

  pub fn with_system(mut self, system: &'static dyn System) -> Self {
    self.system = system;
    self
  }
}

impl Default for Config {
  fn default() -> Self {
    Self::new(DEFAULT_CHUNK_KB)
  }
}

impl fmt::Debug for Config {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Config")
      .field("chunk_kb", &self.chunk_kb)
      .finish_non_exhaustive()
  }
}

#[derive(Debug, Clone, Copy, CopyGetters)]
pub struct FixedConfig {
  #[getset(get_copy = "pub")]
  config: Config,
  /// Block size rounded up to `BLK_BASE`, at least one unit.
  #[getset(get_copy = "pub")]
  block_size: usize,
}

impl FixedConfig {
  pub fn new(chunk_kb: usize, block_size: usize) -> Self {
    Self {
      config: Config::new(chunk_kb),
      block_size: round_unit(block_size).unwrap_or(usize::MAX & !(BLK_BASE - 1)),
    }
  }

  pub fn with_system(mut self, system: &'static dyn System) -> Self {
    self.config = self.config.with_system(system);
    self
  }
}
