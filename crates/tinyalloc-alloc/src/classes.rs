use tinyalloc_sys::{
  math::align_up,
  prim::BLK_BASE,
};

use crate::config::{
  FREELIST_MAX,
  META_SIZE,
  MIN_BLOCK,
};

/// Full tiny block size in bytes, header included.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct SizeClass(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BinIndex(pub usize);

impl SizeClass {
  /// Payload bytes a block of this class can hold.
  pub const fn payload(self) -> usize {
    self.0 - META_SIZE
  }
}

impl BinIndex {
  pub const CATCH_ALL: BinIndex = BinIndex(FREELIST_MAX);

  pub const fn is_catch_all(self) -> bool {
    self.0 == FREELIST_MAX
  }
}

/// Rounds `size` up to whole `BLK_BASE` units, never below one unit.
pub const fn round_unit(size: usize) -> Option<usize> {
  if size < BLK_BASE {
    return Some(BLK_BASE);
  }
  align_up(size, BLK_BASE)
}

/// Size class for a tiny request of `size` payload bytes.
pub const fn class_for(size: usize) -> Option<SizeClass> {
  let full = match size.checked_add(META_SIZE) {
    Some(full) => full,
    None => return None,
  };
  if full < MIN_BLOCK {
    return Some(SizeClass(MIN_BLOCK));
  }

  match align_up(full, BLK_BASE) {
    Some(full) => Some(SizeClass(full)),
    None => None,
  }
}

pub const fn bin_for(class: SizeClass) -> BinIndex {
  let index = class.0 / BLK_BASE - 1;
  if index < FREELIST_MAX {
    BinIndex(index)
  } else {
    BinIndex::CATCH_ALL
  }
}
