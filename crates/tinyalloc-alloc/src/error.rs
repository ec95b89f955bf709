use core::fmt;

use tinyalloc_arena::ArenaError;

#[derive(Debug)]
pub enum AllocError {
  ArenaError(ArenaError),
  Overflow,
  Layout,
}

pub type AllocResult<T> = Result<T, AllocError>;

impl fmt::Display for AllocError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      AllocError::ArenaError(err) => write!(f, "chunk allocation failed: {err:?}"),
      AllocError::Overflow => f.write_str("requested size overflows"),
      AllocError::Layout => f.write_str("type does not fit the block layout"),
    }
  }
}

impl core::error::Error for AllocError {}
