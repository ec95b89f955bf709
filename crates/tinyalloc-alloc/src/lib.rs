#![cfg_attr(not(test), no_std)]

pub mod block;
pub mod bump;
pub mod classes;
pub mod config;
pub mod error;
pub mod fixed;
mod freelist;
pub mod pool;
pub mod tiny;

pub mod prelude {
  pub use super::{
    block::Block,
    bump::Bump,
    config::{
      Config,
      FixedConfig,
    },
    error::{
      AllocError,
      AllocResult,
    },
    fixed::Fixed,
    pool::Pool,
    tiny::Tiny,
  };
}

#[cfg(test)]
mod testing;
