use rand::{
  Rng,
  SeedableRng,
  rngs::StdRng,
};
use tinyalloc_arena::{
  ArenaError,
  ChunkError,
};
use tinyalloc_extent::ExtentError;
use tinyalloc_sys::{
  prim::KIB,
  system::SysError,
};

use super::*;
use crate::testing::{
  CountingSystem,
  LimitedSystem,
  UNSUPPORTED,
  disjoint,
};

fn fill(block: &mut Block, byte: u8) {
  unsafe { block.as_mut_slice() }.fill(byte);
}

fn intact(block: &Block, byte: u8) -> bool {
  unsafe { block.as_slice() }.iter().all(|&b| b == byte)
}

#[test]
fn tiny_alloc_aligned_and_sized() {
  let mut tiny = Tiny::new(4);
  for size in 0..300 {
    let block = tiny.alloc(size).unwrap();
    assert_eq!(block.addr() % BLK_BASE, 0);
    assert!(block.size() >= size);
    assert_eq!(block.size() % BLK_BASE, 0);
  }
}

#[test]
fn tiny_random_blocks_do_not_overlap() {
  let mut rng = StdRng::seed_from_u64(0x7141);
  let mut tiny = Tiny::new(8);
  let mut live = Vec::new();

  for _ in 0..2000 {
    live.push(tiny.alloc(rng.random_range(1..2048)).unwrap());
  }
  for _ in 0..1000 {
    let index = rng.random_range(0..live.len());
    unsafe { tiny.free(live.swap_remove(index)) };
  }
  for _ in 0..1000 {
    live.push(tiny.alloc(rng.random_range(1..2048)).unwrap());
  }

  let mut ranges: Vec<_> = live.iter().map(|b| (b.addr(), b.size())).collect();
  assert!(disjoint(&mut ranges));
}

#[test]
fn tiny_content_survives_churn() {
  let mut rng = StdRng::seed_from_u64(42);
  let mut tiny = Tiny::new(4);

  let mut kept = Vec::new();
  for i in 0..64u8 {
    let mut block = tiny.alloc(rng.random_range(1..600)).unwrap();
    fill(&mut block, i);
    kept.push(block);
  }

  let mut churn = Vec::new();
  for _ in 0..5000 {
    if churn.is_empty() || rng.random_bool(0.55) {
      let mut block = tiny.alloc(rng.random_range(1..1500)).unwrap();
      fill(&mut block, 0xEE);
      churn.push(block);
    } else {
      let index = rng.random_range(0..churn.len());
      unsafe { tiny.free(churn.swap_remove(index)) };
    }
  }

  for (i, block) in kept.iter().enumerate() {
    assert!(intact(block, i as u8), "block {i} was overwritten");
  }
}

#[test]
fn tiny_free_block_is_reused() {
  let mut tiny = Tiny::new(4);
  let first = tiny.alloc(40).unwrap();
  let addr = first.addr();
  let used = tiny.used();

  unsafe { tiny.free(first) };
  assert_eq!(tiny.free_count(BinIndex(5)), 1);

  // 33 bytes maps to the same 48 byte class as 40
  let again = tiny.alloc(33).unwrap();
  assert_eq!(again.addr(), addr);
  assert_eq!(again.size(), 40);
  assert_eq!(tiny.used(), used);
  assert_eq!(tiny.free_count(BinIndex(5)), 0);
}

#[test]
fn tiny_exact_bins_are_lifo() {
  let mut tiny = Tiny::new(4);
  let a = tiny.alloc(24).unwrap();
  let b = tiny.alloc(24).unwrap();
  let (a_addr, b_addr) = (a.addr(), b.addr());

  unsafe {
    tiny.free(a);
    tiny.free(b);
  }
  assert_eq!(tiny.alloc(24).unwrap().addr(), b_addr);
  assert_eq!(tiny.alloc(24).unwrap().addr(), a_addr);
}

#[test]
fn tiny_catch_all_splits_large_block() {
  let mut tiny = Tiny::new(4);
  let big = tiny.alloc(1024).unwrap();
  let addr = big.addr();
  let used = tiny.used();
  unsafe { tiny.free(big) };
  assert_eq!(tiny.free_count(BinIndex::CATCH_ALL), 1);
  assert_eq!(tiny.free_bytes(), 1024);

  // 208 byte head, 824 byte tail stays listed
  let head = tiny.alloc(200).unwrap();
  assert_eq!(head.addr(), addr);
  assert_eq!(head.size(), 200);
  assert_eq!(tiny.free_count(BinIndex::CATCH_ALL), 1);
  assert_eq!(tiny.free_bytes(), 824 - META_SIZE);

  let tail = tiny.alloc(300).unwrap();
  assert_eq!(tail.addr(), addr + 208);
  assert_eq!(tail.size(), 304);
  assert_eq!(tiny.used(), used);

  let mut ranges = [(head.addr(), head.size()), (tail.addr(), tail.size())];
  assert!(disjoint(&mut ranges));
}

#[test]
fn tiny_catch_all_takes_whole_block_when_rest_is_small() {
  let mut tiny = Tiny::new(4);
  let block = tiny.alloc(200).unwrap();
  let addr = block.addr();
  unsafe { tiny.free(block) };

  let again = tiny.alloc(190).unwrap();
  assert_eq!(again.addr(), addr);
  assert_eq!(again.size(), 200);
  assert_eq!(tiny.free_count(BinIndex::CATCH_ALL), 0);
}

#[test]
fn tiny_catch_all_skips_small_blocks() {
  let mut tiny = Tiny::new(4);
  let small = tiny.alloc(200).unwrap();
  let small_addr = small.addr();
  unsafe { tiny.free(small) };

  let large = tiny.alloc(400).unwrap();
  assert_ne!(large.addr(), small_addr);
  assert_eq!(tiny.free_count(BinIndex::CATCH_ALL), 1);
}

#[test]
fn tiny_ignores_null_and_misaligned_free() {
  let mut tiny = Tiny::new(4);
  let block = tiny.alloc(64).unwrap();

  unsafe {
    tiny.free_ptr(core::ptr::null_mut());
    tiny.free_ptr(block.as_ptr().add(1));
    tiny.free_ptr(block.as_ptr().add(BLK_BASE - 1));
  }
  assert_eq!(tiny.free_bytes(), 0);
  assert!((0..BINS).all(|bin| tiny.free_count(BinIndex(bin)) == 0));
}

#[test]
fn tiny_big_block_grows_fitting_chunk() {
  let mut tiny = Tiny::new(32);
  let mut block = tiny.alloc(512 * KIB).unwrap();
  assert!(block.size() >= 512 * KIB);
  assert_eq!(tiny.chunk_count(), 1);
  assert!(tiny.capacity() >= 512 * KIB + META_SIZE);

  fill(&mut block, 0x5A);
  assert!(intact(&block, 0x5A));
  assert!(tiny.owns(block.as_ptr()));
}

#[test]
fn tiny_reset_then_destroy_releases_everything() {
  static COUNTING: CountingSystem = CountingSystem::new();

  let mut tiny = Tiny::with_config(Config::new(1).with_system(&COUNTING));
  let mut blocks = Vec::new();
  for size in (8..4000).step_by(97) {
    blocks.push(tiny.alloc(size).unwrap());
  }
  for block in blocks.drain(..).step_by(2) {
    unsafe { tiny.free(block) };
  }
  let chunks = tiny.chunk_count();
  assert!(chunks > 1);
  assert_eq!(COUNTING.live(), chunks);

  tiny.reset();
  assert_eq!(tiny.used(), 0);
  assert_eq!(tiny.free_bytes(), 0);
  assert_eq!(tiny.chunk_count(), chunks);
  assert_eq!(COUNTING.live(), chunks);

  tiny.destroy();
  assert_eq!(tiny.chunk_count(), 0);
  assert_eq!(COUNTING.live(), 0);
}

#[test]
fn tiny_drop_releases_chunks() {
  static COUNTING: CountingSystem = CountingSystem::new();

  {
    let mut tiny = Tiny::with_config(Config::new(1).with_system(&COUNTING));
    tiny.alloc(2 * KIB).unwrap();
    tiny.alloc(16).unwrap();
    assert!(COUNTING.live() >= 1);
  }
  assert_eq!(COUNTING.live(), 0);
}

#[test]
fn tiny_reusable_after_destroy() {
  let mut tiny = Tiny::new(1);
  let block = tiny.alloc(64).unwrap();
  unsafe { tiny.free(block) };
  tiny.destroy();

  assert_eq!(tiny.free_bytes(), 0);
  let block = tiny.alloc(64).unwrap();
  assert!(tiny.owns(block.as_ptr()));
  assert_eq!(tiny.chunk_count(), 1);
}

#[test]
fn tiny_failed_grow_keeps_bins() {
  static LIMITED: LimitedSystem = LimitedSystem::new(1);

  let mut tiny = Tiny::with_config(Config::new(4).with_system(&LIMITED));
  let kept = tiny.alloc(100).unwrap();
  let small = tiny.alloc(40).unwrap();
  let large = tiny.alloc(200).unwrap();
  let (small_addr, large_addr) = (small.addr(), large.addr());
  unsafe {
    tiny.free(small);
    tiny.free(large);
  }

  // too big for the parked catch-all block and for the chunk
  assert!(matches!(
    tiny.alloc(8000),
    Err(AllocError::ArenaError(ArenaError::ChunkError(
      ChunkError::ExtentError(ExtentError::SystemError(SysError::OutOfMemory))
    )))
  ));
  assert_eq!(tiny.chunk_count(), 1);
  assert!(tiny.owns(kept.as_ptr()));
  assert_eq!(tiny.free_count(BinIndex(5)), 1);
  assert_eq!(tiny.free_count(BinIndex::CATCH_ALL), 1);
  assert_eq!(tiny.free_bytes(), 40 + 200);

  assert_eq!(tiny.alloc(40).unwrap().addr(), small_addr);
  assert_eq!(tiny.alloc(150).unwrap().addr(), large_addr);
  assert_eq!(tiny.free_bytes(), 0);
}

#[test]
fn tiny_reports_exhaustion() {
  let mut tiny = Tiny::with_config(Config::new(1).with_system(&UNSUPPORTED));
  assert!(matches!(
    tiny.alloc(16),
    Err(AllocError::ArenaError(ArenaError::ChunkError(
      ChunkError::ExtentError(_)
    )))
  ));
  assert_eq!(tiny.chunk_count(), 0);
}

#[test]
fn tiny_size_overflow() {
  let mut tiny = Tiny::new(1);
  assert!(matches!(tiny.alloc(usize::MAX), Err(AllocError::Overflow)));
  assert!(matches!(
    tiny.alloc(usize::MAX - 64),
    Err(AllocError::ArenaError(ArenaError::ChunkError(
      ChunkError::Overflow
    )))
  ));
  assert_eq!(tiny.chunk_count(), 0);
}
