//! Intrusive LIFO list of free slots.
//!
//! A listed slot's first word holds the pointer to the next slot. The slot
//! body is the node, so listing costs no memory. This is the only place that
//! reinterprets payload bytes: a slot is written here only while it is free,
//! and every owner clears its lists before the chunks behind them are rewound
//! or released.

use core::ptr::NonNull;

#[repr(C)]
struct Node {
  next: Option<NonNull<Node>>,
}

/// Decision made for each slot while scanning with [`FreeList::take_first`].
pub(crate) enum Pick {
  Skip,
  Take,
  /// Take the slot and list this one in its place.
  Replace(NonNull<u8>),
}

pub(crate) struct FreeList {
  head: Option<NonNull<Node>>,
  len: usize,
}

impl FreeList {
  pub(crate) const fn new() -> Self {
    Self { head: None, len: 0 }
  }

  pub(crate) const fn len(&self) -> usize {
    self.len
  }

  /// # Safety
  ///
  /// `slot` must be aligned for a pointer, hold at least one word, and stay
  /// untouched by anyone else until it is popped or the list is cleared.
  pub(crate) unsafe fn push(&mut self, slot: NonNull<u8>) {
    let node = slot.cast::<Node>();
    unsafe { node.as_ptr().write(Node { next: self.head }) };
    self.head = Some(node);
    self.len += 1;
  }

  pub(crate) fn pop(&mut self) -> Option<NonNull<u8>> {
    let node = self.head?;
    // SAFETY: listed slots satisfy the `push` contract
    self.head = unsafe { (*node.as_ptr()).next };
    self.len -= 1;
    Some(node.cast())
  }

  /// Unlinks the first slot `pick` accepts.
  ///
  /// # Safety
  ///
  /// A slot returned through [`Pick::Replace`] must satisfy the `push`
  /// contract.
  pub(crate) unsafe fn take_first<F>(&mut self, mut pick: F) -> Option<NonNull<u8>>
  where
    F: FnMut(NonNull<u8>) -> Pick,
  {
    let mut link: *mut Option<NonNull<Node>> = &raw mut self.head;

    // SAFETY: `link` always points at the head or at the `next` field of a
    // listed slot
    unsafe {
      while let Some(node) = *link {
        match pick(node.cast()) {
          Pick::Skip => link = &raw mut (*node.as_ptr()).next,
          Pick::Take => {
            *link = (*node.as_ptr()).next;
            self.len -= 1;
            return Some(node.cast());
          }
          Pick::Replace(slot) => {
            let replacement = slot.cast::<Node>();
            replacement.as_ptr().write(Node {
              next: (*node.as_ptr()).next,
            });
            *link = Some(replacement);
            return Some(node.cast());
          }
        }
      }
    }

    None
  }

  pub(crate) fn clear(&mut self) {
    self.head = None;
    self.len = 0;
  }

  pub(crate) fn iter(&self) -> Iter<'_> {
    Iter {
      next: self.head,
      marker: core::marker::PhantomData,
    }
  }
}

pub(crate) struct Iter<'list> {
  next: Option<NonNull<Node>>,
  marker: core::marker::PhantomData<&'list FreeList>,
}

impl Iterator for Iter<'_> {
  type Item = NonNull<u8>;

  fn next(&mut self) -> Option<Self::Item> {
    let node = self.next?;
    // SAFETY: listed slots satisfy the `push` contract
    self.next = unsafe { (*node.as_ptr()).next };
    Some(node.cast())
  }
}
