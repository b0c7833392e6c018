//! Scratch heap used to hold block captures during a relocation.
//!
//! [`ScratchHeap`] is a fixed-capacity bump allocator over bytes. A
//! relocation captures every block into it, rebuilds the arena from the
//! captures, then resets it. The backing allocation is reused across
//! relocations.

use crate::error::SaveError;
use crate::layout::BlockId;

/// A block copied into the scratch heap.
///
/// The length recorded here is the length copied back out, so both
/// directions of a relocation move exactly the same number of bytes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Capture {
    /// Which block was captured.
    pub block: BlockId,
    offset: usize,
    len: usize,
}

impl Capture {
    /// Captured length in bytes.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the capture is empty.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Fixed-capacity bump allocator for block captures.
pub struct ScratchHeap {
    data: Vec<u8>,
    cursor: usize,
}

impl ScratchHeap {
    /// Create a heap of `capacity` bytes.
    pub fn new(capacity: usize) -> Self {
        Self {
            data: vec![0; capacity],
            cursor: 0,
        }
    }

    /// Copy `bytes` into the heap and return where they landed.
    pub fn capture(&mut self, block: BlockId, bytes: &[u8]) -> Result<Capture, SaveError> {
        let available = self.data.len() - self.cursor;
        if bytes.len() > available {
            return Err(SaveError::HeapExhausted {
                requested: bytes.len(),
                available,
            });
        }
        let offset = self.cursor;
        self.data[offset..offset + bytes.len()].copy_from_slice(bytes);
        self.cursor += bytes.len();
        Ok(Capture {
            block,
            offset,
            len: bytes.len(),
        })
    }

    /// The bytes of a capture.
    pub fn get(&self, capture: &Capture) -> &[u8] {
        &self.data[capture.offset..capture.offset + capture.len]
    }

    /// Release every capture. Stale bytes are overwritten by the next capture.
    pub fn reset(&mut self) {
        self.cursor = 0;
    }

    /// Bytes currently held.
    pub fn used(&self) -> usize {
        self.cursor
    }

    /// Total capacity in bytes.
    pub fn capacity(&self) -> usize {
        self.data.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn captures_do_not_overlap() {
        let mut heap = ScratchHeap::new(16);
        let a = heap.capture(BlockId::Trainer, &[1, 2, 3]).unwrap();
        let b = heap.capture(BlockId::World, &[9; 5]).unwrap();
        assert_eq!(heap.get(&a), &[1, 2, 3]);
        assert_eq!(heap.get(&b), &[9; 5]);
        assert_eq!(heap.used(), 8);
    }

    #[test]
    fn exhaustion_is_reported() {
        let mut heap = ScratchHeap::new(4);
        heap.capture(BlockId::Trainer, &[0; 3]).unwrap();
        assert_eq!(
            heap.capture(BlockId::World, &[0; 2]),
            Err(SaveError::HeapExhausted {
                requested: 2,
                available: 1
            })
        );
    }

    #[test]
    fn reset_allows_reuse() {
        let mut heap = ScratchHeap::new(4);
        heap.capture(BlockId::Trainer, &[7; 4]).unwrap();
        heap.reset();
        assert_eq!(heap.used(), 0);
        let c = heap.capture(BlockId::Storage, &[1; 4]).unwrap();
        assert_eq!(heap.get(&c), &[1; 4]);
        assert_eq!(heap.capacity(), 4);
    }
}
