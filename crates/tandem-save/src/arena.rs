//! Generation-tagged storage for the save blocks.
//!
//! Each block lives in a window `move_range` bytes larger than the block;
//! the block itself starts at the arena's base offset inside the window.
//! A relocation never moves bytes in place: it builds a fresh arena at
//! the new offset with the next generation and swaps it in. Any
//! [`BlockRef`] minted under the old generation stops resolving.

use std::fmt;

use tandem_core::Generation;

use crate::block::{Block, BlockMut};
use crate::error::SaveError;
use crate::layout::BlockId;

/// Where the blocks currently live.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BaseLocation {
    /// Arena generation.
    pub generation: Generation,
    /// Offset of every block within its window.
    pub offset: usize,
}

/// A held reference to one block, valid for one generation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[must_use]
pub struct BlockRef {
    block: BlockId,
    generation: Generation,
    offset: usize,
}

impl BlockRef {
    /// Referenced block.
    pub fn block(&self) -> BlockId {
        self.block
    }

    /// Generation the reference was minted under.
    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Base offset at the time the reference was minted.
    pub fn offset(&self) -> usize {
        self.offset
    }
}

impl fmt::Display for BlockRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}@{:#x} (gen {})",
            self.block, self.offset, self.generation
        )
    }
}

/// The authoritative copy of every save block.
pub struct SaveArena {
    location: BaseLocation,
    windows: [Box<[u8]>; 3],
}

impl SaveArena {
    /// Allocate zeroed windows with every block at `offset`.
    ///
    /// # Panics
    ///
    /// Panics if `offset` does not leave room for a block inside its window.
    pub fn new(move_range: usize, offset: usize, generation: Generation) -> Self {
        assert!(
            offset < move_range,
            "offset {offset} outside move range {move_range}"
        );
        let window = |id: BlockId| vec![0u8; id.size() + move_range].into_boxed_slice();
        Self {
            location: BaseLocation { generation, offset },
            windows: [
                window(BlockId::Trainer),
                window(BlockId::World),
                window(BlockId::Storage),
            ],
        }
    }

    /// Current generation and offset.
    pub fn location(&self) -> BaseLocation {
        self.location
    }

    /// Current generation.
    pub fn generation(&self) -> Generation {
        self.location.generation
    }

    /// Current base offset.
    pub fn offset(&self) -> usize {
        self.location.offset
    }

    /// Mint a reference to `block` for the current generation.
    pub fn locate(&self, block: BlockId) -> BlockRef {
        BlockRef {
            block,
            generation: self.location.generation,
            offset: self.location.offset,
        }
    }

    fn check(&self, r: &BlockRef) -> Result<(), SaveError> {
        if r.generation != self.location.generation {
            return Err(SaveError::StaleHandle {
                block: r.block,
                handle_generation: r.generation.0,
                current: self.location.generation.0,
            });
        }
        Ok(())
    }

    /// Resolve a held reference. Fails if a relocation happened since.
    pub fn resolve(&self, r: &BlockRef) -> Result<Block<'_>, SaveError> {
        self.check(r)?;
        Ok(self.block(r.block))
    }

    /// Resolve a held reference mutably. Fails if a relocation happened since.
    pub fn resolve_mut(&mut self, r: &BlockRef) -> Result<BlockMut<'_>, SaveError> {
        self.check(r)?;
        Ok(self.block_mut(r.block))
    }

    /// The current bytes of `id`.
    pub fn block(&self, id: BlockId) -> Block<'_> {
        let at = self.location.offset;
        Block::new(id, &self.windows[id.index()][at..at + id.size()])
    }

    /// The current bytes of `id`, mutably.
    pub fn block_mut(&mut self, id: BlockId) -> BlockMut<'_> {
        let at = self.location.offset;
        BlockMut::new(id, &mut self.windows[id.index()][at..at + id.size()])
    }
}
