//! Save-specific error types.

use std::error::Error;
use std::fmt;

use crate::layout::BlockId;

/// Errors from save block access, persistence and relocation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SaveError {
    /// A `BlockRef` minted before the most recent relocation.
    StaleHandle {
        /// Block the handle points at.
        block: BlockId,
        /// Generation encoded in the handle.
        handle_generation: u32,
        /// Current arena generation.
        current: u32,
    },
    /// A read or write past the end of a block.
    OutOfBounds {
        /// Block being accessed.
        block: BlockId,
        /// Start offset of the access.
        offset: usize,
        /// Width of the access in bytes.
        width: usize,
    },
    /// The scratch heap cannot hold another capture.
    HeapExhausted {
        /// Bytes requested.
        requested: usize,
        /// Bytes still free.
        available: usize,
    },
    /// A persisted image has the wrong length for its block.
    SizeMismatch {
        /// Block being restored.
        block: BlockId,
        /// Expected image length.
        expected: usize,
        /// Actual image length.
        actual: usize,
    },
    /// A persisted image failed its checksum.
    ChecksumMismatch {
        /// Block being restored.
        block: BlockId,
        /// Checksum stored in the image.
        stored: u16,
        /// Checksum computed over the image body.
        computed: u16,
    },
    /// An item pocket slot index past the pocket's capacity.
    NoSuchSlot {
        /// Slot index requested.
        slot: usize,
        /// Pocket capacity.
        capacity: usize,
    },
}

impl fmt::Display for SaveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StaleHandle {
                block,
                handle_generation,
                current,
            } => write!(
                f,
                "stale handle to {block}: generation {handle_generation}, current {current}"
            ),
            Self::OutOfBounds {
                block,
                offset,
                width,
            } => write!(f, "{width}-byte access at {offset:#x} is outside {block}"),
            Self::HeapExhausted {
                requested,
                available,
            } => write!(
                f,
                "scratch heap exhausted: requested {requested} bytes, {available} free"
            ),
            Self::SizeMismatch {
                block,
                expected,
                actual,
            } => write!(f, "{block} image is {actual} bytes, expected {expected}"),
            Self::ChecksumMismatch {
                block,
                stored,
                computed,
            } => write!(
                f,
                "{block} checksum mismatch: stored {stored:#06x}, computed {computed:#06x}"
            ),
            Self::NoSuchSlot { slot, capacity } => {
                write!(f, "slot {slot} is past pocket capacity {capacity}")
            }
        }
    }
}

impl Error for SaveError {}

/// Errors detected during [`SaveConfig::validate()`](crate::SaveConfig::validate).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SaveConfigError {
    /// The relocation window is not a power of two of at least 8 bytes.
    InvalidMoveRange {
        /// The configured window.
        configured: usize,
    },
    /// The scratch heap cannot hold every block at once.
    HeapTooSmall {
        /// The configured heap size.
        configured: usize,
        /// Bytes needed to capture all blocks.
        required: usize,
    },
}

impl fmt::Display for SaveConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidMoveRange { configured } => write!(
                f,
                "move_range {configured} must be a power of two and at least 8"
            ),
            Self::HeapTooSmall {
                configured,
                required,
            } => write!(
                f,
                "heap_size {configured} cannot hold all blocks ({required} bytes)"
            ),
        }
    }
}

impl Error for SaveConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stale_handle_display() {
        let e = SaveError::StaleHandle {
            block: BlockId::Trainer,
            handle_generation: 1,
            current: 3,
        };
        assert_eq!(
            e.to_string(),
            "stale handle to trainer block: generation 1, current 3"
        );
    }
}
