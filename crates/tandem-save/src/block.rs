//! Bounds-checked views over a save block, checksums and persisted images.

use crate::error::SaveError;
use crate::layout::BlockId;

/// Read-only view of one block.
#[derive(Clone, Copy, Debug)]
pub struct Block<'a> {
    id: BlockId,
    bytes: &'a [u8],
}

/// Mutable view of one block.
#[derive(Debug)]
pub struct BlockMut<'a> {
    id: BlockId,
    bytes: &'a mut [u8],
}

fn span(id: BlockId, len: usize, offset: usize, width: usize) -> Result<(), SaveError> {
    match offset.checked_add(width) {
        Some(end) if end <= len => Ok(()),
        _ => Err(SaveError::OutOfBounds {
            block: id,
            offset,
            width,
        }),
    }
}

impl<'a> Block<'a> {
    pub(crate) fn new(id: BlockId, bytes: &'a [u8]) -> Self {
        Self { id, bytes }
    }

    /// Which block this is.
    pub fn id(&self) -> BlockId {
        self.id
    }

    /// The whole block.
    pub fn as_bytes(&self) -> &'a [u8] {
        self.bytes
    }

    /// `width` bytes at `offset`.
    pub fn bytes(&self, offset: usize, width: usize) -> Result<&'a [u8], SaveError> {
        span(self.id, self.bytes.len(), offset, width)?;
        Ok(&self.bytes[offset..offset + width])
    }

    /// Read a byte.
    pub fn read_u8(&self, offset: usize) -> Result<u8, SaveError> {
        Ok(self.bytes(offset, 1)?[0])
    }

    /// Read a little-endian u16.
    pub fn read_u16(&self, offset: usize) -> Result<u16, SaveError> {
        let b = self.bytes(offset, 2)?;
        Ok(u16::from_le_bytes([b[0], b[1]]))
    }

    /// Read a little-endian u32.
    pub fn read_u32(&self, offset: usize) -> Result<u32, SaveError> {
        let b = self.bytes(offset, 4)?;
        Ok(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    /// Checksum of the whole block.
    pub fn checksum(&self) -> u16 {
        checksum(self.bytes)
    }
}

impl<'a> BlockMut<'a> {
    pub(crate) fn new(id: BlockId, bytes: &'a mut [u8]) -> Self {
        Self { id, bytes }
    }

    /// Reborrow as a read-only view.
    pub fn as_block(&self) -> Block<'_> {
        Block::new(self.id, self.bytes)
    }

    /// `width` mutable bytes at `offset`.
    pub fn bytes_mut(&mut self, offset: usize, width: usize) -> Result<&mut [u8], SaveError> {
        span(self.id, self.bytes.len(), offset, width)?;
        Ok(&mut self.bytes[offset..offset + width])
    }

    /// Write a byte.
    pub fn write_u8(&mut self, offset: usize, v: u8) -> Result<(), SaveError> {
        self.bytes_mut(offset, 1)?[0] = v;
        Ok(())
    }

    /// Write a little-endian u16.
    pub fn write_u16(&mut self, offset: usize, v: u16) -> Result<(), SaveError> {
        self.bytes_mut(offset, 2)?.copy_from_slice(&v.to_le_bytes());
        Ok(())
    }

    /// Write a little-endian u32.
    pub fn write_u32(&mut self, offset: usize, v: u32) -> Result<(), SaveError> {
        self.bytes_mut(offset, 4)?.copy_from_slice(&v.to_le_bytes());
        Ok(())
    }

    /// Zero the whole block.
    pub fn clear(&mut self) {
        self.bytes.fill(0);
    }
}

/// Sum of little-endian u32 words, folded to 16 bits.
///
/// A trailing partial word is ignored.
pub fn checksum(bytes: &[u8]) -> u16 {
    let sum = bytes
        .chunks_exact(4)
        .map(|w| u32::from_le_bytes([w[0], w[1], w[2], w[3]]))
        .fold(0u32, u32::wrapping_add);
    ((sum >> 16).wrapping_add(sum)) as u16
}

/// Encode a persisted image: block bytes followed by a LE u16 checksum.
pub fn persist(block: Block<'_>) -> Vec<u8> {
    let mut image = Vec::with_capacity(block.as_bytes().len() + 2);
    image.extend_from_slice(block.as_bytes());
    image.extend_from_slice(&block.checksum().to_le_bytes());
    image
}

/// Verify a persisted image and return its body.
pub fn verify_image(id: BlockId, image: &[u8]) -> Result<&[u8], SaveError> {
    let expected = id.size() + 2;
    if image.len() != expected {
        return Err(SaveError::SizeMismatch {
            block: id,
            expected,
            actual: image.len(),
        });
    }
    let (body, tail) = image.split_at(id.size());
    let stored = u16::from_le_bytes([tail[0], tail[1]]);
    let computed = checksum(body);
    if stored != computed {
        return Err(SaveError::ChecksumMismatch {
            block: id,
            stored,
            computed,
        });
    }
    Ok(body)
}
