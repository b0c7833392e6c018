//! XOR obfuscation of sensitive save fields and key rotation.
//!
//! Every registered field is always stored XORed with the key recorded
//! in the trainer block. Rotation re-encodes every field from the old key
//! to the new one before the new key is recorded.

use std::fmt;

use indexmap::IndexMap;

use crate::arena::SaveArena;
use crate::error::SaveError;
use crate::layout::{trainer, world, BlockId, Pocket};

/// The obfuscation key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct EncryptionKey(pub u32);

impl EncryptionKey {
    /// Combine two 16-bit draws as `(hi << 16) + lo`.
    pub fn from_halves(hi: u16, lo: u16) -> Self {
        Self(((hi as u32) << 16).wrapping_add(lo as u32))
    }

    /// Encode or decode a 32-bit field.
    pub fn apply_u32(self, v: u32) -> u32 {
        v ^ self.0
    }

    /// Encode or decode a 16-bit field with the key's low half.
    pub fn apply_u16(self, v: u16) -> u16 {
        v ^ self.0 as u16
    }
}

impl fmt::Display for EncryptionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#010x}", self.0)
    }
}

/// Move a 32-bit field from `old` to `new`.
pub fn rekey_u32(v: u32, old: EncryptionKey, new: EncryptionKey) -> u32 {
    new.apply_u32(old.apply_u32(v))
}

/// Move a 16-bit field from `old` to `new`.
pub fn rekey_u16(v: u16, old: EncryptionKey, new: EncryptionKey) -> u16 {
    new.apply_u16(old.apply_u16(v))
}

/// Storage width of an encrypted field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FieldWidth {
    /// 16-bit, keyed by the low half.
    Half,
    /// 32-bit.
    Word,
}

/// One encrypted field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EncryptedField {
    /// Human-readable name for diagnostics.
    pub name: &'static str,
    /// Storage width.
    pub width: FieldWidth,
}

/// Registry of every encrypted field, keyed by location.
///
/// Keying by `(block, offset)` means a location can only be registered
/// once, so a rotation touches each field exactly once.
#[derive(Clone, Debug, Default)]
pub struct EncryptedFieldSet {
    fields: IndexMap<(BlockId, usize), EncryptedField>,
}

impl EncryptedFieldSet {
    /// An empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// The standard set: money, coins, every bag quantity, every game stat.
    pub fn standard() -> Self {
        let mut set = Self::new();
        set.register(BlockId::World, world::MONEY, "money", FieldWidth::Word);
        set.register(BlockId::World, world::COINS, "coins", FieldWidth::Half);
        for pocket in Pocket::ALL {
            for slot in 0..pocket.capacity() {
                set.register(
                    BlockId::World,
                    pocket.slot_offset(slot) + 2,
                    "bag quantity",
                    FieldWidth::Half,
                );
            }
        }
        for i in 0..world::GAME_STATS_COUNT {
            set.register(
                BlockId::World,
                world::GAME_STATS + 4 * i,
                "game stat",
                FieldWidth::Word,
            );
        }
        set
    }

    /// Register a field.
    ///
    /// # Panics
    ///
    /// Panics if the location is already registered.
    pub fn register(&mut self, block: BlockId, offset: usize, name: &'static str, width: FieldWidth) {
        let prev = self
            .fields
            .insert((block, offset), EncryptedField { name, width });
        assert!(
            prev.is_none(),
            "encrypted field at {block} {offset:#x} registered twice"
        );
    }

    /// Number of registered fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether no fields are registered.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Whether `(block, offset)` is registered.
    pub fn contains(&self, block: BlockId, offset: usize) -> bool {
        self.fields.contains_key(&(block, offset))
    }

    /// Iterate `(block, offset, field)` in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (BlockId, usize, &EncryptedField)> {
        self.fields.iter().map(|(&(b, o), f)| (b, o, f))
    }

    /// Re-encode every field from `old` to `new` and record `new`.
    pub fn rotate(
        &self,
        arena: &mut SaveArena,
        old: EncryptionKey,
        new: EncryptionKey,
    ) -> Result<(), SaveError> {
        for (&(block, offset), field) in &self.fields {
            let mut view = arena.block_mut(block);
            match field.width {
                FieldWidth::Word => {
                    let v = view.as_block().read_u32(offset)?;
                    view.write_u32(offset, rekey_u32(v, old, new))?;
                }
                FieldWidth::Half => {
                    let v = view.as_block().read_u16(offset)?;
                    view.write_u16(offset, rekey_u16(v, old, new))?;
                }
            }
        }
        arena
            .block_mut(BlockId::Trainer)
            .write_u32(trainer::ENCRYPTION_KEY, new.0)
    }
}

/// The key currently recorded in `arena`.
pub fn recorded_key(arena: &SaveArena) -> Result<EncryptionKey, SaveError> {
    arena
        .block(BlockId::Trainer)
        .read_u32(trainer::ENCRYPTION_KEY)
        .map(EncryptionKey)
}
