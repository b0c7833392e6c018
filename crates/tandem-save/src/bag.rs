//! Bag pockets: encrypted quantities and the load/save round trip.
//!
//! A [`LoadedBag`] is a raw copy of every pocket together with the key its
//! quantities were encoded under. Writing it back after a relocation
//! re-encodes the quantities from that key to the current one.

use indexmap::IndexMap;

use crate::crypt::{rekey_u16, EncryptionKey};
use crate::error::SaveError;
use crate::layout::{BlockId, Pocket, ITEM_SLOT_LEN};
use crate::manager::SaveManager;

/// One decoded pocket slot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ItemSlot {
    /// Item id. Zero marks an empty slot.
    pub item: u16,
    /// Quantity.
    pub quantity: u16,
}

/// A raw snapshot of every pocket.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoadedBag {
    key: EncryptionKey,
    pockets: IndexMap<Pocket, Vec<u8>>,
}

impl LoadedBag {
    /// Key the quantities are encoded under.
    pub fn key(&self) -> EncryptionKey {
        self.key
    }

    /// Decode one slot.
    pub fn slot(&self, pocket: Pocket, slot: usize) -> Result<ItemSlot, SaveError> {
        check_slot(pocket, slot)?;
        let raw = &self.pockets[&pocket][slot * ITEM_SLOT_LEN..(slot + 1) * ITEM_SLOT_LEN];
        Ok(ItemSlot {
            item: u16::from_le_bytes([raw[0], raw[1]]),
            quantity: self.key.apply_u16(u16::from_le_bytes([raw[2], raw[3]])),
        })
    }
}

fn check_slot(pocket: Pocket, slot: usize) -> Result<(), SaveError> {
    if slot >= pocket.capacity() {
        return Err(SaveError::NoSuchSlot {
            slot,
            capacity: pocket.capacity(),
        });
    }
    Ok(())
}

impl SaveManager {
    /// Decode one pocket slot.
    pub fn item_slot(&self, pocket: Pocket, slot: usize) -> Result<ItemSlot, SaveError> {
        check_slot(pocket, slot)?;
        let block = self.block(BlockId::World);
        let at = pocket.slot_offset(slot);
        Ok(ItemSlot {
            item: block.read_u16(at)?,
            quantity: self.encryption_key()?.apply_u16(block.read_u16(at + 2)?),
        })
    }

    /// Encode and store one pocket slot.
    pub fn set_item_slot(
        &mut self,
        pocket: Pocket,
        slot: usize,
        value: ItemSlot,
    ) -> Result<(), SaveError> {
        check_slot(pocket, slot)?;
        let key = self.encryption_key()?;
        let at = pocket.slot_offset(slot);
        let mut block = self.block_mut(BlockId::World);
        block.write_u16(at, value.item)?;
        block.write_u16(at + 2, key.apply_u16(value.quantity))
    }

    /// Snapshot every pocket under the current key.
    pub fn load_bag(&self) -> Result<LoadedBag, SaveError> {
        let block = self.block(BlockId::World);
        let mut pockets = IndexMap::with_capacity(Pocket::ALL.len());
        for pocket in Pocket::ALL {
            let bytes = block.bytes(pocket.offset(), pocket.capacity() * ITEM_SLOT_LEN)?;
            pockets.insert(pocket, bytes.to_vec());
        }
        Ok(LoadedBag {
            key: self.encryption_key()?,
            pockets,
        })
    }

    /// Write a snapshot back, re-encoding quantities to the current key.
    pub fn save_bag(&mut self, bag: &LoadedBag) -> Result<(), SaveError> {
        let current = self.encryption_key()?;
        let mut block = self.block_mut(BlockId::World);
        for (pocket, raw) in &bag.pockets {
            let dst = block.bytes_mut(pocket.offset(), raw.len())?;
            dst.copy_from_slice(raw);
            if bag.key != current {
                for slot in dst.chunks_exact_mut(ITEM_SLOT_LEN) {
                    let q = u16::from_le_bytes([slot[2], slot[3]]);
                    slot[2..4].copy_from_slice(&rekey_u16(q, bag.key, current).to_le_bytes());
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SaveConfig;

    fn manager() -> SaveManager {
        SaveManager::new(SaveConfig::default()).unwrap()
    }

    #[test]
    fn slot_round_trip_under_key() {
        let mut m = manager();
        m.rotate_key(EncryptionKey(0x0000_1234)).unwrap();
        let slot = ItemSlot {
            item: 13,
            quantity: 5,
        };
        m.set_item_slot(Pocket::Medicine, 3, slot).unwrap();
        assert_eq!(m.item_slot(Pocket::Medicine, 3).unwrap(), slot);
        assert!(matches!(
            m.item_slot(Pocket::Medicine, 20),
            Err(SaveError::NoSuchSlot { slot: 20, capacity: 20 })
        ));
    }

    #[test]
    fn bag_saved_after_relocation_decodes() {
        let mut m = manager();
        let slot = ItemSlot {
            item: 4,
            quantity: 12,
        };
        m.set_item_slot(Pocket::PokeBalls, 0, slot).unwrap();
        let bag = m.load_bag().unwrap();
        assert_eq!(bag.slot(Pocket::PokeBalls, 0).unwrap(), slot);

        m.relocate().unwrap();
        m.save_bag(&bag).unwrap();
        assert_eq!(m.item_slot(Pocket::PokeBalls, 0).unwrap(), slot);
    }
}
