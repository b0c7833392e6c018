//! Party persistence in the world block.

use tandem_core::record::PARTY_IMAGE_LEN;
use tandem_core::{Party, Pokemon, PARTY_SIZE};

use crate::error::SaveError;
use crate::layout::{world, BlockId};
use crate::manager::SaveManager;

impl SaveManager {
    /// Store all six party slots and the member count.
    pub fn save_party(&mut self, party: &Party) -> Result<(), SaveError> {
        let mut block = self.block_mut(BlockId::World);
        block.write_u8(world::PARTY_COUNT, party.count())?;
        for (i, mon) in party.slots().iter().enumerate() {
            block
                .bytes_mut(world::PARTY + i * PARTY_IMAGE_LEN, PARTY_IMAGE_LEN)?
                .copy_from_slice(&mon.to_party_image());
        }
        Ok(())
    }

    /// Read the stored party back.
    pub fn load_party(&self) -> Result<Party, SaveError> {
        let block = self.block(BlockId::World);
        let mut party = Party::new();
        for (i, slot) in party.slots_mut().iter_mut().enumerate() {
            let mut image = [0u8; PARTY_IMAGE_LEN];
            image.copy_from_slice(block.bytes(world::PARTY + i * PARTY_IMAGE_LEN, PARTY_IMAGE_LEN)?);
            *slot = Pokemon::from_party_image(&image);
        }
        party.set_count(block.read_u8(world::PARTY_COUNT)?.min(PARTY_SIZE as u8));
        Ok(party)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SaveConfig;

    fn mon(species: u16, level: u8) -> Pokemon {
        Pokemon {
            species,
            level,
            hp: 20,
            max_hp: 31,
            experience: 1_000,
            moves: [33, 45, 0, 0],
            ..Pokemon::default()
        }
    }

    #[test]
    fn party_survives_relocation() {
        let mut m = SaveManager::new(SaveConfig::default()).unwrap();
        let party = Party::from_members([mon(1, 5), mon(4, 7)]);
        m.save_party(&party).unwrap();
        m.relocate().unwrap();
        assert_eq!(m.load_party().unwrap(), party);
    }

    #[test]
    fn empty_world_loads_empty_party() {
        let m = SaveManager::new(SaveConfig::default()).unwrap();
        let party = m.load_party().unwrap();
        assert_eq!(party.count(), 0);
        assert!(party.slots().iter().all(|p| !p.is_present()));
    }
}
