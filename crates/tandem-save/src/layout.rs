//! Persistent block identities, sizes and field offsets.
//!
//! Offsets are part of the persisted format: changing any of them breaks
//! existing save images.

use std::fmt;

/// Bytes per item slot: u16 item id, u16 quantity.
pub const ITEM_SLOT_LEN: usize = 4;

/// One of the relocatable save blocks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BlockId {
    /// Player profile: name, trainer id, options, encryption key.
    Trainer,
    /// World state: party, money, items, flags, statistics.
    World,
    /// PC box storage.
    Storage,
}

impl BlockId {
    /// Every block in capture order.
    pub const ALL: [BlockId; 3] = [BlockId::Trainer, BlockId::World, BlockId::Storage];

    /// Block size in bytes. Both directions of a relocation copy use this.
    pub const fn size(self) -> usize {
        match self {
            Self::Trainer => 0xF2C,
            Self::World => 0x3D88,
            Self::Storage => 0x83D0,
        }
    }

    /// Slot index into per-block arrays.
    pub const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Trainer => write!(f, "trainer block"),
            Self::World => write!(f, "world block"),
            Self::Storage => write!(f, "storage block"),
        }
    }
}

/// Total bytes of every block together.
pub const fn total_block_bytes() -> usize {
    BlockId::Trainer.size() + BlockId::World.size() + BlockId::Storage.size()
}

/// Field offsets within [`BlockId::Trainer`].
pub mod trainer {
    /// Player name, 8 bytes.
    pub const NAME: usize = 0x00;
    /// Length of the player name.
    pub const NAME_LEN: usize = 8;
    /// Player gender.
    pub const GENDER: usize = 0x08;
    /// Special save-warp flag byte.
    pub const WARP_FLAGS: usize = 0x09;
    /// Trainer id, 4 bytes.
    pub const TRAINER_ID: usize = 0x0A;
    /// Recorded encryption key, u32.
    pub const ENCRYPTION_KEY: usize = 0xAC;

    /// Warp flag: resume at the continue-game warp.
    pub const CONTINUE_GAME_WARP: u8 = 1 << 0;
}

/// Field offsets within [`BlockId::World`].
pub mod world {
    /// Party member count, u8.
    pub const PARTY_COUNT: usize = 0x234;
    /// Six 100-byte party images.
    pub const PARTY: usize = 0x238;
    /// Money, u32, encrypted.
    pub const MONEY: usize = 0x490;
    /// Coins, u16, encrypted.
    pub const COINS: usize = 0x494;
    /// PC item storage.
    pub const PC_ITEMS: usize = 0x498;
    /// PC item slots.
    pub const PC_ITEMS_CAPACITY: usize = 50;
    /// First bag pocket.
    pub const BAG: usize = 0x560;
    /// Seen flags.
    pub const DEX_SEEN: usize = 0x988;
    /// Caught flags.
    pub const DEX_CAUGHT: usize = 0x9BC;
    /// Bytes of each dex flag array.
    pub const DEX_FLAGS_LEN: usize = 52;
    /// Game statistics, u32 each, encrypted.
    pub const GAME_STATS: usize = 0x159C;
    /// Number of game statistics.
    pub const GAME_STATS_COUNT: usize = 64;
}

/// A bag pocket.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Pocket {
    /// General items.
    Items,
    /// Healing items.
    Medicine,
    /// Collectible items.
    Collectibles,
    /// Key items.
    KeyItems,
    /// Poke balls.
    PokeBalls,
    /// TMs and HMs.
    TmHm,
    /// Berries.
    Berries,
    /// Mega stones.
    MegaStones,
}

impl Pocket {
    /// Every pocket in layout order.
    pub const ALL: [Pocket; 8] = [
        Pocket::Items,
        Pocket::Medicine,
        Pocket::Collectibles,
        Pocket::KeyItems,
        Pocket::PokeBalls,
        Pocket::TmHm,
        Pocket::Berries,
        Pocket::MegaStones,
    ];

    /// Slot count.
    pub const fn capacity(self) -> usize {
        match self {
            Self::Items => 30,
            Self::Medicine => 20,
            Self::Collectibles => 20,
            Self::KeyItems => 30,
            Self::PokeBalls => 16,
            Self::TmHm => 64,
            Self::Berries => 46,
            Self::MegaStones => 20,
        }
    }

    /// Offset of the pocket within the world block.
    pub const fn offset(self) -> usize {
        let mut at = world::BAG;
        let mut i = 0;
        while i < Self::ALL.len() {
            if Self::ALL[i] as u8 == self as u8 {
                return at;
            }
            at += Self::ALL[i].capacity() * ITEM_SLOT_LEN;
            i += 1;
        }
        at
    }

    /// Offset of `slot` within the world block.
    pub const fn slot_offset(self, slot: usize) -> usize {
        self.offset() + slot * ITEM_SLOT_LEN
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sizes_are_word_aligned() {
        for id in BlockId::ALL {
            assert_eq!(id.size() % 4, 0, "{id}");
        }
    }

    #[test]
    fn pockets_are_contiguous_and_fit() {
        let mut expected = world::BAG;
        for p in Pocket::ALL {
            assert_eq!(p.offset(), expected, "{p:?}");
            expected += p.capacity() * ITEM_SLOT_LEN;
        }
        assert!(expected <= world::DEX_SEEN);
    }

    #[test]
    fn world_regions_do_not_overlap() {
        assert_eq!(world::PARTY + 6 * 100, world::MONEY);
        assert!(world::COINS + 2 <= world::PC_ITEMS);
        assert_eq!(
            world::PC_ITEMS + world::PC_ITEMS_CAPACITY * ITEM_SLOT_LEN,
            world::BAG
        );
        assert!(world::DEX_CAUGHT + world::DEX_FLAGS_LEN <= world::GAME_STATS);
        assert!(world::GAME_STATS + world::GAME_STATS_COUNT * 4 <= BlockId::World.size());
    }
}
