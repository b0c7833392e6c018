//! The save manager: owner of the arena and everything that touches it.

use rand_chacha::rand_core::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::arena::{BaseLocation, BlockRef, SaveArena};
use crate::block::{persist, verify_image, Block, BlockMut};
use crate::config::SaveConfig;
use crate::consumer::{BlockConsumer, ConsumerRegistry};
use crate::crypt::{recorded_key, EncryptedFieldSet, EncryptionKey};
use crate::error::{SaveConfigError, SaveError};
use crate::heap::ScratchHeap;
use crate::layout::{trainer, world, BlockId};
use tandem_core::Generation;

/// Highest value [`SaveManager::increment_game_stat`] counts to.
pub const GAME_STAT_CAP: u32 = 0x00FF_FFFF;

/// Owns the save blocks and mediates every access to them.
pub struct SaveManager {
    pub(crate) config: SaveConfig,
    pub(crate) arena: SaveArena,
    pub(crate) heap: ScratchHeap,
    pub(crate) consumers: ConsumerRegistry,
    pub(crate) encrypted: EncryptedFieldSet,
    pub(crate) rng: ChaCha8Rng,
}

impl SaveManager {
    /// Create a manager with zeroed blocks at offset 0, generation 0.
    pub fn new(config: SaveConfig) -> Result<Self, SaveConfigError> {
        config.validate()?;
        Ok(Self {
            arena: SaveArena::new(config.move_range, 0, Generation(0)),
            heap: ScratchHeap::new(config.heap_size),
            consumers: ConsumerRegistry::new(),
            encrypted: EncryptedFieldSet::standard(),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            config,
        })
    }

    /// The active configuration.
    pub fn config(&self) -> &SaveConfig {
        &self.config
    }

    /// Current base location.
    pub fn location(&self) -> BaseLocation {
        self.arena.location()
    }

    /// The encrypted field registry.
    pub fn encrypted_fields(&self) -> &EncryptedFieldSet {
        &self.encrypted
    }

    // ── Block access ───────────────────────────────────────────

    /// Read view of `id`.
    pub fn block(&self, id: BlockId) -> Block<'_> {
        self.arena.block(id)
    }

    /// Write view of `id`.
    pub fn block_mut(&mut self, id: BlockId) -> BlockMut<'_> {
        self.arena.block_mut(id)
    }

    /// Mint a reference to `id` valid until the next relocation.
    pub fn locate(&self, id: BlockId) -> BlockRef {
        self.arena.locate(id)
    }

    /// Resolve a held reference.
    pub fn resolve(&self, r: &BlockRef) -> Result<Block<'_>, SaveError> {
        self.arena.resolve(r)
    }

    /// Resolve a held reference mutably.
    pub fn resolve_mut(&mut self, r: &BlockRef) -> Result<BlockMut<'_>, SaveError> {
        self.arena.resolve_mut(r)
    }

    /// Register a consumer to suspend during relocation.
    pub fn register_consumer(
        &mut self,
        name: impl Into<String>,
        consumer: Box<dyn BlockConsumer>,
    ) -> Option<Box<dyn BlockConsumer>> {
        self.consumers.register(name, consumer)
    }

    /// Remove a consumer.
    pub fn unregister_consumer(&mut self, name: &str) -> Option<Box<dyn BlockConsumer>> {
        self.consumers.unregister(name)
    }

    // ── Persistence ────────────────────────────────────────────

    /// Persisted image of `id`: body plus trailing checksum.
    pub fn persist(&self, id: BlockId) -> Vec<u8> {
        persist(self.arena.block(id))
    }

    /// Load a persisted image into `id` after verifying it.
    pub fn restore(&mut self, id: BlockId, image: &[u8]) -> Result<(), SaveError> {
        let body = verify_image(id, image)?;
        self.arena
            .block_mut(id)
            .bytes_mut(0, id.size())?
            .copy_from_slice(body);
        Ok(())
    }

    /// Zero a whole block.
    pub fn clear_block(&mut self, id: BlockId) {
        self.arena.block_mut(id).clear();
    }

    /// Zero the world block for a new game plus, keeping dex flags and
    /// PC items.
    pub fn clear_world_for_new_game_plus(&mut self) -> Result<(), SaveError> {
        const KEPT: [(usize, usize); 3] = [
            (world::DEX_SEEN, world::DEX_FLAGS_LEN),
            (world::DEX_CAUGHT, world::DEX_FLAGS_LEN),
            (world::PC_ITEMS, world::PC_ITEMS_CAPACITY * crate::layout::ITEM_SLOT_LEN),
        ];
        let block = self.arena.block(BlockId::World);
        let kept = KEPT
            .iter()
            .map(|&(at, len)| block.bytes(at, len).map(<[u8]>::to_vec))
            .collect::<Result<Vec<_>, _>>()?;
        let mut block = self.arena.block_mut(BlockId::World);
        block.clear();
        for (&(at, len), bytes) in KEPT.iter().zip(kept) {
            block.bytes_mut(at, len)?.copy_from_slice(&bytes);
        }
        Ok(())
    }

    // ── Trainer profile ────────────────────────────────────────

    /// The four trainer id bytes.
    pub fn trainer_id(&self) -> Result<[u8; 4], SaveError> {
        let b = self.arena.block(BlockId::Trainer).bytes(trainer::TRAINER_ID, 4)?;
        Ok([b[0], b[1], b[2], b[3]])
    }

    /// Set the trainer id.
    pub fn set_trainer_id(&mut self, id: [u8; 4]) -> Result<(), SaveError> {
        self.arena
            .block_mut(BlockId::Trainer)
            .bytes_mut(trainer::TRAINER_ID, 4)?
            .copy_from_slice(&id);
        Ok(())
    }

    /// Whether the next load should use the continue-game warp.
    pub fn uses_continue_warp(&self) -> Result<bool, SaveError> {
        let flags = self.arena.block(BlockId::Trainer).read_u8(trainer::WARP_FLAGS)?;
        Ok(flags & trainer::CONTINUE_GAME_WARP != 0)
    }

    /// Request the continue-game warp on next load.
    pub fn set_continue_warp(&mut self) -> Result<(), SaveError> {
        self.update_warp_flags(|f| f | trainer::CONTINUE_GAME_WARP)
    }

    /// Clear the continue-game warp request.
    pub fn clear_continue_warp(&mut self) -> Result<(), SaveError> {
        self.update_warp_flags(|f| f & !trainer::CONTINUE_GAME_WARP)
    }

    fn update_warp_flags(&mut self, f: impl FnOnce(u8) -> u8) -> Result<(), SaveError> {
        let mut block = self.arena.block_mut(BlockId::Trainer);
        let flags = block.as_block().read_u8(trainer::WARP_FLAGS)?;
        block.write_u8(trainer::WARP_FLAGS, f(flags))
    }

    // ── Encrypted fields ───────────────────────────────────────

    /// The key recorded in the trainer block.
    pub fn encryption_key(&self) -> Result<EncryptionKey, SaveError> {
        recorded_key(&self.arena)
    }

    /// Re-encode every encrypted field under `new` and record it.
    pub fn rotate_key(&mut self, new: EncryptionKey) -> Result<(), SaveError> {
        let old = self.encryption_key()?;
        self.encrypted.rotate(&mut self.arena, old, new)
    }

    /// Decoded money.
    pub fn money(&self) -> Result<u32, SaveError> {
        let raw = self.arena.block(BlockId::World).read_u32(world::MONEY)?;
        Ok(self.encryption_key()?.apply_u32(raw))
    }

    /// Encode and store money.
    pub fn set_money(&mut self, money: u32) -> Result<(), SaveError> {
        let raw = self.encryption_key()?.apply_u32(money);
        self.arena.block_mut(BlockId::World).write_u32(world::MONEY, raw)
    }

    /// Decoded coins.
    pub fn coins(&self) -> Result<u16, SaveError> {
        let raw = self.arena.block(BlockId::World).read_u16(world::COINS)?;
        Ok(self.encryption_key()?.apply_u16(raw))
    }

    /// Encode and store coins.
    pub fn set_coins(&mut self, coins: u16) -> Result<(), SaveError> {
        let raw = self.encryption_key()?.apply_u16(coins);
        self.arena.block_mut(BlockId::World).write_u16(world::COINS, raw)
    }

    fn game_stat_offset(index: usize) -> Result<usize, SaveError> {
        if index >= world::GAME_STATS_COUNT {
            return Err(SaveError::OutOfBounds {
                block: BlockId::World,
                offset: world::GAME_STATS + 4 * index,
                width: 4,
            });
        }
        Ok(world::GAME_STATS + 4 * index)
    }

    /// Decoded game statistic.
    pub fn game_stat(&self, index: usize) -> Result<u32, SaveError> {
        let at = Self::game_stat_offset(index)?;
        let raw = self.arena.block(BlockId::World).read_u32(at)?;
        Ok(self.encryption_key()?.apply_u32(raw))
    }

    /// Encode and store a game statistic.
    pub fn set_game_stat(&mut self, index: usize, value: u32) -> Result<(), SaveError> {
        let at = Self::game_stat_offset(index)?;
        let raw = self.encryption_key()?.apply_u32(value);
        self.arena.block_mut(BlockId::World).write_u32(at, raw)
    }

    /// Add one to a game statistic, stopping at [`GAME_STAT_CAP`].
    pub fn increment_game_stat(&mut self, index: usize) -> Result<(), SaveError> {
        let v = self.game_stat(index)?;
        if v < GAME_STAT_CAP {
            self.set_game_stat(index, v + 1)?;
        }
        Ok(())
    }
}
