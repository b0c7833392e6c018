//! Moving the save blocks to a fresh base offset and rotating the key.

use log::debug;
use rand_chacha::rand_core::RngCore;
use smallvec::SmallVec;

use crate::arena::{BaseLocation, SaveArena};
use crate::crypt::EncryptionKey;
use crate::error::SaveError;
use crate::heap::Capture;
use crate::layout::{trainer, BlockId};
use crate::manager::SaveManager;

/// What a relocation did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RelocationReport {
    /// Location before.
    pub from: BaseLocation,
    /// Location after.
    pub to: BaseLocation,
    /// Key before.
    pub old_key: EncryptionKey,
    /// Key after.
    pub new_key: EncryptionKey,
    /// Bytes copied in each direction.
    pub bytes_moved: usize,
}

/// Sum of the four trainer id bytes of a captured trainer block.
fn trainer_id_seed(trainer_block: &[u8]) -> u32 {
    trainer_block[trainer::TRAINER_ID..trainer::TRAINER_ID + 4]
        .iter()
        .map(|&b| b as u32)
        .sum()
}

impl SaveManager {
    fn draw_u16(&mut self) -> u16 {
        self.rng.next_u32() as u16
    }

    /// Relocate every block and rotate the encryption key.
    ///
    /// Consumers are suspended while the blocks move and resumed at the
    /// new location before the key rotates. The new base offset is
    /// `(trainer id byte sum + random) & (move_range - 4)`. Old
    /// [`BlockRef`](crate::BlockRef)s stop resolving.
    pub fn relocate(&mut self) -> Result<RelocationReport, SaveError> {
        let from = self.arena.location();
        let old_key = self.encryption_key()?;

        let (to, bytes_moved) = {
            let mut guard = self.consumers.suspend(from);
            self.heap.reset();

            let mut captures: SmallVec<[Capture; 3]> = SmallVec::new();
            for id in BlockId::ALL {
                let capture = self.heap.capture(id, self.arena.block(id).as_bytes())?;
                captures.push(capture);
            }

            let seed = trainer_id_seed(self.heap.get(&captures[BlockId::Trainer.index()]));
            let draw = self.rng.next_u32() as u16 as u32;
            let offset = (seed.wrapping_add(draw) as usize) & (self.config.move_range - 4);

            let mut next = SaveArena::new(self.config.move_range, offset, from.generation.next());
            for capture in &captures {
                let src = self.heap.get(capture);
                let mut dst = next.block_mut(capture.block);
                debug_assert_eq!(capture.len(), capture.block.size());
                dst.bytes_mut(0, capture.len())?.copy_from_slice(src);
            }
            self.arena = next;
            self.heap.reset();

            let to = self.arena.location();
            guard.relocated(to);
            (to, captures.iter().map(Capture::len).sum())
        };

        let new_key = {
            let hi = self.draw_u16();
            let lo = self.draw_u16();
            EncryptionKey::from_halves(hi, lo)
        };
        self.encrypted.rotate(&mut self.arena, old_key, new_key)?;

        debug!(
            "relocated save blocks {:#x}->{:#x} (gen {}->{}), key {} -> {}",
            from.offset, to.offset, from.generation, to.generation, old_key, new_key
        );
        Ok(RelocationReport {
            from,
            to,
            old_key,
            new_key,
            bytes_moved,
        })
    }
}
