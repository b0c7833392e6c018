//! Integration test: relocation preserves content and consumer protocol.
//!
//! Drives a `SaveManager` through repeated relocations with a registered
//! frame-callback consumer and checks that every block's plaintext
//! content survives, encrypted fields decode under the new key, and the
//! consumer never observes a stale location.

use std::cell::RefCell;
use std::rc::Rc;

use proptest::prelude::*;
use tandem_save::crypt::FieldWidth;
use tandem_save::layout::{trainer, world};
use tandem_save::{
    BaseLocation, BlockConsumer, BlockId, EncryptionKey, ItemSlot, Pocket, SaveConfig, SaveError, SaveManager,
};

// ── Consumer that tracks its suspension state ────────────────────────

#[derive(Default)]
struct FrameState {
    suspended: bool,
    suspends: usize,
    resumed_at: Vec<BaseLocation>,
}

struct FrameCallback(Rc<RefCell<FrameState>>);

impl BlockConsumer for FrameCallback {
    fn suspend(&mut self) {
        let mut s = self.0.borrow_mut();
        assert!(!s.suspended, "suspended twice");
        s.suspended = true;
        s.suspends += 1;
    }

    fn resume(&mut self, location: BaseLocation) {
        let mut s = self.0.borrow_mut();
        assert!(s.suspended, "resumed without suspend");
        s.suspended = false;
        s.resumed_at.push(location);
    }
}

fn seeded(seed: u64) -> SaveManager {
    SaveManager::new(SaveConfig {
        seed,
        ..SaveConfig::default()
    })
    .unwrap()
}

// ── Tests ────────────────────────────────────────────────────────────

#[test]
fn consumer_is_resumed_at_each_new_location() {
    let state = Rc::new(RefCell::new(FrameState::default()));
    let mut m = seeded(11);
    m.register_consumer("vblank", Box::new(FrameCallback(Rc::clone(&state))));

    let mut seen = Vec::new();
    for _ in 0..5 {
        let r = m.relocate().unwrap();
        seen.push(r.to);
        assert_eq!(m.location(), r.to);
    }

    let s = state.borrow();
    assert!(!s.suspended);
    assert_eq!(s.suspends, 5);
    assert_eq!(s.resumed_at, seen);
}

#[test]
fn plaintext_bytes_survive_relocation() {
    let mut m = seeded(2);
    {
        let mut t = m.block_mut(BlockId::Trainer);
        t.bytes_mut(trainer::NAME, trainer::NAME_LEN)
            .unwrap()
            .copy_from_slice(b"MAY\xFF\0\0\0\0");
        t.write_u8(trainer::GENDER, 1).unwrap();
    }
    {
        let mut s = m.block_mut(BlockId::Storage);
        let last = BlockId::Storage.size() - 4;
        s.write_u32(last, 0xCAFE_F00D).unwrap();
    }
    let storage_before = m.block(BlockId::Storage).as_bytes().to_vec();

    m.relocate().unwrap();

    let t = m.block(BlockId::Trainer);
    assert_eq!(t.bytes(trainer::NAME, 4).unwrap(), b"MAY\xFF");
    assert_eq!(t.read_u8(trainer::GENDER).unwrap(), 1);
    assert_eq!(m.block(BlockId::Storage).as_bytes(), &storage_before[..]);
}

#[test]
fn held_reference_goes_stale_but_relocating_again_is_fine() {
    let mut m = seeded(8);
    let held = m.locate(BlockId::Trainer);
    m.relocate().unwrap();
    m.relocate().unwrap();
    let err = m.resolve(&held).unwrap_err();
    assert!(matches!(err, SaveError::StaleHandle { .. }));
    assert!(err.to_string().contains("stale handle"));
}

#[test]
fn persisted_image_restores_after_relocation() {
    let mut m = seeded(4);
    m.set_money(1234).unwrap();
    let image = m.persist(BlockId::World);
    let key = m.encryption_key().unwrap();

    let mut other = seeded(99);
    other.relocate().unwrap();
    other.rotate_key(key).unwrap();
    other.restore(BlockId::World, &image).unwrap();
    assert_eq!(other.money().unwrap(), 1234);

    let mut corrupt = image.clone();
    corrupt[world::MONEY] ^= 1;
    assert!(matches!(
        other.restore(BlockId::World, &corrupt),
        Err(SaveError::ChecksumMismatch { .. })
    ));
}

// ── Property tests ───────────────────────────────────────────────────

proptest! {
    #[test]
    fn encrypted_values_decode_after_any_relocations(
        seed in any::<u64>(),
        trainer_id in any::<[u8; 4]>(),
        money in any::<u32>(),
        coins in any::<u16>(),
        stat in 0usize..world::GAME_STATS_COUNT,
        stat_value in 0u32..0x00FF_FFFF,
        quantity in 1u16..=999,
        rounds in 1usize..4,
    ) {
        let mut m = seeded(seed);
        m.set_trainer_id(trainer_id).unwrap();
        m.set_money(money).unwrap();
        m.set_coins(coins).unwrap();
        m.set_game_stat(stat, stat_value).unwrap();
        let slot = ItemSlot { item: 17, quantity };
        m.set_item_slot(Pocket::Berries, 2, slot).unwrap();

        for _ in 0..rounds {
            let r = m.relocate().unwrap();
            prop_assert_eq!(r.to.offset % 4, 0);
            prop_assert!(r.to.offset < m.config().move_range);
            prop_assert_eq!(m.encryption_key().unwrap(), r.new_key);
        }

        prop_assert_eq!(m.trainer_id().unwrap(), trainer_id);
        prop_assert_eq!(m.money().unwrap(), money);
        prop_assert_eq!(m.coins().unwrap(), coins);
        prop_assert_eq!(m.game_stat(stat).unwrap(), stat_value);
        prop_assert_eq!(m.item_slot(Pocket::Berries, 2).unwrap(), slot);
    }
}

// ── Whole-block round trip ───────────────────────────────────────────

/// Fill every block with a byte pattern derived from `salt`.
fn fill_blocks(m: &mut SaveManager, salt: u8) {
    for id in BlockId::ALL {
        let mut b = m.block_mut(id);
        let bytes = b.bytes_mut(0, id.size()).unwrap();
        for (i, byte) in bytes.iter_mut().enumerate() {
            *byte = (i as u8).wrapping_mul(31).wrapping_add(salt) ^ (id.index() as u8);
        }
    }
}

fn plain_value(
    m: &SaveManager,
    id: BlockId,
    offset: usize,
    width: FieldWidth,
    key: EncryptionKey,
) -> u32 {
    let b = m.block(id);
    match width {
        FieldWidth::Half => key.apply_u16(b.read_u16(offset).unwrap()) as u32,
        FieldWidth::Word => key.apply_u32(b.read_u32(offset).unwrap()),
    }
}

fn field_len(width: FieldWidth) -> usize {
    match width {
        FieldWidth::Half => 2,
        FieldWidth::Word => 4,
    }
}

proptest! {
    #[test]
    fn every_block_byte_survives_relocation(seed in any::<u64>(), salt in any::<u8>()) {
        let mut m = seeded(seed);
        fill_blocks(&mut m, salt);
        let old_key = m.encryption_key().unwrap();
        let before: Vec<Vec<u8>> = BlockId::ALL
            .iter()
            .map(|&id| m.block(id).as_bytes().to_vec())
            .collect();
        let fields: Vec<(BlockId, usize, FieldWidth)> = m
            .encrypted_fields()
            .iter()
            .map(|(id, offset, f)| (id, offset, f.width))
            .collect();
        let plain: Vec<u32> = fields
            .iter()
            .map(|&(id, offset, width)| plain_value(&m, id, offset, width, old_key))
            .collect();

        let r = m.relocate().unwrap();
        prop_assert_eq!(r.old_key, old_key);
        prop_assert_eq!(m.encryption_key().unwrap(), r.new_key);

        for id in BlockId::ALL {
            let mut keyed = vec![false; id.size()];
            for &(fid, offset, width) in &fields {
                if fid == id {
                    keyed[offset..offset + field_len(width)].fill(true);
                }
            }
            if id == BlockId::Trainer {
                keyed[trainer::ENCRYPTION_KEY..trainer::ENCRYPTION_KEY + 4].fill(true);
            }
            let after = m.block(id).as_bytes();
            for (i, was) in before[id.index()].iter().enumerate() {
                if !keyed[i] {
                    prop_assert_eq!(after[i], *was, "{} byte {:#x}", id, i);
                }
            }
        }

        for (&(id, offset, width), &value) in fields.iter().zip(&plain) {
            prop_assert_eq!(plain_value(&m, id, offset, width, r.new_key), value);
        }
    }
}
