//! Benchmark profiles for the Tandem battle controller and save manager.
//!
//! - [`battle_profile`]: a battle with the partner on both player slots
//! - [`save_profile`]: a save manager with populated blocks
//! - [`command_mix`]: a deterministic cycle of quick-completing commands

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use tandem_core::{BattlerId, Opcode, PartyIndex};
use tandem_engine::{Battle, BattleFlags, EngineConfig};
use tandem_save::{ItemSlot, Pocket, SaveConfig, SaveManager};
use tandem_test_utils::{fixtures, FixedAi, ScriptedPresentation, TableSpecies};

/// Build a double battle with the partner on both player slots.
///
/// All presentation effects finish immediately, so every command
/// completes within a few ticks.
pub fn battle_profile() -> Battle<ScriptedPresentation> {
    let config = EngineConfig {
        flags: BattleFlags::DOUBLE,
        ..EngineConfig::default()
    };
    let mut battle = Battle::new(
        config,
        fixtures::partner_party(),
        ScriptedPresentation::default(),
        Box::new(FixedAi::default()),
        Box::new(TableSpecies::default()),
    )
    .unwrap();
    battle
        .assign_partner(BattlerId::PLAYER_LEFT, PartyIndex(0))
        .unwrap();
    battle
        .assign_partner(BattlerId::PLAYER_RIGHT, PartyIndex(3))
        .unwrap();
    battle
}

/// A save manager seeded with `seed`, holding money, coins and a
/// partly filled bag so relocation re-keys real values.
pub fn save_profile(seed: u64) -> SaveManager {
    let mut save = SaveManager::new(SaveConfig {
        seed,
        ..SaveConfig::default()
    })
    .unwrap();
    save.set_trainer_id([0x39, 0x30, 0x12, 0x00]).unwrap();
    save.set_money(123_456).unwrap();
    save.set_coins(789).unwrap();
    for slot in 0..8 {
        save.set_item_slot(
            Pocket::Items,
            slot,
            ItemSlot {
                item: 1 + slot as u16,
                quantity: 10 + slot as u16,
            },
        )
        .unwrap();
    }
    save
}

/// Commands that complete on their dispatch tick or shortly after.
pub fn command_mix() -> Vec<Vec<u8>> {
    vec![
        vec![Opcode::GetMonData.as_byte(), 0, 0],
        vec![Opcode::GetMonData.as_byte(), 1, 0b11_1111],
        vec![Opcode::SetMonData.as_byte(), 42, 0, 15, 0],
        vec![Opcode::PlaySe.as_byte(), 7, 0],
        vec![Opcode::ChooseMove.as_byte()],
        vec![Opcode::ChoosePokemon.as_byte()],
        vec![Opcode::HitAnimation.as_byte()],
        vec![Opcode::SetSharedVar.as_byte(), 3],
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_mix_completes_on_both_slots() {
        let mut battle = battle_profile();
        for cmd in command_mix() {
            for b in [BattlerId::PLAYER_LEFT, BattlerId::PLAYER_RIGHT] {
                battle.issue(b, &cmd).unwrap();
            }
            let mut ticks = 0;
            while !(battle.is_complete(BattlerId::PLAYER_LEFT)
                && battle.is_complete(BattlerId::PLAYER_RIGHT))
            {
                battle.tick();
                ticks += 1;
                assert!(ticks < 100, "{cmd:?} did not complete");
            }
            battle.responses();
        }
    }

    #[test]
    fn save_profile_relocates() {
        let mut save = save_profile(7);
        save.relocate().unwrap();
        assert_eq!(save.money().unwrap(), 123_456);
        assert_eq!(save.coins().unwrap(), 789);
    }
}
