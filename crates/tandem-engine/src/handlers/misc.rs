//! Sound and end-of-battle handlers.

use log::debug;
use tandem_core::{BattlerId, CryKind, Presentation};

use super::{END_MUSIC_FADE_SPEED, FAINTING_CRY_PAN};
use crate::battle::Battle;
use crate::controller::{pan_for, ControllerState, Step};

impl<P: Presentation> Battle<P> {
    pub(crate) fn play_se(&mut self, battler: BattlerId, sound: u16) -> Step {
        self.presentation.play_se(sound, pan_for(battler));
        Step::Complete
    }

    pub(crate) fn play_fanfare_or_bgm(&mut self, song: u16, as_bgm: bool) -> Step {
        if as_bgm {
            self.presentation.stop_low_hp_sound();
            self.presentation.play_bgm(song);
        } else {
            self.presentation.play_fanfare(song);
        }
        Step::Complete
    }

    pub(crate) fn fainting_cry(&mut self, battler: BattlerId) -> Step {
        let species = self.state.active(battler).species;
        self.presentation
            .play_cry(species, FAINTING_CRY_PAN, CryKind::Fainting);
        Step::Complete
    }

    pub(crate) fn end_link_battle(&mut self, outcome: u8) -> Step {
        debug!("battle ended with outcome {outcome}");
        self.state.outcome = Some(outcome);
        self.presentation.fade_out_music(END_MUSIC_FADE_SPEED);
        self.presentation.begin_battle_end_fade();
        Step::CompleteInto(ControllerState::BattleEnding)
    }
}

#[cfg(test)]
mod tests {
    use tandem_core::{BattlerId, Opcode, PartyIndex};
    use tandem_test_utils::Call;

    use crate::battle::test_battle;
    use crate::controller::ControllerState;

    #[test]
    fn se_pan_depends_on_side() {
        let mut battle = test_battle();
        battle
            .assign_partner(BattlerId::PLAYER_RIGHT, PartyIndex(0))
            .unwrap();
        battle
            .assign_partner(BattlerId::OPPONENT_LEFT, PartyIndex(1))
            .unwrap();
        battle
            .issue(BattlerId::PLAYER_RIGHT, &[Opcode::PlaySe.as_byte(), 7, 0])
            .unwrap();
        battle
            .issue(BattlerId::OPPONENT_LEFT, &[Opcode::PlaySe.as_byte(), 8, 0])
            .unwrap();
        battle.tick();
        let calls = battle.presentation().calls();
        assert!(calls.contains(&Call::PlaySe { se: 7, pan: -64 }));
        assert!(calls.contains(&Call::PlaySe { se: 8, pan: 63 }));
    }

    #[test]
    fn bgm_stops_low_hp_sound_first() {
        let mut battle = test_battle();
        let b = BattlerId::PLAYER_RIGHT;
        battle.assign_partner(b, PartyIndex(0)).unwrap();
        battle
            .issue(b, &[Opcode::PlayFanfareOrBgm.as_byte(), 0x2A, 0x01, 1])
            .unwrap();
        battle.tick();
        let calls = battle.presentation_mut().take_calls();
        assert_eq!(calls, vec![Call::StopLowHpSound, Call::PlayBgm { song: 0x012A }]);
    }

    #[test]
    fn end_link_battle_waits_for_fade_then_goes_inert() {
        let mut battle = test_battle();
        let b = BattlerId::PLAYER_RIGHT;
        battle.assign_partner(b, PartyIndex(0)).unwrap();
        battle.presentation_mut().set_palette_fade_ticks(3);
        battle.issue(b, &[Opcode::EndLinkBattle.as_byte(), 2]).unwrap();
        battle.tick();
        assert!(battle.is_complete(b));
        assert_eq!(battle.state().outcome, Some(2));
        assert_eq!(battle.controller(b), Some(ControllerState::BattleEnding));
        for _ in 0..4 {
            battle.tick();
        }
        assert_eq!(battle.controller(b), Some(ControllerState::Ended));
    }
}
