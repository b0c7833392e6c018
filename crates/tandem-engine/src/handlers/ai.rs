//! Partner AI decisions: move choice and switch-in choice.

use tandem_core::{
    BattlerId, MoveTarget, PartyIndex, Presentation, Response, ReturnKind, PARTY_SIZE,
};

use crate::battle::Battle;
use crate::controller::Step;

/// The partner's own members occupy the back half of the party.
const PARTNER_SLOTS: std::ops::Range<u8> = 3..PARTY_SIZE as u8;

impl<P: Presentation> Battle<P> {
    pub(crate) fn choose_move(&mut self, battler: BattlerId) -> Step {
        let moves = self.state.active(battler).moves;
        let choice = self.ai.choose_move(battler, &moves);
        let slot = choice.slot & 3;
        let flags = self.ai.move_target(moves[slot as usize]);

        let mut target = choice.target;
        if flags.intersects(MoveTarget::USER | MoveTarget::USER_OR_SELECTED) {
            target = battler;
        }
        if flags.intersects(MoveTarget::BOTH) {
            target = if self.state.is_absent(BattlerId::OPPONENT_LEFT) {
                BattlerId::OPPONENT_RIGHT
            } else {
                BattlerId::OPPONENT_LEFT
            };
        }

        self.emit(
            battler,
            Response::TwoReturnValues {
                kind: ReturnKind::ChosenMove,
                value: slot as u32 | (target.0 as u32) << 8,
            },
        );
        Step::Complete
    }

    pub(crate) fn choose_pokemon(&mut self, battler: BattlerId) -> Step {
        let chosen = match self.ai.choose_switch(battler) {
            Some(index) if index.is_valid() => index,
            _ => self.fallback_switch_in(),
        };
        self.state.switch_targets[battler.index()] = chosen.is_valid().then_some(chosen);
        self.emit(
            battler,
            Response::ChosenMon {
                party_index: chosen,
            },
        );
        Step::Complete
    }

    /// First conscious partner member not already on the field, or slot 6.
    fn fallback_switch_in(&self) -> PartyIndex {
        let on_field = [
            self.state.party_index(BattlerId::PLAYER_LEFT),
            self.state.party_index(BattlerId::PLAYER_RIGHT),
        ];
        PARTNER_SLOTS
            .map(PartyIndex)
            .find(|&i| self.state.party.slots()[i.index()].hp != 0 && !on_field.contains(&i))
            .unwrap_or(PartyIndex(PARTY_SIZE as u8))
    }
}
