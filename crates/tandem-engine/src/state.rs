//! Battle-wide state the handlers read and write.

use tandem_core::{BattlerId, Party, PartyIndex, Pokemon, MAX_BATTLERS};

use crate::error::AssignError;

/// Per-battler sprite bookkeeping.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BattlerAnimState {
    /// A substitute doll stands in for the battler.
    pub behind_substitute: bool,
    /// The doll was swapped out for the current move animation.
    pub substitute_hidden: bool,
    /// Last known sprite visibility.
    pub invisible: bool,
    /// The party status summary is on screen.
    pub summary_shown: bool,
    /// The shiny check already ran for the current send-out.
    pub shiny_attempted: bool,
}

/// Party, field positions and shared battle flags.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BattleState {
    /// The partner's party.
    pub party: Party,
    party_indexes: [PartyIndex; MAX_BATTLERS],
    /// Bit per battler not on the field.
    pub absent: u8,
    /// Member each battler will switch to, recorded by the AI.
    pub switch_targets: [Option<PartyIndex>; MAX_BATTLERS],
    /// Per-battler sprite flags.
    pub anim: [BattlerAnimState; MAX_BATTLERS],
    /// Shared battle variable.
    pub shared_var: u8,
    /// Shared battle flag.
    pub shared_flag: bool,
    /// Outcome recorded when the battle ended.
    pub outcome: Option<u8>,
    /// The intro slide has started.
    pub intro_slide_started: bool,
    /// Intro send-outs are still playing.
    pub intro_sequence_active: bool,
}

impl BattleState {
    /// Fresh state over `party`. Every battler points at slot 0.
    pub fn new(party: Party) -> Self {
        Self {
            party,
            party_indexes: [PartyIndex(0); MAX_BATTLERS],
            absent: 0,
            switch_targets: [None; MAX_BATTLERS],
            anim: [BattlerAnimState::default(); MAX_BATTLERS],
            shared_var: 0,
            shared_flag: false,
            outcome: None,
            intro_slide_started: false,
            intro_sequence_active: false,
        }
    }

    /// The member `battler` is fielding.
    ///
    /// # Panics
    ///
    /// Panics if `battler` is not one of [`BattlerId::ALL`].
    pub fn party_index(&self, battler: BattlerId) -> PartyIndex {
        self.party_indexes[battler.index()]
    }

    /// Point `battler` at a party slot.
    pub fn set_party_index(
        &mut self,
        battler: BattlerId,
        index: PartyIndex,
    ) -> Result<(), AssignError> {
        if battler.index() >= MAX_BATTLERS {
            return Err(AssignError::UnknownBattler { battler });
        }
        if !index.is_valid() {
            return Err(AssignError::InvalidPartyIndex { index });
        }
        self.party_indexes[battler.index()] = index;
        Ok(())
    }

    /// The member `battler` is fielding.
    ///
    /// # Panics
    ///
    /// Panics if `battler` is not one of [`BattlerId::ALL`].
    pub fn active(&self, battler: BattlerId) -> &Pokemon {
        // party_indexes only ever hold validated slots.
        &self.party.slots()[self.party_index(battler).index()]
    }

    /// Mutable access to the member `battler` is fielding.
    ///
    /// # Panics
    ///
    /// Panics if `battler` is not one of [`BattlerId::ALL`].
    pub fn active_mut(&mut self, battler: BattlerId) -> &mut Pokemon {
        let slot = self.party_index(battler).index();
        &mut self.party.slots_mut()[slot]
    }

    /// Whether `battler` is off the field.
    pub fn is_absent(&self, battler: BattlerId) -> bool {
        self.absent & battler.bit() != 0
    }

    /// Mark `battler` on or off the field.
    pub fn set_absent(&mut self, battler: BattlerId, absent: bool) {
        if absent {
            self.absent |= battler.bit();
        } else {
            self.absent &= !battler.bit();
        }
    }

    /// Sprite flags for `battler`.
    ///
    /// # Panics
    ///
    /// Panics if `battler` is not one of [`BattlerId::ALL`].
    pub fn anim(&self, battler: BattlerId) -> &BattlerAnimState {
        &self.anim[battler.index()]
    }

    /// Mutable sprite flags for `battler`.
    ///
    /// # Panics
    ///
    /// Panics if `battler` is not one of [`BattlerId::ALL`].
    pub fn anim_mut(&mut self, battler: BattlerId) -> &mut BattlerAnimState {
        &mut self.anim[battler.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn party_index_is_validated() {
        let mut s = BattleState::new(Party::new());
        s.set_party_index(BattlerId::PLAYER_RIGHT, PartyIndex(4)).unwrap();
        assert_eq!(s.party_index(BattlerId::PLAYER_RIGHT), PartyIndex(4));
        assert_eq!(
            s.set_party_index(BattlerId::PLAYER_RIGHT, PartyIndex(6)),
            Err(AssignError::InvalidPartyIndex {
                index: PartyIndex(6)
            })
        );
        assert_eq!(
            s.set_party_index(BattlerId(4), PartyIndex(0)),
            Err(AssignError::UnknownBattler {
                battler: BattlerId(4)
            })
        );
    }

    #[test]
    fn absent_bits() {
        let mut s = BattleState::new(Party::new());
        s.set_absent(BattlerId::OPPONENT_LEFT, true);
        assert!(s.is_absent(BattlerId::OPPONENT_LEFT));
        assert!(!s.is_absent(BattlerId::OPPONENT_RIGHT));
        s.set_absent(BattlerId::OPPONENT_LEFT, false);
        assert_eq!(s.absent, 0);
    }

    #[test]
    #[should_panic]
    fn anim_of_unknown_battler_panics() {
        let s = BattleState::new(Party::new());
        let _ = s.anim(BattlerId(4));
    }
}
