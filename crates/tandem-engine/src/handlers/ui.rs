//! Healthbox and party status summary handlers.

use tandem_core::command::INSTANT_HP_BAR_DROP;
use tandem_core::{BattlerId, PartySummaryEntry, Presentation, Side};

use crate::battle::Battle;
use crate::controller::{ControllerState, Step};

impl<P: Presentation> Battle<P> {
    pub(crate) fn health_bar_update(&mut self, battler: BattlerId, delta: i16) -> Step {
        self.start_health_bar(battler, delta, delta == INSTANT_HP_BAR_DROP);
        Step::Goto(ControllerState::HealthBarFill)
    }

    pub(crate) fn draw_party_status_summary(
        &mut self,
        battler: BattlerId,
        battle_start: bool,
        skip_delay: bool,
        entries: &[PartySummaryEntry],
    ) -> Step {
        if battle_start && battler.side() == Side::Player {
            return Step::Complete;
        }
        self.state.anim_mut(battler).summary_shown = true;
        self.presentation
            .show_party_status_summary(battler, entries, battle_start);
        let elapsed = if skip_delay {
            self.config.status_summary_min_ticks
        } else {
            0
        };
        Step::Goto(ControllerState::PartyStatusSummary { elapsed })
    }

    pub(crate) fn hide_party_status_summary(&mut self, battler: BattlerId) -> Step {
        let anim = self.state.anim_mut(battler);
        if anim.summary_shown {
            anim.summary_shown = false;
            self.presentation.hide_party_status_summary(battler);
        }
        Step::Complete
    }
}

#[cfg(test)]
mod tests {
    use tandem_core::{BattlerId, Opcode, PartyIndex};

    use crate::battle::test_battle;

    fn summary(battle_start: bool, skip_delay: bool) -> Vec<u8> {
        let mut cmd = vec![0u8; 52];
        cmd[0] = Opcode::DrawPartyStatusSummary.as_byte();
        cmd[1] = battle_start as u8;
        cmd[2] = skip_delay as u8;
        cmd
    }

    fn ticks_to_complete(battler: BattlerId, cmd: &[u8]) -> u32 {
        let mut battle = test_battle();
        battle.assign_partner(battler, PartyIndex(0)).unwrap();
        battle.issue(battler, cmd).unwrap();
        let mut ticks = 0;
        loop {
            battle.tick();
            ticks += 1;
            if battle.is_complete(battler) {
                return ticks;
            }
            assert!(ticks < 1_000);
        }
    }

    #[test]
    fn summary_stays_up_for_minimum_ticks() {
        // Dispatch tick, 93 counting ticks, then the completing tick.
        assert_eq!(ticks_to_complete(BattlerId::PLAYER_RIGHT, &summary(false, false)), 95);
    }

    #[test]
    fn skip_delay_completes_on_first_poll() {
        assert_eq!(ticks_to_complete(BattlerId::PLAYER_RIGHT, &summary(false, true)), 2);
    }

    #[test]
    fn battle_start_on_player_side_is_skipped() {
        assert_eq!(ticks_to_complete(BattlerId::PLAYER_RIGHT, &summary(true, false)), 1);
    }

    #[test]
    fn hide_pending_holds_summary() {
        let b = BattlerId::PLAYER_RIGHT;
        let mut battle = test_battle();
        battle.assign_partner(b, PartyIndex(0)).unwrap();
        battle.presentation_mut().set_summary_hide_pending(true);
        battle.issue(b, &summary(false, true)).unwrap();
        for _ in 0..10 {
            battle.tick();
        }
        assert!(!battle.is_complete(b));
        battle.presentation_mut().set_summary_hide_pending(false);
        battle.tick();
        assert!(battle.is_complete(b));
    }
}
