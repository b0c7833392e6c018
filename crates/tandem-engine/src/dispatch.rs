//! Opcode dispatch: one handler per opcode, selected by `match`.
//!
//! The dispatcher reads byte 0 of the battler's channel. A byte outside
//! the declared range, like the declared terminator, runs nothing and
//! never completes; it is reported once per issued command. Otherwise
//! the payload is decoded up front so handlers work on typed fields.
//!
//! Cry-gated handlers (move, status and table animations) return
//! [`Step::Stay`] without side effects while the battler's cry is still
//! playing and are re-dispatched on the next tick.

use log::warn;
use tandem_core::{BattlerId, CommandPayload, Opcode, Presentation};

use crate::battle::Battle;
use crate::controller::{ControllerState, Step};

fn is_cry_gated(opcode: Opcode) -> bool {
    matches!(
        opcode,
        Opcode::MoveAnimation
            | Opcode::StatusIconUpdate
            | Opcode::StatusAnimation
            | Opcode::BattleAnimation
    )
}

impl<P: Presentation> Battle<P> {
    /// Run the handler for `battler`'s pending command once.
    pub(crate) fn dispatch(&mut self, battler: BattlerId) -> Step {
        let channel = &mut self.channels[battler.index()];
        let byte = channel.opcode_byte();
        let opcode = match Opcode::from_byte(byte) {
            Some(Opcode::TerminatorNop) | None => {
                if channel.first_warning() {
                    warn!("battler {battler}: opcode {byte} terminates dispatch, command will not complete");
                }
                return Step::Stay;
            }
            Some(op) => op,
        };

        if is_cry_gated(opcode) && self.presentation.sound_busy(battler) {
            return Step::Stay;
        }

        let payload = match CommandPayload::decode(opcode, channel.bytes()) {
            Ok(p) => p,
            Err(e) => {
                warn!("battler {battler}: dropping malformed command: {e}");
                return Step::Complete;
            }
        };

        match (opcode, payload) {
            // ── Data ───────────────────────────────────────────────
            (Opcode::GetMonData, CommandPayload::GetMonData { request, selector }) => {
                self.get_mon_data(battler, request, selector)
            }
            (
                Opcode::SetMonData,
                CommandPayload::SetMonData {
                    request,
                    selector,
                    data,
                },
            ) => self.set_mon_data(battler, request, selector, &data),
            (Opcode::SetRawMonData, CommandPayload::SetRawMonData { offset, data }) => {
                self.set_raw_mon_data(battler, offset, &data)
            }

            // ── Sprites ────────────────────────────────────────────
            (Opcode::LoadMonSprite, _) => self.load_mon_sprite(battler),
            (
                Opcode::SwitchInAnim,
                CommandPayload::SwitchInAnim {
                    party_index,
                    keep_substitute,
                },
            ) => self.switch_in_anim(battler, party_index, keep_substitute),
            (Opcode::ReturnMonToBall, CommandPayload::ReturnMonToBall { instant }) => {
                self.return_mon_to_ball(battler, instant)
            }
            (Opcode::DrawTrainerPic, _) => self.draw_trainer_pic(battler),
            (Opcode::TrainerSlideBack, _) => self.trainer_slide_back(battler),
            (Opcode::FaintAnimation, _) => self.faint_animation(battler),
            (Opcode::MoveAnimation, CommandPayload::MoveAnimation(args)) => {
                Step::Goto(ControllerState::MoveAnimation { step: 0, args })
            }
            (Opcode::StatusIconUpdate, _) => self.status_icon_update(battler),
            (Opcode::StatusAnimation, CommandPayload::StatusAnimation { status2, status }) => {
                self.status_animation(battler, status2, status)
            }
            (Opcode::HitAnimation, _) => self.hit_animation(battler),
            (Opcode::SpriteInvisibility, CommandPayload::SpriteInvisibility { invisible }) => {
                self.sprite_invisibility(battler, invisible)
            }
            (Opcode::BattleAnimation, CommandPayload::BattleAnimation { anim_id, argument }) => {
                self.battle_animation(battler, anim_id, argument)
            }

            // ── Text and healthbox ─────────────────────────────────
            (Opcode::PrintString, CommandPayload::PrintString { string_id }) => {
                self.presentation.print_battle_string(battler, string_id);
                Step::Goto(ControllerState::WaitText)
            }
            (Opcode::HealthBarUpdate, CommandPayload::HealthBarUpdate { delta }) => {
                self.health_bar_update(battler, delta)
            }
            (Opcode::ExpUpdate, CommandPayload::ExpUpdate { party_index, amount }) => {
                self.exp_update(battler, party_index, amount)
            }
            (
                Opcode::DrawPartyStatusSummary,
                CommandPayload::DrawPartyStatusSummary {
                    battle_start,
                    skip_delay,
                    entries,
                },
            ) => self.draw_party_status_summary(battler, battle_start, skip_delay, &entries),
            (Opcode::HidePartyStatusSummary, _) => self.hide_party_status_summary(battler),

            // ── Intro and end ──────────────────────────────────────
            (Opcode::IntroSlide, CommandPayload::IntroSlide { environment }) => {
                self.presentation.intro_slide(environment);
                self.state.intro_slide_started = true;
                Step::Complete
            }
            (Opcode::IntroTrainerBallThrow, _) => self.intro_trainer_ball_throw(battler),
            (Opcode::EndLinkBattle, CommandPayload::EndLinkBattle { outcome }) => {
                self.end_link_battle(outcome)
            }

            // ── AI ─────────────────────────────────────────────────
            (Opcode::ChooseAction, _) => {
                self.ai.choose_action(battler);
                Step::Complete
            }
            (Opcode::ChooseMove, _) => self.choose_move(battler),
            (Opcode::ChoosePokemon, _) => self.choose_pokemon(battler),

            // ── Sound ──────────────────────────────────────────────
            (Opcode::PlaySe, CommandPayload::PlaySe { sound }) => self.play_se(battler, sound),
            (Opcode::PlayFanfareOrBgm, CommandPayload::PlayFanfareOrBgm { song, as_bgm }) => {
                self.play_fanfare_or_bgm(song, as_bgm)
            }
            (Opcode::FaintingCry, _) => self.fainting_cry(battler),

            // ── Shared battle variable and flag ────────────────────
            (Opcode::ClearSharedVar, _) => {
                self.state.shared_var = 0;
                Step::Complete
            }
            (Opcode::SetSharedVar, CommandPayload::SetSharedVar { value }) => {
                self.state.shared_var = value;
                Step::Complete
            }
            (Opcode::ClearSharedFlag, _) => {
                self.state.shared_flag = false;
                Step::Complete
            }
            (Opcode::ToggleSharedFlag, _) => {
                self.state.shared_flag = !self.state.shared_flag;
                Step::Complete
            }

            // No partner behaviour.
            _ => Step::Complete,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_animation_opcodes_wait_for_cries() {
        let gated: Vec<_> = Opcode::all()
            .iter()
            .copied()
            .filter(|op| is_cry_gated(*op))
            .collect();
        assert_eq!(
            gated,
            vec![
                Opcode::MoveAnimation,
                Opcode::StatusIconUpdate,
                Opcode::StatusAnimation,
                Opcode::BattleAnimation
            ]
        );
    }
}
