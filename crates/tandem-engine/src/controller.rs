//! Per-battler controller state machine.
//!
//! Each assigned battler holds one [`ControllerState`]. Once per tick
//! [`Battle::advance`] switches on it: `RunCommand` dispatches the
//! pending command, every other state polls a guard and either stays,
//! moves to another state or completes. Polling a state whose guard does
//! not hold has no side effects, so a battler can sit in it for any
//! number of ticks.
//!
//! ```text
//!   RunCommand ──dispatch──► parked state ──guard──► … ──► complete
//!       ▲                                                    │
//!       └──────────── completion bit set, back to RunCommand ┘
//! ```

use log::debug;
use tandem_core::{
    BarSetup, BattleBar, BattlerId, HealthboxUpdate, MoveAnimationArgs, Presentation, Side,
    SpecialAnim,
};

use crate::battle::Battle;
use crate::handlers::{MOVE_SUBSTITUTE, SE_FAINT};

/// Where a battler's controller is.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ControllerState {
    /// Dispatch the pending command, if any.
    RunCommand,
    /// Complete once the battler sprite is idle.
    WaitSpriteIdle,
    /// Complete once the loaded sprite finished sliding in.
    WaitSpriteSlideIn,
    /// Destroy the trainer sprite once it slid off.
    TrainerSlideBackDone,
    /// Step the health bar until it stops.
    HealthBarFill,
    /// Complete once the text printer is idle.
    WaitText,
    /// A task owns the battler. Nothing to poll.
    AwaitTask,
    /// Wait for the substitute doll to clear before fainting.
    FaintWaitSubstitute,
    /// Wait for the faint slide.
    FaintSlideDown,
    /// Blink the sprite after a hit.
    HitBlink {
        /// Ticks blinked so far.
        frames: u8,
    },
    /// Recall sequence.
    SwitchOut {
        /// 0 clears the substitute, 1 launches the recall.
        step: u8,
    },
    /// Complete once the recall animation ends.
    SwitchOutDone,
    /// Wait for the ball, trying the shiny sparkle once.
    SwitchInBall,
    /// Wait for the shiny sparkle, then refresh the healthbox.
    SwitchInShiny,
    /// Wait for the healthbox, then restore the substitute.
    SwitchInShowHealthbox,
    /// Complete once the substitute and sprite settle.
    SwitchInWaitSubstitute,
    /// Move animation sequence.
    MoveAnimation {
        /// 0 hide substitute, 1 start, 2 drive, 3 finish.
        step: u8,
        /// Decoded arguments.
        args: MoveAnimationArgs,
    },
    /// Complete once the status animation ends.
    WaitStatusAnimation,
    /// Complete once the table animation ends.
    WaitTableAnimation,
    /// Keep the party status summary up.
    PartyStatusSummary {
        /// Ticks shown.
        elapsed: u16,
    },
    /// The intro task owns the battler.
    AwaitIntroTask,
    /// Wait for the intro ball animations to settle.
    IntroWaitBallAnims {
        /// The settle condition already held once.
        primed: bool,
    },
    /// Wait for the intro healthboxes and cry.
    IntroWaitHealthbox,
    /// Short pause before completing the intro.
    IntroHealthboxDelay {
        /// Ticks left.
        frames: u8,
    },
    /// Wait for the end-of-battle fade.
    BattleEnding,
    /// The battle is over. Inert.
    Ended,
}

/// What one advance did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Step {
    /// Guard not met. Nothing changed.
    Stay,
    /// Move to another state.
    Goto(ControllerState),
    /// Command finished. Back to `RunCommand`.
    Complete,
    /// Command finished, but the battler moves on to the given state.
    CompleteInto(ControllerState),
}

impl<P: Presentation> Battle<P> {
    /// Run `battler`'s controller once. Returns `true` if its command
    /// completed this tick.
    pub(crate) fn advance(&mut self, battler: BattlerId) -> bool {
        let Some(state) = self.controllers[battler.index()] else {
            return false;
        };
        let step = match state {
            ControllerState::RunCommand => {
                if self.signals.is_pending(battler) {
                    self.dispatch(battler)
                } else {
                    Step::Stay
                }
            }
            ControllerState::WaitSpriteIdle => {
                complete_if(self.presentation.sprite_idle(battler))
            }
            ControllerState::WaitSpriteSlideIn => {
                complete_if(self.presentation.sprite_slide_finished(battler))
            }
            ControllerState::TrainerSlideBackDone => {
                if self.presentation.sprite_idle(battler) {
                    self.presentation.destroy_sprite(battler);
                    Step::Complete
                } else {
                    Step::Stay
                }
            }
            ControllerState::HealthBarFill => self.health_bar_fill(battler),
            ControllerState::WaitText => complete_if(!self.presentation.printer_active()),
            ControllerState::AwaitTask | ControllerState::AwaitIntroTask => Step::Stay,
            ControllerState::FaintWaitSubstitute => self.faint_wait_substitute(battler),
            ControllerState::FaintSlideDown => {
                if self.presentation.faint_slide_finished(battler) {
                    self.presentation.destroy_sprite(battler);
                    self.presentation.set_healthbox_visible(battler, false);
                    Step::Complete
                } else {
                    Step::Stay
                }
            }
            ControllerState::HitBlink { frames } => self.hit_blink(battler, frames),
            ControllerState::SwitchOut { step } => self.switch_out(battler, step),
            ControllerState::SwitchOutDone => {
                if self.presentation.special_animation_active(battler) {
                    Step::Stay
                } else {
                    self.presentation.destroy_sprite(battler);
                    self.presentation.set_healthbox_visible(battler, false);
                    Step::Complete
                }
            }
            ControllerState::SwitchInBall => self.switch_in_ball(battler),
            ControllerState::SwitchInShiny => self.switch_in_shiny(battler),
            ControllerState::SwitchInShowHealthbox => self.switch_in_show_healthbox(battler),
            ControllerState::SwitchInWaitSubstitute => complete_if(
                !self.presentation.special_animation_active(battler)
                    && self.presentation.sprite_idle(battler),
            ),
            ControllerState::MoveAnimation { step, args } => {
                self.move_animation(battler, step, args)
            }
            ControllerState::WaitStatusAnimation => {
                complete_if(!self.presentation.status_animation_active(battler))
            }
            ControllerState::WaitTableAnimation => {
                complete_if(!self.presentation.table_animation_active(battler))
            }
            ControllerState::PartyStatusSummary { elapsed } => {
                if elapsed >= self.config.status_summary_min_ticks
                    && !self.presentation.party_status_summary_hide_pending(battler)
                {
                    Step::Complete
                } else {
                    Step::Goto(ControllerState::PartyStatusSummary {
                        elapsed: elapsed.saturating_add(1),
                    })
                }
            }
            ControllerState::IntroWaitBallAnims { primed } => {
                self.intro_wait_ball_anims(battler, primed)
            }
            ControllerState::IntroWaitHealthbox => self.intro_wait_healthbox(battler),
            ControllerState::IntroHealthboxDelay { frames } => match frames {
                0 => Step::Complete,
                n => Step::Goto(ControllerState::IntroHealthboxDelay { frames: n - 1 }),
            },
            ControllerState::BattleEnding => {
                if self.presentation.palette_fade_active() {
                    Step::Stay
                } else {
                    Step::Goto(ControllerState::Ended)
                }
            }
            ControllerState::Ended => Step::Stay,
        };
        self.apply(battler, step)
    }

    pub(crate) fn apply(&mut self, battler: BattlerId, step: Step) -> bool {
        let slot = &mut self.controllers[battler.index()];
        match step {
            Step::Stay => false,
            Step::Goto(next) => {
                *slot = Some(next);
                false
            }
            Step::Complete => {
                *slot = Some(ControllerState::RunCommand);
                self.signals.complete(battler);
                true
            }
            Step::CompleteInto(next) => {
                debug!("battler {battler} completed into {next:?}");
                *slot = Some(next);
                self.signals.complete(battler);
                true
            }
        }
    }

    /// Hand `battler` to a state from outside the controller (tasks).
    pub(crate) fn set_controller(&mut self, battler: BattlerId, state: ControllerState) {
        if let Some(slot) = self.controllers.get_mut(battler.index()) {
            if slot.is_some() {
                *slot = Some(state);
            }
        }
    }

    // ── Polling states ─────────────────────────────────────────────

    fn health_bar_fill(&mut self, battler: BattlerId) -> Step {
        let value = self.presentation.step_bar(battler, BattleBar::Health);
        self.presentation.set_healthbox_visible(battler, true);
        match value {
            Some(hp) => {
                let mon = self.state.active(battler);
                self.presentation
                    .update_healthbox(battler, mon, HealthboxUpdate::HpText(hp));
                Step::Stay
            }
            None => {
                let mon = self.state.active(battler);
                self.presentation.update_low_hp_music(battler, mon);
                Step::Complete
            }
        }
    }

    fn faint_wait_substitute(&mut self, battler: BattlerId) -> Step {
        if self.presentation.special_animation_active(battler) {
            return Step::Stay;
        }
        let mon = self.state.active(battler);
        self.presentation.update_low_hp_music(battler, mon);
        self.presentation.play_se(SE_FAINT, pan_for(battler));
        self.presentation.start_faint_slide(battler);
        Step::Goto(ControllerState::FaintSlideDown)
    }

    fn hit_blink(&mut self, battler: BattlerId, frames: u8) -> Step {
        if frames >= self.config.hit_blink_frames {
            self.presentation.set_sprite_invisible(battler, false);
            self.state.anim_mut(battler).invisible = false;
            return Step::Complete;
        }
        if frames % 4 == 0 {
            let hidden = self.presentation.sprite_invisible(battler);
            self.presentation.set_sprite_invisible(battler, !hidden);
        }
        Step::Goto(ControllerState::HitBlink { frames: frames + 1 })
    }

    fn switch_out(&mut self, battler: BattlerId, step: u8) -> Step {
        match step {
            0 => {
                if self.state.anim(battler).behind_substitute {
                    self.presentation
                        .launch_special_animation(battler, SpecialAnim::SubstituteToMon);
                }
                Step::Goto(ControllerState::SwitchOut { step: 1 })
            }
            _ => {
                if self.presentation.special_animation_active(battler) {
                    return Step::Stay;
                }
                self.presentation
                    .launch_special_animation(battler, SpecialAnim::SwitchOut);
                Step::Goto(ControllerState::SwitchOutDone)
            }
        }
    }

    fn switch_in_ball(&mut self, battler: BattlerId) -> Step {
        let anim = *self.state.anim(battler);
        if !anim.shiny_attempted && !self.presentation.ball_animation_active(battler) {
            let mon = self.state.active(battler);
            self.presentation.start_shiny_animation(battler, mon);
            self.state.anim_mut(battler).shiny_attempted = true;
        }
        if self.presentation.ball_sprite_idle(battler)
            && !self.presentation.ball_animation_active(battler)
        {
            self.presentation.destroy_ball_sprite(battler);
            return Step::Goto(ControllerState::SwitchInShiny);
        }
        Step::Stay
    }

    fn switch_in_shiny(&mut self, battler: BattlerId) -> Step {
        if !self.presentation.shiny_animation_finished(battler) {
            return Step::Stay;
        }
        self.state.anim_mut(battler).shiny_attempted = false;
        let mon = self.state.active(battler);
        self.presentation.update_low_hp_music(battler, mon);
        self.presentation
            .update_healthbox(battler, mon, HealthboxUpdate::All);
        self.presentation.set_healthbox_visible(battler, true);
        Step::Goto(ControllerState::SwitchInShowHealthbox)
    }

    fn switch_in_show_healthbox(&mut self, battler: BattlerId) -> Step {
        if !self.presentation.healthbox_idle(battler) {
            return Step::Stay;
        }
        self.state.anim_mut(battler).invisible = self.presentation.sprite_invisible(battler);
        if self.state.anim(battler).behind_substitute {
            self.presentation
                .launch_special_animation(battler, SpecialAnim::MonToSubstitute);
        }
        Step::Goto(ControllerState::SwitchInWaitSubstitute)
    }

    fn move_animation(&mut self, battler: BattlerId, step: u8, args: MoveAnimationArgs) -> Step {
        let next = |step| Step::Goto(ControllerState::MoveAnimation { step, args });
        match step {
            0 => {
                let anim = self.state.anim_mut(battler);
                if anim.behind_substitute && !anim.substitute_hidden {
                    anim.substitute_hidden = true;
                    self.presentation
                        .launch_special_animation(battler, SpecialAnim::SubstituteToMon);
                }
                next(1)
            }
            1 => {
                if self.presentation.special_animation_active(battler) {
                    return Step::Stay;
                }
                self.presentation.start_move_animation(battler, &args);
                next(2)
            }
            2 => {
                self.presentation.step_move_animation();
                if self.presentation.move_animation_active() {
                    return Step::Stay;
                }
                let anim = self.state.anim_mut(battler);
                if anim.behind_substitute && args.multihit < 2 {
                    anim.substitute_hidden = false;
                    self.presentation
                        .launch_special_animation(battler, SpecialAnim::MonToSubstitute);
                }
                next(3)
            }
            _ => {
                if self.presentation.special_animation_active(battler) {
                    return Step::Stay;
                }
                for b in BattlerId::ALL {
                    self.state.anim_mut(b).invisible = self.presentation.sprite_invisible(b);
                }
                if args.move_id == MOVE_SUBSTITUTE {
                    self.state.anim_mut(battler).behind_substitute = true;
                }
                Step::Complete
            }
        }
    }

    fn intro_wait_ball_anims(&mut self, battler: BattlerId, primed: bool) -> Step {
        let flank = self.config.sends_out_flank().then(|| battler.flank());
        let settled = |b: BattlerId| {
            !self.presentation.ball_animation_active(b)
                && self.presentation.ball_sprite_idle(b)
                && self.presentation.sprite_idle(b)
        };
        if !settled(battler) || flank.is_some_and(|f| !settled(f)) {
            return Step::Stay;
        }
        if !primed {
            return Step::Goto(ControllerState::IntroWaitBallAnims { primed: true });
        }
        for b in std::iter::once(battler).chain(flank) {
            self.presentation.destroy_ball_sprite(b);
            let mon = self.state.active(b);
            self.presentation.update_healthbox(b, mon, HealthboxUpdate::All);
            self.presentation.set_healthbox_visible(b, true);
        }
        self.state.intro_sequence_active = false;
        Step::Goto(ControllerState::IntroWaitHealthbox)
    }

    fn intro_wait_healthbox(&mut self, battler: BattlerId) -> Step {
        let flank_ready = !self.config.sends_out_flank()
            || self.presentation.healthbox_idle(battler.flank());
        if self.presentation.healthbox_idle(battler)
            && flank_ready
            && !self.presentation.sound_busy(battler)
        {
            Step::Goto(ControllerState::IntroHealthboxDelay { frames: 3 })
        } else {
            Step::Stay
        }
    }

    /// Set up the health bar for a signed HP delta.
    pub(crate) fn start_health_bar(&mut self, battler: BattlerId, delta: i16, instant: bool) {
        let mon = self.state.active(battler);
        let setup = BarSetup {
            max: mon.max_hp as i32,
            current: if instant { 0 } else { mon.hp as i32 },
            delta: delta as i32,
        };
        self.presentation
            .start_bar(battler, BattleBar::Health, setup);
    }
}

fn complete_if(done: bool) -> Step {
    if done {
        Step::Complete
    } else {
        Step::Stay
    }
}

/// Stereo pan for sounds originating from `battler`.
pub(crate) fn pan_for(battler: BattlerId) -> i8 {
    match battler.side() {
        Side::Player => -64,
        Side::Opponent => 63,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::test_battle;
    use crate::config::EngineConfig;
    use tandem_core::{Opcode, PartyIndex};
    use tandem_test_utils::{fixtures, Call, FixedAi, ScriptedPresentation, TableSpecies, Timings};

    const B: BattlerId = BattlerId::PLAYER_RIGHT;

    fn timed(timings: Timings) -> Battle<ScriptedPresentation> {
        let mut battle = Battle::new(
            EngineConfig::default(),
            fixtures::partner_party(),
            ScriptedPresentation::new(timings),
            Box::new(FixedAi::default()),
            Box::new(TableSpecies::default()),
        )
        .unwrap();
        battle.assign_partner(B, PartyIndex(3)).unwrap();
        battle
    }

    fn run(battle: &mut Battle<ScriptedPresentation>, cmd: &[u8]) -> u32 {
        battle.issue(B, cmd).unwrap();
        for n in 1..=100 {
            battle.tick();
            if battle.is_complete(B) {
                return n;
            }
        }
        panic!("command never completed");
    }

    fn special_anims(battle: &Battle<ScriptedPresentation>) -> Vec<SpecialAnim> {
        battle
            .presentation()
            .calls()
            .iter()
            .filter_map(|c| match c {
                Call::SpecialAnimation { anim, .. } => Some(*anim),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn switch_out_clears_substitute_before_recall() {
        let mut battle = timed(Timings {
            special_anim: 3,
            ..Timings::default()
        });
        battle.state_mut().anim_mut(B).behind_substitute = true;
        run(&mut battle, &[Opcode::ReturnMonToBall.as_byte(), 0]);
        assert_eq!(
            special_anims(&battle),
            vec![SpecialAnim::SubstituteToMon, SpecialAnim::SwitchOut]
        );
        assert!(battle
            .presentation()
            .calls()
            .contains(&Call::DestroySprite { battler: B }));
        assert_eq!(battle.controller(B), Some(ControllerState::RunCommand));
    }

    #[test]
    fn instant_return_completes_in_one_tick() {
        let mut battle = timed(Timings::default());
        assert_eq!(run(&mut battle, &[Opcode::ReturnMonToBall.as_byte(), 1]), 1);
        assert!(special_anims(&battle).is_empty());
    }

    #[test]
    fn health_bar_reports_each_step() {
        let mut battle = timed(Timings::default());
        battle.presentation_mut().set_bar_steps(3);
        let hp = battle.state().active(B).hp as i32;
        let ticks = run(&mut battle, &[Opcode::HealthBarUpdate.as_byte(), 0, 10, 0]);
        assert_eq!(ticks, 5);
        let texts: Vec<_> = battle
            .presentation()
            .calls()
            .iter()
            .filter_map(|c| match c {
                Call::UpdateHealthbox {
                    update: HealthboxUpdate::HpText(v),
                    ..
                } => Some(*v),
                _ => None,
            })
            .collect();
        assert_eq!(texts, vec![hp - 3, hp - 6, hp - 10]);
        assert!(battle
            .presentation()
            .calls()
            .contains(&Call::UpdateLowHpMusic { battler: B }));
    }

    #[test]
    fn faint_plays_sound_then_removes_sprite() {
        let mut battle = timed(Timings {
            faint_slide: 4,
            ..Timings::default()
        });
        let ticks = run(&mut battle, &[Opcode::FaintAnimation.as_byte()]);
        // Dispatch, start the slide, four slide frames, then teardown.
        assert_eq!(ticks, 6);
        let calls = battle.presentation().calls();
        assert!(calls.contains(&Call::PlaySe {
            se: SE_FAINT,
            pan: -64
        }));
        assert!(calls.contains(&Call::StartFaintSlide { battler: B }));
        assert_eq!(calls.last(), Some(&Call::DestroySprite { battler: B }));
    }

    #[test]
    fn switch_in_tries_shiny_once_and_shows_healthbox() {
        let mut battle = timed(Timings {
            ball: 3,
            ..Timings::default()
        });
        battle.state_mut().anim_mut(B).behind_substitute = true;
        run(&mut battle, &[Opcode::SwitchInAnim.as_byte(), 4, 0]);
        assert_eq!(battle.state().party_index(B), PartyIndex(4));
        assert!(!battle.state().anim(B).behind_substitute);
        let calls = battle.presentation().calls();
        let shiny = calls
            .iter()
            .filter(|c| matches!(c, Call::StartShinyAnimation { .. }))
            .count();
        assert_eq!(shiny, 1);
        assert!(calls.contains(&Call::UpdateHealthbox {
            battler: B,
            update: HealthboxUpdate::All
        }));
        assert!(calls.contains(&Call::SetHealthboxVisible {
            battler: B,
            visible: true
        }));
        assert!(special_anims(&battle).is_empty());
    }

    #[test]
    fn set_controller_ignores_unassigned_battler() {
        let mut battle = test_battle();
        battle.set_controller(BattlerId::OPPONENT_LEFT, ControllerState::WaitText);
        assert_eq!(battle.controller(BattlerId::OPPONENT_LEFT), None);
    }

    #[test]
    fn pan_follows_side() {
        assert_eq!(pan_for(BattlerId::PLAYER_LEFT), -64);
        assert_eq!(pan_for(BattlerId::OPPONENT_RIGHT), 63);
    }
}
