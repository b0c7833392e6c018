//! Sprite and animation handlers.

use log::warn;
use tandem_core::{
    BattlerId, HealthboxUpdate, PartyIndex, Presentation, SpecialAnim, TrainerPic,
    TrainerPlacement,
};

use crate::battle::Battle;
use crate::controller::{ControllerState, Step};

/// Trainer pic placement: back pics sit further right than front pics,
/// and smaller pics sit lower.
fn trainer_placement(pic: TrainerPic, size: u8) -> TrainerPlacement {
    let x = match pic {
        TrainerPic::Back(_) => 90,
        TrainerPic::Front(_) => 32,
    };
    let y = (8 - size.min(8) as i16) * 4 + 80;
    TrainerPlacement { pic, x, y }
}

impl<P: Presentation> Battle<P> {
    pub(crate) fn load_mon_sprite(&mut self, battler: BattlerId) -> Step {
        let mon = self.state.active(battler);
        self.presentation.load_mon_sprite(battler, mon);
        Step::Goto(ControllerState::WaitSpriteSlideIn)
    }

    pub(crate) fn switch_in_anim(
        &mut self,
        battler: BattlerId,
        party_index: PartyIndex,
        keep_substitute: bool,
    ) -> Step {
        if self.state.set_party_index(battler, party_index).is_err() {
            warn!("battler {battler}: switch-in to invalid party slot {party_index}");
            return Step::Complete;
        }
        self.presentation
            .clear_temporary_sprite_data(battler, keep_substitute);
        let anim = self.state.anim_mut(battler);
        if !keep_substitute {
            anim.behind_substitute = false;
        }
        anim.shiny_attempted = false;
        let mon = self.state.active(battler);
        self.presentation.start_send_out(battler, mon);
        Step::Goto(ControllerState::SwitchInBall)
    }

    pub(crate) fn return_mon_to_ball(&mut self, battler: BattlerId, instant: bool) -> Step {
        if instant {
            self.presentation.destroy_sprite(battler);
            self.presentation.set_healthbox_visible(battler, false);
            Step::Complete
        } else {
            Step::Goto(ControllerState::SwitchOut { step: 0 })
        }
    }

    pub(crate) fn draw_trainer_pic(&mut self, battler: BattlerId) -> Step {
        let pic = self.config.partner.trainer_pic();
        let size = self.presentation.trainer_pic_size(pic);
        self.presentation
            .draw_trainer_pic(battler, trainer_placement(pic, size));
        Step::Goto(ControllerState::WaitSpriteIdle)
    }

    pub(crate) fn trainer_slide_back(&mut self, battler: BattlerId) -> Step {
        self.presentation.start_trainer_slide_back(battler);
        Step::Goto(ControllerState::TrainerSlideBackDone)
    }

    pub(crate) fn faint_animation(&mut self, battler: BattlerId) -> Step {
        if self.state.anim(battler).behind_substitute {
            self.presentation
                .launch_special_animation(battler, SpecialAnim::SubstituteToMon);
        }
        Step::Goto(ControllerState::FaintWaitSubstitute)
    }

    pub(crate) fn status_icon_update(&mut self, battler: BattlerId) -> Step {
        let mon = self.state.active(battler);
        self.presentation
            .update_healthbox(battler, mon, HealthboxUpdate::StatusIcon);
        Step::Goto(ControllerState::WaitStatusAnimation)
    }

    pub(crate) fn status_animation(&mut self, battler: BattlerId, status2: bool, status: u32) -> Step {
        self.presentation
            .launch_status_animation(battler, status2, status);
        Step::Goto(ControllerState::WaitStatusAnimation)
    }

    pub(crate) fn hit_animation(&mut self, battler: BattlerId) -> Step {
        if self.presentation.sprite_invisible(battler) {
            return Step::Complete;
        }
        self.presentation.start_hit_effect(battler);
        Step::Goto(ControllerState::HitBlink { frames: 0 })
    }

    pub(crate) fn sprite_invisibility(&mut self, battler: BattlerId, invisible: bool) -> Step {
        if self.presentation.sprite_present(battler) {
            self.presentation.set_sprite_invisible(battler, invisible);
            self.state.anim_mut(battler).invisible = invisible;
        }
        Step::Complete
    }

    pub(crate) fn battle_animation(&mut self, battler: BattlerId, anim_id: u8, argument: u16) -> Step {
        if self
            .presentation
            .launch_table_animation(battler, anim_id, argument)
        {
            Step::Goto(ControllerState::WaitTableAnimation)
        } else {
            Step::Complete
        }
    }
}
